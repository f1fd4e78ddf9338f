//! Session-credential resolution.
//!
//! Credential issuance and validation belong to the external identity
//! collaborator; this service only performs the opaque decode step. A
//! credential that fails to decode resolves to an anonymous viewer rather
//! than an error, matching the read-by-default posture of the engine.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use uuid::Uuid;

/// Identity resolved from a session credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Stable user id shared with the role-assignment store.
    pub user_id: Uuid,
}

/// Decode an opaque session credential into an identity.
pub fn resolve_session(token: &str) -> Option<SessionIdentity> {
    let trimmed = token.trim();
    let trimmed = trimmed.strip_prefix("Bearer ").unwrap_or(trimmed);
    Uuid::parse_str(trimmed)
        .ok()
        .map(|user_id| SessionIdentity { user_id })
}

/// Resolve the identity carried in the `Authorization` header, if any.
pub fn identity_from_headers(headers: &HeaderMap) -> Option<SessionIdentity> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(resolve_session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_accepted() {
        let id = Uuid::new_v4();
        let identity = resolve_session(&format!("Bearer {id}")).unwrap();
        assert_eq!(identity.user_id, id);
    }

    #[test]
    fn bare_uuid_is_accepted() {
        let id = Uuid::new_v4();
        assert_eq!(resolve_session(&id.to_string()).unwrap().user_id, id);
    }

    #[test]
    fn garbage_resolves_to_anonymous() {
        assert!(resolve_session("not-a-credential").is_none());
        assert!(resolve_session("").is_none());
    }
}
