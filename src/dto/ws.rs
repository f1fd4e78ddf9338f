use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::dto::validation::validate_event;
use crate::engine::{MatchState, ScorerRole, ScoringEvent};

/// Failure to turn a raw text frame into a usable inbound message.
#[derive(Debug, Error)]
pub enum InboundMessageError {
    /// The frame was not valid JSON for the message schema.
    #[error("malformed scorer message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The frame decoded but carried an invalid event payload.
    #[error("invalid scorer message: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
/// Messages accepted from scorer and overlay WebSocket clients.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScorerInboundMessage {
    /// First frame on every connection: the opaque session credential.
    Identify {
        /// Session credential issued by the external identity layer.
        token: String,
    },
    /// A scoring mutation to run through the gate and reducer.
    Action {
        /// Event payload.
        event: ScoringEvent,
    },
    /// Undo the last mutation (unrestricted roles only).
    Undo,
    /// Redo the last undone mutation (unrestricted roles only).
    Redo,
    /// Forward-compatible catch-all.
    #[serde(other)]
    Unknown,
}

impl ScorerInboundMessage {
    /// Parse and validate a raw text frame.
    pub fn from_json_str(raw: &str) -> Result<Self, InboundMessageError> {
        let message: Self = serde_json::from_str(raw)?;
        if let ScorerInboundMessage::Action { event } = &message {
            validate_event(event).map_err(InboundMessageError::Invalid)?;
        }
        Ok(message)
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Messages pushed to scorer and overlay WebSocket clients.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScorerOutboundMessage {
    /// Sent once after successful identification.
    Hello {
        /// Role resolved for this connection.
        role: ScorerRole,
        /// Authoritative state at the time of connection.
        state: Box<MatchState>,
    },
    /// Full state replacement; consumers re-render from this document.
    State {
        /// The new authoritative state.
        state: Box<MatchState>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identify_frame_parses() {
        let message =
            ScorerInboundMessage::from_json_str(r#"{"type":"identify","token":"abc"}"#).unwrap();
        assert!(matches!(
            message,
            ScorerInboundMessage::Identify { token } if token == "abc"
        ));
    }

    #[test]
    fn action_frame_carries_a_scoring_event() {
        let message = ScorerInboundMessage::from_json_str(
            r#"{"type":"action","event":{"type":"goal","team":"home"}}"#,
        )
        .unwrap();
        assert!(matches!(message, ScorerInboundMessage::Action { .. }));
    }

    #[test]
    fn invalid_basket_points_are_rejected() {
        let err = ScorerInboundMessage::from_json_str(
            r#"{"type":"action","event":{"type":"basket","team":"home","points":5,"is_make":true}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, InboundMessageError::Invalid(_)));
    }

    #[test]
    fn unknown_type_falls_through_to_unknown() {
        let message = ScorerInboundMessage::from_json_str(r#"{"type":"mystery"}"#).unwrap();
        assert!(matches!(message, ScorerInboundMessage::Unknown));
    }
}
