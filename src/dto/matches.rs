use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::MatchRecordEntity,
    dto::{format_system_time, validation::validate_event},
    engine::{MatchState, ScoringEvent, Sport},
};

/// Body of a scoring mutation submitted over REST.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitEventRequest {
    /// Event to run through the authorization gate and reducer.
    pub event: ScoringEvent,
}

impl Validate for SubmitEventRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(message) = validate_event(&self.event) {
            let mut error = ValidationError::new("event");
            error.message = Some(message.into());
            errors.add("event", error);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Result of a mutation attempt.
///
/// Denied and not-applicable mutations answer with `applied: false` and no
/// state; surfacing them as HTTP errors would invent a user-facing failure
/// mode the scoring UI is expected to prevent up front.
#[derive(Debug, Serialize, ToSchema)]
pub struct MutationResponse {
    /// Whether the mutation changed the match state.
    pub applied: bool,
    /// The new authoritative state, present when `applied` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MatchState>,
}

impl MutationResponse {
    /// A mutation that went through.
    pub fn applied(state: MatchState) -> Self {
        Self {
            applied: true,
            state: Some(state),
        }
    }

    /// A silently dropped mutation.
    pub fn dropped() -> Self {
        Self {
            applied: false,
            state: None,
        }
    }
}

/// Fixture projection returned when listing matches.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchListItem {
    /// Match identifier.
    pub id: Uuid,
    /// Configured sport.
    pub sport: Sport,
    /// Tournament name.
    pub tournament_name: String,
    /// Venue display string.
    pub venue: String,
    /// Scheduled start, RFC 3339.
    pub start_time: String,
    /// Home team name.
    pub home: String,
    /// Away team name.
    pub away: String,
}

impl From<MatchRecordEntity> for MatchListItem {
    fn from(record: MatchRecordEntity) -> Self {
        Self {
            id: record.id,
            sport: record.sport,
            tournament_name: record.tournament_name,
            venue: record.venue,
            start_time: format_system_time(record.start_time),
            home: record.home_team.name,
            away: record.away_team.name,
        }
    }
}
