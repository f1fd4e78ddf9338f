//! The live match-state engine: typed sport schemas, per-event reducers,
//! bounded undo/redo history, and the role-based authorization gate.
//!
//! Reducers are synchronous in-memory transforms over the match document.
//! They are total over well-formed input: events aimed at the wrong sport and
//! unknown player ids degrade to (partial) no-ops instead of panicking, so a
//! malformed UI action can never corrupt shared state mid-broadcast.

pub mod authz;
pub mod basketball;
pub mod cricket;
pub mod event;
pub mod football;
pub mod history;
pub mod match_state;
pub mod seed;
pub mod volleyball;

use std::time::SystemTime;

use thiserror::Error;

pub use self::authz::ScorerRole;
pub use self::event::ScoringEvent;
pub use self::history::{DEFAULT_UNDO_DEPTH, MatchHistory};
pub use self::match_state::{
    LiveData, MatchMeta, MatchState, MatchStatus, ScoreSummary, Sport, TeamSide,
};
use self::volleyball::SetScore;

/// Derived notifications surfaced by a transition, on top of the state delta.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReduceOutcome {
    /// Milestone descriptions crossed by this event.
    pub milestones: Vec<String>,
    /// Set score pushed into the book, when a volleyball set just closed.
    pub set_completed: Option<SetScore>,
    /// Whether the shot clock expired on this tick.
    pub shot_clock_expired: bool,
    /// Whether the game clock ran out on this tick.
    pub period_ended: bool,
}

/// Failure modes of a transition. Neither crosses the mutation boundary as a
/// panic; callers log and drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReduceError {
    /// Event kind does not apply to the sport being scored.
    #[error("event `{event}` does not apply to {sport:?}")]
    SportMismatch {
        /// Sport of the live payload.
        sport: Sport,
        /// Offending event kind.
        event: &'static str,
    },
    /// Match is not in a scorable lifecycle status.
    #[error("match is not scorable while {0:?}")]
    NotScorable(MatchStatus),
}

/// Apply one event to the match document, updating every derived field.
///
/// Deterministic given `(state, event, now)`; consults nothing beyond the
/// provided snapshot.
pub fn reduce(
    state: &mut MatchState,
    event: &ScoringEvent,
    now: SystemTime,
) -> Result<ReduceOutcome, ReduceError> {
    if let ScoringEvent::StatusUpdate { status } = event {
        state.status = *status;
        return Ok(ReduceOutcome::default());
    }

    if !state.is_scorable() {
        return Err(ReduceError::NotScorable(state.status));
    }

    match &mut state.live {
        LiveData::Cricket(live) => cricket::apply(live, &mut state.score_summary, event, now),
        LiveData::Basketball(live) => basketball::apply(live, &mut state.score_summary, event, now),
        LiveData::Football(live) => football::apply(live, &mut state.score_summary, event, now),
        LiveData::Volleyball(live) => volleyball::apply(live, &mut state.score_summary, event, now),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::engine::event::{BasketPayload, GoalPayload};

    fn meta() -> MatchMeta {
        MatchMeta {
            tournament_name: "Test Cup".into(),
            venue: "Arena".into(),
            start_time: SystemTime::UNIX_EPOCH,
            officials: vec![],
        }
    }

    fn live_state(sport: Sport) -> MatchState {
        let mut state = seed::default_state(Uuid::new_v4(), sport, meta());
        state.status = MatchStatus::Live;
        state
    }

    #[test]
    fn scheduled_match_rejects_scoring_events() {
        let mut state = seed::default_state(Uuid::new_v4(), Sport::Football, meta());
        let err = reduce(
            &mut state,
            &ScoringEvent::Goal(GoalPayload {
                team: TeamSide::Home,
                player_id: None,
            }),
            SystemTime::UNIX_EPOCH,
        )
        .unwrap_err();
        assert_eq!(err, ReduceError::NotScorable(MatchStatus::Scheduled));
    }

    #[test]
    fn status_update_is_always_accepted() {
        let mut state = seed::default_state(Uuid::new_v4(), Sport::Football, meta());
        reduce(
            &mut state,
            &ScoringEvent::StatusUpdate {
                status: MatchStatus::Live,
            },
            SystemTime::UNIX_EPOCH,
        )
        .unwrap();
        assert_eq!(state.status, MatchStatus::Live);
    }

    #[test]
    fn wrong_sport_event_is_a_sport_mismatch() {
        let mut state = live_state(Sport::Football);
        let before = state.clone();

        let err = reduce(
            &mut state,
            &ScoringEvent::Basket(BasketPayload {
                team: TeamSide::Home,
                points: 2,
                is_make: true,
                player_id: None,
            }),
            SystemTime::UNIX_EPOCH,
        )
        .unwrap_err();

        assert!(matches!(err, ReduceError::SportMismatch { sport: Sport::Football, .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn goal_flows_through_the_dispatcher() {
        let mut state = live_state(Sport::Football);
        reduce(
            &mut state,
            &ScoringEvent::Goal(GoalPayload {
                team: TeamSide::Away,
                player_id: None,
            }),
            SystemTime::UNIX_EPOCH,
        )
        .unwrap();
        assert_eq!(state.score_summary.away, "1");
    }
}
