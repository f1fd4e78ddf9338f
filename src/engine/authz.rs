//! Role model and the per-mutation authorization gate.
//!
//! The gate runs at the call site of every mutating reducer invocation, never
//! inside the reducer itself, and a denied mutation is a silent no-op: no
//! state change, no broadcast. Role assignments live in the external
//! administration store and are re-resolved on every mutating call.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::{event::ScoringEvent, match_state::TeamSide};

/// Role a user holds for one specific match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScorerRole {
    /// Unrestricted administrative role; every mutation plus undo/redo.
    Admin,
    /// May only mutate home-team-scoped data.
    HomeScorer,
    /// May only mutate away-team-scoped data.
    AwayScorer,
    /// May only record player counting stats.
    StatsScorer,
    /// Generic unrestricted scoring role; every mutation plus undo/redo.
    Scorer,
    /// Viewer; reads state, never mutates, never triggers broadcasts.
    ReadOnly,
}

impl ScorerRole {
    /// Whether the role may mutate anything at all.
    pub fn can_score(self) -> bool {
        !matches!(self, ScorerRole::ReadOnly)
    }

    /// Undo/redo is reserved for the unrestricted roles; delegated scopes
    /// could otherwise revert another scorer's work.
    pub fn can_undo(self) -> bool {
        matches!(self, ScorerRole::Admin | ScorerRole::Scorer)
    }

    /// Whether this role may apply `event` to the match.
    pub fn permits(self, event: &ScoringEvent) -> bool {
        match self {
            ScorerRole::Admin | ScorerRole::Scorer => true,
            ScorerRole::HomeScorer => team_of(event) == Some(TeamSide::Home),
            ScorerRole::AwayScorer => team_of(event) == Some(TeamSide::Away),
            ScorerRole::StatsScorer => matches!(
                event,
                ScoringEvent::Stat(_) | ScoringEvent::RallyStat(_)
            ),
            ScorerRole::ReadOnly => false,
        }
    }
}

/// Side a mutation is scoped to, when it carries one. Match-wide mutations
/// (cricket balls, clock control, rules, status) return `None` and are
/// reserved for the unrestricted roles.
pub fn team_of(event: &ScoringEvent) -> Option<TeamSide> {
    match event {
        ScoringEvent::Basket(payload) => Some(payload.team),
        ScoringEvent::Foul(payload) => Some(payload.team),
        ScoringEvent::Stat(payload) => Some(payload.team),
        ScoringEvent::Timeout(payload) => Some(payload.team),
        ScoringEvent::Substitution(payload) => Some(payload.team),
        ScoringEvent::Goal(payload) => Some(payload.team),
        ScoringEvent::Card(payload) => Some(payload.team),
        ScoringEvent::Point(payload) => Some(payload.team),
        ScoringEvent::RallyStat(payload) => Some(payload.team),
        ScoringEvent::TeamStat(payload) => Some(payload.team),
        ScoringEvent::Ball(_)
        | ScoringEvent::Possession { .. }
        | ScoringEvent::RulesUpdate { .. }
        | ScoringEvent::Clock { .. }
        | ScoringEvent::PeriodAdvance
        | ScoringEvent::StatusUpdate { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::event::{BallPayload, BasketPayload, StatKind, StatPayload};

    fn home_basket() -> ScoringEvent {
        ScoringEvent::Basket(BasketPayload {
            team: TeamSide::Home,
            points: 2,
            is_make: true,
            player_id: None,
        })
    }

    fn away_stat() -> ScoringEvent {
        ScoringEvent::Stat(StatPayload {
            team: TeamSide::Away,
            player_id: None,
            stat: StatKind::Assist,
        })
    }

    #[test]
    fn away_scorer_cannot_touch_home_team() {
        assert!(!ScorerRole::AwayScorer.permits(&home_basket()));
        assert!(ScorerRole::HomeScorer.permits(&home_basket()));
    }

    #[test]
    fn stats_scorer_is_limited_to_counting_stats() {
        assert!(ScorerRole::StatsScorer.permits(&away_stat()));
        assert!(!ScorerRole::StatsScorer.permits(&home_basket()));
    }

    #[test]
    fn team_scorers_cannot_send_match_wide_events() {
        let ball = ScoringEvent::Ball(BallPayload {
            runs_scored: 4,
            extras: None,
            wicket: None,
            speed_kmph: None,
        });
        assert!(!ScorerRole::HomeScorer.permits(&ball));
        assert!(!ScorerRole::HomeScorer.permits(&ScoringEvent::PeriodAdvance));
        assert!(ScorerRole::Scorer.permits(&ball));
        assert!(ScorerRole::Admin.permits(&ScoringEvent::PeriodAdvance));
    }

    #[test]
    fn read_only_permits_nothing() {
        assert!(!ScorerRole::ReadOnly.permits(&home_basket()));
        assert!(!ScorerRole::ReadOnly.permits(&away_stat()));
        assert!(!ScorerRole::ReadOnly.can_score());
    }

    #[test]
    fn undo_is_reserved_for_unrestricted_roles() {
        assert!(ScorerRole::Admin.can_undo());
        assert!(ScorerRole::Scorer.can_undo());
        assert!(!ScorerRole::HomeScorer.can_undo());
        assert!(!ScorerRole::AwayScorer.can_undo());
        assert!(!ScorerRole::StatsScorer.can_undo());
        assert!(!ScorerRole::ReadOnly.can_undo());
    }
}
