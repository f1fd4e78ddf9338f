//! Sport-agnostic match envelope shared by every consumer of the engine.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::{
    basketball::BasketballLive, cricket::CricketLive, football::FootballLive,
    volleyball::VolleyballLive,
};

/// Sports the engine knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    /// Limited-overs cricket (20-over innings).
    Cricket,
    /// Basketball with game + shot clocks.
    Basketball,
    /// Association football with a count-up clock.
    Football,
    /// Indoor volleyball with rotation tracking.
    Volleyball,
}

/// Lifecycle status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Created but not yet started.
    Scheduled,
    /// Being actively scored.
    Live,
    /// Between sets/periods/innings.
    Break,
    /// Completed normally.
    Finished,
    /// Called off before completion.
    Abandoned,
}

/// Side of the match an event or role is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    /// The team listed first on the fixture.
    Home,
    /// The visiting team.
    Away,
}

impl TeamSide {
    /// The other side of the fixture.
    pub fn opposite(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// Static fixture metadata carried on the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MatchMeta {
    /// Tournament the match belongs to.
    pub tournament_name: String,
    /// Venue display string.
    pub venue: String,
    /// Scheduled start.
    #[schema(value_type = String)]
    pub start_time: SystemTime,
    /// Umpires/referees announced for the fixture.
    pub officials: Vec<String>,
}

/// Display-ready score strings, one per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreSummary {
    /// Home side summary (e.g. `"124/3"`, `"87"`, sets won).
    pub home: String,
    /// Away side summary.
    pub away: String,
}

/// Append-only audit entry recorded by reducers.
///
/// Entries carry the score and clock as they stood when the event happened so
/// alert overlays can render without replaying history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventRecord {
    /// Short machine-readable kind (`"basket"`, `"wicket"`, `"set_won"`, ...).
    pub kind: String,
    /// Side the event is attributed to, when applicable.
    pub team: Option<TeamSide>,
    /// Player involved, when known.
    pub player_id: Option<Uuid>,
    /// Human-readable description for tickers and alert UI.
    pub description: String,
    /// `(home, away)` score summary at the moment of the event.
    #[schema(value_type = Vec<String>)]
    pub score: (String, String),
    /// Clock display at the moment of the event, for clocked sports.
    pub clock: Option<String>,
    /// Wall-clock time the event was recorded.
    #[schema(value_type = String)]
    pub recorded_at: SystemTime,
}

/// Sport-specific live payload. The tag must agree with the envelope `sport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "sport", rename_all = "snake_case")]
pub enum LiveData {
    /// Cricket innings state.
    Cricket(CricketLive),
    /// Basketball game state.
    Basketball(BasketballLive),
    /// Football match state.
    Football(FootballLive),
    /// Volleyball set state.
    Volleyball(VolleyballLive),
}

impl LiveData {
    /// Sport this payload belongs to.
    pub fn sport(&self) -> Sport {
        match self {
            LiveData::Cricket(_) => Sport::Cricket,
            LiveData::Basketball(_) => Sport::Basketball,
            LiveData::Football(_) => Sport::Football,
            LiveData::Volleyball(_) => Sport::Volleyball,
        }
    }

    /// Whether the payload shape matches `sport`.
    pub fn matches_sport(&self, sport: Sport) -> bool {
        self.sport() == sport
    }

    /// Structural markers a persisted snapshot must satisfy to be trusted.
    ///
    /// A snapshot failing this check is discarded during hydration in favour
    /// of a freshly synthesized state.
    pub fn structurally_sound(&self) -> bool {
        match self {
            LiveData::Cricket(live) => live.striker.player_id != live.non_striker.player_id,
            LiveData::Basketball(live) => {
                !live.home.name.is_empty() && !live.away.name.is_empty()
            }
            LiveData::Football(live) => !live.home.name.is_empty() && !live.away.name.is_empty(),
            LiveData::Volleyball(live) => {
                live.home.rotation.len() == 6 && live.away.rotation.len() == 6
            }
        }
    }

    /// Whether any scoring event has been recorded against this state.
    ///
    /// Fresh templates (no events) are still eligible for roster injection
    /// during hydration; anything scored keeps its roster untouched.
    pub fn has_recorded_events(&self) -> bool {
        match self {
            LiveData::Cricket(live) => !live.events.is_empty() || !live.ball_history.is_empty(),
            LiveData::Basketball(live) => !live.events.is_empty(),
            LiveData::Football(live) => !live.events.is_empty(),
            LiveData::Volleyball(live) => !live.events.is_empty(),
        }
    }
}

/// Root aggregate for a live match; the single document every consumer
/// re-renders from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MatchState {
    /// Stable match identifier shared with the administration store.
    pub match_id: Uuid,
    /// Sport configured for the match.
    pub sport: Sport,
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Fixture metadata.
    pub meta: MatchMeta,
    /// Display score strings, kept consistent by every reducer.
    pub score_summary: ScoreSummary,
    /// Sport-specific live payload.
    pub live: LiveData,
}

impl MatchState {
    /// Whether mutations are currently accepted for this match.
    pub fn is_scorable(&self) -> bool {
        matches!(self.status, MatchStatus::Live | MatchStatus::Break)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_side_opposite_flips() {
        assert_eq!(TeamSide::Home.opposite(), TeamSide::Away);
        assert_eq!(TeamSide::Away.opposite(), TeamSide::Home);
    }

    #[test]
    fn live_data_sport_tags_agree() {
        let live = LiveData::Volleyball(crate::engine::volleyball::VolleyballLive::default());
        assert!(live.matches_sport(Sport::Volleyball));
        assert!(!live.matches_sport(Sport::Cricket));
    }
}
