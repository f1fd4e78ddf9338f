//! Discrete scoring events accepted by the reducer, as submitted by scorer
//! clients over REST or WebSocket.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::{
    match_state::{MatchStatus, TeamSide},
    volleyball::VolleyballRules,
};

/// Kinds of extra delivery in cricket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    /// Ball outside the batter's reach; penalty run, re-bowled.
    Wide,
    /// Illegal delivery; penalty run, re-bowled.
    NoBall,
    /// Runs taken without bat contact.
    Bye,
    /// Runs deflected off the batter's body.
    LegBye,
}

impl ExtraKind {
    /// Wides and no-balls do not count as legal deliveries.
    pub fn is_illegal_delivery(self) -> bool {
        matches!(self, ExtraKind::Wide | ExtraKind::NoBall)
    }
}

/// Extra runs attached to a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtraDelivery {
    /// Extra classification.
    pub kind: ExtraKind,
    /// Runs awarded for the extra (penalty included).
    pub runs: u32,
}

/// How a wicket fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WicketKind {
    /// Stumps hit by the delivery.
    Bowled,
    /// Caught by a fielder.
    Caught,
    /// Leg before wicket.
    Lbw,
    /// Run out attempting a run.
    RunOut,
    /// Stumped by the keeper.
    Stumped,
    /// Batter dislodged their own stumps.
    HitWicket,
}

impl WicketKind {
    /// Run-outs are not credited to the bowler's tally.
    pub fn credits_bowler(self) -> bool {
        !matches!(self, WicketKind::RunOut)
    }
}

/// A single delivery in a cricket innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BallPayload {
    /// Runs scored off the bat.
    #[serde(default)]
    pub runs_scored: u32,
    /// Extra runs, when the delivery was not a clean legal ball.
    #[serde(default)]
    pub extras: Option<ExtraDelivery>,
    /// Wicket, when one fell on this delivery.
    #[serde(default)]
    pub wicket: Option<WicketKind>,
    /// Measured delivery speed, when the venue provides it.
    #[serde(default)]
    pub speed_kmph: Option<f32>,
}

/// A basketball shot attempt (made or missed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BasketPayload {
    /// Attempting side.
    pub team: TeamSide,
    /// Value of the attempt: 1 (free throw), 2 or 3.
    pub points: u8,
    /// Whether the attempt scored.
    pub is_make: bool,
    /// Shooter, when identified.
    #[serde(default)]
    pub player_id: Option<Uuid>,
}

/// A personal or technical foul.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FoulPayload {
    /// Offending side.
    pub team: TeamSide,
    /// Offender, when identified.
    #[serde(default)]
    pub player_id: Option<Uuid>,
    /// Technical fouls are tallied separately and skip the bonus count.
    #[serde(default)]
    pub technical: bool,
}

/// Rebound direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReboundSide {
    /// Off the team's own missed shot.
    Offensive,
    /// Off the opponent's missed shot.
    Defensive,
}

/// Generic basketball counting stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "stat", rename_all = "snake_case")]
pub enum StatKind {
    /// Rebound; requires a direction and also bumps the aggregate counter.
    Rebound {
        /// Offensive or defensive board.
        side: ReboundSide,
    },
    /// Assist on a made basket.
    Assist,
    /// Steal from the opponent.
    Steal,
    /// Blocked shot.
    Block,
    /// Lost possession.
    Turnover,
}

/// A player-attributable counting stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatPayload {
    /// Side credited with the stat.
    pub team: TeamSide,
    /// Player credited, when identified.
    #[serde(default)]
    pub player_id: Option<Uuid>,
    /// Which counter to bump.
    #[serde(flatten)]
    pub stat: StatKind,
}

/// A timeout call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeoutPayload {
    /// Side calling the timeout.
    pub team: TeamSide,
}

/// A player swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubstitutionPayload {
    /// Side making the change.
    pub team: TeamSide,
    /// Player leaving the floor/court.
    pub player_out: Uuid,
    /// Player coming on.
    pub player_in: Uuid,
}

/// A football goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GoalPayload {
    /// Scoring side.
    pub team: TeamSide,
    /// Scorer, when identified.
    #[serde(default)]
    pub player_id: Option<Uuid>,
}

/// Card colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Caution.
    Yellow,
    /// Dismissal.
    Red,
}

/// A disciplinary card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CardPayload {
    /// Side the carded player belongs to.
    pub team: TeamSide,
    /// Carded player, when identified.
    #[serde(default)]
    pub player_id: Option<Uuid>,
    /// Yellow or red.
    pub card: CardKind,
}

/// Football team-level stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "stat", rename_all = "snake_case")]
pub enum FootballStatKind {
    /// Shot at goal.
    Shot {
        /// Whether the shot was on target.
        on_target: bool,
    },
    /// Corner kick awarded.
    Corner,
    /// Offside called.
    Offside,
}

/// A football team-stat increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FootballStatPayload {
    /// Side credited (or charged, for offsides).
    pub team: TeamSide,
    /// Which counter to bump.
    #[serde(flatten)]
    pub stat: FootballStatKind,
}

/// How a volleyball rally ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    /// Service ace by the acting team.
    Ace,
    /// Attack kill by the acting team.
    Kill,
    /// Stuff block by the acting team.
    Block,
    /// Error by the acting team; the point goes to the opponent.
    Error,
    /// Plain point with no stat attribution.
    Point,
}

/// A volleyball rally outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PointPayload {
    /// Acting side (the side that performed the ace/kill/block/error).
    pub team: TeamSide,
    /// Rally classification.
    pub kind: PointKind,
    /// Acting player, when identified.
    #[serde(default)]
    pub player_id: Option<Uuid>,
}

/// Non-scoring volleyball stats kept on player lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VolleyballStatKind {
    /// Defensive dig.
    Dig,
    /// Setting assist.
    Assist,
}

/// A volleyball stat with no effect on the rally score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VolleyballStatPayload {
    /// Side credited.
    pub team: TeamSide,
    /// Player credited, when identified.
    #[serde(default)]
    pub player_id: Option<Uuid>,
    /// Which counter to bump.
    pub stat: VolleyballStatKind,
}

/// Clock control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
    /// Start the running clock.
    Start,
    /// Stop the running clock.
    Stop,
    /// Advance one second (issued by the ticker, not by scorers).
    Tick,
}

/// Every mutation the engine accepts, across all sports.
///
/// The reducer treats events targeted at the wrong sport as no-ops rather
/// than errors that could take down a live broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringEvent {
    /// Cricket delivery.
    Ball(BallPayload),
    /// Basketball shot attempt.
    Basket(BasketPayload),
    /// Basketball foul.
    Foul(FoulPayload),
    /// Basketball counting stat.
    Stat(StatPayload),
    /// Timeout (basketball decrements remaining, volleyball caps used).
    Timeout(TimeoutPayload),
    /// Player substitution (basketball lineup, volleyball rotation slot).
    Substitution(SubstitutionPayload),
    /// Football goal.
    Goal(GoalPayload),
    /// Football card.
    Card(CardPayload),
    /// Volleyball rally outcome.
    Point(PointPayload),
    /// Volleyball dig/assist bookkeeping.
    RallyStat(VolleyballStatPayload),
    /// Football team stat (shots, corners, offsides).
    TeamStat(FootballStatPayload),
    /// Football possession split update.
    Possession {
        /// Home share of possession, `0..=100`.
        home_pct: u8,
    },
    /// Replace the volleyball rules wholesale; already-recorded sets keep
    /// the targets they were played under.
    RulesUpdate {
        /// New rule set.
        rules: VolleyballRules,
    },
    /// Clock start/stop/tick for clocked sports.
    Clock {
        /// Requested clock action.
        action: ClockAction,
    },
    /// Advance to the next period/half, resetting per-period counters.
    PeriodAdvance,
    /// Move the match through its lifecycle.
    StatusUpdate {
        /// New lifecycle status.
        status: MatchStatus,
    },
}

impl ScoringEvent {
    /// Short label used in logs and audit entries.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringEvent::Ball(_) => "ball",
            ScoringEvent::Basket(_) => "basket",
            ScoringEvent::Foul(_) => "foul",
            ScoringEvent::Stat(_) => "stat",
            ScoringEvent::Timeout(_) => "timeout",
            ScoringEvent::Substitution(_) => "substitution",
            ScoringEvent::Goal(_) => "goal",
            ScoringEvent::Card(_) => "card",
            ScoringEvent::Point(_) => "point",
            ScoringEvent::RallyStat(_) => "rally_stat",
            ScoringEvent::TeamStat(_) => "team_stat",
            ScoringEvent::Possession { .. } => "possession",
            ScoringEvent::RulesUpdate { .. } => "rules_update",
            ScoringEvent::Clock { .. } => "clock",
            ScoringEvent::PeriodAdvance => "period_advance",
            ScoringEvent::StatusUpdate { .. } => "status_update",
        }
    }

    /// Whether this event originates from the ticker rather than a scorer.
    pub fn is_tick(&self) -> bool {
        matches!(
            self,
            ScoringEvent::Clock {
                action: ClockAction::Tick
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_and_no_ball_are_illegal_deliveries() {
        assert!(ExtraKind::Wide.is_illegal_delivery());
        assert!(ExtraKind::NoBall.is_illegal_delivery());
        assert!(!ExtraKind::Bye.is_illegal_delivery());
        assert!(!ExtraKind::LegBye.is_illegal_delivery());
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = ScoringEvent::Basket(BasketPayload {
            team: TeamSide::Home,
            points: 3,
            is_make: true,
            player_id: None,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"basket\""));
        let back: ScoringEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn stat_payload_flattens_the_stat_tag() {
        let payload = StatPayload {
            team: TeamSide::Away,
            player_id: None,
            stat: StatKind::Rebound {
                side: ReboundSide::Defensive,
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["stat"], "rebound");
        assert_eq!(json["side"], "defensive");
    }
}
