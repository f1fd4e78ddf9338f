//! Football live state and reducers for goals, cards, substitutions, team
//! stats and the count-up clock.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::{
    ReduceError, ReduceOutcome,
    event::{
        CardKind, CardPayload, ClockAction, FootballStatKind, FootballStatPayload, FoulPayload,
        GoalPayload, ScoringEvent, SubstitutionPayload,
    },
    match_state::{EventRecord, ScoreSummary, Sport, TeamSide},
};

/// Squad member carried for lineup display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FootballPlayer {
    /// Stable player id from the administration store.
    pub player_id: Uuid,
    /// Display name.
    pub name: String,
    /// Shirt number, when known.
    pub shirt_number: Option<u8>,
}

/// One side's football state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FootballTeam {
    /// Team display name.
    pub name: String,
    /// Goals scored.
    pub score: u32,
    /// Possession share in percent.
    pub possession_pct: u8,
    /// Shots taken.
    pub shots: u32,
    /// Shots on target.
    pub shots_on_target: u32,
    /// Corners won.
    pub corners: u32,
    /// Fouls conceded.
    pub fouls: u32,
    /// Offsides called.
    pub offsides: u32,
    /// Full squad.
    pub squad: Vec<FootballPlayer>,
    /// Player ids currently on the pitch.
    pub lineup: Vec<Uuid>,
}

/// Phase of the match clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FootballPeriod {
    /// Minutes 0-45.
    FirstHalf,
    /// Minutes 45-90.
    SecondHalf,
    /// Beyond 90 minutes.
    ExtraTime,
}

/// Count-up match clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FootballClock {
    /// Seconds elapsed since kick-off, continuous across halves.
    pub seconds: u32,
    /// Current phase.
    pub period: FootballPeriod,
    /// Whether the clock is ticking.
    pub running: bool,
}

impl FootballClock {
    /// Minute component of the elapsed time.
    pub fn minute(&self) -> u32 {
        self.seconds / 60
    }

    /// Clock display string (`"67:41"`).
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

/// A goal entry in the match timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GoalRecord {
    /// Scoring side.
    pub team: TeamSide,
    /// Scorer, when identified.
    pub player_id: Option<Uuid>,
    /// Clock minute the goal was scored in.
    pub minute: u32,
}

/// A card entry in the match timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CardRecord {
    /// Carded side.
    pub team: TeamSide,
    /// Carded player, when identified.
    pub player_id: Option<Uuid>,
    /// Yellow or red.
    pub card: CardKind,
    /// Clock minute of the card.
    pub minute: u32,
}

/// A substitution entry in the match timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubstitutionRecord {
    /// Side making the change.
    pub team: TeamSide,
    /// Player leaving the pitch.
    pub player_out: Uuid,
    /// Player coming on.
    pub player_in: Uuid,
    /// Clock minute of the change.
    pub minute: u32,
}

/// Full football live payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FootballLive {
    /// Home side.
    pub home: FootballTeam,
    /// Away side.
    pub away: FootballTeam,
    /// Match clock.
    pub clock: FootballClock,
    /// Goal timeline.
    pub goals: Vec<GoalRecord>,
    /// Card timeline.
    pub cards: Vec<CardRecord>,
    /// Substitution timeline.
    pub substitutions: Vec<SubstitutionRecord>,
    /// Append-only audit log.
    pub events: Vec<EventRecord>,
}

impl Default for FootballLive {
    fn default() -> Self {
        Self {
            home: FootballTeam {
                name: "Home".into(),
                possession_pct: 50,
                ..FootballTeam::default()
            },
            away: FootballTeam {
                name: "Away".into(),
                possession_pct: 50,
                ..FootballTeam::default()
            },
            clock: FootballClock {
                seconds: 0,
                period: FootballPeriod::FirstHalf,
                running: false,
            },
            goals: Vec::new(),
            cards: Vec::new(),
            substitutions: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl FootballLive {
    fn team_mut(&mut self, side: TeamSide) -> &mut FootballTeam {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }
}

/// Refresh both display summaries from the goal tallies.
pub(crate) fn update_summary(live: &FootballLive, summary: &mut ScoreSummary) {
    summary.home = live.home.score.to_string();
    summary.away = live.away.score.to_string();
}

/// Apply a football-scoped event.
pub(crate) fn apply(
    live: &mut FootballLive,
    summary: &mut ScoreSummary,
    event: &ScoringEvent,
    now: SystemTime,
) -> Result<ReduceOutcome, ReduceError> {
    match event {
        ScoringEvent::Goal(payload) => Ok(apply_goal(live, summary, payload, now)),
        ScoringEvent::Card(payload) => Ok(apply_card(live, summary, payload, now)),
        ScoringEvent::Substitution(payload) => Ok(apply_substitution(live, summary, payload, now)),
        ScoringEvent::Foul(payload) => Ok(apply_foul(live, payload)),
        ScoringEvent::TeamStat(payload) => Ok(apply_team_stat(live, payload)),
        ScoringEvent::Possession { home_pct } => Ok(apply_possession(live, *home_pct)),
        ScoringEvent::Clock { action } => Ok(apply_clock(live, *action)),
        ScoringEvent::PeriodAdvance => Ok(apply_period_advance(live, summary, now)),
        other => Err(ReduceError::SportMismatch {
            sport: Sport::Football,
            event: other.kind(),
        }),
    }
}

fn apply_goal(
    live: &mut FootballLive,
    summary: &mut ScoreSummary,
    payload: &GoalPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let minute = live.clock.minute();
    let team = live.team_mut(payload.team);
    team.score += 1;
    let team_name = team.name.clone();

    live.goals.push(GoalRecord {
        team: payload.team,
        player_id: payload.player_id,
        minute,
    });

    update_summary(live, summary);
    live.events.push(EventRecord {
        kind: "goal".into(),
        team: Some(payload.team),
        player_id: payload.player_id,
        description: format!("Goal for {team_name} ({minute}')"),
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(live.clock.display()),
        recorded_at: now,
    });

    ReduceOutcome::default()
}

fn apply_card(
    live: &mut FootballLive,
    summary: &mut ScoreSummary,
    payload: &CardPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let minute = live.clock.minute();
    let team_name = live.team_mut(payload.team).name.clone();

    live.cards.push(CardRecord {
        team: payload.team,
        player_id: payload.player_id,
        card: payload.card,
        minute,
    });

    update_summary(live, summary);
    live.events.push(EventRecord {
        kind: "card".into(),
        team: Some(payload.team),
        player_id: payload.player_id,
        description: format!("{:?} card against {team_name} ({minute}')", payload.card),
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(live.clock.display()),
        recorded_at: now,
    });

    ReduceOutcome::default()
}

fn apply_substitution(
    live: &mut FootballLive,
    summary: &mut ScoreSummary,
    payload: &SubstitutionPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let minute = live.clock.minute();
    let team = live.team_mut(payload.team);
    if let Some(slot) = team
        .lineup
        .iter_mut()
        .find(|slot| **slot == payload.player_out)
    {
        *slot = payload.player_in;
    }
    let team_name = team.name.clone();

    live.substitutions.push(SubstitutionRecord {
        team: payload.team,
        player_out: payload.player_out,
        player_in: payload.player_in,
        minute,
    });

    update_summary(live, summary);
    live.events.push(EventRecord {
        kind: "substitution".into(),
        team: Some(payload.team),
        player_id: Some(payload.player_in),
        description: format!("Substitution for {team_name} ({minute}')"),
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(live.clock.display()),
        recorded_at: now,
    });

    ReduceOutcome::default()
}

fn apply_foul(live: &mut FootballLive, payload: &FoulPayload) -> ReduceOutcome {
    live.team_mut(payload.team).fouls += 1;
    ReduceOutcome::default()
}

fn apply_team_stat(live: &mut FootballLive, payload: &FootballStatPayload) -> ReduceOutcome {
    let team = live.team_mut(payload.team);
    match payload.stat {
        FootballStatKind::Shot { on_target } => {
            team.shots += 1;
            if on_target {
                team.shots_on_target += 1;
            }
        }
        FootballStatKind::Corner => team.corners += 1,
        FootballStatKind::Offside => team.offsides += 1,
    }
    ReduceOutcome::default()
}

fn apply_possession(live: &mut FootballLive, home_pct: u8) -> ReduceOutcome {
    let home_pct = home_pct.min(100);
    live.home.possession_pct = home_pct;
    live.away.possession_pct = 100 - home_pct;
    ReduceOutcome::default()
}

fn apply_clock(live: &mut FootballLive, action: ClockAction) -> ReduceOutcome {
    match action {
        ClockAction::Start => live.clock.running = true,
        ClockAction::Stop => live.clock.running = false,
        ClockAction::Tick => {
            // The football clock only counts upward; stoppage is display-side.
            if live.clock.running {
                live.clock.seconds += 1;
            }
        }
    }
    ReduceOutcome::default()
}

fn apply_period_advance(
    live: &mut FootballLive,
    summary: &mut ScoreSummary,
    now: SystemTime,
) -> ReduceOutcome {
    let (next, floor_seconds) = match live.clock.period {
        FootballPeriod::FirstHalf => (FootballPeriod::SecondHalf, 45 * 60),
        FootballPeriod::SecondHalf | FootballPeriod::ExtraTime => {
            (FootballPeriod::ExtraTime, 90 * 60)
        }
    };
    live.clock.period = next;
    live.clock.seconds = live.clock.seconds.max(floor_seconds);
    live.clock.running = false;

    update_summary(live, summary);
    live.events.push(EventRecord {
        kind: "period".into(),
        team: None,
        player_id: None,
        description: match next {
            FootballPeriod::SecondHalf => "Second half".into(),
            FootballPeriod::ExtraTime => "Extra time".into(),
            FootballPeriod::FirstHalf => "Kick-off".into(),
        },
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(live.clock.display()),
        recorded_at: now,
    });

    ReduceOutcome::default()
}
