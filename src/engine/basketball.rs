//! Basketball live state and reducers for baskets, fouls, counting stats,
//! timeouts, substitutions, and the game/shot clocks.

use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::{
    ReduceError, ReduceOutcome,
    event::{
        BasketPayload, ClockAction, FoulPayload, ReboundSide, ScoringEvent, StatKind, StatPayload,
        SubstitutionPayload, TimeoutPayload,
    },
    match_state::{EventRecord, ScoreSummary, Sport, TeamSide},
};

/// Team fouls in a period that put the opponent in the bonus.
pub const BONUS_FOUL_THRESHOLD: u32 = 5;

/// Made/attempted pair for one shot class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShootingLine {
    /// Successful attempts.
    pub made: u32,
    /// Total attempts.
    pub attempted: u32,
}

/// Offensive/defensive rebound split plus the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReboundLine {
    /// Offensive boards.
    pub offensive: u32,
    /// Defensive boards.
    pub defensive: u32,
    /// Sum of both.
    pub total: u32,
}

/// Counting stats shared between the team aggregate and per-player lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountingStats {
    /// Two-point and three-point attempts combined.
    pub field_goals: ShootingLine,
    /// Three-point attempts.
    pub three_pointers: ShootingLine,
    /// Free-throw attempts.
    pub free_throws: ShootingLine,
    /// Rebound split.
    pub rebounds: ReboundLine,
    /// Assists.
    pub assists: u32,
    /// Steals.
    pub steals: u32,
    /// Blocks.
    pub blocks: u32,
    /// Turnovers.
    pub turnovers: u32,
}

impl CountingStats {
    fn record_attempt(&mut self, points: u8) {
        match points {
            1 => self.free_throws.attempted += 1,
            2 => self.field_goals.attempted += 1,
            3 => {
                self.field_goals.attempted += 1;
                self.three_pointers.attempted += 1;
            }
            _ => {}
        }
    }

    fn record_make(&mut self, points: u8) {
        match points {
            1 => self.free_throws.made += 1,
            2 => self.field_goals.made += 1,
            3 => {
                self.field_goals.made += 1;
                self.three_pointers.made += 1;
            }
            _ => {}
        }
    }

    fn record_stat(&mut self, stat: StatKind) {
        match stat {
            StatKind::Rebound { side } => {
                match side {
                    ReboundSide::Offensive => self.rebounds.offensive += 1,
                    ReboundSide::Defensive => self.rebounds.defensive += 1,
                }
                self.rebounds.total += 1;
            }
            StatKind::Assist => self.assists += 1,
            StatKind::Steal => self.steals += 1,
            StatKind::Block => self.blocks += 1,
            StatKind::Turnover => self.turnovers += 1,
        }
    }
}

/// One player's live line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlayerLine {
    /// Display name.
    pub name: String,
    /// Whether the player is currently on the floor.
    pub on_floor: bool,
    /// Points scored.
    pub points: u32,
    /// Shooting and counting stats.
    #[serde(flatten)]
    pub stats: CountingStats,
    /// Personal fouls.
    pub personal_fouls: u32,
    /// Technical fouls.
    pub technical_fouls: u32,
}

/// Team foul bookkeeping for the bonus rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeamFouls {
    /// Personal fouls across the game.
    pub total: u32,
    /// Technical fouls across the game.
    pub technical: u32,
    /// Personal fouls in the current period.
    pub this_period: u32,
    /// Set once `this_period` reaches the bonus threshold.
    pub in_bonus: bool,
}

/// One side's basketball state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BasketballTeam {
    /// Team display name.
    pub name: String,
    /// Running score.
    pub score: u32,
    /// Points scored in each period, index 0 = first period.
    pub score_by_period: Vec<u32>,
    /// Foul bookkeeping.
    pub fouls: TeamFouls,
    /// Timeouts left.
    pub timeouts_remaining: u32,
    /// Aggregate team stats.
    pub totals: CountingStats,
    /// Per-player lines keyed by player id, in roster order.
    pub players: IndexMap<Uuid, PlayerLine>,
    /// Player ids currently on the floor.
    pub lineup: Vec<Uuid>,
}

impl BasketballTeam {
    /// Empty team with the configured number of timeouts.
    pub fn new(name: impl Into<String>, timeouts: u32) -> Self {
        Self {
            name: name.into(),
            score: 0,
            score_by_period: vec![0],
            fouls: TeamFouls::default(),
            timeouts_remaining: timeouts,
            totals: CountingStats::default(),
            players: IndexMap::new(),
            lineup: Vec::new(),
        }
    }
}

/// Count-down game clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GameClock {
    /// 1-based period number; values beyond 4 are overtime.
    pub period: u8,
    /// Seconds left in the period.
    pub seconds_remaining: u32,
    /// Full period length, restored on period advance.
    pub period_length_seconds: u32,
    /// Whether the clock is ticking.
    pub running: bool,
}

/// Shot clock riding on the game clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShotClock {
    /// Seconds left on the possession.
    pub seconds_remaining: u32,
    /// Full reset value.
    pub full_seconds: u32,
    /// Set when the shot clock hits zero; cleared on reset or clock start.
    pub expired: bool,
}

impl ShotClock {
    /// Wind the shot clock back to its full value.
    pub fn reset(&mut self) {
        self.seconds_remaining = self.full_seconds;
        self.expired = false;
    }
}

/// Lead swings between the two sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeadTracker {
    /// Current `home - away` differential.
    pub current: i32,
    /// Largest lead held by the home side.
    pub largest_home: u32,
    /// Largest lead held by the away side.
    pub largest_away: u32,
    /// Times the lead changed hands.
    pub lead_changes: u32,
    /// Times the score returned to level.
    pub ties: u32,
    /// Sign of the last non-zero differential; drives change detection.
    pub last_leader_sign: i8,
}

impl LeadTracker {
    fn update(&mut self, home: u32, away: u32) {
        let diff = home as i32 - away as i32;
        if diff == 0 && self.current != 0 {
            self.ties += 1;
        }
        let sign = diff.signum() as i8;
        if sign != 0 {
            if self.last_leader_sign != 0 && sign != self.last_leader_sign {
                self.lead_changes += 1;
            }
            self.last_leader_sign = sign;
        }
        if diff > 0 {
            self.largest_home = self.largest_home.max(diff as u32);
        } else if diff < 0 {
            self.largest_away = self.largest_away.max(diff.unsigned_abs());
        }
        self.current = diff;
    }
}

/// Score sample taken after every made basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreSample {
    /// Period the sample was taken in.
    pub period: u8,
    /// Clock display at the time.
    pub clock: String,
    /// Home score.
    pub home: u32,
    /// Away score.
    pub away: u32,
}

/// Full basketball live payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BasketballLive {
    /// Home side.
    pub home: BasketballTeam,
    /// Away side.
    pub away: BasketballTeam,
    /// Game clock.
    pub clock: GameClock,
    /// Shot clock.
    pub shot_clock: ShotClock,
    /// Lead swings.
    pub lead: LeadTracker,
    /// Score timeline samples.
    pub score_history: Vec<ScoreSample>,
    /// Append-only audit log.
    pub events: Vec<EventRecord>,
}

impl Default for BasketballLive {
    fn default() -> Self {
        Self {
            home: BasketballTeam::new("Home", 4),
            away: BasketballTeam::new("Away", 4),
            clock: GameClock {
                period: 1,
                seconds_remaining: 600,
                period_length_seconds: 600,
                running: false,
            },
            shot_clock: ShotClock {
                seconds_remaining: 24,
                full_seconds: 24,
                expired: false,
            },
            lead: LeadTracker::default(),
            score_history: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl BasketballLive {
    fn team_mut(&mut self, side: TeamSide) -> &mut BasketballTeam {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    /// Clock display string (`"Q2 07:41"`).
    pub fn clock_display(&self) -> String {
        format!(
            "Q{} {:02}:{:02}",
            self.clock.period,
            self.clock.seconds_remaining / 60,
            self.clock.seconds_remaining % 60
        )
    }
}

/// Refresh both display summaries from the running scores.
pub(crate) fn update_summary(live: &BasketballLive, summary: &mut ScoreSummary) {
    summary.home = live.home.score.to_string();
    summary.away = live.away.score.to_string();
}

/// Apply a basketball-scoped event.
pub(crate) fn apply(
    live: &mut BasketballLive,
    summary: &mut ScoreSummary,
    event: &ScoringEvent,
    now: SystemTime,
) -> Result<ReduceOutcome, ReduceError> {
    match event {
        ScoringEvent::Basket(payload) => Ok(apply_basket(live, summary, payload, now)),
        ScoringEvent::Foul(payload) => Ok(apply_foul(live, summary, payload, now)),
        ScoringEvent::Stat(payload) => Ok(apply_stat(live, summary, payload, now)),
        ScoringEvent::Timeout(payload) => Ok(apply_timeout(live, summary, payload, now)),
        ScoringEvent::Substitution(payload) => Ok(apply_substitution(live, summary, payload, now)),
        ScoringEvent::Clock { action } => Ok(apply_clock(live, *action)),
        ScoringEvent::PeriodAdvance => Ok(apply_period_advance(live, summary, now)),
        other => Err(ReduceError::SportMismatch {
            sport: Sport::Basketball,
            event: other.kind(),
        }),
    }
}

fn apply_basket(
    live: &mut BasketballLive,
    summary: &mut ScoreSummary,
    payload: &BasketPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let outcome = ReduceOutcome::default();
    if !(1..=3).contains(&payload.points) {
        return outcome;
    }

    let period = live.clock.period;
    let team = live.team_mut(payload.team);

    team.totals.record_attempt(payload.points);
    if let Some(player) = payload.player_id.and_then(|id| team.players.get_mut(&id)) {
        player.stats.record_attempt(payload.points);
    }

    if !payload.is_make {
        return outcome;
    }

    team.totals.record_make(payload.points);
    team.score += payload.points as u32;
    if let Some(player) = payload.player_id.and_then(|id| team.players.get_mut(&id)) {
        player.stats.record_make(payload.points);
        player.points += payload.points as u32;
    }

    // Points in the current period are whatever the running score exceeds the
    // prior periods by.
    let index = period.max(1) as usize - 1;
    if team.score_by_period.len() <= index {
        team.score_by_period.resize(index + 1, 0);
    }
    let prior: u32 = team.score_by_period[..index].iter().sum();
    team.score_by_period[index] = team.score - prior;

    let team_name = team.name.clone();
    live.lead.update(live.home.score, live.away.score);

    update_summary(live, summary);
    let clock = live.clock_display();
    live.score_history.push(ScoreSample {
        period,
        clock: clock.clone(),
        home: live.home.score,
        away: live.away.score,
    });
    live.events.push(EventRecord {
        kind: "basket".into(),
        team: Some(payload.team),
        player_id: payload.player_id,
        description: format!("{} scores {} ({})", team_name, payload.points, clock),
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(clock),
        recorded_at: now,
    });

    outcome
}

fn apply_foul(
    live: &mut BasketballLive,
    summary: &mut ScoreSummary,
    payload: &FoulPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let team = live.team_mut(payload.team);

    if payload.technical {
        team.fouls.technical += 1;
    } else {
        team.fouls.total += 1;
        team.fouls.this_period += 1;
        if team.fouls.this_period >= BONUS_FOUL_THRESHOLD {
            team.fouls.in_bonus = true;
        }
    }

    if let Some(player) = payload.player_id.and_then(|id| team.players.get_mut(&id)) {
        if payload.technical {
            player.technical_fouls += 1;
        } else {
            player.personal_fouls += 1;
        }
    }

    let team_name = team.name.clone();
    update_summary(live, summary);
    let clock = live.clock_display();
    live.events.push(EventRecord {
        kind: "foul".into(),
        team: Some(payload.team),
        player_id: payload.player_id,
        description: format!(
            "{} foul on {}",
            if payload.technical { "Technical" } else { "Personal" },
            team_name
        ),
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(clock),
        recorded_at: now,
    });

    ReduceOutcome::default()
}

fn apply_stat(
    live: &mut BasketballLive,
    summary: &mut ScoreSummary,
    payload: &StatPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let team = live.team_mut(payload.team);
    team.totals.record_stat(payload.stat);
    if let Some(player) = payload.player_id.and_then(|id| team.players.get_mut(&id)) {
        player.stats.record_stat(payload.stat);
    }

    let team_name = team.name.clone();
    update_summary(live, summary);
    let clock = live.clock_display();
    let label = match payload.stat {
        StatKind::Rebound {
            side: ReboundSide::Offensive,
        } => "offensive rebound",
        StatKind::Rebound {
            side: ReboundSide::Defensive,
        } => "defensive rebound",
        StatKind::Assist => "assist",
        StatKind::Steal => "steal",
        StatKind::Block => "block",
        StatKind::Turnover => "turnover",
    };
    live.events.push(EventRecord {
        kind: "stat".into(),
        team: Some(payload.team),
        player_id: payload.player_id,
        description: format!("{team_name} {label}"),
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(clock),
        recorded_at: now,
    });

    ReduceOutcome::default()
}

fn apply_timeout(
    live: &mut BasketballLive,
    summary: &mut ScoreSummary,
    payload: &TimeoutPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let team = live.team_mut(payload.team);
    if team.timeouts_remaining == 0 {
        return ReduceOutcome::default();
    }
    team.timeouts_remaining -= 1;

    let team_name = team.name.clone();
    update_summary(live, summary);
    let clock = live.clock_display();
    live.events.push(EventRecord {
        kind: "timeout".into(),
        team: Some(payload.team),
        player_id: None,
        description: format!("Timeout {team_name}"),
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(clock),
        recorded_at: now,
    });

    ReduceOutcome::default()
}

fn apply_substitution(
    live: &mut BasketballLive,
    summary: &mut ScoreSummary,
    payload: &SubstitutionPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let team = live.team_mut(payload.team);

    if let Some(outgoing) = team.players.get_mut(&payload.player_out) {
        outgoing.on_floor = false;
    }
    if let Some(incoming) = team.players.get_mut(&payload.player_in) {
        incoming.on_floor = true;
    }
    if let Some(slot) = team
        .lineup
        .iter_mut()
        .find(|slot| **slot == payload.player_out)
    {
        *slot = payload.player_in;
    } else if !team.lineup.contains(&payload.player_in) {
        team.lineup.push(payload.player_in);
    }

    let team_name = team.name.clone();
    update_summary(live, summary);
    let clock = live.clock_display();
    live.events.push(EventRecord {
        kind: "substitution".into(),
        team: Some(payload.team),
        player_id: Some(payload.player_in),
        description: format!("Substitution for {team_name}"),
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(clock),
        recorded_at: now,
    });

    ReduceOutcome::default()
}

fn apply_clock(live: &mut BasketballLive, action: ClockAction) -> ReduceOutcome {
    let mut outcome = ReduceOutcome::default();
    match action {
        ClockAction::Start => {
            live.clock.running = true;
            live.shot_clock.expired = false;
        }
        ClockAction::Stop => live.clock.running = false,
        ClockAction::Tick => {
            if !live.clock.running {
                return outcome;
            }
            live.clock.seconds_remaining = live.clock.seconds_remaining.saturating_sub(1);
            if live.shot_clock.seconds_remaining > 0 {
                live.shot_clock.seconds_remaining -= 1;
                if live.shot_clock.seconds_remaining == 0 {
                    live.shot_clock.expired = true;
                    live.clock.running = false;
                    outcome.shot_clock_expired = true;
                }
            }
            if live.clock.seconds_remaining == 0 {
                live.clock.running = false;
                outcome.period_ended = true;
            }
        }
    }
    outcome
}

fn apply_period_advance(
    live: &mut BasketballLive,
    summary: &mut ScoreSummary,
    now: SystemTime,
) -> ReduceOutcome {
    live.clock.period += 1;
    live.clock.seconds_remaining = live.clock.period_length_seconds;
    live.clock.running = false;
    live.shot_clock.reset();

    for team in [&mut live.home, &mut live.away] {
        team.fouls.this_period = 0;
        team.fouls.in_bonus = false;
        team.score_by_period.push(0);
    }

    update_summary(live, summary);
    live.events.push(EventRecord {
        kind: "period".into(),
        team: None,
        player_id: None,
        description: format!("Start of period {}", live.clock.period),
        score: (summary.home.clone(), summary.away.clone()),
        clock: Some(live.clock_display()),
        recorded_at: now,
    });

    ReduceOutcome::default()
}
