//! Volleyball live state and reducers: rally points with side-out rotation,
//! capped substitutions/timeouts, and configurable set rules.

use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::{
    ReduceError, ReduceOutcome,
    event::{
        PointKind, PointPayload, ScoringEvent, SubstitutionPayload, TimeoutPayload,
        VolleyballStatKind, VolleyballStatPayload,
    },
    match_state::{EventRecord, ScoreSummary, Sport, TeamSide},
};

/// Court positions per rotation.
pub const ROTATION_SLOTS: usize = 6;
/// Position code marking a libero, exempt from the substitution cap.
pub const LIBERO_POSITION: &str = "L";

/// Configurable match rules. Replacing them never rewrites sets already in
/// the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VolleyballRules {
    /// Maximum number of sets (3 or 5).
    pub best_of: u8,
    /// Points needed to win a regular set.
    pub points_per_set: u32,
    /// Points needed to win the deciding set.
    pub deciding_set_points: u32,
    /// Non-libero substitutions allowed per set.
    pub substitutions_per_set: u32,
    /// Timeouts allowed per set.
    pub timeouts_per_set: u32,
}

impl Default for VolleyballRules {
    fn default() -> Self {
        Self {
            best_of: 5,
            points_per_set: 25,
            deciding_set_points: 15,
            substitutions_per_set: 6,
            timeouts_per_set: 2,
        }
    }
}

impl VolleyballRules {
    /// Sets needed to take the match.
    pub fn sets_to_win(&self) -> u32 {
        u32::from(self.best_of) / 2 + 1
    }
}

/// One player's live line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VolleyballPlayer {
    /// Display name.
    pub name: String,
    /// Position code (`"OH"`, `"S"`, `"L"`, ...).
    pub position: String,
    /// Attack kills.
    pub kills: u32,
    /// Stuff blocks.
    pub blocks: u32,
    /// Service aces.
    pub aces: u32,
    /// Defensive digs.
    pub digs: u32,
    /// Setting assists.
    pub assists: u32,
    /// Errors committed.
    pub errors: u32,
    /// Points credited.
    pub points: u32,
}

impl VolleyballPlayer {
    /// Whether the player wears the libero jersey.
    pub fn is_libero(&self) -> bool {
        self.position == LIBERO_POSITION
    }
}

/// One side's volleyball state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VolleyballTeam {
    /// Team display name.
    pub name: String,
    /// Sets already won.
    pub sets_won: u32,
    /// On-court order, always exactly six active player ids, zone-ordered
    /// with the server at the front.
    pub rotation: Vec<Uuid>,
    /// Non-libero substitutions used this set.
    pub substitutions_used: u32,
    /// Timeouts used this set.
    pub timeouts_used: u32,
    /// Per-player lines keyed by player id, in roster order.
    pub players: IndexMap<Uuid, VolleyballPlayer>,
}

impl VolleyballTeam {
    /// Empty team with a placeholder six-player rotation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets_won: 0,
            rotation: (0..ROTATION_SLOTS).map(|_| Uuid::new_v4()).collect(),
            substitutions_used: 0,
            timeouts_used: 0,
            players: IndexMap::new(),
        }
    }

    /// Rotate one slot: the front player serves next from the back.
    fn rotate(&mut self) {
        if !self.rotation.is_empty() {
            self.rotation.rotate_left(1);
        }
    }
}

/// Final score of a completed set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SetScore {
    /// Home points.
    pub home: u32,
    /// Away points.
    pub away: u32,
}

impl SetScore {
    fn side(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    fn side_mut(&mut self, side: TeamSide) -> &mut u32 {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }
}

/// Full volleyball live payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VolleyballLive {
    /// Home side.
    pub home: VolleyballTeam,
    /// Away side.
    pub away: VolleyballTeam,
    /// Completed sets, in order.
    pub sets: Vec<SetScore>,
    /// 0-based index of the set in progress.
    pub current_set: u32,
    /// Live points in the current set.
    pub score: SetScore,
    /// Side currently serving; only changes on a side-out.
    pub serving: TeamSide,
    /// Rules in force.
    pub rules: VolleyballRules,
    /// Append-only audit log.
    pub events: Vec<EventRecord>,
}

impl Default for VolleyballLive {
    fn default() -> Self {
        Self {
            home: VolleyballTeam::new("Home"),
            away: VolleyballTeam::new("Away"),
            sets: Vec::new(),
            current_set: 0,
            score: SetScore::default(),
            serving: TeamSide::Home,
            rules: VolleyballRules::default(),
            events: Vec::new(),
        }
    }
}

impl VolleyballLive {
    fn team(&self, side: TeamSide) -> &VolleyballTeam {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    fn team_mut(&mut self, side: TeamSide) -> &mut VolleyballTeam {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    /// Whether the set in progress is the last the rules allow.
    pub fn is_deciding_set(&self) -> bool {
        self.current_set + 1 >= u32::from(self.rules.best_of)
    }

    /// Point target for the set in progress.
    pub fn set_target(&self) -> u32 {
        if self.is_deciding_set() {
            self.rules.deciding_set_points
        } else {
            self.rules.points_per_set
        }
    }
}

/// Refresh both display summaries as completed sets won per side.
pub(crate) fn update_summary(live: &VolleyballLive, summary: &mut ScoreSummary) {
    summary.home = live.home.sets_won.to_string();
    summary.away = live.away.sets_won.to_string();
}

/// Apply a volleyball-scoped event.
pub(crate) fn apply(
    live: &mut VolleyballLive,
    summary: &mut ScoreSummary,
    event: &ScoringEvent,
    now: SystemTime,
) -> Result<ReduceOutcome, ReduceError> {
    match event {
        ScoringEvent::Point(payload) => Ok(apply_point(live, summary, payload, now)),
        ScoringEvent::RallyStat(payload) => Ok(apply_rally_stat(live, payload)),
        ScoringEvent::Substitution(payload) => Ok(apply_substitution(live, summary, payload, now)),
        ScoringEvent::Timeout(payload) => Ok(apply_timeout(live, summary, payload, now)),
        ScoringEvent::RulesUpdate { rules } => Ok(apply_rules_update(live, summary, *rules, now)),
        other => Err(ReduceError::SportMismatch {
            sport: Sport::Volleyball,
            event: other.kind(),
        }),
    }
}

fn apply_point(
    live: &mut VolleyballLive,
    summary: &mut ScoreSummary,
    payload: &PointPayload,
    now: SystemTime,
) -> ReduceOutcome {
    // Player bookkeeping happens on the acting side before the shared score
    // application; an error still belongs to the side that made it.
    if let Some(player) = payload
        .player_id
        .and_then(|id| live.team_mut(payload.team).players.get_mut(&id))
    {
        match payload.kind {
            PointKind::Ace => player.aces += 1,
            PointKind::Kill => player.kills += 1,
            PointKind::Block => player.blocks += 1,
            PointKind::Error => player.errors += 1,
            PointKind::Point => {}
        }
    }

    let scoring_side = match payload.kind {
        PointKind::Error => payload.team.opposite(),
        _ => payload.team,
    };
    let credited_player = match payload.kind {
        PointKind::Ace | PointKind::Kill | PointKind::Block => payload.player_id,
        PointKind::Error | PointKind::Point => None,
    };

    score_point(live, summary, scoring_side, credited_player, payload.kind, now)
}

/// Shared score application: point, side-out rotation, set evaluation.
fn score_point(
    live: &mut VolleyballLive,
    summary: &mut ScoreSummary,
    side: TeamSide,
    credited_player: Option<Uuid>,
    kind: PointKind,
    now: SystemTime,
) -> ReduceOutcome {
    let mut outcome = ReduceOutcome::default();

    *live.score.side_mut(side) += 1;
    if let Some(player) = credited_player.and_then(|id| live.team_mut(side).players.get_mut(&id)) {
        player.points += 1;
    }

    // Side-out: the receiving side won the rally, takes the serve, and
    // rotates one slot.
    if live.serving != side {
        live.serving = side;
        live.team_mut(side).rotate();
    }

    let my = live.score.side(side);
    let opp = live.score.side(side.opposite());
    let target = live.set_target();

    update_summary(live, summary);
    let team_name = live.team(side).name.clone();
    live.events.push(EventRecord {
        kind: "point".into(),
        team: Some(side),
        player_id: credited_player,
        description: format!(
            "{team_name} point ({kind:?}), {}-{}",
            live.score.home, live.score.away
        ),
        score: (live.score.home.to_string(), live.score.away.to_string()),
        clock: None,
        recorded_at: now,
    });

    if my >= target && my - opp >= 2 {
        let finished = live.score;
        live.sets.push(finished);
        live.team_mut(side).sets_won += 1;
        live.current_set += 1;
        live.score = SetScore::default();
        for team in [&mut live.home, &mut live.away] {
            team.substitutions_used = 0;
            team.timeouts_used = 0;
        }

        update_summary(live, summary);
        let team_name = live.team(side).name.clone();
        live.events.push(EventRecord {
            kind: "set_won".into(),
            team: Some(side),
            player_id: None,
            description: format!("{team_name} takes the set {}-{}", finished.home, finished.away),
            score: (summary.home.clone(), summary.away.clone()),
            clock: None,
            recorded_at: now,
        });
        outcome.set_completed = Some(finished);
    }

    outcome
}

fn apply_rally_stat(live: &mut VolleyballLive, payload: &VolleyballStatPayload) -> ReduceOutcome {
    if let Some(player) = payload
        .player_id
        .and_then(|id| live.team_mut(payload.team).players.get_mut(&id))
    {
        match payload.stat {
            VolleyballStatKind::Dig => player.digs += 1,
            VolleyballStatKind::Assist => player.assists += 1,
        }
    }
    ReduceOutcome::default()
}

fn apply_substitution(
    live: &mut VolleyballLive,
    summary: &mut ScoreSummary,
    payload: &SubstitutionPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let cap = live.rules.substitutions_per_set;
    let team = live.team_mut(payload.team);

    let Some(slot) = team
        .rotation
        .iter()
        .position(|id| *id == payload.player_out)
    else {
        return ReduceOutcome::default();
    };

    let involves_libero = [payload.player_out, payload.player_in]
        .iter()
        .any(|id| team.players.get(id).is_some_and(VolleyballPlayer::is_libero));

    if !involves_libero {
        // Non-libero changes burn one of the capped substitutions.
        if team.substitutions_used >= cap {
            return ReduceOutcome::default();
        }
        team.substitutions_used += 1;
    }

    team.rotation[slot] = payload.player_in;
    let team_name = team.name.clone();

    update_summary(live, summary);
    live.events.push(EventRecord {
        kind: "substitution".into(),
        team: Some(payload.team),
        player_id: Some(payload.player_in),
        description: format!("Substitution for {team_name}"),
        score: (live.score.home.to_string(), live.score.away.to_string()),
        clock: None,
        recorded_at: now,
    });

    ReduceOutcome::default()
}

fn apply_timeout(
    live: &mut VolleyballLive,
    summary: &mut ScoreSummary,
    payload: &TimeoutPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let cap = live.rules.timeouts_per_set;
    let team = live.team_mut(payload.team);
    if team.timeouts_used >= cap {
        return ReduceOutcome::default();
    }
    team.timeouts_used += 1;
    let team_name = team.name.clone();

    update_summary(live, summary);
    live.events.push(EventRecord {
        kind: "timeout".into(),
        team: Some(payload.team),
        player_id: None,
        description: format!("Timeout {team_name}"),
        score: (live.score.home.to_string(), live.score.away.to_string()),
        clock: None,
        recorded_at: now,
    });

    ReduceOutcome::default()
}

fn apply_rules_update(
    live: &mut VolleyballLive,
    summary: &mut ScoreSummary,
    rules: VolleyballRules,
    now: SystemTime,
) -> ReduceOutcome {
    live.rules = rules;
    update_summary(live, summary);
    live.events.push(EventRecord {
        kind: "rules_update".into(),
        team: None,
        player_id: None,
        description: format!(
            "Rules updated: best of {}, {} points per set",
            rules.best_of, rules.points_per_set
        ),
        score: (summary.home.clone(), summary.away.clone()),
        clock: None,
        recorded_at: now,
    });
    ReduceOutcome::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(team: TeamSide, kind: PointKind) -> PointPayload {
        PointPayload {
            team,
            kind,
            player_id: None,
        }
    }

    fn apply_one(live: &mut VolleyballLive, summary: &mut ScoreSummary, payload: PointPayload) {
        apply_point(live, summary, &payload, SystemTime::UNIX_EPOCH);
    }

    fn team_with_players(name: &str, positions: &[&str]) -> (VolleyballTeam, Vec<Uuid>) {
        let mut team = VolleyballTeam::new(name);
        team.players.clear();
        team.rotation.clear();
        let mut ids = Vec::new();
        for (index, position) in positions.iter().enumerate() {
            let id = Uuid::new_v4();
            team.players.insert(
                id,
                VolleyballPlayer {
                    name: format!("Player {index}"),
                    position: (*position).into(),
                    ..VolleyballPlayer::default()
                },
            );
            if team.rotation.len() < ROTATION_SLOTS {
                team.rotation.push(id);
            }
            ids.push(id);
        }
        (team, ids)
    }

    #[test]
    fn point_for_serving_side_keeps_serve_and_rotation() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        live.serving = TeamSide::Home;
        let rotation_before = live.home.rotation.clone();

        apply_one(&mut live, &mut summary, point(TeamSide::Home, PointKind::Kill));

        assert_eq!(live.score.home, 1);
        assert_eq!(live.serving, TeamSide::Home);
        assert_eq!(live.home.rotation, rotation_before);
    }

    #[test]
    fn side_out_flips_serve_and_rotates_one_slot() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        live.serving = TeamSide::Home;
        let rotation_before = live.away.rotation.clone();

        apply_one(&mut live, &mut summary, point(TeamSide::Away, PointKind::Kill));

        assert_eq!(live.serving, TeamSide::Away);
        let mut expected = rotation_before;
        expected.rotate_left(1);
        assert_eq!(live.away.rotation, expected);
        assert_eq!(live.away.rotation.len(), ROTATION_SLOTS);
    }

    #[test]
    fn error_credits_the_opposing_team() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        let (home, ids) = team_with_players("Home", &["OH", "S", "MB", "OP", "OH", "MB"]);
        live.home = home;
        live.serving = TeamSide::Away;

        apply_point(
            &mut live,
            &mut summary,
            &PointPayload {
                team: TeamSide::Home,
                kind: PointKind::Error,
                player_id: Some(ids[0]),
            },
            SystemTime::UNIX_EPOCH,
        );

        assert_eq!(live.score.away, 1);
        assert_eq!(live.score.home, 0);
        assert_eq!(live.home.players[&ids[0]].errors, 1);
        // The away side was already serving, so no rotation happened.
        assert_eq!(live.serving, TeamSide::Away);
    }

    #[test]
    fn ace_credits_player_stats_and_point() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        let (home, ids) = team_with_players("Home", &["OH", "S", "MB", "OP", "OH", "MB"]);
        live.home = home;
        live.serving = TeamSide::Home;

        apply_point(
            &mut live,
            &mut summary,
            &PointPayload {
                team: TeamSide::Home,
                kind: PointKind::Ace,
                player_id: Some(ids[1]),
            },
            SystemTime::UNIX_EPOCH,
        );

        let player = &live.home.players[&ids[1]];
        assert_eq!(player.aces, 1);
        assert_eq!(player.points, 1);
    }

    #[test]
    fn set_closes_only_with_two_point_margin() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        live.score = SetScore { home: 24, away: 24 };
        live.serving = TeamSide::Home;

        apply_one(&mut live, &mut summary, point(TeamSide::Home, PointKind::Kill));

        // 25-24 is not enough at a 25-point target.
        assert!(live.sets.is_empty());
        assert_eq!(live.score, SetScore { home: 25, away: 24 });
    }

    #[test]
    fn kill_at_24_23_closes_the_set() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        live.score = SetScore { home: 24, away: 23 };
        live.serving = TeamSide::Home;

        let outcome = apply_point(
            &mut live,
            &mut summary,
            &point(TeamSide::Home, PointKind::Kill),
            SystemTime::UNIX_EPOCH,
        );

        assert_eq!(live.sets, vec![SetScore { home: 25, away: 23 }]);
        assert_eq!(live.current_set, 1);
        assert_eq!(live.score, SetScore::default());
        assert_eq!(live.home.sets_won, 1);
        assert_eq!(summary.home, "1");
        assert_eq!(summary.away, "0");
        assert_eq!(outcome.set_completed, Some(SetScore { home: 25, away: 23 }));
        assert!(live.events.iter().any(|e| e.kind == "set_won"));
    }

    #[test]
    fn set_close_resets_per_set_counters() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        live.score = SetScore { home: 24, away: 20 };
        live.serving = TeamSide::Home;
        live.home.substitutions_used = 3;
        live.away.timeouts_used = 2;

        apply_one(&mut live, &mut summary, point(TeamSide::Home, PointKind::Point));

        assert_eq!(live.home.substitutions_used, 0);
        assert_eq!(live.away.timeouts_used, 0);
    }

    #[test]
    fn deciding_set_uses_the_lower_target() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        live.current_set = 4;
        live.score = SetScore { home: 14, away: 12 };
        live.serving = TeamSide::Home;

        apply_one(&mut live, &mut summary, point(TeamSide::Home, PointKind::Kill));

        assert_eq!(live.sets, vec![SetScore { home: 15, away: 12 }]);
    }

    #[test]
    fn non_libero_substitution_burns_the_cap() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        let (home, ids) =
            team_with_players("Home", &["OH", "S", "MB", "OP", "OH", "MB", "OH"]);
        live.home = home;

        apply_substitution(
            &mut live,
            &mut summary,
            &SubstitutionPayload {
                team: TeamSide::Home,
                player_out: ids[0],
                player_in: ids[6],
            },
            SystemTime::UNIX_EPOCH,
        );

        assert_eq!(live.home.substitutions_used, 1);
        assert_eq!(live.home.rotation[0], ids[6]);
    }

    #[test]
    fn libero_substitution_is_exempt_from_the_cap() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        let (home, ids) = team_with_players("Home", &["OH", "S", "MB", "OP", "OH", "MB", "L"]);
        live.home = home;

        apply_substitution(
            &mut live,
            &mut summary,
            &SubstitutionPayload {
                team: TeamSide::Home,
                player_out: ids[2],
                player_in: ids[6],
            },
            SystemTime::UNIX_EPOCH,
        );

        assert_eq!(live.home.substitutions_used, 0);
        assert_eq!(live.home.rotation[2], ids[6]);
    }

    #[test]
    fn substitution_at_the_cap_is_rejected() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        let (home, ids) =
            team_with_players("Home", &["OH", "S", "MB", "OP", "OH", "MB", "OH"]);
        live.home = home;
        live.home.substitutions_used = live.rules.substitutions_per_set;

        apply_substitution(
            &mut live,
            &mut summary,
            &SubstitutionPayload {
                team: TeamSide::Home,
                player_out: ids[0],
                player_in: ids[6],
            },
            SystemTime::UNIX_EPOCH,
        );

        assert_eq!(live.home.rotation[0], ids[0]);
        assert_eq!(
            live.home.substitutions_used,
            live.rules.substitutions_per_set
        );
    }

    #[test]
    fn timeouts_cap_per_set() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        let timeout = TimeoutPayload {
            team: TeamSide::Home,
        };

        for _ in 0..3 {
            apply_timeout(&mut live, &mut summary, &timeout, SystemTime::UNIX_EPOCH);
        }

        assert_eq!(live.home.timeouts_used, 2);
    }

    #[test]
    fn rules_update_replaces_wholesale_without_touching_sets() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        live.sets.push(SetScore { home: 25, away: 17 });

        apply_rules_update(
            &mut live,
            &mut summary,
            VolleyballRules {
                best_of: 3,
                points_per_set: 21,
                deciding_set_points: 15,
                substitutions_per_set: 6,
                timeouts_per_set: 2,
            },
            SystemTime::UNIX_EPOCH,
        );

        assert_eq!(live.rules.points_per_set, 21);
        assert_eq!(live.sets, vec![SetScore { home: 25, away: 17 }]);
    }

    #[test]
    fn dig_and_assist_update_player_lines_only() {
        let mut live = VolleyballLive::default();
        let mut summary = ScoreSummary::default();
        let (home, ids) = team_with_players("Home", &["OH", "S", "MB", "OP", "OH", "MB"]);
        live.home = home;

        let _ = apply(
            &mut live,
            &mut summary,
            &ScoringEvent::RallyStat(VolleyballStatPayload {
                team: TeamSide::Home,
                player_id: Some(ids[1]),
                stat: VolleyballStatKind::Assist,
            }),
            SystemTime::UNIX_EPOCH,
        );

        assert_eq!(live.home.players[&ids[1]].assists, 1);
        assert_eq!(live.score, SetScore::default());
    }
}
