//! Cricket live state and the ball-by-ball reducer.
//!
//! The innings model is limited-overs (T20): a fixed 20-over innings drives
//! the run-rate projections. Overs are rendered as `"N.B"` with the ball
//! component always in `[0, 6)`.

use std::mem;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::{
    ReduceError, ReduceOutcome,
    event::{BallPayload, ExtraDelivery, ExtraKind, ScoringEvent, WicketKind},
    match_state::{EventRecord, ScoreSummary, Sport, TeamSide},
};

/// Legal deliveries per over.
pub const BALLS_PER_OVER: u32 = 6;
/// Innings length used for projections.
pub const INNINGS_OVERS: u32 = 20;
/// Team totals that earn a milestone entry when first crossed.
const MILESTONES: [u32; 4] = [50, 100, 150, 200];

/// Batting-side player entry carried for roster display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SquadPlayer {
    /// Stable player id from the administration store.
    pub player_id: Uuid,
    /// Display name.
    pub name: String,
}

/// A team's name and squad as shown on the scorecard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CricketTeam {
    /// Team display name.
    pub name: String,
    /// Squad list injected at hydration time.
    pub squad: Vec<SquadPlayer>,
}

/// Live batting figures for one of the two batters at the crease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatterStats {
    /// Player identity.
    pub player_id: Uuid,
    /// Display name.
    pub name: String,
    /// Runs off the bat.
    pub runs: u32,
    /// Legal balls faced.
    pub balls: u32,
    /// Boundary fours hit.
    pub fours: u32,
    /// Boundary sixes hit.
    pub sixes: u32,
    /// Runs per 100 balls.
    pub strike_rate: f32,
    /// Set once a wicket falls against this batter.
    pub is_out: bool,
}

impl BatterStats {
    fn fresh(player_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            strike_rate: 0.0,
            is_out: false,
        }
    }

    fn refresh_strike_rate(&mut self) {
        self.strike_rate = if self.balls == 0 {
            0.0
        } else {
            self.runs as f32 * 100.0 / self.balls as f32
        };
    }
}

/// Live bowling figures for the current bowler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BowlerStats {
    /// Player identity.
    pub player_id: Uuid,
    /// Display name.
    pub name: String,
    /// Legal deliveries bowled.
    pub legal_balls: u32,
    /// Overs display (`"3.4"`).
    pub overs: String,
    /// Overs conceding no runs.
    pub maidens: u32,
    /// Dot balls bowled.
    pub dots: u32,
    /// Runs conceded (bat runs plus wide/no-ball penalties).
    pub runs_conceded: u32,
    /// Wickets credited.
    pub wickets: u32,
    /// Runs conceded per over.
    pub economy: f32,
}

impl BowlerStats {
    fn fresh(player_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
            legal_balls: 0,
            overs: format_overs(0),
            maidens: 0,
            dots: 0,
            runs_conceded: 0,
            wickets: 0,
            economy: 0.0,
        }
    }

    fn refresh_derived(&mut self) {
        self.overs = format_overs(self.legal_balls);
        self.economy = if self.legal_balls == 0 {
            0.0
        } else {
            self.runs_conceded as f32 * BALLS_PER_OVER as f32 / self.legal_balls as f32
        };
    }
}

/// Extras conceded so far, bucketed by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtrasTally {
    /// Wide deliveries.
    pub wides: u32,
    /// No-balls.
    pub no_balls: u32,
    /// Byes.
    pub byes: u32,
    /// Leg byes.
    pub leg_byes: u32,
    /// Sum of all buckets.
    pub total: u32,
}

impl ExtrasTally {
    fn add(&mut self, extra: ExtraDelivery) {
        match extra.kind {
            ExtraKind::Wide => self.wides += extra.runs,
            ExtraKind::NoBall => self.no_balls += extra.runs,
            ExtraKind::Bye => self.byes += extra.runs,
            ExtraKind::LegBye => self.leg_byes += extra.runs,
        }
        self.total += extra.runs;
    }
}

/// One completed over in the innings transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OverSummary {
    /// 1-based over number.
    pub over_number: u32,
    /// Runs scored in the over (bat and extras).
    pub runs_conceded: u32,
    /// Wickets lost in the over.
    pub wickets_lost: u32,
    /// Team total when the over closed.
    pub total_score_at_end: u32,
}

/// Audit entry for a single delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BallRecord {
    /// Over display at the time of the delivery (`"0.1"`).
    pub over: String,
    /// Runs off the bat.
    pub runs_scored: u32,
    /// Extras attached to the delivery.
    pub extras: Option<ExtraDelivery>,
    /// Wicket that fell, if any.
    pub wicket: Option<WicketKind>,
    /// Measured speed, when provided.
    pub speed_kmph: Option<f32>,
    /// Team total after the delivery.
    pub total_after: u32,
}

/// Current and extrapolated scoring rates over the fixed innings length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RunRateProjection {
    /// Runs per over so far.
    pub current_rate: f32,
    /// Final total if the current rate holds.
    pub at_current_rate: u32,
    /// Final total scoring 6 an over from here.
    pub at_six_per_over: u32,
    /// Final total scoring 8 an over from here.
    pub at_eight_per_over: u32,
    /// Final total scoring 10 an over from here.
    pub at_ten_per_over: u32,
}

/// A team-total milestone crossed during the innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Milestone {
    /// Threshold crossed (50/100/150/200).
    pub threshold: u32,
    /// Overs display when it was crossed.
    pub over: String,
    /// Ticker description.
    pub description: String,
}

/// Runs and balls added since the last wicket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Partnership {
    /// Runs added by the current pair.
    pub runs: u32,
    /// Legal balls faced by the current pair.
    pub balls: u32,
}

/// Full cricket live payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CricketLive {
    /// Side currently batting.
    pub batting: TeamSide,
    /// Home team roster.
    pub home_team: CricketTeam,
    /// Away team roster.
    pub away_team: CricketTeam,
    /// Team total runs.
    pub total_runs: u32,
    /// Wickets fallen.
    pub wickets: u32,
    /// Legal deliveries bowled this innings.
    pub legal_balls: u32,
    /// Overs display (`"N.B"`, ball in `[0, 6)`).
    pub overs: String,
    /// Batter on strike. Always a different player from `non_striker`.
    pub striker: BatterStats,
    /// Batter at the non-striker's end.
    pub non_striker: BatterStats,
    /// Current bowler figures.
    pub bowler: BowlerStats,
    /// Runs scored in the over in progress.
    pub current_over_runs: u32,
    /// Wickets fallen in the over in progress.
    pub current_over_wickets: u32,
    /// Ball-by-ball history.
    pub ball_history: Vec<BallRecord>,
    /// One entry per completed over.
    pub over_transcript: Vec<OverSummary>,
    /// Run-rate and forward projections.
    pub projection: RunRateProjection,
    /// Milestones crossed so far.
    pub milestones: Vec<Milestone>,
    /// Extras tally.
    pub extras: ExtrasTally,
    /// Current partnership.
    pub partnership: Partnership,
    /// Append-only audit log.
    pub events: Vec<EventRecord>,
}

impl Default for CricketLive {
    fn default() -> Self {
        Self {
            batting: TeamSide::Home,
            home_team: CricketTeam::default(),
            away_team: CricketTeam::default(),
            total_runs: 0,
            wickets: 0,
            legal_balls: 0,
            overs: format_overs(0),
            striker: BatterStats::fresh(Uuid::new_v4(), "Batter 1"),
            non_striker: BatterStats::fresh(Uuid::new_v4(), "Batter 2"),
            bowler: BowlerStats::fresh(Uuid::new_v4(), "Bowler"),
            current_over_runs: 0,
            current_over_wickets: 0,
            ball_history: Vec::new(),
            over_transcript: Vec::new(),
            projection: RunRateProjection::default(),
            milestones: Vec::new(),
            extras: ExtrasTally::default(),
            partnership: Partnership::default(),
            events: Vec::new(),
        }
    }
}

impl CricketLive {
    /// Replace the two batters at the crease, keeping the distinct-id invariant.
    pub fn set_batters(&mut self, striker: (Uuid, String), non_striker: (Uuid, String)) {
        self.striker = BatterStats::fresh(striker.0, striker.1);
        self.non_striker = BatterStats::fresh(non_striker.0, non_striker.1);
    }

    fn score_line(&self) -> String {
        format!("{}/{}", self.total_runs, self.wickets)
    }
}

/// Render a legal-ball count as the `"N.B"` overs display.
pub fn format_overs(legal_balls: u32) -> String {
    format!(
        "{}.{}",
        legal_balls / BALLS_PER_OVER,
        legal_balls % BALLS_PER_OVER
    )
}

/// Apply a cricket-scoped event, updating the score summary for the batting
/// side as part of the transition.
pub(crate) fn apply(
    live: &mut CricketLive,
    summary: &mut ScoreSummary,
    event: &ScoringEvent,
    now: SystemTime,
) -> Result<ReduceOutcome, ReduceError> {
    match event {
        ScoringEvent::Ball(payload) => Ok(apply_ball(live, summary, payload, now)),
        other => Err(ReduceError::SportMismatch {
            sport: Sport::Cricket,
            event: other.kind(),
        }),
    }
}

fn apply_ball(
    live: &mut CricketLive,
    summary: &mut ScoreSummary,
    payload: &BallPayload,
    now: SystemTime,
) -> ReduceOutcome {
    let mut outcome = ReduceOutcome::default();
    let previous_total = live.total_runs;

    let is_illegal = payload
        .extras
        .is_some_and(|extra| extra.kind.is_illegal_delivery());
    let extra_runs = payload.extras.map_or(0, |extra| extra.runs);
    let bat_runs = payload.runs_scored;

    live.total_runs += bat_runs + extra_runs;
    live.current_over_runs += bat_runs + extra_runs;
    if let Some(extra) = payload.extras {
        live.extras.add(extra);
    }

    // Bat runs always credit the striker; byes and leg byes never reach them.
    live.striker.runs += bat_runs;
    match bat_runs {
        4 => live.striker.fours += 1,
        6 => live.striker.sixes += 1,
        _ => {}
    }

    // Byes and leg byes are not charged against the bowler.
    live.bowler.runs_conceded += bat_runs + if is_illegal { extra_runs } else { 0 };

    let mut over_completed = false;
    if !is_illegal {
        live.striker.balls += 1;
        live.legal_balls += 1;
        live.bowler.legal_balls += 1;
        live.partnership.balls += 1;
        if bat_runs == 0 && extra_runs == 0 {
            live.bowler.dots += 1;
        }
        over_completed = live.legal_balls % BALLS_PER_OVER == 0;
    }
    live.partnership.runs += bat_runs + extra_runs;

    live.overs = format_overs(live.legal_balls);
    live.striker.refresh_strike_rate();
    live.bowler.refresh_derived();

    let mut out_batter = None;
    if let Some(wicket) = payload.wicket {
        live.wickets += 1;
        live.current_over_wickets += 1;
        if wicket.credits_bowler() {
            live.bowler.wickets += 1;
        }
        live.striker.is_out = true;
        out_batter = Some(live.striker.player_id);
        live.partnership = Partnership::default();
    }

    // Strike rotates on an odd bat count and again when the over closes; the
    // two conditions compose rather than short-circuit.
    let mut rotate = !is_illegal && bat_runs % 2 == 1;
    if over_completed {
        rotate = !rotate;
    }
    if rotate {
        mem::swap(&mut live.striker, &mut live.non_striker);
    }

    if over_completed {
        if live.current_over_runs == 0 {
            live.bowler.maidens += 1;
        }
        live.over_transcript.push(OverSummary {
            over_number: live.legal_balls / BALLS_PER_OVER,
            runs_conceded: live.current_over_runs,
            wickets_lost: live.current_over_wickets,
            total_score_at_end: live.total_runs,
        });
        live.current_over_runs = 0;
        live.current_over_wickets = 0;
    }

    refresh_projection(live);

    live.ball_history.push(BallRecord {
        over: live.overs.clone(),
        runs_scored: bat_runs,
        extras: payload.extras,
        wicket: payload.wicket,
        speed_kmph: payload.speed_kmph,
        total_after: live.total_runs,
    });

    update_summary(live, summary);
    let score_snapshot = (summary.home.clone(), summary.away.clone());

    if let Some(wicket) = payload.wicket {
        live.events.push(EventRecord {
            kind: "wicket".into(),
            team: Some(live.batting),
            player_id: out_batter,
            description: format!("Wicket ({wicket:?}) at {}", live.overs),
            score: score_snapshot.clone(),
            clock: None,
            recorded_at: now,
        });
    } else if bat_runs == 4 || bat_runs == 6 {
        live.events.push(EventRecord {
            kind: "boundary".into(),
            team: Some(live.batting),
            player_id: None,
            description: format!("{} runs off the bat at {}", bat_runs, live.overs),
            score: score_snapshot.clone(),
            clock: None,
            recorded_at: now,
        });
    }

    for threshold in MILESTONES {
        if previous_total < threshold && live.total_runs >= threshold {
            let description = format!(
                "{} brings up {} in {} overs",
                live.batting_team_name(),
                threshold,
                live.overs
            );
            live.milestones.push(Milestone {
                threshold,
                over: live.overs.clone(),
                description: description.clone(),
            });
            live.events.push(EventRecord {
                kind: "milestone".into(),
                team: Some(live.batting),
                player_id: None,
                description: description.clone(),
                score: score_snapshot.clone(),
                clock: None,
                recorded_at: now,
            });
            outcome.milestones.push(description);
        }
    }

    outcome
}

impl CricketLive {
    fn batting_team_name(&self) -> &str {
        let name = match self.batting {
            TeamSide::Home => self.home_team.name.as_str(),
            TeamSide::Away => self.away_team.name.as_str(),
        };
        if name.is_empty() { "Batting side" } else { name }
    }
}

/// Refresh the batting side's display summary from the live totals.
pub(crate) fn update_summary(live: &CricketLive, summary: &mut ScoreSummary) {
    let line = live.score_line();
    match live.batting {
        TeamSide::Home => summary.home = line,
        TeamSide::Away => summary.away = line,
    }
}

fn refresh_projection(live: &mut CricketLive) {
    let total_balls = INNINGS_OVERS * BALLS_PER_OVER;
    if live.legal_balls == 0 {
        live.projection = RunRateProjection::default();
        return;
    }
    let rate = live.total_runs as f32 * BALLS_PER_OVER as f32 / live.legal_balls as f32;
    let remaining_balls = total_balls.saturating_sub(live.legal_balls);
    let remaining_overs = remaining_balls as f32 / BALLS_PER_OVER as f32;

    let extrapolate =
        |per_over: f32| live.total_runs + (per_over * remaining_overs).round() as u32;

    live.projection = RunRateProjection {
        current_rate: rate,
        at_current_rate: extrapolate(rate),
        at_six_per_over: extrapolate(6.0),
        at_eight_per_over: extrapolate(8.0),
        at_ten_per_over: extrapolate(10.0),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(runs: u32) -> BallPayload {
        BallPayload {
            runs_scored: runs,
            extras: None,
            wicket: None,
            speed_kmph: None,
        }
    }

    fn extra(kind: ExtraKind, runs: u32) -> BallPayload {
        BallPayload {
            runs_scored: 0,
            extras: Some(ExtraDelivery { kind, runs }),
            wicket: None,
            speed_kmph: None,
        }
    }

    fn apply_one(live: &mut CricketLive, summary: &mut ScoreSummary, payload: BallPayload) {
        apply_ball(live, summary, &payload, SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn wide_does_not_advance_striker_or_over() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        apply_one(&mut live, &mut summary, extra(ExtraKind::Wide, 1));

        assert_eq!(live.striker.balls, 0);
        assert_eq!(live.legal_balls, 0);
        assert_eq!(live.overs, "0.0");
        assert_eq!(live.total_runs, 1);
        assert_eq!(live.extras.wides, 1);
        assert_eq!(live.extras.total, 1);
        assert_eq!(live.bowler.runs_conceded, 1);
    }

    #[test]
    fn no_ball_counts_toward_total_but_not_legal_balls() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        apply_one(&mut live, &mut summary, extra(ExtraKind::NoBall, 2));

        assert_eq!(live.legal_balls, 0);
        assert_eq!(live.total_runs, 2);
        assert_eq!(live.extras.no_balls, 2);
    }

    #[test]
    fn legal_ball_advances_striker_count_by_one() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        apply_one(&mut live, &mut summary, ball(0));

        assert_eq!(live.striker.balls, 1);
        assert_eq!(live.legal_balls, 1);
        assert_eq!(live.overs, "0.1");
    }

    #[test]
    fn byes_count_against_extras_not_striker_or_bowler() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        apply_one(&mut live, &mut summary, extra(ExtraKind::Bye, 2));

        // A bye is a legal delivery: the striker faces it without scoring.
        assert_eq!(live.striker.balls, 1);
        assert_eq!(live.striker.runs, 0);
        assert_eq!(live.bowler.runs_conceded, 0);
        assert_eq!(live.total_runs, 2);
        assert_eq!(live.extras.byes, 2);
    }

    #[test]
    fn six_dot_balls_complete_an_over_with_transcript_entry() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();
        assert_eq!(live.overs, "0.0");

        for _ in 0..6 {
            apply_one(&mut live, &mut summary, ball(0));
        }

        assert_eq!(live.overs, "1.0");
        assert_eq!(live.over_transcript.len(), 1);
        assert_eq!(
            live.over_transcript[0],
            OverSummary {
                over_number: 1,
                runs_conceded: 0,
                wickets_lost: 0,
                total_score_at_end: 0,
            }
        );
        assert_eq!(summary.home, "0/0");
        assert_eq!(live.bowler.maidens, 1);
        assert_eq!(live.bowler.dots, 6);
    }

    #[test]
    fn odd_runs_rotate_strike() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();
        let original_striker = live.striker.player_id;

        apply_one(&mut live, &mut summary, ball(1));

        assert_eq!(live.non_striker.player_id, original_striker);
        assert_eq!(live.non_striker.runs, 1);
    }

    #[test]
    fn over_end_after_odd_runs_cancels_rotation() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();
        let original_striker = live.striker.player_id;

        for _ in 0..5 {
            apply_one(&mut live, &mut summary, ball(0));
        }
        // Single off the last ball: odd-run swap and over-end swap compose.
        apply_one(&mut live, &mut summary, ball(1));

        assert_eq!(live.striker.player_id, original_striker);
    }

    #[test]
    fn over_end_on_even_runs_rotates_strike() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();
        let original_striker = live.striker.player_id;

        for _ in 0..6 {
            apply_one(&mut live, &mut summary, ball(0));
        }

        assert_eq!(live.non_striker.player_id, original_striker);
    }

    #[test]
    fn boundaries_update_counts() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        apply_one(&mut live, &mut summary, ball(4));
        apply_one(&mut live, &mut summary, ball(6));

        assert_eq!(live.striker.fours, 1);
        assert_eq!(live.striker.sixes, 1);
        assert_eq!(live.total_runs, 10);
        assert_eq!(live.events.iter().filter(|e| e.kind == "boundary").count(), 2);
    }

    #[test]
    fn wicket_increments_bowler_and_team_without_rotating_strike() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();
        let original_striker = live.striker.player_id;

        apply_one(
            &mut live,
            &mut summary,
            BallPayload {
                runs_scored: 0,
                extras: None,
                wicket: Some(WicketKind::Bowled),
                speed_kmph: None,
            },
        );

        assert_eq!(live.wickets, 1);
        assert_eq!(live.bowler.wickets, 1);
        assert_eq!(live.striker.player_id, original_striker);
        assert!(live.striker.is_out);
        assert_eq!(live.partnership, Partnership::default());
        assert_eq!(summary.home, "0/1");
    }

    #[test]
    fn run_out_does_not_credit_the_bowler() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        apply_one(
            &mut live,
            &mut summary,
            BallPayload {
                runs_scored: 1,
                extras: None,
                wicket: Some(WicketKind::RunOut),
                speed_kmph: None,
            },
        );

        assert_eq!(live.wickets, 1);
        assert_eq!(live.bowler.wickets, 0);
    }

    #[test]
    fn milestone_appended_once_when_fifty_crossed() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        for _ in 0..8 {
            apply_one(&mut live, &mut summary, ball(6));
        }
        assert_eq!(live.total_runs, 48);
        assert!(live.milestones.is_empty());

        apply_one(&mut live, &mut summary, ball(4));
        assert_eq!(live.total_runs, 52);
        assert_eq!(live.milestones.len(), 1);
        assert_eq!(live.milestones[0].threshold, 50);

        apply_one(&mut live, &mut summary, ball(4));
        assert_eq!(live.milestones.len(), 1);
    }

    #[test]
    fn projections_extrapolate_over_twenty_overs() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        // One over for 12 runs: 2 runs a ball.
        for _ in 0..6 {
            apply_one(&mut live, &mut summary, ball(2));
        }

        assert!((live.projection.current_rate - 12.0).abs() < f32::EPSILON);
        assert_eq!(live.projection.at_current_rate, 12 + 12 * 19);
        assert_eq!(live.projection.at_six_per_over, 12 + 6 * 19);
        assert_eq!(live.projection.at_eight_per_over, 12 + 8 * 19);
        assert_eq!(live.projection.at_ten_per_over, 12 + 10 * 19);
    }

    #[test]
    fn ball_history_records_every_delivery() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        apply_one(&mut live, &mut summary, ball(1));
        apply_one(&mut live, &mut summary, extra(ExtraKind::Wide, 1));

        assert_eq!(live.ball_history.len(), 2);
        assert_eq!(live.ball_history[0].over, "0.1");
        // The wide repeats the over display because it must be re-bowled.
        assert_eq!(live.ball_history[1].over, "0.1");
        assert_eq!(live.ball_history[1].total_after, 2);
    }

    #[test]
    fn non_ball_events_are_rejected_as_sport_mismatch() {
        let mut live = CricketLive::default();
        let mut summary = ScoreSummary::default();

        let err = apply(
            &mut live,
            &mut summary,
            &ScoringEvent::PeriodAdvance,
            SystemTime::UNIX_EPOCH,
        )
        .unwrap_err();

        assert!(matches!(err, ReduceError::SportMismatch { .. }));
    }
}
