//! Hydration/bootstrap and the mutation pipeline.
//!
//! Every mutation runs the same sequence: resolve the caller's role (fresh,
//! on every call), gate on it, snapshot the pre-mutation state into history,
//! apply the reducer, then fan the new document out to the three
//! distribution channels. Fan-out is best-effort: the local reducer state is
//! authoritative for the acting client regardless of channel failures.

use std::{sync::Arc, time::SystemTime};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::models::MatchSnapshotEntity,
    dto::ws::ScorerOutboundMessage,
    engine::{
        self, LiveData, MatchState, ScorerRole, ScoringEvent, seed,
    },
    error::ServiceError,
    services::{clock_service, identity::SessionIdentity, sse_events},
    state::{SharedState, room::MatchRoom},
};

/// How a mutation attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The reducer ran and the new state was fanned out.
    Applied(MatchState),
    /// The authorization gate dropped the mutation; nothing changed and
    /// nothing was broadcast.
    Denied,
    /// The reducer rejected the event (wrong sport, not scorable) or there
    /// was nothing to undo/redo; treated as a no-op.
    Ignored,
}

/// Attach to a match, hydrating its room on first contact.
///
/// Hydration fetches the fixture record and the last persisted snapshot,
/// validates the snapshot against the configured sport, synthesizes a fresh
/// default on mismatch, and injects the real rosters if nothing has been
/// scored yet. Mutations for a match are only reachable through the room this
/// returns, so nothing can score against a half-loaded state.
pub async fn attach_room(
    state: &SharedState,
    match_id: Uuid,
) -> Result<Arc<MatchRoom>, ServiceError> {
    if let Some(room) = state.room(match_id) {
        return Ok(room);
    }

    let _gate = state.hydration_gate().lock().await;
    if let Some(room) = state.room(match_id) {
        return Ok(room);
    }

    let store = state.require_match_store().await?;
    let Some(record) = store.find_match(match_id).await? else {
        return Err(ServiceError::NotFound(format!("match `{match_id}` not found")));
    };

    let snapshot = match store.find_snapshot(match_id).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            // A missing snapshot endpoint is recoverable: score from fresh.
            warn!(match_id = %match_id, error = %err, "snapshot fetch failed; starting fresh");
            None
        }
    };

    let mut live_state = match snapshot {
        Some(snapshot)
            if snapshot.state.sport == record.sport
                && snapshot.state.live.matches_sport(record.sport)
                && snapshot.state.live.structurally_sound() =>
        {
            snapshot.state
        }
        Some(snapshot) => {
            info!(
                match_id = %match_id,
                stored = ?snapshot.state.sport,
                configured = ?record.sport,
                "discarding structurally invalid snapshot"
            );
            fresh_default(state, &record)
        }
        None => fresh_default(state, &record),
    };

    if !live_state.live.has_recorded_events() {
        seed::inject_rosters(
            &mut live_state,
            &(&record.home_team).into(),
            &(&record.away_team).into(),
        );
    }

    let room = Arc::new(MatchRoom::new(
        record,
        live_state,
        state.config().undo_depth,
    ));
    state.insert_room(room.clone());
    clock_service::spawn_ticker(state.clone(), room.clone());

    Ok(room)
}

/// Synthesize a default state for the fixture, applying configured rule
/// defaults on top of the generic template.
fn fresh_default(state: &SharedState, record: &crate::dao::models::MatchRecordEntity) -> MatchState {
    let mut fresh = seed::default_state(record.id, record.sport, record.meta());
    match &mut fresh.live {
        LiveData::Basketball(live) => {
            let config = state.config().basketball;
            live.clock.period_length_seconds = config.period_seconds;
            live.clock.seconds_remaining = config.period_seconds;
            live.shot_clock.full_seconds = config.shot_clock_seconds;
            live.shot_clock.seconds_remaining = config.shot_clock_seconds;
            live.home.timeouts_remaining = config.timeouts;
            live.away.timeouts_remaining = config.timeouts;
        }
        LiveData::Volleyball(live) => {
            live.rules = state.config().volleyball_rules;
        }
        LiveData::Cricket(_) | LiveData::Football(_) => {}
    }
    fresh
}

/// Resolve the caller's role for a match, re-checked on every mutating call
/// since assignments can change out-of-band.
pub async fn resolve_role(
    state: &SharedState,
    match_id: Uuid,
    identity: Option<&SessionIdentity>,
) -> ScorerRole {
    let Some(identity) = identity else {
        return ScorerRole::ReadOnly;
    };

    let Some(store) = state.match_store().await else {
        warn!(match_id = %match_id, "role lookup unavailable in degraded mode; treating as viewer");
        return ScorerRole::ReadOnly;
    };

    match store.find_role(match_id, identity.user_id).await {
        Ok(Some(assignment)) => assignment.role,
        Ok(None) => ScorerRole::ReadOnly,
        Err(err) => {
            warn!(
                match_id = %match_id,
                user_id = %identity.user_id,
                error = %err,
                "role lookup failed; treating as viewer"
            );
            ScorerRole::ReadOnly
        }
    }
}

/// Run one scoring event through the gate, history, reducer, and fan-out.
pub async fn submit_event(
    state: &SharedState,
    room: &Arc<MatchRoom>,
    identity: Option<&SessionIdentity>,
    event: &ScoringEvent,
) -> Result<SubmissionOutcome, ServiceError> {
    let role = resolve_role(state, room.match_id, identity).await;
    if !role.permits(event) {
        // Defensive no-op: the UI is expected to have hidden the control.
        debug!(
            match_id = %room.match_id,
            role = ?role,
            event = event.kind(),
            "mutation dropped by authorization gate"
        );
        return Ok(SubmissionOutcome::Denied);
    }

    apply_unchecked(state, room, event).await
}

/// Apply an event that has already passed (or does not require) the gate.
///
/// The ticker uses this directly: ticks are system actions, and recording
/// them in history would flush the undo buffer within a minute of clock time.
pub(crate) async fn apply_unchecked(
    state: &SharedState,
    room: &Arc<MatchRoom>,
    event: &ScoringEvent,
) -> Result<SubmissionOutcome, ServiceError> {
    let _gate = room.mutation_gate.lock().await;

    let mut current = room.state.write().await;
    let pre = current.clone();

    match engine::reduce(&mut current, event, SystemTime::now()) {
        Ok(outcome) => {
            let snapshot = current.clone();
            drop(current);

            if !event.is_tick() {
                room.history.lock().await.record(pre);
            }
            for milestone in &outcome.milestones {
                info!(match_id = %room.match_id, milestone, "milestone reached");
            }
            if outcome.shot_clock_expired {
                sse_events::broadcast_info(room, "shot clock expired");
            }

            fan_out(state, room, snapshot.clone(), !event.is_tick()).await;
            Ok(SubmissionOutcome::Applied(snapshot))
        }
        Err(err) => {
            // Reducers leave the state untouched on error; degrade to no-op.
            drop(current);
            warn!(
                match_id = %room.match_id,
                event = event.kind(),
                error = %err,
                "event ignored by reducer"
            );
            Ok(SubmissionOutcome::Ignored)
        }
    }
}

/// Undo the last mutation, restoring and re-broadcasting the prior snapshot.
pub async fn undo(
    state: &SharedState,
    room: &Arc<MatchRoom>,
    identity: Option<&SessionIdentity>,
) -> Result<SubmissionOutcome, ServiceError> {
    let role = resolve_role(state, room.match_id, identity).await;
    if !role.can_undo() {
        debug!(match_id = %room.match_id, role = ?role, "undo dropped by authorization gate");
        return Ok(SubmissionOutcome::Denied);
    }

    let _gate = room.mutation_gate.lock().await;
    let mut current = room.state.write().await;
    let restored = {
        let mut history = room.history.lock().await;
        history.undo(&current)
    };

    match restored {
        Some(snapshot) => {
            *current = snapshot.clone();
            drop(current);
            fan_out(state, room, snapshot.clone(), true).await;
            Ok(SubmissionOutcome::Applied(snapshot))
        }
        None => Ok(SubmissionOutcome::Ignored),
    }
}

/// Redo the last undone mutation.
pub async fn redo(
    state: &SharedState,
    room: &Arc<MatchRoom>,
    identity: Option<&SessionIdentity>,
) -> Result<SubmissionOutcome, ServiceError> {
    let role = resolve_role(state, room.match_id, identity).await;
    if !role.can_undo() {
        debug!(match_id = %room.match_id, role = ?role, "redo dropped by authorization gate");
        return Ok(SubmissionOutcome::Denied);
    }

    let _gate = room.mutation_gate.lock().await;
    let mut current = room.state.write().await;
    let restored = {
        let mut history = room.history.lock().await;
        history.redo(&current)
    };

    match restored {
        Some(snapshot) => {
            *current = snapshot.clone();
            drop(current);
            fan_out(state, room, snapshot.clone(), true).await;
            Ok(SubmissionOutcome::Applied(snapshot))
        }
        None => Ok(SubmissionOutcome::Ignored),
    }
}

/// Push the new document to the three distribution channels.
///
/// Channels are independent and non-transactional; a failure in any of them
/// must never delay or roll back the local mutation, so persistence runs on a
/// detached task and socket/hub errors are swallowed.
pub(crate) async fn fan_out(
    state: &SharedState,
    room: &Arc<MatchRoom>,
    snapshot: MatchState,
    persist: bool,
) {
    sse_events::broadcast_state(room, &snapshot);

    match serde_json::to_string(&ScorerOutboundMessage::State {
        state: Box::new(snapshot.clone()),
    }) {
        Ok(payload) => room.send_to_sockets(&payload),
        Err(err) => {
            warn!(match_id = %room.match_id, error = %err, "failed to serialize state frame")
        }
    }

    if !persist {
        return;
    }
    let Some(store) = state.match_store().await else {
        // Degraded mode: the scorer keeps scoring, the snapshot catches up
        // after the next persisted mutation.
        return;
    };
    let entity = MatchSnapshotEntity {
        match_id: room.match_id,
        state: snapshot,
        updated_at: SystemTime::now(),
    };
    let match_id = room.match_id;
    tokio::spawn(async move {
        if let Err(err) = store.save_snapshot(entity).await {
            warn!(match_id = %match_id, error = %err, "snapshot persistence failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            match_store::MatchStore,
            models::{
                MatchRecordEntity, PlayerRecordEntity, RoleAssignmentEntity, TeamRecordEntity,
            },
            storage::StorageResult,
        },
        engine::{
            MatchStatus, Sport, TeamSide,
            event::{BasketPayload, GoalPayload},
        },
        state::AppState,
    };
    use futures::future::BoxFuture;

    #[derive(Default)]
    struct MemoryStore {
        matches: Mutex<HashMap<Uuid, MatchRecordEntity>>,
        snapshots: Mutex<HashMap<Uuid, MatchSnapshotEntity>>,
        roles: Mutex<HashMap<(Uuid, Uuid), RoleAssignmentEntity>>,
    }

    impl MatchStore for Arc<MemoryStore> {
        fn find_match(
            &self,
            id: Uuid,
        ) -> BoxFuture<'static, StorageResult<Option<MatchRecordEntity>>> {
            let store = self.clone();
            Box::pin(async move { Ok(store.matches.lock().unwrap().get(&id).cloned()) })
        }

        fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchRecordEntity>>> {
            let store = self.clone();
            Box::pin(async move { Ok(store.matches.lock().unwrap().values().cloned().collect()) })
        }

        fn save_match(&self, record: MatchRecordEntity) -> BoxFuture<'static, StorageResult<()>> {
            let store = self.clone();
            Box::pin(async move {
                store.matches.lock().unwrap().insert(record.id, record);
                Ok(())
            })
        }

        fn find_snapshot(
            &self,
            match_id: Uuid,
        ) -> BoxFuture<'static, StorageResult<Option<MatchSnapshotEntity>>> {
            let store = self.clone();
            Box::pin(async move { Ok(store.snapshots.lock().unwrap().get(&match_id).cloned()) })
        }

        fn save_snapshot(
            &self,
            snapshot: MatchSnapshotEntity,
        ) -> BoxFuture<'static, StorageResult<()>> {
            let store = self.clone();
            Box::pin(async move {
                store
                    .snapshots
                    .lock()
                    .unwrap()
                    .insert(snapshot.match_id, snapshot);
                Ok(())
            })
        }

        fn find_role(
            &self,
            match_id: Uuid,
            user_id: Uuid,
        ) -> BoxFuture<'static, StorageResult<Option<RoleAssignmentEntity>>> {
            let store = self.clone();
            Box::pin(async move {
                Ok(store
                    .roles
                    .lock()
                    .unwrap()
                    .get(&(match_id, user_id))
                    .copied())
            })
        }

        fn save_role(&self, role: RoleAssignmentEntity) -> BoxFuture<'static, StorageResult<()>> {
            let store = self.clone();
            Box::pin(async move {
                store
                    .roles
                    .lock()
                    .unwrap()
                    .insert((role.match_id, role.user_id), role);
                Ok(())
            })
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn roster(name: &str, count: usize) -> TeamRecordEntity {
        TeamRecordEntity {
            id: Uuid::new_v4(),
            name: name.into(),
            players: (0..count)
                .map(|index| PlayerRecordEntity {
                    id: Uuid::new_v4(),
                    name: format!("{name} {index}"),
                    position: None,
                    shirt_number: Some(index as u8 + 1),
                })
                .collect(),
        }
    }

    fn fixture(sport: Sport) -> MatchRecordEntity {
        MatchRecordEntity {
            id: Uuid::new_v4(),
            sport,
            tournament_name: "City League".into(),
            venue: "Main Hall".into(),
            start_time: SystemTime::UNIX_EPOCH,
            officials: vec!["R. Whistle".into()],
            home_team: roster("Hawks", 8),
            away_team: roster("Kings", 8),
        }
    }

    async fn setup(sport: Sport) -> (SharedState, Arc<MemoryStore>, MatchRecordEntity) {
        let app = AppState::new(AppConfig::default());
        let store = Arc::new(MemoryStore::default());
        let record = fixture(sport);
        store
            .matches
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        app.set_match_store(Arc::new(store.clone())).await;
        (app, store, record)
    }

    async fn grant(store: &Arc<MemoryStore>, match_id: Uuid, role: ScorerRole) -> SessionIdentity {
        let user_id = Uuid::new_v4();
        store.roles.lock().unwrap().insert(
            (match_id, user_id),
            RoleAssignmentEntity {
                match_id,
                user_id,
                role,
            },
        );
        SessionIdentity { user_id }
    }

    fn home_basket() -> ScoringEvent {
        ScoringEvent::Basket(BasketPayload {
            team: TeamSide::Home,
            points: 2,
            is_make: true,
            player_id: None,
        })
    }

    async fn go_live(state: &SharedState, room: &Arc<MatchRoom>, admin: &SessionIdentity) {
        submit_event(
            state,
            room,
            Some(admin),
            &ScoringEvent::StatusUpdate {
                status: MatchStatus::Live,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn hydration_injects_rosters_into_fresh_state() {
        let (app, _store, record) = setup(Sport::Basketball).await;

        let room = attach_room(&app, record.id).await.unwrap();
        let state = room.snapshot().await;

        let LiveData::Basketball(live) = &state.live else {
            panic!("expected basketball live data");
        };
        assert_eq!(live.home.name, "Hawks");
        assert_eq!(live.home.players.len(), 8);
        assert_eq!(live.home.lineup.len(), 5);
    }

    #[tokio::test]
    async fn sport_mismatched_snapshot_is_discarded() {
        let (app, store, record) = setup(Sport::Volleyball).await;

        // Persist a basketball snapshot under a volleyball fixture.
        let stray = seed::default_state(record.id, Sport::Basketball, record.meta());
        store.snapshots.lock().unwrap().insert(
            record.id,
            MatchSnapshotEntity {
                match_id: record.id,
                state: stray,
                updated_at: SystemTime::UNIX_EPOCH,
            },
        );

        let room = attach_room(&app, record.id).await.unwrap();
        let state = room.snapshot().await;

        assert_eq!(state.sport, Sport::Volleyball);
        assert!(state.live.matches_sport(Sport::Volleyball));
        let LiveData::Volleyball(live) = &state.live else {
            panic!("expected volleyball live data");
        };
        assert_eq!(live.home.name, "Hawks");
    }

    #[tokio::test]
    async fn scored_snapshot_keeps_its_roster() {
        let (app, store, record) = setup(Sport::Football).await;

        let mut scored = seed::default_state(record.id, Sport::Football, record.meta());
        scored.status = MatchStatus::Live;
        engine::reduce(
            &mut scored,
            &ScoringEvent::Goal(GoalPayload {
                team: TeamSide::Home,
                player_id: None,
            }),
            SystemTime::UNIX_EPOCH,
        )
        .unwrap();
        store.snapshots.lock().unwrap().insert(
            record.id,
            MatchSnapshotEntity {
                match_id: record.id,
                state: scored.clone(),
                updated_at: SystemTime::UNIX_EPOCH,
            },
        );

        let room = attach_room(&app, record.id).await.unwrap();
        let state = room.snapshot().await;

        // Roster injection must not run: the template names survive.
        let LiveData::Football(live) = &state.live else {
            panic!("expected football live data");
        };
        assert_eq!(live.home.score, 1);
        assert_eq!(live.home.name, "Home");
    }

    #[tokio::test]
    async fn unknown_match_is_not_found() {
        let (app, _store, _record) = setup(Sport::Cricket).await;
        let err = attach_room(&app, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn anonymous_mutation_never_changes_state_or_broadcasts() {
        let (app, _store, record) = setup(Sport::Basketball).await;
        let room = attach_room(&app, record.id).await.unwrap();
        let mut spy = room.hub.subscribe();
        let before = room.snapshot().await;

        let outcome = submit_event(&app, &room, None, &home_basket()).await.unwrap();

        assert_eq!(outcome, SubmissionOutcome::Denied);
        assert_eq!(room.snapshot().await, before);
        assert!(matches!(spy.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn away_scorer_cannot_score_for_the_home_team() {
        let (app, store, record) = setup(Sport::Basketball).await;
        let room = attach_room(&app, record.id).await.unwrap();
        let admin = grant(&store, record.id, ScorerRole::Admin).await;
        go_live(&app, &room, &admin).await;
        let away = grant(&store, record.id, ScorerRole::AwayScorer).await;
        let before = room.snapshot().await;

        let outcome = submit_event(&app, &room, Some(&away), &home_basket())
            .await
            .unwrap();

        assert_eq!(outcome, SubmissionOutcome::Denied);
        let after = room.snapshot().await;
        let LiveData::Basketball(live) = &after.live else {
            panic!("expected basketball live data");
        };
        assert_eq!(live.home.score, 0);
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn scorer_mutation_applies_broadcasts_and_persists() {
        let (app, store, record) = setup(Sport::Basketball).await;
        let room = attach_room(&app, record.id).await.unwrap();
        let scorer = grant(&store, record.id, ScorerRole::Scorer).await;
        go_live(&app, &room, &scorer).await;
        let mut spy = room.hub.subscribe();

        let outcome = submit_event(&app, &room, Some(&scorer), &home_basket())
            .await
            .unwrap();

        let SubmissionOutcome::Applied(new_state) = outcome else {
            panic!("expected applied outcome");
        };
        assert_eq!(new_state.score_summary.home, "2");
        assert!(spy.try_recv().is_ok());

        // Persistence is fire-and-forget; give the detached task a beat.
        let mut persisted = None;
        for _ in 0..50 {
            persisted = store.snapshots.lock().unwrap().get(&record.id).cloned();
            if persisted.as_ref().is_some_and(|s| s.state.score_summary.home == "2") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(persisted.unwrap().state.score_summary.home, "2");
    }

    #[tokio::test]
    async fn wrong_sport_event_is_ignored_not_an_error() {
        let (app, store, record) = setup(Sport::Football).await;
        let room = attach_room(&app, record.id).await.unwrap();
        let scorer = grant(&store, record.id, ScorerRole::Scorer).await;
        go_live(&app, &room, &scorer).await;
        let before = room.snapshot().await;

        let outcome = submit_event(&app, &room, Some(&scorer), &home_basket())
            .await
            .unwrap();

        assert_eq!(outcome, SubmissionOutcome::Ignored);
        assert_eq!(room.snapshot().await, before);
    }

    #[tokio::test]
    async fn undo_restores_and_redo_reapplies() {
        let (app, store, record) = setup(Sport::Football).await;
        let room = attach_room(&app, record.id).await.unwrap();
        let scorer = grant(&store, record.id, ScorerRole::Scorer).await;
        go_live(&app, &room, &scorer).await;
        let before_goal = room.snapshot().await;

        submit_event(
            &app,
            &room,
            Some(&scorer),
            &ScoringEvent::Goal(GoalPayload {
                team: TeamSide::Home,
                player_id: None,
            }),
        )
        .await
        .unwrap();
        let after_goal = room.snapshot().await;
        assert_ne!(before_goal, after_goal);

        let undone = undo(&app, &room, Some(&scorer)).await.unwrap();
        assert_eq!(undone, SubmissionOutcome::Applied(before_goal.clone()));
        assert_eq!(room.snapshot().await, before_goal);

        let redone = redo(&app, &room, Some(&scorer)).await.unwrap();
        assert_eq!(redone, SubmissionOutcome::Applied(after_goal.clone()));
        assert_eq!(room.snapshot().await, after_goal);
    }

    #[tokio::test]
    async fn delegated_roles_cannot_undo() {
        let (app, store, record) = setup(Sport::Football).await;
        let room = attach_room(&app, record.id).await.unwrap();
        let scorer = grant(&store, record.id, ScorerRole::Scorer).await;
        go_live(&app, &room, &scorer).await;
        submit_event(
            &app,
            &room,
            Some(&scorer),
            &ScoringEvent::Goal(GoalPayload {
                team: TeamSide::Home,
                player_id: None,
            }),
        )
        .await
        .unwrap();

        let home = grant(&store, record.id, ScorerRole::HomeScorer).await;
        let outcome = undo(&app, &room, Some(&home)).await.unwrap();

        assert_eq!(outcome, SubmissionOutcome::Denied);
        let LiveData::Football(live) = &room.snapshot().await.live else {
            panic!("expected football live data");
        };
        assert_eq!(live.home.score, 1);
    }
}
