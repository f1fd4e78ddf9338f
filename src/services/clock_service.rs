//! Per-room clock ticker.
//!
//! A repeating task (≈1 Hz) advances the clocked sports while their running
//! flag is set: basketball counts down (game + shot clock), football counts
//! up. Ticks reuse the reducer pipeline so passive viewers watch the clock
//! advance without a scoring action, but they skip history (they would flush
//! the undo buffer) and persistence (the next scored mutation snapshots the
//! clock anyway).

use std::sync::{Arc, Weak};

use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use crate::{
    engine::{LiveData, MatchStatus, ScoringEvent, event::ClockAction},
    services::match_service,
    state::{SharedState, room::MatchRoom},
};

/// Spawn the ticker task for a freshly hydrated room.
///
/// The task holds only a weak reference so it winds down once the room is
/// dropped from the registry.
pub fn spawn_ticker(state: SharedState, room: Arc<MatchRoom>) {
    let weak: Weak<MatchRoom> = Arc::downgrade(&room);
    let tick_interval = state.config().clock_tick_interval;

    tokio::spawn(async move {
        let mut ticker = interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(room) = weak.upgrade() else {
                break;
            };

            if !should_tick(&room).await {
                continue;
            }

            let _ = match_service::apply_unchecked(
                &state,
                &room,
                &ScoringEvent::Clock {
                    action: ClockAction::Tick,
                },
            )
            .await;
        }

        debug!("clock ticker stopped; room dropped");
    });
}

/// Whether the room's sport has a running clock worth advancing.
async fn should_tick(room: &MatchRoom) -> bool {
    let state = room.state.read().await;
    if !matches!(state.status, MatchStatus::Live) {
        return false;
    }
    match &state.live {
        LiveData::Basketball(live) => live.clock.running,
        LiveData::Football(live) => live.clock.running,
        LiveData::Cricket(_) | LiveData::Volleyball(_) => false,
    }
}
