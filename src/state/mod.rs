pub mod room;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::{
    config::AppConfig, dao::match_store::MatchStore, error::ServiceError, state::room::MatchRoom,
};

pub use self::room::{RoomHub, SocketConnection};

/// Cheaply clonable handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the room registry, the storage handle, and the
/// degraded-mode flag.
pub struct AppState {
    config: AppConfig,
    match_store: RwLock<Option<Arc<dyn MatchStore>>>,
    rooms: DashMap<Uuid, Arc<MatchRoom>>,
    degraded: watch::Sender<bool>,
    hydration_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is
    /// installed by the supervisor.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            match_store: RwLock::new(None),
            rooms: DashMap::new(),
            degraded: degraded_tx,
            hydration_gate: Mutex::new(()),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current match store, if one is installed.
    pub async fn match_store(&self) -> Option<Arc<dyn MatchStore>> {
        let guard = self.match_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the match store or fail with a degraded-mode error.
    pub async fn require_match_store(&self) -> Result<Arc<dyn MatchStore>, ServiceError> {
        self.match_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new match store implementation and leave degraded mode.
    pub async fn set_match_store(&self, store: Arc<dyn MatchStore>) {
        {
            let mut guard = self.match_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current match store and enter degraded mode.
    pub async fn clear_match_store(&self) {
        {
            let mut guard = self.match_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    /// Room already hydrated for the given match, if any.
    pub fn room(&self, match_id: Uuid) -> Option<Arc<MatchRoom>> {
        self.rooms.get(&match_id).map(|room| room.clone())
    }

    /// Register a freshly hydrated room.
    pub fn insert_room(&self, room: Arc<MatchRoom>) {
        self.rooms.insert(room.match_id, room);
    }

    /// Lock taken while hydrating so concurrent attaches to the same match do
    /// not race to create two rooms.
    pub fn hydration_gate(&self) -> &Mutex<()> {
        &self.hydration_gate
    }
}
