//! Per-match room: the authoritative state document plus the distribution
//! fabric endpoints attached to it (SSE hub, WebSocket registry).

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, broadcast, mpsc};
use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::MatchRecordEntity,
    dto::sse::ServerEvent,
    engine::{MatchHistory, MatchState},
};

/// Handle used to push messages to a connected scorer/overlay socket.
#[derive(Clone, Debug)]
pub struct SocketConnection {
    /// Connection identifier (not a user id; one user may hold several tabs).
    pub id: Uuid,
    /// Outbound frame channel serviced by the connection's writer task.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Broadcast hub fanning events out to the room's SSE subscribers.
#[derive(Debug)]
pub struct RoomHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl RoomHub {
    /// Construct a new hub backed by a Tokio broadcast channel.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}

/// Authoritative per-match state and its fan-out endpoints.
///
/// The mutation gate serializes writers so a history snapshot always pairs
/// with the mutation that follows it; readers go through the `RwLock`
/// directly.
#[derive(Debug)]
pub struct MatchRoom {
    /// Match identifier the room is keyed by.
    pub match_id: Uuid,
    /// Fixture record cached at hydration time.
    pub record: MatchRecordEntity,
    /// The live match document.
    pub state: RwLock<MatchState>,
    /// Undo/redo buffer.
    pub history: Mutex<MatchHistory>,
    /// SSE fan-out hub.
    pub hub: RoomHub,
    /// Connected WebSocket clients.
    pub sockets: DashMap<Uuid, SocketConnection>,
    /// Serializes the gate → snapshot → reduce sequence.
    pub mutation_gate: Mutex<()>,
}

impl MatchRoom {
    /// Build a room around a hydrated state.
    pub fn new(record: MatchRecordEntity, state: MatchState, undo_depth: usize) -> Self {
        Self {
            match_id: record.id,
            record,
            state: RwLock::new(state),
            history: Mutex::new(MatchHistory::new(undo_depth)),
            hub: RoomHub::new(16),
            sockets: DashMap::new(),
            mutation_gate: Mutex::new(()),
        }
    }

    /// Clone the current authoritative state.
    pub async fn snapshot(&self) -> MatchState {
        self.state.read().await.clone()
    }

    /// Fan a serialized frame out to every connected socket, pruning
    /// connections whose writer has gone away.
    pub fn send_to_sockets(&self, payload: &str) {
        let mut dead = Vec::new();
        for connection in self.sockets.iter() {
            if connection
                .tx
                .send(Message::Text(payload.to_owned().into()))
                .is_err()
            {
                dead.push(connection.id);
            }
        }
        for id in dead {
            warn!(match_id = %self.match_id, connection = %id, "pruning dead socket");
            self.sockets.remove(&id);
        }
    }
}
