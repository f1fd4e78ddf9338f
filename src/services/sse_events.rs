//! Typed broadcast helpers for the per-match SSE hub.

use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::sse::{ServerEvent, StreamHello},
    engine::MatchState,
    state::room::MatchRoom,
};

const EVENT_STATE: &str = "state";
const EVENT_HELLO: &str = "hello";
const EVENT_INFO: &str = "info";

/// Broadcast a full state replacement to the room's SSE subscribers.
pub fn broadcast_state(room: &MatchRoom, state: &MatchState) {
    send_event(room, EVENT_STATE, state);
}

/// Broadcast the subscription handshake for a new stream consumer.
pub fn broadcast_hello(room: &MatchRoom, match_id: Uuid, degraded: bool) {
    let payload = StreamHello {
        match_id,
        message: "match stream connected".into(),
        degraded,
    };
    send_event(room, EVENT_HELLO, &payload);
}

/// Send a human-readable info message onto the room stream.
pub fn broadcast_info(room: &MatchRoom, message: &str) {
    room.hub.broadcast(ServerEvent::new(
        Some(EVENT_INFO.to_string()),
        message.to_string(),
    ));
}

fn send_event(room: &MatchRoom, event: &str, payload: &impl serde::Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => room.hub.broadcast(event),
        Err(err) => {
            warn!(match_id = %room.match_id, event, error = %err, "failed to serialize SSE payload")
        }
    }
}
