//! WebSocket relay: scorer terminals, overlay displays and viewer pages join
//! a per-match room and receive full-state replacements; identified scorers
//! additionally submit actions through the same gate → history → reducer
//! pipeline as REST clients.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::{ScorerInboundMessage, ScorerOutboundMessage},
    error::ServiceError,
    services::{
        identity::{self, SessionIdentity},
        match_service,
    },
    state::{SharedState, room::SocketConnection},
};

const IDENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Internal error type for socket frame handling.
#[derive(Debug, Error)]
enum SocketError {
    /// Writer channel closed - connection should be terminated immediately.
    #[error("connection closed")]
    ConnectionClosed,
    /// Error from persistence or state management operations.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}

/// Handle the full lifecycle for one scorer/overlay WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket, match_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let initial_message = match tokio::time::timeout(IDENT_TIMEOUT, receiver.next()).await {
        Ok(Some(Ok(Message::Text(text)))) => text,
        Ok(Some(Ok(Message::Close(_)))) => {
            finalize(writer_task, outbound_tx).await;
            return;
        }
        Ok(Some(Ok(_))) => {
            let _ = outbound_tx.send(Message::Close(None));
            finalize(writer_task, outbound_tx).await;
            return;
        }
        Ok(Some(Err(err))) => {
            warn!(error = %err, "websocket receive error");
            finalize(writer_task, outbound_tx).await;
            return;
        }
        Ok(None) | Err(_) => {
            warn!("websocket identification timed out");
            finalize(writer_task, outbound_tx).await;
            return;
        }
    };

    let inbound = match ScorerInboundMessage::from_json_str(&initial_message) {
        Ok(message) => message,
        Err(err) => {
            warn!(error = %err, "failed to parse scorer message");
            let _ = outbound_tx.send(Message::Close(None));
            finalize(writer_task, outbound_tx).await;
            return;
        }
    };

    let ScorerInboundMessage::Identify { token } = inbound else {
        warn!("first message was not identification");
        let _ = outbound_tx.send(Message::Close(None));
        finalize(writer_task, outbound_tx).await;
        return;
    };

    // Anonymous viewers are allowed on: they receive state, never mutate.
    let identity = identity::resolve_session(&token);

    // Hydration is the one blocking dependency; no mutation entry point
    // exists until the room is loaded and the role resolved.
    let room = match match_service::attach_room(&state, match_id).await {
        Ok(room) => room,
        Err(err) => {
            warn!(match_id = %match_id, error = %err, "failed to attach match room");
            let _ = outbound_tx.send(Message::Close(None));
            finalize(writer_task, outbound_tx).await;
            return;
        }
    };
    let role = match_service::resolve_role(&state, match_id, identity.as_ref()).await;

    let connection_id = Uuid::new_v4();
    room.sockets.insert(
        connection_id,
        SocketConnection {
            id: connection_id,
            tx: outbound_tx.clone(),
        },
    );
    info!(match_id = %match_id, connection = %connection_id, role = ?role, "scorer connected");

    let hello = ScorerOutboundMessage::Hello {
        role,
        state: Box::new(room.snapshot().await),
    };
    if send_message_to_websocket(&outbound_tx, &hello).is_err() {
        info!(connection = %connection_id, "connection closed during hello, terminating");
        room.sockets.remove(&connection_id);
        finalize(writer_task, outbound_tx).await;
        return;
    }

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                match ScorerInboundMessage::from_json_str(&text) {
                    Ok(msg) => {
                        let result =
                            handle_frame(&state, &room, identity.as_ref(), msg).await;
                        if let Err(err) = result {
                            warn!(
                                connection = %connection_id,
                                error = %err,
                                "error while handling scorer frame"
                            );
                            if matches!(err, SocketError::ConnectionClosed) {
                                break;
                            }
                        }
                    }
                    Err(err) => {
                        warn!(connection = %connection_id, error = %err, "failed to parse scorer message");
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(connection = %connection_id, "scorer closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(connection = %connection_id, error = %err, "websocket error");
                break;
            }
        }
    }

    room.sockets.remove(&connection_id);
    info!(match_id = %match_id, connection = %connection_id, "scorer disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Route one parsed frame into the mutation pipeline.
///
/// Outcomes are not acknowledged per-frame: an applied mutation reaches this
/// client through the room fan-out like everyone else, and denied/no-op
/// mutations are silent by design.
async fn handle_frame(
    state: &SharedState,
    room: &std::sync::Arc<crate::state::room::MatchRoom>,
    identity: Option<&SessionIdentity>,
    message: ScorerInboundMessage,
) -> Result<(), SocketError> {
    match message {
        ScorerInboundMessage::Action { event } => {
            match_service::submit_event(state, room, identity, &event).await?;
        }
        ScorerInboundMessage::Undo => {
            match_service::undo(state, room, identity).await?;
        }
        ScorerInboundMessage::Redo => {
            match_service::redo(state, room, identity).await?;
        }
        ScorerInboundMessage::Identify { .. } => {
            warn!("ignoring duplicate identification message");
        }
        ScorerInboundMessage::Unknown => {}
    }
    Ok(())
}

/// Serialize a payload and push it onto the provided WebSocket sender.
///
/// Serialization failure is a permanent error (a bug, not a network state) so
/// it is logged and swallowed; a closed writer channel is returned to the
/// caller for teardown.
fn send_message_to_websocket<T>(
    tx: &mpsc::UnboundedSender<Message>,
    value: &T,
) -> Result<(), SocketError>
where
    T: ?Sized + serde::Serialize + std::fmt::Debug,
{
    let payload = match serde_json::to_string(value) {
        Ok(p) => p,
        Err(err) => {
            warn!(error = %err, "failed to serialize message `{value:?}`");
            return Ok(());
        }
    };

    tx.send(Message::Text(payload.into()))
        .map_err(|_| SocketError::ConnectionClosed)
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
