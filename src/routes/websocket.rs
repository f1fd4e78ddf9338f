use axum::{
    Router,
    extract::{Path, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{services::websocket_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/ws/{match_id}",
    tag = "scorers",
    params(("match_id" = Uuid, Path, description = "Match room to join")),
    responses((status = 101, description = "Switching protocols to WebSocket"))
)]
/// Upgrade the HTTP connection into a scorer/overlay WebSocket session.
pub async fn ws_handler(
    State(state): State<SharedState>,
    Path(match_id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let shared_state = state.clone();
    ws.on_upgrade(move |socket| websocket_service::handle_socket(shared_state, socket, match_id))
}

/// Configure the WebSocket endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/ws/{match_id}", get(ws_handler))
}
