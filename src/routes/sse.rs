use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    services::{match_service, sse_events, sse_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/matches/{id}/stream",
    tag = "sse",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses((status = 200, description = "Per-match SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream realtime state replacements for one match to viewer/overlay pages.
pub async fn match_stream(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let room = match_service::attach_room(&state, id).await?;
    let receiver = sse_service::subscribe(&room);
    info!(match_id = %id, "new match SSE connection");
    sse_events::broadcast_hello(&room, id, state.is_degraded().await);
    Ok(sse_service::to_sse_stream(receiver, id))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/matches/{id}/stream", get(match_stream))
}
