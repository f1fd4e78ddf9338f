use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::matches::{MatchListItem, MutationResponse, SubmitEventRequest},
    engine::MatchState,
    error::AppError,
    services::{
        identity::identity_from_headers,
        match_service::{self, SubmissionOutcome},
    },
    state::SharedState,
};

/// Routes exposing live match state and the mutation pipeline.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/matches", get(list_matches))
        .route("/matches/{id}/state", get(get_match_state))
        .route("/matches/{id}/events", post(submit_event))
        .route("/matches/{id}/undo", post(undo))
        .route("/matches/{id}/redo", post(redo))
}

#[utoipa::path(
    get,
    path = "/matches",
    tag = "matches",
    responses((status = 200, description = "Configured fixtures", body = [MatchListItem]))
)]
/// List the fixtures known to the administration store.
pub async fn list_matches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchListItem>>, AppError> {
    let store = state.require_match_store().await.map_err(AppError::from)?;
    let records = store.list_matches().await.map_err(|err| {
        AppError::ServiceUnavailable(err.to_string())
    })?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/matches/{id}/state",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses(
        (status = 200, description = "Authoritative match state", body = MatchState),
        (status = 404, description = "Unknown match")
    )
)]
/// Hydrate (if needed) and return the authoritative state for a match.
pub async fn get_match_state(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchState>, AppError> {
    let room = match_service::attach_room(&state, id).await?;
    Ok(Json(room.snapshot().await))
}

#[utoipa::path(
    post,
    path = "/matches/{id}/events",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    request_body = SubmitEventRequest,
    responses((status = 200, description = "Mutation outcome", body = MutationResponse))
)]
/// Run one scoring event through the authorization gate and reducer.
pub async fn submit_event(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Valid(Json(payload)): Valid<Json<SubmitEventRequest>>,
) -> Result<Json<MutationResponse>, AppError> {
    let identity = identity_from_headers(&headers);
    let room = match_service::attach_room(&state, id).await?;
    let outcome =
        match_service::submit_event(&state, &room, identity.as_ref(), &payload.event).await?;
    Ok(Json(outcome_response(outcome)))
}

#[utoipa::path(
    post,
    path = "/matches/{id}/undo",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses((status = 200, description = "Mutation outcome", body = MutationResponse))
)]
/// Undo the most recent mutation (unrestricted roles only).
pub async fn undo(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<MutationResponse>, AppError> {
    let identity = identity_from_headers(&headers);
    let room = match_service::attach_room(&state, id).await?;
    let outcome = match_service::undo(&state, &room, identity.as_ref()).await?;
    Ok(Json(outcome_response(outcome)))
}

#[utoipa::path(
    post,
    path = "/matches/{id}/redo",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses((status = 200, description = "Mutation outcome", body = MutationResponse))
)]
/// Redo the most recently undone mutation (unrestricted roles only).
pub async fn redo(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<MutationResponse>, AppError> {
    let identity = identity_from_headers(&headers);
    let room = match_service::attach_room(&state, id).await?;
    let outcome = match_service::redo(&state, &room, identity.as_ref()).await?;
    Ok(Json(outcome_response(outcome)))
}

fn outcome_response(outcome: SubmissionOutcome) -> MutationResponse {
    match outcome {
        SubmissionOutcome::Applied(state) => MutationResponse::applied(state),
        SubmissionOutcome::Denied | SubmissionOutcome::Ignored => MutationResponse::dropped(),
    }
}
