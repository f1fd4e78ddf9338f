use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Scoreline Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::matches::list_matches,
        crate::routes::matches::get_match_state,
        crate::routes::matches::submit_event,
        crate::routes::matches::undo,
        crate::routes::matches::redo,
        crate::routes::sse::match_stream,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::matches::MatchListItem,
            crate::dto::matches::SubmitEventRequest,
            crate::dto::matches::MutationResponse,
            crate::dto::sse::StreamHello,
            crate::dto::ws::ScorerInboundMessage,
            crate::dto::ws::ScorerOutboundMessage,
            crate::engine::MatchState,
            crate::engine::ScoringEvent,
            crate::engine::ScorerRole,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "matches", description = "Live match state and scoring mutations"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "scorers", description = "WebSocket operations for scorer terminals and overlays"),
    )
)]
pub struct ApiDoc;
