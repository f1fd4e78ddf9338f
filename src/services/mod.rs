/// Per-room game/shot clock ticker.
pub mod clock_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Session-credential resolution (external identity boundary).
pub mod identity;
/// Hydration, the mutation pipeline, and distribution fan-out.
pub mod match_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage reconnection supervisor.
pub mod storage_supervisor;
/// WebSocket connection and message handling service.
pub mod websocket_service;
