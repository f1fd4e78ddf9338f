//! Scoreline Back binary entrypoint wiring REST, WebSocket, SSE, and storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod engine;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use services::storage_supervisor;
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_state = AppState::new(AppConfig::load());

    spawn_storage_supervisor(app_state.clone());
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Launch the storage supervisor against the backend selected by
/// `SCORELINE_STORE` (`mongo`, the default, or `couch`).
fn spawn_storage_supervisor(state: SharedState) {
    let backend = env::var("SCORELINE_STORE").unwrap_or_else(|_| "mongo".into());

    match backend.as_str() {
        #[cfg(feature = "couch-store")]
        "couch" => {
            use dao::match_store::couchdb::{CouchConfig, CouchMatchStore};
            use dao::match_store::MatchStore;

            tokio::spawn(storage_supervisor::run(state, move || async move {
                let config = CouchConfig::from_env()?;
                let store = CouchMatchStore::connect(config).await?;
                Ok(Arc::new(store) as Arc<dyn MatchStore>)
            }));
        }
        _ => {
            #[cfg(feature = "mongo-store")]
            {
                use dao::match_store::MatchStore;
                use dao::match_store::mongodb::{MongoConfig, MongoMatchStore};

                let uri = env::var("MONGO_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".into());
                let db_name = env::var("MONGO_DB").ok();

                tokio::spawn(storage_supervisor::run(state, move || {
                    let uri = uri.clone();
                    let db_name = db_name.clone();
                    async move {
                        let config = MongoConfig::from_uri(&uri, db_name.as_deref()).await?;
                        let store = MongoMatchStore::connect(config).await?;
                        Ok(Arc::new(store) as Arc<dyn MatchStore>)
                    }
                }));
            }
            #[cfg(not(feature = "mongo-store"))]
            {
                tracing::warn!(
                    backend,
                    "no storage backend compiled in; serving in degraded mode"
                );
                drop(state);
            }
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
