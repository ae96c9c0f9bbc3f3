//! Game catalog binary entrypoint wiring REST routes, the static page and the storage backend.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use game_catalog_back::{
    config::{AppConfig, StorageBackend},
    dao::game_store::memory::MemoryGameStore,
    routes,
    state::{AppState, SharedState},
};

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_state = AppState::new(AppConfig::load());
    install_storage(&app_state, StorageBackend::from_env()).await;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

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

/// Install the selected backend, supervising MongoDB in the background.
async fn install_storage(state: &SharedState, backend: StorageBackend) {
    match backend {
        StorageBackend::Memory => {
            info!("using in-memory storage; data is lost on shutdown");
            state.set_game_store(Arc::new(MemoryGameStore::new())).await;
        }
        #[cfg(feature = "mongo-store")]
        StorageBackend::Mongo => {
            let uri = env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
            let db_name = env::var("MONGO_DB").ok();
            tokio::spawn(
                game_catalog_back::services::storage_supervisor::run(state.clone(), move || {
                    mongo::connect(uri.clone(), db_name.clone())
                }),
            );
        }
        #[cfg(not(feature = "mongo-store"))]
        StorageBackend::Mongo => {
            tracing::warn!("built without MongoDB support; falling back to in-memory storage");
            state.set_game_store(Arc::new(MemoryGameStore::new())).await;
        }
    }
}

#[cfg(feature = "mongo-store")]
mod mongo {
    use std::sync::Arc;

    use game_catalog_back::dao::{
        game_store::{
            GameStore,
            mongodb::{MongoConfig, MongoGameStore},
        },
        storage::StorageError,
    };

    /// Open a MongoDB-backed store for the storage supervisor.
    pub async fn connect(
        uri: String,
        db_name: Option<String>,
    ) -> Result<Arc<dyn GameStore>, StorageError> {
        let config = MongoConfig::from_uri(&uri, db_name.as_deref()).await?;
        let store = MongoGameStore::connect(config).await?;
        Ok(Arc::new(store))
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

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
