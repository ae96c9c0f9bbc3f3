use axum::Router;
use tower_http::services::ServeDir;

use crate::state::SharedState;

pub mod docs;
pub mod games;
pub mod health;
pub mod reports;

/// Compose all route trees, wiring in shared state, documentation and the static front page.
pub fn router(state: SharedState) -> Router<()> {
    let static_files = ServeDir::new(&state.config().static_dir);

    let api_router = Router::new()
        .merge(games::router())
        .merge(reports::router());

    let docs_router = docs::router(state.clone());

    Router::new()
        .nest("/api", api_router)
        .merge(health::router())
        .merge(docs_router)
        .fallback_service(static_files)
        .with_state(state)
}
