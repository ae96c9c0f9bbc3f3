use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether a storage backend is installed and still answering.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let Ok(store) = state.require_game_store().await else {
        warn!("storage unavailable (degraded mode)");
        return HealthResponse::degraded();
    };

    match store.health_check().await {
        Ok(()) if !state.is_degraded().await => HealthResponse::ok(store.backend_name()),
        Ok(()) => HealthResponse::degraded(),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::degraded()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::game_store::memory::MemoryGameStore, state::AppState,
    };

    #[tokio::test]
    async fn reports_backend_when_healthy() {
        let state = AppState::with_store(AppConfig::default(), Arc::new(MemoryGameStore::new()));
        let status = health_status(&state).await;
        assert_eq!(status.status, "ok");
        assert_eq!(status.storage, Some("memory"));
    }

    #[tokio::test]
    async fn reports_degraded_without_store() {
        let status = health_status(&AppState::new(AppConfig::default())).await;
        assert_eq!(status.status, "degraded");
        assert_eq!(status.storage, None);
    }
}
