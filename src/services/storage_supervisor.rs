use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{game_store::GameStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Exponential delay doubling from [`INITIAL_DELAY`] up to [`MAX_DELAY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Backoff {
    current: Duration,
}

impl Backoff {
    fn new() -> Self {
        Self {
            current: INITIAL_DELAY,
        }
    }

    /// Delay to wait now; the following call returns twice as much, capped.
    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(MAX_DELAY);
        delay
    }

    fn reset(&mut self) {
        self.current = INITIAL_DELAY;
    }
}

/// Keep a storage backend installed in `state`, connecting through `connect`.
///
/// While no backend answers, requests see the service in degraded mode. Once connected the
/// backend is health-checked periodically; a failing check triggers a few in-place reconnects
/// before the supervisor falls back to opening a brand new connection.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn GameStore>, StorageError>> + Send,
{
    let mut backoff = Backoff::new();

    loop {
        match connect().await {
            Ok(store) => {
                info!(backend = store.backend_name(), "storage connection established");
                state.set_game_store(store.clone()).await;
                backoff.reset();

                watch_health(&state, store.as_ref()).await;

                state.clear_game_store().await;
                sleep(backoff.next_delay()).await;
            }
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
                sleep(backoff.next_delay()).await;
            }
        }
    }
}

/// Poll `store` until it stops answering and cannot be revived in place.
async fn watch_health(state: &SharedState, store: &dyn GameStore) {
    loop {
        match store.health_check().await {
            Ok(()) => {
                state.update_degraded(false).await;
                sleep(HEALTH_POLL_INTERVAL).await;
            }
            Err(err) => {
                warn!(error = %err, "storage health check failed; entering degraded mode");
                state.update_degraded(true).await;

                if !reconnect_in_place(store).await {
                    warn!("exhausted storage reconnect attempts; opening a new connection");
                    return;
                }
                state.update_degraded(false).await;
                sleep(HEALTH_POLL_INTERVAL).await;
            }
        }
    }
}

async fn reconnect_in_place(store: &dyn GameStore) -> bool {
    let mut backoff = Backoff::new();
    for attempt in 1..=MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => {
                info!(attempt, "storage reconnection succeeded");
                return true;
            }
            Err(err) => {
                warn!(attempt, error = %err, "storage reconnect attempt failed");
                sleep(backoff.next_delay()).await;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::{
        config::AppConfig, dao::game_store::memory::MemoryGameStore, state::AppState,
    };

    #[test]
    fn backoff_doubles_until_capped() {
        let mut backoff = Backoff::new();
        let delays: Vec<_> = (0..6).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 10, 10]);

        backoff.reset();
        assert_eq!(backoff.next_delay(), INITIAL_DELAY);
    }

    #[tokio::test]
    async fn installs_store_once_connected() {
        let state = AppState::new(AppConfig::default());
        let calls = Arc::new(AtomicU32::new(0));

        let connect_calls = calls.clone();
        let task = tokio::spawn(run(state.clone(), move || {
            connect_calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Arc::new(MemoryGameStore::new()) as Arc<dyn GameStore>) }
        }));

        let mut watcher = state.degraded_watcher();
        tokio::time::timeout(Duration::from_secs(2), watcher.wait_for(|degraded| !degraded))
            .await
            .expect("supervisor should leave degraded mode")
            .unwrap();

        assert!(state.game_store().await.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        task.abort();
    }
}
