use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{AsyncConfigLoader, CostConfigStore};
use crate::config::SamplingConfig;
use crate::persistence::Database;

/// Owner of the sampling subsystem's shared pieces: the cost store, the
/// config and the loader tasks. Built once at startup and handed to whoever
/// spawns player reactors.
pub struct CollectionManager {
    store: Arc<CostConfigStore>,
    config: Arc<SamplingConfig>,
    shutdown: CancellationToken,
    loader_tasks: Vec<JoinHandle<()>>,
}

impl CollectionManager {
    /// Submits the cost queries in the background. Must be called inside a
    /// Tokio runtime.
    pub fn start(db: Arc<dyn Database>, config: SamplingConfig) -> Self {
        let store = Arc::new(CostConfigStore::new(config.fallback_costs));
        let shutdown = CancellationToken::new();
        let loader_tasks = AsyncConfigLoader::new(db, Arc::clone(&store)).submit_all(shutdown.clone());

        info!("Resource collection manager started; loading command costs");

        Self {
            store,
            config: Arc::new(config),
            shutdown,
            loader_tasks,
        }
    }

    pub fn costs(&self) -> Arc<CostConfigStore> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> Arc<SamplingConfig> {
        Arc::clone(&self.config)
    }

    /// `false` when the manager shut down before the costs finished loading.
    pub async fn wait_ready(&self) -> bool {
        self.store.wait_ready().await
    }

    /// Token that fires when the manager shuts down. Player reactors hang
    /// their run loops and timers off child tokens of this one.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Abandons any cost query still in flight. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        for task in self.loader_tasks.drain(..) {
            task.abort();
        }
        if !self.store.is_ready() {
            warn!("Cost loading abandoned; fallback costs stay in effect");
        }
        self.store.close();
        info!("Resource collection manager shut down");
    }
}

impl Drop for CollectionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
