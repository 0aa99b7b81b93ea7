//! Lifecycle Controller
//!
//! Owns the cache store and its background sweep across the states
//! `Created -> Running -> Stopping -> Stopped`.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::config::CacheConfig;
use crate::error::{ProxyError, Result};
use crate::tasks::spawn_cleanup_task;

/// Lifecycle states of the cache engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Running,
    Stopping,
    Stopped,
}

/// Starts and stops the background expiry sweep around a shared store.
#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
    config: CacheConfig,
    store: Arc<CacheStore>,
    cancel: CancellationToken,
    sweep: Option<JoinHandle<()>>,
}

impl Lifecycle {
    /// Instantiates the store from configuration. No task is running yet.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            state: LifecycleState::Created,
            store: Arc::new(CacheStore::from_config(&config)),
            config,
            cancel: CancellationToken::new(),
            sweep: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Shared handle to the store, for wiring into request handlers.
    pub fn store(&self) -> Arc<CacheStore> {
        Arc::clone(&self.store)
    }

    /// `Created -> Running`: spawns the background sweep.
    pub fn start(&mut self) -> Result<()> {
        if self.state != LifecycleState::Created {
            return Err(ProxyError::internal(
                "INVALID_LIFECYCLE_TRANSITION",
                format!("cannot start from state {:?}", self.state),
            ));
        }

        self.sweep = Some(spawn_cleanup_task(
            self.store(),
            self.config.cleanup_interval,
            self.cancel.clone(),
        ));
        self.state = LifecycleState::Running;
        info!(
            max_size = self.config.max_size,
            default_ttl_secs = self.config.default_ttl.as_secs(),
            "Cache engine running"
        );
        Ok(())
    }

    /// `Running -> Stopping -> Stopped`: cancels the sweep and waits for it
    /// to exit before the store is released.
    ///
    /// In-flight request handlers keep their own `Arc` to the store and can
    /// finish their work.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.state != LifecycleState::Running {
            return Err(ProxyError::internal(
                "INVALID_LIFECYCLE_TRANSITION",
                format!("cannot shut down from state {:?}", self.state),
            ));
        }

        self.state = LifecycleState::Stopping;
        self.cancel.cancel();

        if let Some(handle) = self.sweep.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Cleanup task ended abnormally");
            }
        }

        self.state = LifecycleState::Stopped;
        info!("Cache engine stopped");
        Ok(())
    }
}
