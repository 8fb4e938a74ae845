//! Process-wide holder of the current model artifact.
//!
//! Lifecycle: Unloaded -> Ready (exactly one artifact) -> Unloaded on
//! teardown. Readiness is derived strictly from the load result; there is
//! no partially-ready state and no hot swap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::ModelArtifact;

pub struct ServiceState {
    artifact: RwLock<Option<Arc<ModelArtifact>>>,
    ready: AtomicBool,
}

impl ServiceState {
    pub fn new() -> Self {
        Self {
            artifact: RwLock::new(None),
            ready: AtomicBool::new(false),
        }
    }

    /// Install a freshly loaded artifact, discarding any previous one.
    pub async fn install(&self, artifact: ModelArtifact) {
        let mut slot = self.artifact.write().await;
        *slot = Some(Arc::new(artifact));
        self.ready.store(true, Ordering::SeqCst);
    }

    /// Drop the current artifact (shutdown/teardown).
    pub async fn teardown(&self) {
        let mut slot = self.artifact.write().await;
        self.ready.store(false, Ordering::SeqCst);
        *slot = None;
    }

    /// Cheap readiness probe; true only while an artifact is installed.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// The current artifact, shared read-only across callers.
    pub async fn current(&self) -> Option<Arc<ModelArtifact>> {
        self.artifact.read().await.clone()
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new()
    }
}
