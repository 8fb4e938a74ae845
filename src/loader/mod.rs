//! Model resolution: registry first, local snapshot fallback.

pub mod registry;
pub mod snapshot;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::model::ModelArtifact;

/// Outcome of a single resolution source.
#[derive(Debug)]
pub enum SourceOutcome {
    Loaded(ModelArtifact),
    Failed(String),
}

impl SourceOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SourceOutcome::Loaded(_))
    }
}

/// Attempt the registry source. Only called when registry parameters are
/// configured; every registry error is downgraded to a failed outcome.
async fn try_registry(cfg: &AppConfig) -> Option<SourceOutcome> {
    let registry_cfg = cfg.registry.as_ref()?;
    match registry::load(registry_cfg).await {
        Ok(artifact) => Some(SourceOutcome::Loaded(artifact)),
        Err(e) => Some(SourceOutcome::Failed(e.to_string())),
    }
}

fn try_snapshot(cfg: &AppConfig) -> SourceOutcome {
    match snapshot::load(&cfg.snapshot.path) {
        Ok(artifact) => SourceOutcome::Loaded(artifact),
        Err(e) => SourceOutcome::Failed(e.to_string()),
    }
}

/// Resolve a model artifact with fixed precedence: registry, then snapshot.
///
/// Never raises past this boundary. `None` means neither source yielded an
/// artifact and the service stays unloaded.
pub async fn resolve(cfg: &AppConfig) -> Option<ModelArtifact> {
    match try_registry(cfg).await {
        Some(SourceOutcome::Loaded(artifact)) => {
            info!(version = %artifact.version(), "loaded model from registry");
            return Some(artifact);
        }
        Some(SourceOutcome::Failed(reason)) => {
            warn!(%reason, "registry load failed, falling back to snapshot");
        }
        None => {
            info!("registry not configured, resolving from snapshot");
        }
    }

    match try_snapshot(cfg) {
        SourceOutcome::Loaded(artifact) => {
            info!(
                version = %artifact.version(),
                path = %cfg.snapshot.path.display(),
                "loaded model from snapshot"
            );
            Some(artifact)
        }
        SourceOutcome::Failed(reason) => {
            warn!(%reason, "snapshot load failed, no model available");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, ServerConfig, SnapshotConfig};
    use std::path::PathBuf;

    fn config_with_snapshot(path: PathBuf) -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            snapshot: SnapshotConfig { path },
            registry: None,
            logging: LoggingConfig::default(),
        }
    }

    #[tokio::test]
    async fn absent_sources_yield_none() {
        let cfg = config_with_snapshot(std::env::temp_dir().join("inferd-loader-missing.json"));
        assert!(resolve(&cfg).await.is_none());
    }

    #[tokio::test]
    async fn snapshot_failure_is_a_tagged_outcome_not_a_panic() {
        let path = std::env::temp_dir().join(format!("inferd-loader-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{").unwrap();
        let outcome = try_snapshot(&config_with_snapshot(path.clone()));
        assert!(!outcome.is_loaded());
        std::fs::remove_file(path).ok();
    }
}
