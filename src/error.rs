use thiserror::Error;

/// Main error type for the serving service
#[derive(Error, Debug)]
pub enum InferdError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Registry errors — recovered by the loader via snapshot fallback,
    // never surfaced to a request caller.
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Registry record incomplete: {0}")]
    RegistryIncomplete(String),

    // Snapshot errors — fatal to load; surfaced only as absence of readiness.
    #[error("Snapshot not found: {0}")]
    SnapshotMissing(String),

    #[error("Snapshot corrupt: {0}")]
    SnapshotCorrupt(String),

    // Caller input errors
    #[error("Missing feature(s): {}", names.join(", "))]
    MissingFeature { names: Vec<String> },

    #[error("Feature '{name}' is not numeric")]
    InvalidFeatureType { name: String },

    // Readiness
    #[error("Model not loaded")]
    ServiceNotReady,

    // Predictor errors
    #[error("Inference failed: {0}")]
    Inference(String),

    // Model/schema validation errors (load-time)
    #[error("Validation failed: {0}")]
    Validation(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl InferdError {
    /// True for errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            InferdError::MissingFeature { .. } | InferdError::InvalidFeatureType { .. }
        )
    }
}

/// Result type alias for InferdError
pub type Result<T> = std::result::Result<T, InferdError>;
