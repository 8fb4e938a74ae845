pub mod api;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod serving;

pub use config::AppConfig;
pub use error::{InferdError, Result};
pub use loader::{resolve, SourceOutcome};
pub use model::{Model, ModelArtifact, ModelInfo, Prediction, SoftmaxNetwork};
pub use serving::{InferenceMetrics, ServiceState};
