//! Request-time serving: validation, inference and metrics recording.

pub mod metrics;
pub mod state;

pub use metrics::InferenceMetrics;
pub use state::ServiceState;

use std::collections::HashMap;

use serde_json::Value;

use crate::error::Result;
use crate::model::{self, Model, ModelArtifact, Prediction};

/// Validate a named-value input against the artifact's schema, run the
/// predictor, and record metrics. Validation failures record nothing.
pub fn run_inference(
    artifact: &ModelArtifact,
    metrics: &InferenceMetrics,
    features: &HashMap<String, Value>,
) -> Result<Prediction> {
    let vector = model::ordered_vector(artifact.feature_names(), features)?;
    let prediction = artifact.infer(&vector)?;
    metrics.observe_inference(prediction.latency_seconds(), &prediction.label);
    Ok(prediction)
}
