use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::model::{ModelInfo, Prediction};

// ============================================================================
// Prediction Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    /// Named feature values; extra keys are ignored.
    pub features: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub confidence: f64,
    pub model_version: String,
    pub inference_time_ms: f64,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            inference_time_ms: p.latency_ms(),
            prediction: p.label,
            confidence: p.confidence,
            model_version: p.model_version,
        }
    }
}

// ============================================================================
// Probe Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub model_loaded: bool,
}

// ============================================================================
// Model Info Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub name: String,
    pub version: String,
    pub framework: String,
    pub features: Vec<String>,
    pub classes: Vec<String>,
}

impl From<ModelInfo> for ModelInfoResponse {
    fn from(info: ModelInfo) -> Self {
        Self {
            name: info.name.to_string(),
            version: info.version,
            framework: info.framework.to_string(),
            features: info.features,
            classes: info.classes,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
