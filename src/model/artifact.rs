//! The loaded model artifact: predictor plus its serving schema.

use std::time::{Duration, Instant};

use crate::error::{InferdError, Result};
use crate::model::network::SoftmaxNetwork;

/// Fixed identifier reported by this service instance.
pub const MODEL_NAME: &str = "iris-classifier";

/// Framework label for the in-process predictor.
pub const FRAMEWORK: &str = "dense";

/// Version sentinel for bundles that carry no version tag.
pub const UNKNOWN_VERSION: &str = "unknown";

/// A single labeled prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted class, drawn from the artifact's class names.
    pub label: String,
    /// Probability mass of the selected class, in [0, 1]. Not renormalized.
    pub confidence: f64,
    /// Artifact version at prediction time.
    pub model_version: String,
    /// Wall-clock duration of the predictor invocation only.
    pub latency: Duration,
}

impl Prediction {
    /// Latency in milliseconds, rounded to 3 decimals.
    pub fn latency_ms(&self) -> f64 {
        (self.latency.as_secs_f64() * 1000.0 * 1000.0).round() / 1000.0
    }

    /// Latency in seconds, unrounded (metrics input).
    pub fn latency_seconds(&self) -> f64 {
        self.latency.as_secs_f64()
    }
}

/// Model metadata surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: &'static str,
    pub version: String,
    pub framework: &'static str,
    pub features: Vec<String>,
    pub classes: Vec<String>,
}

/// A servable model: run inference on an ordered vector, describe itself.
///
/// Alternative predictor backends only need these two capabilities; the
/// loading, validation and metrics logic never looks past this trait.
pub trait Model: Send + Sync {
    fn infer(&self, vector: &[f64]) -> Result<Prediction>;
    fn describe(&self) -> ModelInfo;
}

/// Loaded predictor plus its ordered feature/class schema and version tag.
///
/// Immutable after load; shared read-only across concurrent inference calls.
pub struct ModelArtifact {
    predictor: SoftmaxNetwork,
    feature_names: Vec<String>,
    class_names: Vec<String>,
    version: String,
}

impl std::fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("feature_names", &self.feature_names)
            .field("class_names", &self.class_names)
            .field("version", &self.version)
            .finish()
    }
}

impl ModelArtifact {
    /// Assemble an artifact, checking the schema against the predictor shape.
    ///
    /// A dimensionality mismatch is a load failure, not a request-time failure.
    pub fn new(
        predictor: SoftmaxNetwork,
        feature_names: Vec<String>,
        class_names: Vec<String>,
        version: String,
    ) -> Result<Self> {
        let predictor = predictor.validated()?;

        if predictor.input_dim() != feature_names.len() {
            return Err(InferdError::Validation(format!(
                "predictor expects {} inputs but schema has {} feature names",
                predictor.input_dim(),
                feature_names.len()
            )));
        }
        if predictor.output_dim() != class_names.len() {
            return Err(InferdError::Validation(format!(
                "predictor emits {} outputs but schema has {} class names",
                predictor.output_dim(),
                class_names.len()
            )));
        }

        Ok(Self {
            predictor,
            feature_names,
            class_names,
            version,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Model for ModelArtifact {
    /// Compute a labeled prediction for an ordered, validated feature vector.
    ///
    /// Only the predictor call is timed. Ties among equal maximum
    /// probabilities break to the lowest class index.
    fn infer(&self, vector: &[f64]) -> Result<Prediction> {
        let start = Instant::now();
        let proba = self.predictor.predict_proba(vector)?;
        let latency = start.elapsed();

        let mut best_idx = 0usize;
        let mut best = f64::NEG_INFINITY;
        for (idx, p) in proba.iter().enumerate() {
            if *p > best {
                best = *p;
                best_idx = idx;
            }
        }

        Ok(Prediction {
            label: self.class_names[best_idx].clone(),
            confidence: proba[best_idx],
            model_version: self.version.clone(),
            latency,
        })
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            name: MODEL_NAME,
            version: self.version.clone(),
            framework: FRAMEWORK,
            features: self.feature_names.clone(),
            classes: self.class_names.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::network::{Activation, DenseLayer};

    fn network(weights: Vec<Vec<f64>>, bias: Vec<f64>) -> SoftmaxNetwork {
        SoftmaxNetwork {
            input_dim: weights[0].len(),
            layers: vec![DenseLayer {
                weights,
                bias,
                activation: Activation::Softmax,
            }],
            metadata: serde_json::Value::Null,
        }
    }

    fn two_class_artifact() -> ModelArtifact {
        ModelArtifact::new(
            network(vec![vec![1.0, 0.0], vec![0.0, 1.0]], vec![0.0, 0.0]),
            vec!["x".to_string(), "y".to_string()],
            vec!["left".to_string(), "right".to_string()],
            "1.2.3".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn infer_selects_max_probability_class() {
        let artifact = two_class_artifact();
        let pred = artifact.infer(&[3.0, 0.0]).unwrap();
        assert_eq!(pred.label, "left");
        assert!(pred.confidence > 0.5 && pred.confidence <= 1.0);
        assert_eq!(pred.model_version, "1.2.3");
        assert!(pred.latency_ms() >= 0.0);
    }

    #[test]
    fn ties_break_to_lowest_class_index() {
        // Symmetric weights and equal inputs give identical logits.
        let artifact = two_class_artifact();
        let pred = artifact.infer(&[1.0, 1.0]).unwrap();
        assert_eq!(pred.label, "left");
        assert!((pred.confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn repeated_inference_is_deterministic() {
        let artifact = two_class_artifact();
        let a = artifact.infer(&[0.2, 0.9]).unwrap();
        let b = artifact.infer(&[0.2, 0.9]).unwrap();
        assert_eq!(a.label, b.label);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn feature_count_mismatch_fails_at_load() {
        let err = ModelArtifact::new(
            network(vec![vec![1.0, 0.0], vec![0.0, 1.0]], vec![0.0, 0.0]),
            vec!["only-one".to_string()],
            vec!["left".to_string(), "right".to_string()],
            "1.0.0".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, InferdError::Validation(_)));
    }

    #[test]
    fn class_count_mismatch_fails_at_load() {
        let err = ModelArtifact::new(
            network(vec![vec![1.0, 0.0], vec![0.0, 1.0]], vec![0.0, 0.0]),
            vec!["x".to_string(), "y".to_string()],
            vec!["left".to_string()],
            "1.0.0".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, InferdError::Validation(_)));
    }

    #[test]
    fn describe_reports_schema_in_order() {
        let artifact = two_class_artifact();
        let info = artifact.describe();
        assert_eq!(info.name, MODEL_NAME);
        assert_eq!(info.framework, FRAMEWORK);
        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.features, vec!["x", "y"]);
        assert_eq!(info.classes, vec!["left", "right"]);
    }
}
