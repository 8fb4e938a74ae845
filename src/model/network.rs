//! Dense softmax network inference (CPU-only).
//!
//! The predictor served by this process is a small MLP stored as JSON:
//! a stack of dense layers ending in a softmax over the class scores.
//!
//! Design goals:
//! - Stable, deterministic, dependency-light.
//! - Explicit shape validation (fail fast at load, never at request time).

use serde::{Deserialize, Serialize};

use crate::error::{InferdError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
    Sigmoid,
    Softmax,
}

impl Default for Activation {
    fn default() -> Self {
        Self::Linear
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weights shape: [out_dim][in_dim]
    pub weights: Vec<Vec<f64>>,
    /// Bias shape: [out_dim]
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn in_dim(&self) -> usize {
        self.weights.first().map(|r| r.len()).unwrap_or(0)
    }

    fn out_dim(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.out_dim());
        for (row, b) in self.weights.iter().zip(self.bias.iter()) {
            let z: f64 = row.iter().zip(input.iter()).map(|(w, x)| w * x).sum::<f64>() + b;
            out.push(z);
        }
        apply_activation(self.activation, &mut out);
        out
    }
}

fn apply_activation(activation: Activation, values: &mut [f64]) {
    match activation {
        Activation::Linear => {}
        Activation::Relu => {
            for v in values.iter_mut() {
                *v = v.max(0.0);
            }
        }
        Activation::Tanh => {
            for v in values.iter_mut() {
                *v = v.tanh();
            }
        }
        Activation::Sigmoid => {
            for v in values.iter_mut() {
                *v = 1.0 / (1.0 + (-*v).exp());
            }
        }
        Activation::Softmax => {
            // Shift by the max logit for numerical stability.
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let mut sum = 0.0;
            for v in values.iter_mut() {
                *v = (*v - max).exp();
                sum += *v;
            }
            if sum > 0.0 {
                for v in values.iter_mut() {
                    *v /= sum;
                }
            }
        }
    }
}

/// A trained classifier: dense layers ending in a softmax over class scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxNetwork {
    /// Expected input dimension.
    pub input_dim: usize,

    pub layers: Vec<DenseLayer>,

    /// Optional free-form metadata (training info, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl SoftmaxNetwork {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.input_dim == 0 {
            return Err("input_dim must be > 0".to_string());
        }
        if self.layers.is_empty() {
            return Err("layers must not be empty".to_string());
        }

        let mut expected_in = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.out_dim() == 0 {
                return Err(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != layer.out_dim() {
                return Err(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim()
                ));
            }
            for (r, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_in {
                    return Err(format!(
                        "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                        row.len()
                    ));
                }
                if row.iter().any(|w| !w.is_finite()) {
                    return Err(format!("layer[{idx}] weights row {r} has non-finite value"));
                }
            }
            if layer.bias.iter().any(|b| !b.is_finite()) {
                return Err(format!("layer[{idx}] bias has non-finite value"));
            }
            expected_in = layer.out_dim();
        }

        // Classifier contract: the final layer must produce a distribution.
        let last = self.layers.last().map(|l| l.activation);
        if last != Some(Activation::Softmax) {
            return Err("final layer activation must be softmax".to_string());
        }

        Ok(())
    }

    pub fn validated(self) -> Result<Self> {
        self.validate().map_err(InferdError::Validation)?;
        Ok(self)
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.out_dim()).unwrap_or(0)
    }

    /// Run a forward pass and return the class probability distribution.
    pub fn predict_proba(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_dim {
            return Err(InferdError::Inference(format!(
                "input dim mismatch: got {}, expected {}",
                input.len(),
                self.input_dim
            )));
        }
        if input.iter().any(|x| !x.is_finite()) {
            return Err(InferdError::Inference(
                "input contains non-finite value".to_string(),
            ));
        }

        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current);
        }
        Ok(current)
    }
}
