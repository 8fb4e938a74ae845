//! Model artifact, predictor network and feature validation.

pub mod artifact;
pub mod features;
pub mod network;

pub use artifact::{Model, ModelArtifact, ModelInfo, Prediction, FRAMEWORK, MODEL_NAME, UNKNOWN_VERSION};
pub use features::ordered_vector;
pub use network::{Activation, DenseLayer, SoftmaxNetwork};
