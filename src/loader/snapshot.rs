//! Local snapshot bundle: the fallback model source.
//!
//! A snapshot is a single JSON file holding the predictor network plus the
//! exact feature/class order and version it was trained with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InferdError, Result};
use crate::model::{ModelArtifact, SoftmaxNetwork, UNKNOWN_VERSION};

/// On-disk bundle layout. `model`, `feature_names` and `target_names` are
/// required; a missing `version` maps to the "unknown" sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotBundle {
    pub model: SoftmaxNetwork,
    pub feature_names: Vec<String>,
    pub target_names: Vec<String>,
    #[serde(default = "unknown_version")]
    pub version: String,
}

fn unknown_version() -> String {
    UNKNOWN_VERSION.to_string()
}

/// Deserialize a snapshot bundle into a ready artifact.
pub fn load(path: &Path) -> Result<ModelArtifact> {
    if !path.exists() {
        return Err(InferdError::SnapshotMissing(path.display().to_string()));
    }

    let contents = std::fs::read_to_string(path)?;
    let bundle: SnapshotBundle = serde_json::from_str(&contents)
        .map_err(|e| InferdError::SnapshotCorrupt(format!("{}: {e}", path.display())))?;

    ModelArtifact::new(
        bundle.model,
        bundle.feature_names,
        bundle.target_names,
        bundle.version,
    )
    .map_err(|e| InferdError::SnapshotCorrupt(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use serde_json::json;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("inferd-snapshot-{name}-{}.json", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn bundle_json() -> serde_json::Value {
        json!({
            "model": {
                "input_dim": 2,
                "layers": [{
                    "weights": [[1.0, 0.0], [0.0, 1.0]],
                    "bias": [0.0, 0.0],
                    "activation": "softmax"
                }]
            },
            "feature_names": ["x", "y"],
            "target_names": ["left", "right"],
            "version": "1.0.0"
        })
    }

    #[test]
    fn loads_well_formed_bundle_preserving_order() {
        let path = write_temp("ok", &bundle_json().to_string());
        let artifact = load(&path).unwrap();
        assert_eq!(artifact.feature_names(), ["x", "y"]);
        assert_eq!(artifact.class_names(), ["left", "right"]);
        assert_eq!(artifact.version(), "1.0.0");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_snapshot_missing() {
        let path = std::env::temp_dir().join("inferd-snapshot-does-not-exist.json");
        assert!(matches!(
            load(&path),
            Err(InferdError::SnapshotMissing(_))
        ));
    }

    #[test]
    fn missing_required_key_is_corrupt() {
        let mut bundle = bundle_json();
        bundle.as_object_mut().unwrap().remove("feature_names");
        let path = write_temp("nokeys", &bundle.to_string());
        assert!(matches!(load(&path), Err(InferdError::SnapshotCorrupt(_))));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn invalid_json_is_corrupt() {
        let path = write_temp("garbage", "not json at all");
        assert!(matches!(load(&path), Err(InferdError::SnapshotCorrupt(_))));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn absent_version_defaults_to_unknown() {
        let mut bundle = bundle_json();
        bundle.as_object_mut().unwrap().remove("version");
        let path = write_temp("nover", &bundle.to_string());
        let artifact = load(&path).unwrap();
        assert_eq!(artifact.version(), UNKNOWN_VERSION);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn schema_shape_mismatch_is_corrupt() {
        let mut bundle = bundle_json();
        bundle["feature_names"] = json!(["x", "y", "z"]);
        let path = write_temp("shape", &bundle.to_string());
        assert!(matches!(load(&path), Err(InferdError::SnapshotCorrupt(_))));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn loaded_artifact_predicts() {
        let path = write_temp("predicts", &bundle_json().to_string());
        let artifact = load(&path).unwrap();
        let pred = artifact.infer(&[5.0, 0.0]).unwrap();
        assert_eq!(pred.label, "left");
        std::fs::remove_file(path).ok();
    }
}
