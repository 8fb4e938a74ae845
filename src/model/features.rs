//! Feature vector validation: named input map -> schema-ordered vector.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{InferdError, Result};

/// Pull each schema feature by name, in schema order, as an f64.
///
/// The schema is authoritative: every name in `feature_names` must be
/// present (all absent names are reported at once, in schema order), and
/// extra keys in the input are ignored. Non-numeric values are rejected.
pub fn ordered_vector(
    feature_names: &[String],
    features: &HashMap<String, Value>,
) -> Result<Vec<f64>> {
    let missing: Vec<String> = feature_names
        .iter()
        .filter(|name| !features.contains_key(*name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(InferdError::MissingFeature { names: missing });
    }

    feature_names
        .iter()
        .map(|name| {
            features[name]
                .as_f64()
                .ok_or_else(|| InferdError::InvalidFeatureType { name: name.clone() })
        })
        .collect()
}
