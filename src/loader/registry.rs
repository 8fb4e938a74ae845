//! Model registry client (MLflow-compatible REST).
//!
//! Resolves the latest model version registered under a name at a stage,
//! reads the feature/target schema from the run's tags, and downloads the
//! predictor network. Every failure here is recoverable: the loader falls
//! back to the local snapshot.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::config::RegistryConfig;
use crate::error::{InferdError, Result};
use crate::model::{ModelArtifact, SoftmaxNetwork};

/// Artifact path of the predictor network within a run.
const NETWORK_ARTIFACT_PATH: &str = "model/model.json";

#[derive(Debug, Clone, Deserialize)]
struct LatestVersionsResponse {
    #[serde(default)]
    model_versions: Vec<ModelVersion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelVersion {
    pub version: String,
    pub run_id: String,
    #[serde(default)]
    pub current_stage: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GetRunResponse {
    run: RunRecord,
}

#[derive(Debug, Clone, Deserialize)]
struct RunRecord {
    data: RunData,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RunData {
    #[serde(default)]
    tags: Vec<RunTag>,
}

#[derive(Debug, Clone, Deserialize)]
struct RunTag {
    key: String,
    value: String,
}

#[derive(Clone)]
pub struct RegistryClient {
    http: Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let base_url = endpoint.trim_end_matches('/').to_string();

        let http = Client::builder()
            .user_agent("inferd-registry-client/0.1")
            .build()
            .map_err(|e| {
                InferdError::Internal(format!("failed to build registry HTTP client: {}", e))
            })?;

        Ok(Self { http, base_url })
    }

    /// Latest version registered under `name` at `stage`, if any.
    pub async fn latest_version(&self, name: &str, stage: &str) -> Result<Option<ModelVersion>> {
        let url = format!(
            "{}/api/2.0/mlflow/registered-models/get-latest-versions",
            self.base_url
        );
        let resp = self
            .http
            .post(&url)
            .json(&json!({ "name": name, "stages": [stage] }))
            .send()
            .await
            .map_err(|e| InferdError::RegistryUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(InferdError::RegistryUnavailable(format!(
                "get-latest-versions returned {}",
                resp.status()
            )));
        }

        let body: LatestVersionsResponse = resp
            .json()
            .await
            .map_err(|e| InferdError::RegistryUnavailable(e.to_string()))?;

        Ok(body.model_versions.into_iter().next())
    }

    /// Run tag value by key; empty strings count as absent.
    pub async fn run_tag(&self, run_id: &str, key: &str) -> Result<Option<String>> {
        let url = format!("{}/api/2.0/mlflow/runs/get", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("run_id", run_id)])
            .send()
            .await
            .map_err(|e| InferdError::RegistryUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(InferdError::RegistryUnavailable(format!(
                "runs/get returned {}",
                resp.status()
            )));
        }

        let body: GetRunResponse = resp
            .json()
            .await
            .map_err(|e| InferdError::RegistryUnavailable(e.to_string()))?;

        Ok(body
            .run
            .data
            .tags
            .into_iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value)
            .filter(|value| !value.trim().is_empty()))
    }

    /// Download the predictor network stored under the run's artifacts.
    pub async fn download_network(&self, run_id: &str) -> Result<SoftmaxNetwork> {
        let url = format!("{}/get-artifact", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("run_id", run_id), ("path", NETWORK_ARTIFACT_PATH)])
            .send()
            .await
            .map_err(|e| InferdError::RegistryUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(InferdError::RegistryUnavailable(format!(
                "get-artifact returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| InferdError::RegistryUnavailable(e.to_string()))
    }
}

/// Resolve an artifact from the registry.
///
/// Zero versions at the requested stage and missing or empty schema tags
/// are registry failures (`RegistryIncomplete`), not hard errors.
pub async fn load(cfg: &RegistryConfig) -> Result<ModelArtifact> {
    let client = RegistryClient::new(&cfg.endpoint)?;

    let version = client
        .latest_version(&cfg.model_name, &cfg.stage)
        .await?
        .ok_or_else(|| {
            InferdError::RegistryIncomplete(format!(
                "no version of '{}' at stage '{}'",
                cfg.model_name, cfg.stage
            ))
        })?;

    info!(
        model = %cfg.model_name,
        version = %version.version,
        stage = %cfg.stage,
        run = %version.run_id,
        "resolved registry model version"
    );

    let feature_tag = client.run_tag(&version.run_id, "feature_names").await?;
    let target_tag = client.run_tag(&version.run_id, "target_names").await?;
    let (feature_tag, target_tag) = match (feature_tag, target_tag) {
        (Some(f), Some(t)) => (f, t),
        _ => {
            return Err(InferdError::RegistryIncomplete(format!(
                "run {} missing feature_names/target_names tags",
                version.run_id
            )))
        }
    };

    let feature_names: Vec<String> = feature_tag.split(',').map(|s| s.trim().to_string()).collect();
    let class_names: Vec<String> = target_tag.split(',').map(|s| s.trim().to_string()).collect();

    let network = client.download_network(&version.run_id).await?;

    ModelArtifact::new(network, feature_names, class_names, version.version)
        .map_err(|e| InferdError::RegistryIncomplete(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = RegistryClient::new("http://mlflow:5000/").unwrap();
        assert_eq!(client.base_url, "http://mlflow:5000");
    }

    #[tokio::test]
    async fn unreachable_registry_is_unavailable() {
        // Nothing listens on port 1; the connect error maps to RegistryUnavailable.
        let client = RegistryClient::new("http://127.0.0.1:1").unwrap();
        let err = client.latest_version("iris", "Production").await.unwrap_err();
        assert!(matches!(err, InferdError::RegistryUnavailable(_)));
    }
}
