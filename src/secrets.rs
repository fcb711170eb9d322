use async_trait::async_trait;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use serde::Deserialize;
use tracing::debug;

use crate::error::CaseError;

/// CXM connection details for both regions, stored as a single JSON secret.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    #[serde(rename = "cxmEndPointTest", default)]
    pub cxm_end_point_test: String,
    #[serde(rename = "cxmEndPointLive", default)]
    pub cxm_end_point_live: String,
    #[serde(rename = "cxmAPIKeyTest", default)]
    pub cxm_api_key_test: String,
    #[serde(rename = "cxmAPIKeyLive", default)]
    pub cxm_api_key_live: String,
    #[serde(rename = "cxmEndPointTestNorth", default)]
    pub cxm_end_point_test_north: String,
    #[serde(rename = "cxmEndPointLiveNorth", default)]
    pub cxm_end_point_live_north: String,
    #[serde(rename = "cxmAPIKeyTestNorth", default)]
    pub cxm_api_key_test_north: String,
    #[serde(rename = "cxmAPIKeyLiveNorth", default)]
    pub cxm_api_key_live_north: String,
    #[serde(rename = "cxmAPINameNorth", default)]
    pub cxm_api_name_north: String,
    #[serde(rename = "cxmAPINameWest", default)]
    pub cxm_api_name_west: String,
}

impl Secrets {
    pub fn from_json(secret_string: &str) -> Result<Secrets, CaseError> {
        serde_json::from_str(secret_string)
            .map_err(|e| CaseError::SecretRetrieval(format!("secret is not valid JSON - {}", e)))
    }
}

#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn fetch_secrets(&self) -> Result<Secrets, CaseError>;
}

/// Reads the [Secrets] record from AWS Secrets Manager.
pub struct SecretsManagerSource {
    client: SecretsManagerClient,
    secret_id: String,
    version_stage: String,
}

impl SecretsManagerSource {
    pub fn new(client: SecretsManagerClient, secret_id: String, version_stage: String) -> Self {
        SecretsManagerSource {
            client,
            secret_id,
            version_stage,
        }
    }
}

#[async_trait]
impl SecretSource for SecretsManagerSource {
    async fn fetch_secrets(&self) -> Result<Secrets, CaseError> {
        debug!("fetching secret {} ({})", self.secret_id, self.version_stage);
        let response = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .version_stage(&self.version_stage)
            .send()
            .await
            .map_err(|error| {
                CaseError::SecretRetrieval(format!(
                    "Failed to access AWS Secrets Manager secret {} - {}",
                    self.secret_id,
                    error.into_service_error()
                ))
            })?;

        let secret = response.secret_string.ok_or_else(|| {
            CaseError::SecretRetrieval(format!(
                "Didn't find the {} secret in AWS secretsmanager",
                self.secret_id
            ))
        })?;

        Secrets::from_json(&secret)
    }
}
