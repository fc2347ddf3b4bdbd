use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::errors::{DeployError, Result};
use crate::core::models::descriptor::ImageSpec;

/// Placeholder shown instead of secret material in rendered output.
pub const MASK: &str = "********";

/// Override values submitted to the Dagster Helm chart.
///
/// Field names serialize to the chart's own keys, so the JSON form of
/// this struct can be handed to `helm --values` directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartValues {
    pub postgresql: PostgresqlValues,
    #[serde(rename = "dagsterWebserver")]
    pub dagster_webserver: WebserverValues,
    #[serde(rename = "dagsterDaemon")]
    pub dagster_daemon: DaemonValues,
    #[serde(rename = "dagster-user-deployments")]
    pub user_deployments: UserDeploymentsValues,
}

#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostgresqlValues {
    pub enabled: bool,
    pub postgresql_username: String,
    pub postgresql_password: String,
    pub postgresql_database: String,
}

impl fmt::Debug for PostgresqlValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresqlValues")
            .field("enabled", &self.enabled)
            .field("postgresql_username", &self.postgresql_username)
            .field("postgresql_password", &MASK)
            .field("postgresql_database", &self.postgresql_database)
            .finish()
    }
}

/// Kubernetes Service type for the webserver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[default]
    ClusterIP,
    NodePort,
    LoadBalancer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebserverValues {
    pub service: ServiceValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceValues {
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaemonValues {
    pub resources: ResourceRequirements,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRequirements {
    pub limits: ResourceQuantities,
    pub requests: ResourceQuantities,
}

/// CPU and memory in Kubernetes quantity notation (`"1"`, `"512Mi"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceQuantities {
    pub cpu: String,
    pub memory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeploymentsValues {
    pub enabled: bool,
    pub enable_subchart: bool,
    pub deployments: Vec<UserDeployment>,
}

/// One entry of `dagster-user-deployments.deployments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeployment {
    pub name: String,
    pub image: ImageSpec,
    pub dagster_api_grpc_args: Vec<String>,
    pub port: u16,
    pub env: BTreeMap<String, String>,
}

impl ChartValues {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DeployError::StateError {
            detail: format!("Failed to serialize chart values: {e}"),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DeployError::StateError {
            detail: format!("Failed to serialize chart values: {e}"),
        })
    }

    /// Hex SHA-256 of the compact JSON form. Identical inputs give
    /// identical fingerprints, so two runs can be compared without
    /// storing the values themselves.
    pub fn fingerprint(&self) -> Result<String> {
        let json = self.to_json()?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Copy with the database password and the given env keys masked.
    pub fn redacted<'a>(&self, secret_keys: impl IntoIterator<Item = &'a str>) -> Self {
        let keys: Vec<&str> = secret_keys.into_iter().collect();
        let mut out = self.clone();
        out.postgresql.postgresql_password = MASK.to_string();
        for deployment in &mut out.user_deployments.deployments {
            for (key, value) in deployment.env.iter_mut() {
                if keys.contains(&key.as_str()) && !value.is_empty() {
                    *value = MASK.to_string();
                }
            }
        }
        out
    }
}
