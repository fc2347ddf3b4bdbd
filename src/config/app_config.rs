use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::core::errors::{DeployError, Result};
use crate::core::models::chart_values::ServiceType;
use crate::core::models::release::ChartRef;
use crate::core::services::deploy_service::DeployTarget;
use crate::core::services::secret_resolver::normalize_secret_name;

/// Default location of the project configuration.
pub const DEFAULT_CONFIG_FILE: &str = "dagster-deploy.toml";

/// Project configuration read from `dagster-deploy.toml`.
///
/// Every section is optional; a missing file yields `AppConfig::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chart: ChartSection,
    pub target: TargetSection,
    pub secrets: SecretsSection,
    pub webserver: WebserverSection,
    pub tools: ToolsSection,
    pub state: StateSection,
}

impl AppConfig {
    /// Load the configuration at `path`, or defaults when it does not exist.
    ///
    /// After parsing, validates the namespace and release names so that a
    /// bad value fails here instead of inside helm.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no project config, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| DeployError::InvalidConfig {
            detail: format!("Failed to parse {}: {e}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_dns_label(&self.target.namespace, "target.namespace")?;
        validate_dns_label(&self.target.release, "target.release")?;

        for (value, field) in [
            (&self.chart.name, "chart.name"),
            (&self.chart.version, "chart.version"),
            (&self.chart.repo, "chart.repo"),
        ] {
            if value.trim().is_empty() {
                return Err(DeployError::InvalidConfig {
                    detail: format!("{field} must not be empty"),
                });
            }
        }

        if normalize_secret_name(&self.secrets.password_key).is_empty() {
            return Err(DeployError::InvalidConfig {
                detail: "secrets.password_key must contain at least one letter or digit".into(),
            });
        }

        if self.webserver.port == 0 {
            return Err(DeployError::InvalidConfig {
                detail: "webserver.port must be positive".into(),
            });
        }

        Ok(())
    }

    pub fn chart_ref(&self) -> ChartRef {
        ChartRef {
            name: self.chart.name.clone(),
            version: self.chart.version.clone(),
            repo_url: self.chart.repo.clone(),
        }
    }

    pub fn deploy_target(&self) -> DeployTarget {
        DeployTarget {
            namespace: self.target.namespace.clone(),
            release: self.target.release.clone(),
        }
    }

    /// Environment variable that would supply the database password,
    /// e.g. `DAGSTER_SECRET_POSTGRESQL_PASSWORD`.
    pub fn password_env_hint(&self) -> String {
        format!(
            "{}{}",
            self.secrets.env_prefix,
            screaming_snake(&self.secrets.password_key)
        )
    }
}

/// The `[chart]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartSection {
    pub name: String,
    /// Pinned chart version.
    pub version: String,
    pub repo: String,
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            name: "dagster".into(),
            version: "1.12.8".into(),
            repo: "https://dagster-io.github.io/helm".into(),
        }
    }
}

/// The `[target]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetSection {
    pub namespace: String,
    pub release: String,
}

impl Default for TargetSection {
    fn default() -> Self {
        Self {
            namespace: "dagster".into(),
            release: "dagster".into(),
        }
    }
}

/// The `[secrets]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecretsSection {
    /// Optional dotenv file consulted after the environment.
    pub file: Option<PathBuf>,
    pub env_prefix: String,
    /// Key of the database password; never defaults to empty.
    pub password_key: String,
}

impl Default for SecretsSection {
    fn default() -> Self {
        Self {
            file: None,
            env_prefix: "DAGSTER_SECRET_".into(),
            password_key: "postgresqlPassword".into(),
        }
    }
}

/// The `[webserver]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebserverSection {
    pub service_type: ServiceType,
    pub port: u16,
}

impl Default for WebserverSection {
    fn default() -> Self {
        Self {
            service_type: ServiceType::ClusterIP,
            port: 80,
        }
    }
}

/// The `[tools]` section: external binaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    pub helm: PathBuf,
    pub kubectl: PathBuf,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            helm: PathBuf::from("helm"),
            kubectl: PathBuf::from("kubectl"),
        }
    }
}

/// The `[state]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StateSection {
    pub dir: PathBuf,
}

impl Default for StateSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".dagster-deploy"),
        }
    }
}

/// Reject anything that is not a Kubernetes DNS-1123 label.
fn validate_dns_label(value: &str, field: &str) -> Result<()> {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    let re = LABEL.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$").expect("static regex is valid")
    });
    if re.is_match(value) {
        Ok(())
    } else {
        Err(DeployError::InvalidConfig {
            detail: format!(
                "{field} '{value}' is not a valid Kubernetes name \
                 (lowercase letters, digits and '-', at most 63 characters)"
            ),
        })
    }
}

/// `postgresqlPassword` -> `POSTGRESQL_PASSWORD`, `s3_key` -> `S3_KEY`.
fn screaming_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.extend(c.to_uppercase());
    }
    out
}
