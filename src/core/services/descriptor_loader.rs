use std::path::Path;

use crate::core::errors::{DeployError, Result};
use crate::core::models::descriptor::DeploymentDescriptor;

/// On-disk formats accepted for the deployment descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Toml,
    Json,
}

impl DescriptorFormat {
    /// Pick the format from the file extension. Anything that is not
    /// `.json` is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Reads the deployment descriptor from disk.
///
/// Only structure is checked: required fields must be present and ports
/// must be positive. Module paths and port availability are not verified.
pub struct DescriptorLoader;

impl DescriptorLoader {
    /// Load and parse the descriptor at `path`.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if `path` does not exist.
    /// - `ConfigParse` if the document is malformed or misses `image`
    ///   or `deployments`.
    pub fn load(&self, path: &Path) -> Result<DeploymentDescriptor> {
        if !path.exists() {
            return Err(DeployError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        self.parse(&content, DescriptorFormat::from_path(path), path)
    }

    /// Parse descriptor content. `origin` is only used in error messages.
    pub fn parse(
        &self,
        content: &str,
        format: DescriptorFormat,
        origin: &Path,
    ) -> Result<DeploymentDescriptor> {
        let parse_err = |detail: String| DeployError::ConfigParse {
            file: origin.to_path_buf(),
            detail,
        };

        let descriptor: DeploymentDescriptor = match format {
            DescriptorFormat::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string()))?,
            DescriptorFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?
            }
        };

        if let Some(worker) = descriptor.deployments.iter().find(|w| w.port == 0) {
            return Err(parse_err(format!(
                "deployment '{}' has port 0; ports must be positive",
                worker.name
            )));
        }

        Ok(descriptor)
    }
}
