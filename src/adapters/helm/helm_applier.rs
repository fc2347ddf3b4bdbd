use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::core::errors::{DeployError, Result};
use crate::core::models::chart_values::ChartValues;
use crate::core::models::release::{AppliedRelease, ChartRef, ResourceHandle};
use crate::core::traits::applier::DeploymentApplier;

/// Deployment applier that shells out to the system `helm` and `kubectl`.
///
/// Values are written to a temporary JSON file (valid YAML) and passed
/// with `--values`, so secret material never appears on a command line.
pub struct HelmApplier {
    helm_path: PathBuf,
    kubectl_path: PathBuf,
    /// Pass `--wait` so helm blocks until resources are ready.
    wait: bool,
}

impl HelmApplier {
    pub fn new(helm_path: PathBuf, kubectl_path: PathBuf) -> Self {
        Self {
            helm_path,
            kubectl_path,
            wait: true,
        }
    }

    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Run a tool and return stdout on success.
    fn run(&self, program: &Path, args: &[&str]) -> Result<Vec<u8>> {
        tracing::debug!(program = %program.display(), args = ?args, "running");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| DeployError::Applier {
                detail: format!("Failed to run {}: {e}", program.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeployError::Applier {
                detail: format!(
                    "{} {} exited with {}: {}",
                    program.display(),
                    args.first().copied().unwrap_or_default(),
                    output.status,
                    stderr.trim()
                ),
            });
        }

        Ok(output.stdout)
    }

    /// Only an empty listing means absent; any kubectl failure is returned.
    fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        let stdout = self.run(
            &self.kubectl_path,
            &["get", "namespace", namespace, "--ignore-not-found", "-o", "name"],
        )?;
        Ok(!String::from_utf8_lossy(&stdout).trim().is_empty())
    }

    /// Build the `helm upgrade --install` argument list.
    fn upgrade_args<'a>(
        &self,
        chart: &'a ChartRef,
        release: &'a str,
        namespace: &'a str,
        values_path: &'a str,
    ) -> Vec<&'a str> {
        let mut args = vec![
            "upgrade",
            "--install",
            release,
            chart.name.as_str(),
            "--repo",
            chart.repo_url.as_str(),
            "--version",
            chart.version.as_str(),
            "--namespace",
            namespace,
            "--values",
            values_path,
        ];
        if self.wait {
            args.push("--wait");
        }
        args
    }

    /// Services labelled with the release, as reported by kubectl.
    fn list_services(&self, release: &str, namespace: &str) -> Result<AppliedRelease> {
        let selector = format!("app.kubernetes.io/instance={release}");
        let stdout = self.run(
            &self.kubectl_path,
            &[
                "get",
                "services",
                "--namespace",
                namespace,
                "-l",
                selector.as_str(),
                "-o",
                "json",
            ],
        )?;
        parse_resource_list(&stdout, namespace)
    }
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    items: Vec<ResourceItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceItem {
    #[serde(default = "default_api_version")]
    api_version: String,
    #[serde(default = "default_kind")]
    kind: String,
    metadata: ResourceMetadata,
}

#[derive(Debug, Deserialize)]
struct ResourceMetadata {
    name: String,
    namespace: Option<String>,
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_kind() -> String {
    "Service".to_string()
}

/// Turn `kubectl get ... -o json` output into an `AppliedRelease`.
fn parse_resource_list(json: &[u8], default_namespace: &str) -> Result<AppliedRelease> {
    let list: ResourceList = serde_json::from_slice(json).map_err(|e| DeployError::Applier {
        detail: format!("Unexpected kubectl output: {e}"),
    })?;

    let mut release = AppliedRelease::new();
    for item in list.items {
        let namespace = item.metadata.namespace.as_deref().unwrap_or(default_namespace);
        release.insert(
            &format!("{}/{}", item.api_version, item.kind),
            &format!("{namespace}/{}", item.metadata.name),
            ResourceHandle {
                name: item.metadata.name.clone(),
            },
        );
    }
    Ok(release)
}

impl DeploymentApplier for HelmApplier {
    fn ensure_namespace(&self, namespace: &str) -> Result<()> {
        if self.namespace_exists(namespace)? {
            tracing::debug!(namespace, "namespace already exists");
            return Ok(());
        }
        self.run(&self.kubectl_path, &["create", "namespace", namespace])?;
        Ok(())
    }

    fn apply(
        &self,
        chart: &ChartRef,
        release: &str,
        namespace: &str,
        values: &ChartValues,
    ) -> Result<AppliedRelease> {
        let mut values_file = tempfile::Builder::new()
            .prefix("dagster-values-")
            .suffix(".json")
            .tempfile()?;
        values_file.write_all(values.to_json()?.as_bytes())?;
        values_file.flush()?;

        let values_path = values_file.path().to_string_lossy().into_owned();
        let args = self.upgrade_args(chart, release, namespace, &values_path);
        self.run(&self.helm_path, &args)?;

        self.list_services(release, namespace)
    }
}
