use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Image pull policy, passed through to the chart verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullPolicy {
    Always,
    #[default]
    IfNotPresent,
    Never,
}

/// Container image shared by every worker deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    pub repository: String,
    pub tag: String,
    #[serde(default)]
    pub pull_policy: PullPolicy,
}

/// One user-code worker: a gRPC server loading `module` on `port`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkerSpec {
    pub name: String,
    pub module: String,
    pub port: u16,
    /// Static environment. Resolved secrets are overlaid on top.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// The deployment descriptor: image, worker list, and declared secrets.
///
/// Loaded once per run by `services::descriptor_loader` and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeploymentDescriptor {
    pub image: ImageSpec,
    pub deployments: Vec<WorkerSpec>,
    /// Secret names as written, e.g. `S3_SECRET_KEY`.
    #[serde(default)]
    pub secrets: Vec<String>,
}

impl DeploymentDescriptor {
    /// Worker names that appear more than once, in first-seen order.
    pub fn duplicate_worker_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dupes = Vec::new();
        for worker in &self.deployments {
            if !seen.insert(worker.name.as_str()) && !dupes.contains(&worker.name.as_str()) {
                dupes.push(worker.name.as_str());
            }
        }
        dupes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(name: &str) -> WorkerSpec {
        WorkerSpec {
            name: name.to_string(),
            module: format!("{name}.definitions"),
            port: 4000,
            env: BTreeMap::new(),
        }
    }

    fn descriptor(workers: Vec<WorkerSpec>) -> DeploymentDescriptor {
        DeploymentDescriptor {
            image: ImageSpec {
                repository: "x".into(),
                tag: "1".into(),
                pull_policy: PullPolicy::IfNotPresent,
            },
            deployments: workers,
            secrets: Vec::new(),
        }
    }

    #[test]
    fn pull_policy_defaults_to_if_not_present() {
        let image: ImageSpec = toml::from_str("repository = \"x\"\ntag = \"1\"").unwrap();
        assert_eq!(image.pull_policy, PullPolicy::IfNotPresent);
    }

    #[test]
    fn pull_policy_uses_kubernetes_spelling() {
        let image: ImageSpec =
            toml::from_str("repository = \"x\"\ntag = \"1\"\npullPolicy = \"Always\"").unwrap();
        assert_eq!(image.pull_policy, PullPolicy::Always);
        assert_eq!(
            serde_json::to_value(&image).unwrap()["pullPolicy"],
            serde_json::json!("Always")
        );
    }

    #[test]
    fn no_duplicates_reported_for_unique_names() {
        let d = descriptor(vec![worker("a"), worker("b")]);
        assert!(d.duplicate_worker_names().is_empty());
    }

    #[test]
    fn duplicates_reported_once() {
        let d = descriptor(vec![worker("a"), worker("a"), worker("b"), worker("a")]);
        assert_eq!(d.duplicate_worker_names(), vec!["a"]);
    }
}
