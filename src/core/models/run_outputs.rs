use serde::{Deserialize, Serialize};

/// Outputs of one successful deployment (JSON lines format in the run history).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutputs {
    pub deployed_at: chrono::DateTime<chrono::Utc>,
    pub dagster_namespace: String,
    pub webserver_service_name: String,
    pub release: String,
    pub chart: String,
    pub chart_version: String,
    /// SHA-256 of the submitted values; see `ChartValues::fingerprint`.
    pub values_sha256: String,
    pub worker_count: usize,
}

impl RunOutputs {
    /// Names accepted by `outputs <name>`.
    pub const EXPORTS: [&'static str; 2] = ["dagster_namespace", "webserver_service_name"];

    /// Value of a named export.
    pub fn export(&self, name: &str) -> Option<&str> {
        match name {
            "dagster_namespace" => Some(&self.dagster_namespace),
            "webserver_service_name" => Some(&self.webserver_service_name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunOutputs {
        RunOutputs {
            deployed_at: chrono::Utc::now(),
            dagster_namespace: "dagster".into(),
            webserver_service_name: "dagster-dagster-webserver".into(),
            release: "dagster".into(),
            chart: "dagster".into(),
            chart_version: "1.12.8".into(),
            values_sha256: "00".into(),
            worker_count: 1,
        }
    }

    #[test]
    fn exports_are_addressable_by_name() {
        let outputs = sample();
        assert_eq!(outputs.export("dagster_namespace"), Some("dagster"));
        assert_eq!(
            outputs.export("webserver_service_name"),
            Some("dagster-dagster-webserver")
        );
        assert_eq!(outputs.export("release"), None);
    }

    #[test]
    fn every_listed_export_resolves() {
        let outputs = sample();
        for name in RunOutputs::EXPORTS {
            assert!(outputs.export(name).is_some(), "{name} should resolve");
        }
    }
}
