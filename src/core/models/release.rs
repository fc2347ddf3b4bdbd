use std::collections::BTreeMap;

/// Coordinates of the Helm chart to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRef {
    pub name: String,
    pub version: String,
    pub repo_url: String,
}

/// A cluster object created by applying the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    pub name: String,
}

/// Resources produced by one chart apply.
///
/// Keyed by type (`v1/Service`) and qualified name
/// (`dagster/dagster-dagster-webserver`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedRelease {
    resources: BTreeMap<(String, String), ResourceHandle>,
}

impl AppliedRelease {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_key: &str, qualified_name: &str, handle: ResourceHandle) {
        self.resources
            .insert((type_key.to_string(), qualified_name.to_string()), handle);
    }

    /// Look up a created resource, e.g. `get_resource("v1/Service", "dagster/web")`.
    pub fn get_resource(&self, type_key: &str, qualified_name: &str) -> Option<&ResourceHandle> {
        self.resources
            .get(&(type_key.to_string(), qualified_name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }
}
