use crate::core::errors::Result;
use crate::core::models::chart_values::ChartValues;
use crate::core::models::release::{AppliedRelease, ChartRef};

/// Port for the system that turns a chart plus values into live cluster
/// resources.
///
/// The core only depends on this trait; `adapters::helm::HelmApplier` is the
/// production implementation. Retry and wait semantics belong to the
/// implementation, never to callers.
pub trait DeploymentApplier {
    /// Make sure `namespace` exists, creating it if needed.
    fn ensure_namespace(&self, namespace: &str) -> Result<()>;

    /// Install or upgrade `release` from `chart` into `namespace`.
    fn apply(
        &self,
        chart: &ChartRef,
        release: &str,
        namespace: &str,
        values: &ChartValues,
    ) -> Result<AppliedRelease>;
}
