use crate::core::errors::{DeployError, Result};
use crate::core::models::chart_values::ChartValues;
use crate::core::models::descriptor::DeploymentDescriptor;
use crate::core::models::release::ChartRef;
use crate::core::models::resolved_secrets::ResolvedSecrets;
use crate::core::models::run_outputs::RunOutputs;
use crate::core::services::secret_resolver::SecretResolver;
use crate::core::services::values_composer::ValuesComposer;
use crate::core::traits::applier::DeploymentApplier;
use crate::core::traits::secret_store::SecretStore;

/// Resource type of the webserver Service in an `AppliedRelease`.
pub const SERVICE_TYPE_KEY: &str = "v1/Service";

/// Where the chart goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    pub namespace: String,
    pub release: String,
}

impl DeployTarget {
    /// Name the chart gives the webserver Service for this release.
    pub fn webserver_service(&self) -> String {
        format!("{}-dagster-webserver", self.release)
    }
}

/// Chart values together with the secrets that went into them.
#[derive(Debug, Clone)]
pub struct RenderedValues {
    pub values: ChartValues,
    pub secrets: ResolvedSecrets,
}

/// Required secret lookup: the declared key and the env var that sets it.
#[derive(Debug, Clone)]
pub struct RequiredSecret {
    pub key: String,
    pub env_hint: String,
}

/// Result of a successful run: the exported outputs and the declared
/// secrets that deployed as empty strings.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub outputs: RunOutputs,
    pub defaulted_secrets: Vec<String>,
}

/// Sequences one deployment: secrets, values, namespace, chart, outputs.
pub struct DeployService<S: SecretStore, A: DeploymentApplier> {
    pub resolver: SecretResolver<S>,
    pub applier: A,
    pub composer: ValuesComposer,
    pub password: RequiredSecret,
}

impl<S: SecretStore, A: DeploymentApplier> DeployService<S, A> {
    /// Resolve secrets and compose chart values without touching the cluster.
    ///
    /// # Errors
    ///
    /// `MissingRequiredSecret` if the database password is not set.
    pub fn render(&self, descriptor: &DeploymentDescriptor) -> Result<RenderedValues> {
        let password = self
            .resolver
            .require(&self.password.key, &self.password.env_hint)?;

        for name in descriptor.duplicate_worker_names() {
            tracing::warn!(
                worker = name,
                "duplicate worker name, the chart will receive every entry"
            );
        }

        let secrets = self
            .resolver
            .resolve(descriptor.secrets.iter().map(String::as_str))?;
        let values = self.composer.compose(descriptor, &secrets, &password);

        Ok(RenderedValues { values, secrets })
    }

    /// Run a full deployment and return its exported outputs.
    ///
    /// The password check happens before any cluster call. Applier errors
    /// are returned unchanged; nothing is retried.
    pub fn run(
        &self,
        descriptor: &DeploymentDescriptor,
        chart: &ChartRef,
        target: &DeployTarget,
    ) -> Result<DeployOutcome> {
        let rendered = self.render(descriptor)?;
        let values_sha256 = rendered.values.fingerprint()?;

        self.applier.ensure_namespace(&target.namespace)?;
        tracing::info!(namespace = %target.namespace, "namespace ready");

        let applied = self.applier.apply(
            chart,
            &target.release,
            &target.namespace,
            &rendered.values,
        )?;
        tracing::info!(
            release = %target.release,
            resources = applied.len(),
            "chart applied"
        );

        let qualified = format!("{}/{}", target.namespace, target.webserver_service());
        let service = applied
            .get_resource(SERVICE_TYPE_KEY, &qualified)
            .ok_or_else(|| DeployError::Applier {
                detail: format!(
                    "release applied but {SERVICE_TYPE_KEY} '{qualified}' was not among its resources"
                ),
            })?;

        let outputs = RunOutputs {
            deployed_at: chrono::Utc::now(),
            dagster_namespace: target.namespace.clone(),
            webserver_service_name: service.name.clone(),
            release: target.release.clone(),
            chart: chart.name.clone(),
            chart_version: chart.version.clone(),
            values_sha256,
            worker_count: descriptor.deployments.len(),
        };

        Ok(DeployOutcome {
            outputs,
            defaulted_secrets: rendered.secrets.defaulted().to_vec(),
        })
    }
}
