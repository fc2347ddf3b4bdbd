use std::collections::BTreeMap;

use crate::core::models::chart_values::{
    ChartValues, DaemonValues, PostgresqlValues, ResourceQuantities, ResourceRequirements,
    ServiceType, ServiceValues, UserDeployment, UserDeploymentsValues, WebserverValues,
};
use crate::core::models::descriptor::{DeploymentDescriptor, WorkerSpec};
use crate::core::models::resolved_secrets::ResolvedSecrets;

const POSTGRESQL_USERNAME: &str = "dagster";
const POSTGRESQL_DATABASE: &str = "dagster";

const DAEMON_CPU_LIMIT: &str = "1";
const DAEMON_MEMORY_LIMIT: &str = "512Mi";
const DAEMON_CPU_REQUEST: &str = "1";
const DAEMON_MEMORY_REQUEST: &str = "256Mi";

/// Builds Helm chart values from a descriptor and resolved secrets.
///
/// Composition is pure: no I/O, and the same inputs always produce the
/// same `ChartValues`.
#[derive(Debug, Clone)]
pub struct ValuesComposer {
    pub service_type: ServiceType,
    pub service_port: u16,
}

impl Default for ValuesComposer {
    fn default() -> Self {
        Self {
            service_type: ServiceType::ClusterIP,
            service_port: 80,
        }
    }
}

impl ValuesComposer {
    /// Compose the full set of chart overrides.
    ///
    /// Every worker inherits `descriptor.image` and gets one chart
    /// deployment record, in descriptor order.
    pub fn compose(
        &self,
        descriptor: &DeploymentDescriptor,
        secrets: &ResolvedSecrets,
        postgresql_password: &str,
    ) -> ChartValues {
        let deployments = descriptor
            .deployments
            .iter()
            .map(|worker| Self::user_deployment(descriptor, worker, secrets))
            .collect();

        ChartValues {
            postgresql: PostgresqlValues {
                enabled: true,
                postgresql_username: POSTGRESQL_USERNAME.to_string(),
                postgresql_password: postgresql_password.to_string(),
                postgresql_database: POSTGRESQL_DATABASE.to_string(),
            },
            dagster_webserver: WebserverValues {
                service: ServiceValues {
                    service_type: self.service_type,
                    port: self.service_port,
                },
            },
            dagster_daemon: DaemonValues {
                resources: ResourceRequirements {
                    limits: ResourceQuantities {
                        cpu: DAEMON_CPU_LIMIT.to_string(),
                        memory: DAEMON_MEMORY_LIMIT.to_string(),
                    },
                    requests: ResourceQuantities {
                        cpu: DAEMON_CPU_REQUEST.to_string(),
                        memory: DAEMON_MEMORY_REQUEST.to_string(),
                    },
                },
            },
            user_deployments: UserDeploymentsValues {
                enabled: true,
                enable_subchart: true,
                deployments,
            },
        }
    }

    fn user_deployment(
        descriptor: &DeploymentDescriptor,
        worker: &WorkerSpec,
        secrets: &ResolvedSecrets,
    ) -> UserDeployment {
        UserDeployment {
            name: worker.name.clone(),
            image: descriptor.image.clone(),
            dagster_api_grpc_args: vec!["-m".to_string(), worker.module.clone()],
            port: worker.port,
            env: Self::merge_env(&worker.env, secrets),
        }
    }

    /// Static env first, then every resolved secret on top. A secret
    /// always replaces a static entry with the same key.
    fn merge_env(
        static_env: &BTreeMap<String, String>,
        secrets: &ResolvedSecrets,
    ) -> BTreeMap<String, String> {
        let mut env = static_env.clone();
        for (name, value) in secrets.iter() {
            env.insert(name.to_string(), value.to_string());
        }
        env
    }
}
