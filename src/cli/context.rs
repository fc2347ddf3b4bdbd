use std::path::{Path, PathBuf};

use crate::adapters::helm::helm_applier::HelmApplier;
use crate::adapters::outputs::json_output_store::JsonOutputStore;
use crate::adapters::secret_stores::dotenv_secret_store::DotenvSecretStore;
use crate::adapters::secret_stores::env_secret_store::EnvSecretStore;
use crate::adapters::secret_stores::layered_secret_store::LayeredSecretStore;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::descriptor::DeploymentDescriptor;
use crate::core::services::deploy_service::{DeployService, RequiredSecret};
use crate::core::services::descriptor_loader::DescriptorLoader;
use crate::core::services::secret_resolver::SecretResolver;
use crate::core::services::values_composer::ValuesComposer;
use crate::core::traits::applier::DeploymentApplier;
use crate::core::traits::secret_store::SecretStore;

/// Everything a command needs, built once from the CLI flags and passed
/// down explicitly.
pub struct Context {
    pub config: AppConfig,
    pub descriptor_path: PathBuf,
    pub quiet: bool,
}

impl Context {
    /// Load the project configuration. The descriptor is read on demand
    /// because `outputs` and `history` do not need it.
    pub fn load(config_path: &Path, descriptor_path: PathBuf, quiet: bool) -> Result<Self> {
        let config = AppConfig::load(config_path)?;
        Ok(Self {
            config,
            descriptor_path,
            quiet,
        })
    }

    pub fn descriptor(&self) -> Result<DeploymentDescriptor> {
        DescriptorLoader.load(&self.descriptor_path)
    }

    /// Environment variables first, then the secrets file if configured.
    pub fn secret_store(&self) -> Result<LayeredSecretStore> {
        let env = EnvSecretStore::from_env(&self.config.secrets.env_prefix);
        let mut store = LayeredSecretStore::new().with_layer(env);
        if let Some(file) = &self.config.secrets.file {
            store = store.with_layer(DotenvSecretStore::load(file)?);
        }
        tracing::debug!(sources = %store.describe(), "secret sources");
        Ok(store)
    }

    pub fn secret_resolver(&self) -> Result<SecretResolver<LayeredSecretStore>> {
        Ok(SecretResolver {
            store: self.secret_store()?,
        })
    }

    pub fn helm_applier(&self) -> HelmApplier {
        HelmApplier::new(
            self.config.tools.helm.clone(),
            self.config.tools.kubectl.clone(),
        )
    }

    pub fn deploy_service<A: DeploymentApplier>(
        &self,
        applier: A,
    ) -> Result<DeployService<LayeredSecretStore, A>> {
        Ok(DeployService {
            resolver: self.secret_resolver()?,
            applier,
            composer: ValuesComposer {
                service_type: self.config.webserver.service_type,
                service_port: self.config.webserver.port,
            },
            password: RequiredSecret {
                key: self.config.secrets.password_key.clone(),
                env_hint: self.config.password_env_hint(),
            },
        })
    }

    pub fn output_store(&self) -> JsonOutputStore {
        JsonOutputStore::new(&self.config.state.dir)
    }
}
