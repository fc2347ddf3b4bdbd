use std::collections::HashMap;

use crate::core::errors::Result;
use crate::core::services::secret_resolver::normalize_secret_name;
use crate::core::traits::secret_store::SecretStore;

/// Secret store backed by process environment variables.
///
/// Only variables starting with `prefix` are considered; the rest of the
/// name is normalized. With the default prefix, `DAGSTER_SECRET_S3_SECRET_KEY`
/// answers the lookup `s3secretkey`.
pub struct EnvSecretStore {
    prefix: String,
    values: HashMap<String, String>,
}

impl EnvSecretStore {
    /// Snapshot the current process environment.
    pub fn from_env(prefix: &str) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    /// Build from explicit `(name, value)` pairs.
    pub fn from_vars(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let values = vars
            .into_iter()
            .filter_map(|(name, value)| {
                let rest = name.strip_prefix(prefix)?;
                let key = normalize_secret_name(rest);
                (!key.is_empty()).then_some((key, value))
            })
            .collect();
        Self {
            prefix: prefix.to_string(),
            values,
        }
    }
}

impl SecretStore for EnvSecretStore {
    fn get_secret(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn describe(&self) -> String {
        format!("env:{}*", self.prefix)
    }
}
