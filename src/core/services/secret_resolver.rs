use crate::core::errors::{DeployError, Result};
use crate::core::models::resolved_secrets::ResolvedSecrets;
use crate::core::traits::secret_store::SecretStore;

/// Lookup key for a declared secret name: lowercase, underscores removed.
///
/// `S3_SECRET_KEY`, `s3SecretKey` and `s3_secret_key` all map to
/// `s3secretkey`.
pub fn normalize_secret_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Availability of every secret a run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretReport {
    /// Declared secrets found in a store.
    pub found: Vec<String>,
    /// Declared secrets that will deploy as empty strings.
    pub defaulted: Vec<String>,
    /// Whether the required database password is set.
    pub required_present: bool,
}

/// Resolves declared secret names against a `SecretStore`.
pub struct SecretResolver<S: SecretStore> {
    pub store: S,
}

impl<S: SecretStore> SecretResolver<S> {
    /// Resolve every declared name.
    ///
    /// A name missing from the store resolves to `""` and is logged at
    /// warn level. Deploying with an empty secret usually means the workload
    /// fails later at runtime, so the default is never silent.
    ///
    /// # Errors
    ///
    /// `SecretStore` if the backing store itself cannot be read.
    pub fn resolve<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<ResolvedSecrets> {
        let mut resolved = ResolvedSecrets::new();
        for name in names {
            let key = normalize_secret_name(name);
            match self.store.get_secret(&key)? {
                Some(value) => resolved.insert(name, value),
                None => {
                    tracing::warn!(
                        secret = name,
                        lookup_key = %key,
                        store = %self.store.describe(),
                        "secret not configured, deploying with an empty value"
                    );
                    resolved.insert_defaulted(name);
                }
            }
        }
        Ok(resolved)
    }

    /// Fetch a secret that has no empty default.
    ///
    /// # Errors
    ///
    /// `MissingRequiredSecret` if no store has `key`.
    pub fn require(&self, key: &str, env_hint: &str) -> Result<String> {
        let lookup = normalize_secret_name(key);
        self.store
            .get_secret(&lookup)?
            .ok_or_else(|| DeployError::MissingRequiredSecret {
                key: key.to_string(),
                env_hint: env_hint.to_string(),
            })
    }

    /// Report which secrets are available without failing on any of them.
    pub fn check<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
        required_key: &str,
    ) -> Result<SecretReport> {
        let mut found = Vec::new();
        let mut defaulted = Vec::new();
        for name in names {
            match self.store.get_secret(&normalize_secret_name(name))? {
                Some(_) => found.push(name.to_string()),
                None => defaulted.push(name.to_string()),
            }
        }
        let required_present = self
            .store
            .get_secret(&normalize_secret_name(required_key))?
            .is_some();

        Ok(SecretReport {
            found,
            defaulted,
            required_present,
        })
    }
}
