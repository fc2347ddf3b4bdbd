use crate::core::errors::Result;
use crate::core::traits::secret_store::SecretStore;

/// Queries several stores in order; the first one holding a key wins.
///
/// The CLI layers the environment over the secrets file, so an exported
/// variable overrides a file entry for one run.
#[derive(Default)]
pub struct LayeredSecretStore {
    layers: Vec<Box<dyn SecretStore>>,
}

impl LayeredSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower precedence than the existing ones.
    pub fn with_layer(mut self, store: impl SecretStore + 'static) -> Self {
        self.layers.push(Box::new(store));
        self
    }
}

impl SecretStore for LayeredSecretStore {
    fn get_secret(&self, key: &str) -> Result<Option<String>> {
        for layer in &self.layers {
            if let Some(value) = layer.get_secret(key)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        if self.layers.is_empty() {
            return "none".to_string();
        }
        self.layers
            .iter()
            .map(|l| l.describe())
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secret_stores::env_secret_store::EnvSecretStore;

    fn env(pairs: &[(&str, &str)]) -> EnvSecretStore {
        EnvSecretStore::from_vars(
            "",
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn first_layer_wins() {
        let store = LayeredSecretStore::new()
            .with_layer(env(&[("TOKEN", "from-env")]))
            .with_layer(env(&[("TOKEN", "from-file"), ("OTHER", "file-only")]));

        assert_eq!(store.get_secret("token").unwrap().as_deref(), Some("from-env"));
        assert_eq!(store.get_secret("other").unwrap().as_deref(), Some("file-only"));
        assert_eq!(store.get_secret("missing").unwrap(), None);
    }

    #[test]
    fn empty_stack_has_nothing() {
        let store = LayeredSecretStore::new();
        assert_eq!(store.get_secret("any").unwrap(), None);
        assert_eq!(store.describe(), "none");
    }
}
