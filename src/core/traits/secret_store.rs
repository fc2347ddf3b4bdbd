use crate::core::errors::Result;

/// Port for looking up secret values.
///
/// Keys are already normalized (lowercase, no underscores) by the caller,
/// so `S3_SECRET_KEY` and `s3SecretKey` both arrive as `s3secretkey`.
/// Implementations live in `adapters::secret_stores`.
pub trait SecretStore: Send + Sync {
    /// Return the value for `key`, or `None` if this store does not have it.
    fn get_secret(&self, key: &str) -> Result<Option<String>>;

    /// Human-readable description used in diagnostics (e.g. "env:DAGSTER_SECRET_").
    fn describe(&self) -> String;
}
