use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::errors::{DeployError, Result};
use crate::core::services::secret_resolver::normalize_secret_name;
use crate::core::traits::secret_store::SecretStore;

/// Secret store backed by a dotenv-style file.
///
/// Supports:
/// - `KEY=value` entries, with `export KEY=value` accepted
/// - Quoted values (`KEY="value"` and `KEY='value'`)
/// - Comment lines (`# ...`) and blank lines
///
/// Keys are normalized on load, so `S3_SECRET_KEY=...` and
/// `s3SecretKey=...` answer the same lookup. A later line wins.
#[cfg_attr(test, derive(Debug))]
pub struct DotenvSecretStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl DotenvSecretStore {
    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the file does not exist.
    /// - `SecretStore` if a line is not `KEY=value`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DeployError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse dotenv content. `path` is only used in messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut values = HashMap::new();
        for (idx, raw) in content.lines().enumerate() {
            if let Some((key, value)) = Self::parse_line(raw, idx + 1, path)? {
                values.insert(normalize_secret_name(&key), value);
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Parse one line into `(key, value)`; blanks and comments yield `None`.
    fn parse_line(raw: &str, line_number: usize, path: &Path) -> Result<Option<(String, String)>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let trimmed = match trimmed.strip_prefix("export") {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
            _ => trimmed,
        };

        let Some((key, raw_value)) = trimmed.split_once('=') else {
            return Err(DeployError::SecretStore {
                detail: format!(
                    "{} line {line_number}: expected KEY=value, got: {trimmed}",
                    path.display()
                ),
            });
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(DeployError::SecretStore {
                detail: format!("{} line {line_number}: empty key", path.display()),
            });
        }

        Ok(Some((key.to_string(), strip_quotes(raw_value.trim()))))
    }
}

/// Remove matching surrounding quotes (single or double) from a value.
fn strip_quotes(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

impl SecretStore for DotenvSecretStore {
    fn get_secret(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
