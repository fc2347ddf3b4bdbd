use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::core::errors::{DeployError, Result};
use crate::core::models::run_outputs::RunOutputs;
use crate::core::traits::output_store::OutputStore;

/// File name of the run history inside the state directory.
pub const HISTORY_FILE: &str = "runs.jsonl";

/// Output store that appends each run as one JSON line.
pub struct JsonOutputStore {
    path: PathBuf,
}

impl JsonOutputStore {
    /// Store that writes to `{state_dir}/runs.jsonl`.
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(HISTORY_FILE),
        }
    }
}

impl OutputStore for JsonOutputStore {
    fn record(&self, outputs: &RunOutputs) -> Result<()> {
        let line = serde_json::to_string(outputs).map_err(|e| DeployError::StateError {
            detail: format!("Failed to serialize run outputs: {e}"),
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| DeployError::StateError {
                detail: format!("Cannot open run history at {}: {e}", self.path.display()),
            })?;

        writeln!(file, "{line}").map_err(|e| DeployError::StateError {
            detail: format!("Failed to write run history: {e}"),
        })?;

        Ok(())
    }

    fn history(&self) -> Result<Vec<RunOutputs>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path).map_err(|e| DeployError::StateError {
            detail: format!("Cannot read run history: {e}"),
        })?;

        let mut runs = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| DeployError::StateError {
                detail: format!("Error reading run history line {}: {e}", line_num + 1),
            })?;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let run: RunOutputs =
                serde_json::from_str(trimmed).map_err(|e| DeployError::StateError {
                    detail: format!("Malformed run history entry at line {}: {e}", line_num + 1),
                })?;
            runs.push(run);
        }

        Ok(runs)
    }
}
