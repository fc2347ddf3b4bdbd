use crate::core::errors::Result;
use crate::core::models::run_outputs::RunOutputs;

/// Port for recording and querying the outputs of past runs.
pub trait OutputStore {
    /// Append the outputs of a successful run.
    fn record(&self, outputs: &RunOutputs) -> Result<()>;

    /// All recorded runs, oldest first.
    fn history(&self) -> Result<Vec<RunOutputs>>;

    /// The most recent run, if any.
    fn latest(&self) -> Result<Option<RunOutputs>> {
        Ok(self.history()?.pop())
    }
}
