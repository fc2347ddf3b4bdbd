use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::{DeployError, Result};
use crate::core::models::run_outputs::RunOutputs;
use crate::core::traits::output_store::OutputStore;

/// Execute the `dagster-deploy outputs [name]` command.
///
/// Without a name, prints every export of the latest run. With a name,
/// prints only that value with no decoration so it can be used in scripts:
/// `kubectl port-forward svc/$(dagster-deploy outputs webserver_service_name) 8080:80`.
pub fn execute(ctx: &Context, name: Option<&str>) -> Result<()> {
    let latest = ctx
        .output_store()
        .latest()?
        .ok_or(DeployError::NoRecordedRun)?;

    match name {
        Some(name) => {
            let value = latest
                .export(name)
                .ok_or_else(|| DeployError::OutputNotFound {
                    name: name.to_string(),
                    available: RunOutputs::EXPORTS.join(", "),
                })?;
            println!("{value}");
        }
        None => {
            output::header(&format!(
                "Release '{}' ({} {}), deployed {}",
                latest.release,
                latest.chart,
                latest.chart_version,
                latest.deployed_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            for export in RunOutputs::EXPORTS {
                if let Some(value) = latest.export(export) {
                    output::field(export, value);
                }
            }
        }
    }

    Ok(())
}
