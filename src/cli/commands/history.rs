use colored::Colorize;

use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::run_outputs::RunOutputs;
use crate::core::traits::output_store::OutputStore;

/// Execute the `dagster-deploy history` command.
pub fn execute(ctx: &Context, last: Option<usize>) -> Result<()> {
    let runs = ctx.output_store().history()?;

    if runs.is_empty() {
        output::header("dagster-deploy history");
        output::warning("No deployments recorded");
        return Ok(());
    }

    let skip = last.map_or(0, |n| runs.len().saturating_sub(n));
    let display = &runs[skip..];

    output::header(&format!("dagster-deploy history ({} entries)", display.len()));
    println!();
    for run in display {
        print_run(run);
    }

    Ok(())
}

fn print_run(run: &RunOutputs) {
    println!(
        "  {}  {} {}@{}  {} worker(s)  values {}",
        run.deployed_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        run.release.bold(),
        run.chart,
        run.chart_version,
        run.worker_count,
        run.values_sha256.get(..12).unwrap_or(run.values_sha256.as_str())
    );
}
