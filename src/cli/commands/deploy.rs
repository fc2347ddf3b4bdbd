use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::traits::output_store::OutputStore;

/// Execute the `dagster-deploy deploy` command.
///
/// Loads the descriptor, resolves secrets, applies the chart and records
/// the exported outputs in the run history. The outputs are printed
/// before recording, so they are visible even if the history write fails.
pub fn execute(ctx: &Context, no_wait: bool) -> Result<()> {
    let descriptor = ctx.descriptor()?;
    let chart = ctx.config.chart_ref();
    let target = ctx.config.deploy_target();

    output::header(&format!(
        "Deploying {}@{} to namespace '{}'",
        chart.name, chart.version, target.namespace
    ));

    let applier = ctx.helm_applier().with_wait(!no_wait);
    let service = ctx.deploy_service(applier)?;

    let spinner = spinner(ctx.quiet, &format!("Applying release '{}'", target.release));
    let result = service.run(&descriptor, &chart, &target);
    spinner.finish_and_clear();
    let outcome = result?;
    let outputs = &outcome.outputs;

    output::success(&format!(
        "Release '{}' applied with {} worker deployment(s)",
        outputs.release, outputs.worker_count
    ));
    for name in &outcome.defaulted_secrets {
        output::warning(&format!("Secret '{name}' not configured, deployed empty"));
    }

    output::header("Outputs");
    output::field("dagster_namespace", &outputs.dagster_namespace);
    output::field("webserver_service_name", &outputs.webserver_service_name);
    println!(
        "\n  Port-forward with: kubectl port-forward -n {} svc/{} 8080:{}",
        outputs.dagster_namespace, outputs.webserver_service_name, ctx.config.webserver.port
    );

    // `outputs` reads only from the history, so a failed record fails the run.
    ctx.output_store().record(outputs)
}

fn spinner(quiet: bool, msg: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
