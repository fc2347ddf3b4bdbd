use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;

/// Execute the `dagster-deploy render` command.
///
/// Prints the chart values that `deploy` would submit, as JSON on stdout.
/// Secret values are masked unless `show_secrets` is set. Diagnostics,
/// including secrets that resolved empty, go to stderr.
pub fn execute(ctx: &Context, show_secrets: bool) -> Result<()> {
    let descriptor = ctx.descriptor()?;
    let service = ctx.deploy_service(ctx.helm_applier())?;
    let rendered = service.render(&descriptor)?;
    for name in rendered.secrets.defaulted() {
        output::warning_stderr(&format!("Secret '{name}' not configured, rendering empty"));
    }

    let values = if show_secrets {
        rendered.values
    } else {
        rendered.values.redacted(rendered.secrets.names())
    };

    println!("{}", values.to_json_pretty()?);

    Ok(())
}
