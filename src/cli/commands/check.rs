use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::{DeployError, Result};

/// Execute the `dagster-deploy check` command.
///
/// Resolves every declared secret against the configured sources and
/// reports which ones would deploy as empty strings. Fails only when the
/// database password is missing, since `deploy` would fail the same way.
pub fn execute(ctx: &Context) -> Result<()> {
    let descriptor = ctx.descriptor()?;
    let resolver = ctx.secret_resolver()?;
    let password_key = &ctx.config.secrets.password_key;

    let report = resolver.check(
        descriptor.secrets.iter().map(String::as_str),
        password_key,
    )?;

    output::header("dagster-deploy check");
    output::success(&format!(
        "{} worker deployment(s), image {}:{}",
        descriptor.deployments.len(),
        descriptor.image.repository,
        descriptor.image.tag
    ));

    for name in descriptor.duplicate_worker_names() {
        output::warning(&format!("Worker name '{name}' is used more than once"));
    }

    for name in &report.found {
        output::success(&format!("{name} configured"));
    }

    if !report.defaulted.is_empty() {
        output::warning(&format!(
            "Not configured, will deploy empty ({}):",
            report.defaulted.len()
        ));
        for name in &report.defaulted {
            println!("    • {name}");
        }
    }

    let total = report.found.len() + report.defaulted.len();
    if report.required_present {
        output::success(&format!("{password_key} configured"));
        println!();
        output::success(&format!("{}/{total} declared secrets configured", report.found.len()));
        Ok(())
    } else {
        Err(DeployError::MissingRequiredSecret {
            key: password_key.clone(),
            env_hint: ctx.config.password_env_hint(),
        })
    }
}
