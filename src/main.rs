mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::context::Context;
use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose, args.quiet);

    let result = Context::load(&args.config, args.descriptor.clone(), args.quiet).and_then(|ctx| {
        match &args.command {
            Commands::Deploy { no_wait } => cli::commands::deploy::execute(&ctx, *no_wait),
            Commands::Render { show_secrets } => {
                cli::commands::render::execute(&ctx, *show_secrets)
            }
            Commands::Check => cli::commands::check::execute(&ctx),
            Commands::Outputs { name } => cli::commands::outputs::execute(&ctx, name.as_deref()),
            Commands::History { last } => cli::commands::history::execute(&ctx, *last),
        }
    });

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr. `DAGSTER_DEPLOY_LOG` overrides the level
/// chosen by `--verbose`/`--quiet` (e.g. `DAGSTER_DEPLOY_LOG=dagster_deploy=trace`).
fn init_tracing(verbose: bool, quiet: bool) {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_env("DAGSTER_DEPLOY_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
