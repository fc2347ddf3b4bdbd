pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::app_config::DEFAULT_CONFIG_FILE;

/// Deploy Dagster to Kubernetes from a worker descriptor.
#[derive(Parser, Debug)]
#[command(name = "dagster-deploy", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Deployment descriptor (image, workers, declared secrets)
    #[arg(
        long,
        global = true,
        env = "DAGSTER_DEPLOY_DESCRIPTOR",
        default_value = "deploy.toml"
    )]
    pub descriptor: PathBuf,

    /// Project configuration (chart, target, secret sources)
    #[arg(
        long,
        global = true,
        env = "DAGSTER_DEPLOY_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Verbose output (debug diagnostics, helm command lines)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the namespace, apply the chart and record the outputs
    Deploy {
        /// Return as soon as helm has submitted the release
        #[arg(long)]
        no_wait: bool,
    },

    /// Print the composed chart values as JSON without deploying
    Render {
        /// Print secret values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Report which declared secrets are configured
    Check,

    /// Show the outputs of the last deployment
    Outputs {
        /// Print only this output (dagster_namespace, webserver_service_name)
        name: Option<String>,
    },

    /// List recorded deployments
    History {
        /// Show last N entries
        #[arg(long)]
        last: Option<usize>,
    },
}
