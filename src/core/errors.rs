use std::path::PathBuf;

/// All domain errors for dagster-deploy.
///
/// Each variant carries enough context to fix the problem without
/// re-running in verbose mode.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(
        "File not found: {path}\n\n  \
         Check that the path is correct and the file exists.\n  \
         Use --descriptor or --config to point at another location."
    )]
    FileNotFound { path: PathBuf },

    #[error(
        "Parse error in {file}: {detail}\n\n  \
         A descriptor needs an `image` (repository, tag) and a `deployments` list\n  \
         whose entries have name, module and port. Files ending in .json are\n  \
         read as JSON, anything else as TOML."
    )]
    ConfigParse { file: PathBuf, detail: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "Required secret '{key}' is not set\n\n  \
         The database password must be configured before anything is deployed.\n\n  \
         Solutions:\n    \
         → Export it: {env_hint}=<password>\n    \
         → Or add it to the secrets file configured in [secrets].file"
    )]
    MissingRequiredSecret { key: String, env_hint: String },

    #[error("Secret store error: {detail}")]
    SecretStore { detail: String },

    #[error(
        "Deployment failed: {detail}\n\n  \
         Nothing was retried. Check cluster access with 'kubectl cluster-info'\n  \
         and inspect the release with 'helm status'."
    )]
    Applier { detail: String },

    #[error(
        "Output '{name}' not found\n\n  \
         Available outputs: {available}"
    )]
    OutputNotFound { name: String, available: String },

    #[error(
        "No recorded deployment found\n\n  \
         Run 'dagster-deploy deploy' first."
    )]
    NoRecordedRun,

    #[error("State error: {detail}")]
    StateError { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DeployError>;
