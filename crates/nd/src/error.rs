//! CLI error types.

use nd_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Seed(#[from] nd_seed::ServerError),

    #[error("{0}")]
    Dev(#[from] nd_dev::ServerError),
}
