//! Dev server errors.

use crate::rewrite::RuleError;

/// Error starting or running the dev server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Requested `host:port`.
        addr: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The server failed while serving.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
    /// The file watcher could not be started.
    #[error("Failed to watch files: {0}")]
    Watch(#[from] notify::Error),
    /// A rewrite rule did not parse.
    #[error(transparent)]
    Rule(#[from] RuleError),
    /// The upstream HTTP client could not be built.
    #[error("Failed to create proxy client: {0}")]
    Client(#[from] reqwest::Error),
}
