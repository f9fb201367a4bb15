//! Error types for the seed server.

/// Seed server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Listener could not be bound (typically the port is taken).
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// Accept loop failed.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    /// Descriptor could not be serialized.
    #[error("Failed to render cluster descriptor: {0}")]
    Render(#[from] serde_json::Error),
}
