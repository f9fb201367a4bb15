//! Seed provider stub for local Dynomite testing.
//!
//! Emulates the one read-only endpoint of a Dynomite manager that token-aware
//! clients poll for cluster topology:
//!
//! ```text
//! GET /REST/v1/admin/cluster_describe
//!   -> 200 [{"token":"1383429731","hostname":"localhost","dc":"local-dc",...}]
//! ```
//!
//! The descriptor is rendered once when the server binds and the same bytes
//! are returned for every request. Pointing a benchmark at another cluster
//! only needs a different `[[seed.nodes]]` list in `nd.toml`.
//!
//! # Quick Start
//!
//! ```ignore
//! use nd_seed::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     run_server(ServerConfig::default(), |_| {}).await.unwrap();
//! }
//! ```

mod app;
mod descriptor;
mod error;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use app::AppState;
use tokio::net::TcpListener;

pub use app::CLUSTER_DESCRIBE_PATH;
pub use descriptor::{ClusterDescriptor, Seed};
pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Seeds to serve.
    pub descriptor: ClusterDescriptor,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: nd_config::DEFAULT_PORT,
            descriptor: ClusterDescriptor::default(),
        }
    }
}

/// A bound seed server, ready to serve.
pub struct SeedServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl SeedServer {
    /// Render the descriptor and bind the listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address is unavailable, e.g. when
    /// another instance already holds the port.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let body = config.descriptor.render()?;

        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .await
            .map_err(|source| ServerError::Bind {
                addr: format!("{}:{}", config.host, config.port),
                source,
            })?;

        Ok(Self {
            listener,
            state: Arc::new(AppState { body }),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Serve)
    }

    /// Response body served by `cluster_describe`.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.state.body
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `signal` completes.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = app::create_router(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(ServerError::Serve)
    }
}

/// Run the server.
///
/// Binds, logs the served payload, hands the bound server to `on_ready` and
/// serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn run_server<R>(config: ServerConfig, on_ready: R) -> Result<(), ServerError>
where
    R: FnOnce(&SeedServer),
{
    run_server_with_shutdown(config, on_ready, shutdown_signal()).await
}

/// Like [`run_server`], but serves until `signal` completes.
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn run_server_with_shutdown<R, F>(
    config: ServerConfig,
    on_ready: R,
    signal: F,
) -> Result<(), ServerError>
where
    R: FnOnce(&SeedServer),
    F: Future<Output = ()> + Send + 'static,
{
    let server = SeedServer::bind(config).await?;
    let addr = server.local_addr()?;
    tracing::info!(
        address = %addr,
        port = addr.port(),
        path = CLUSTER_DESCRIBE_PATH,
        payload = server.body(),
        "Serving cluster description"
    );
    on_ready(&server);
    server.serve_with_shutdown(signal).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the `[seed]` section.
#[must_use]
pub fn server_config_from_nd_config(config: &nd_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.seed.host.clone(),
        port: config.seed.port,
        descriptor: ClusterDescriptor::from(config.seed.nodes.as_slice()),
    }
}
