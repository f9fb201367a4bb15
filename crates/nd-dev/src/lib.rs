//! Development server for the NDBench UI.
//!
//! Serves the UI's static files, reloads connected browsers when those files
//! change and passes REST calls through to a running NDBench instance:
//!
//! ```text
//! Browser ──HTTP──► nd-dev (axum)
//!                     │
//!                     ├─► /ws/live-reload ◄── notify watcher (debounced)
//!                     │
//!                     ├─► rewrite rules ──[P]──► reqwest ──► NDBench :8080
//!                     │
//!                     └─► static files (tower-http ServeDir, script injected)
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use nd_dev::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     run_server(ServerConfig::default(), |_| {}).await.unwrap();
//! }
//! ```

mod app;
mod browser;
mod error;
mod handlers;
mod live_reload;
mod middleware;
mod proxy;
mod rewrite;
mod state;
mod static_files;

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use state::AppState;
use tokio::net::TcpListener;

pub use browser::open_browser;
pub use error::ServerError;
pub use live_reload::{CLIENT_SCRIPT_PATH, WS_PATH};
pub use proxy::ProxyError;
pub use rewrite::{Rewrite, RewriteRule, RewriteRules, RuleError};
pub use static_files::inject_live_reload;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory watched for changes.
    pub files: PathBuf,
    /// Directory static files are served from.
    pub base_dir: PathBuf,
    /// Rewrite rules in order.
    pub rewrites: Vec<String>,
    /// Enable live reload.
    pub live_reload_enabled: bool,
    /// Watch patterns for live reload.
    pub watch_patterns: Option<Vec<String>>,
    /// Quiet period before a change is broadcast.
    pub debounce_ms: u64,
    /// Open the served URL in a browser after binding.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: nd_config::DEFAULT_PORT,
            files: PathBuf::from("app"),
            base_dir: PathBuf::from("app"),
            rewrites: vec![nd_config::DEFAULT_REST_REWRITE.to_owned()],
            live_reload_enabled: true,
            watch_patterns: None,
            debounce_ms: 100,
            open_browser: true,
        }
    }
}

/// A bound dev server, ready to serve.
pub struct DevServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl DevServer {
    /// Parse rules, start the watcher and bind the listener.
    ///
    /// # Errors
    ///
    /// Returns an error if a rewrite rule is invalid, the watched directory
    /// cannot be watched or the address is unavailable.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let state = AppState::new(&config)?;

        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .await
            .map_err(|source| ServerError::Bind {
                addr: format!("{}:{}", config.host, config.port),
                source,
            })?;

        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Serve)
    }

    /// URL a browser on this machine can open.
    pub fn url(&self) -> Result<String, ServerError> {
        let addr = self.local_addr()?;
        if addr.ip().is_unspecified() {
            Ok(format!("http://localhost:{}/", addr.port()))
        } else {
            Ok(format!("http://{addr}/"))
        }
    }

    /// Number of active rewrite rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.state.rules.len()
    }

    /// Whether browsers will be live reloaded.
    #[must_use]
    pub fn live_reload_enabled(&self) -> bool {
        self.state.live_reload.is_some()
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
/// Binds, hands the bound server to `on_ready`, optionally opens a browser
/// and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails to start or serve.
pub async fn run_server<R>(config: ServerConfig, on_ready: R) -> Result<(), ServerError>
where
    R: FnOnce(&DevServer),
{
    run_server_with_shutdown(config, on_ready, shutdown_signal()).await
}

/// Like [`run_server`], but serves until `signal` completes.
///
/// # Errors
///
/// Returns an error if the server fails to start or serve.
pub async fn run_server_with_shutdown<R, F>(
    config: ServerConfig,
    on_ready: R,
    signal: F,
) -> Result<(), ServerError>
where
    R: FnOnce(&DevServer),
    F: Future<Output = ()> + Send + 'static,
{
    let open = config.open_browser;
    let server = DevServer::bind(config).await?;
    let url = server.url()?;

    tracing::info!(
        url = %url,
        rules = server.rule_count(),
        live_reload = server.live_reload_enabled(),
        "Starting dev server"
    );
    on_ready(&server);

    if open && let Err(e) = open_browser(&url) {
        tracing::warn!(error = %e, url = %url, "Failed to open browser");
    }

    server.serve_with_shutdown(signal).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the `[dev]` and `[live_reload]`
/// sections.
#[must_use]
pub fn server_config_from_nd_config(config: &nd_config::Config) -> ServerConfig {
    let dev = &config.dev_resolved;
    ServerConfig {
        host: dev.host.clone(),
        port: dev.port,
        files: dev.files.clone(),
        base_dir: dev.base_dir.clone(),
        rewrites: dev.rewrites.clone(),
        live_reload_enabled: config.live_reload.enabled,
        watch_patterns: config.live_reload.watch_patterns.clone(),
        debounce_ms: config.live_reload.debounce_ms,
        open_browser: dev.open_browser,
    }
}
