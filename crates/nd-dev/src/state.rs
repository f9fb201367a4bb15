//! Application state.

use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::ServerConfig;
use crate::error::ServerError;
use crate::live_reload::{LiveReloadManager, ReloadEvent};
use crate::rewrite::RewriteRules;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Rewrite rules, evaluated in order for every request.
    pub(crate) rules: RewriteRules,
    /// Client used for proxied requests. Never follows redirects.
    pub(crate) client: reqwest::Client,
    /// Static file service rooted at the base directory.
    pub(crate) static_files: ServeDir,
    /// Live reload manager (if enabled).
    pub(crate) live_reload: Option<LiveReloadManager>,
}

impl AppState {
    /// Build the state and start watching when live reload is enabled.
    ///
    /// Must be called inside a tokio runtime.
    pub(crate) fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        let rules = RewriteRules::parse_all(&config.rewrites)?;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let live_reload = if config.live_reload_enabled {
            let (tx, _rx) = broadcast::channel::<ReloadEvent>(100);
            let mut manager =
                LiveReloadManager::new(config.files.clone(), config.watch_patterns.clone(), tx)
                    .with_debounce_ms(config.debounce_ms);
            manager.start()?;
            Some(manager)
        } else {
            None
        };

        Ok(Self {
            rules,
            client,
            static_files: ServeDir::new(&config.base_dir),
            live_reload,
        })
    }
}
