//! Live reload: file watching, debouncing and the browser channel.

mod debouncer;
mod manager;
mod websocket;

pub(crate) use manager::{LiveReloadManager, ReloadEvent};
pub(crate) use websocket::{client_script, ws_handler};

/// WebSocket endpoint browsers subscribe to.
pub const WS_PATH: &str = "/ws/live-reload";

/// Path of the injected client script.
pub const CLIENT_SCRIPT_PATH: &str = "/__nd/live-reload.js";
