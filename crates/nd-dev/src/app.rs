//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::live_reload::{self, CLIENT_SCRIPT_PATH, WS_PATH};
use crate::middleware::cache;
use crate::state::AppState;

/// Create the application router.
///
/// Live reload routes exist only when live reload is enabled; everything
/// else goes through the rewrite rules.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new();

    if state.live_reload.is_some() {
        router = router
            .route(WS_PATH, get(live_reload::ws_handler))
            .route(CLIENT_SCRIPT_PATH, get(live_reload::client_script));
    }

    router
        .fallback(handlers::dispatch)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cache::no_cache_layer()),
        )
        .with_state(state)
}
