//! Cache headers middleware.
//!
//! Development responses must always be revalidated so an edit is visible on
//! the next load. The layer covers every response, proxied ones included;
//! a `Cache-Control` header sent by the upstream is left untouched.

use axum::http::HeaderValue;
use axum::http::header;
use tower_http::set_header::SetResponseHeaderLayer;

/// Create layer that adds `Cache-Control: no-cache` when absent.
pub(crate) fn no_cache_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache"),
    )
}
