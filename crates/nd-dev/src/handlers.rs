//! Request dispatch.
//!
//! Every request that is not a live reload route lands here. The rewrite
//! rules decide between proxying, redirecting, a bare status and the static
//! file tree.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

use crate::proxy;
use crate::rewrite::Rewrite;
use crate::state::AppState;
use crate::static_files;

pub(crate) async fn dispatch(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
) -> Response {
    let url = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_owned(), ToString::to_string);

    match state.rules.evaluate(&url) {
        Rewrite::Proxy(target) => {
            tracing::debug!(from = %url, to = %target, "Proxying");
            match proxy::forward(&state.client, &target, req).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(error = %e, "Proxy request failed");
                    e.into_response()
                }
            }
        }
        Rewrite::Redirect { location, status } => {
            tracing::debug!(from = %url, to = %location, status = status.as_u16(), "Redirecting");
            (status, [(header::LOCATION, location)]).into_response()
        }
        Rewrite::Status(status) => status.into_response(),
        Rewrite::Internal(rewritten) => {
            let Ok(uri) = rewritten.parse::<Uri>() else {
                tracing::warn!(from = %url, to = %rewritten, "Rewrite produced an invalid URI");
                return StatusCode::BAD_REQUEST.into_response();
            };
            tracing::debug!(from = %url, to = %uri, "Rewriting");
            *req.uri_mut() = uri;
            static_files::serve(&state, req).await
        }
        Rewrite::Unchanged => static_files::serve(&state, req).await,
    }
}
