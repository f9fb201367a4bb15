//! Pass-through forwarding for `[P]` rules.
//!
//! The request is replayed against the upstream URL with its method, headers
//! and streamed body; the upstream response is relayed back the same way.
//! The client never sees the upstream address.

use axum::body::{Body, HttpBody};
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Connection-scoped headers that must not be forwarded (RFC 9110 §7.6.1).
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Proxy error.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Rewritten target is not an absolute http(s) URL.
    #[error("Invalid proxy target {target:?}: {message}")]
    InvalidTarget {
        /// Target after substitution.
        target: String,
        /// Why it was rejected.
        message: String,
    },
    /// Upstream could not be reached or failed mid-request.
    #[error("Upstream request to {target} failed: {source}")]
    Upstream {
        /// Target after substitution.
        target: String,
        /// Client error.
        #[source]
        source: reqwest::Error,
    },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let target = match &self {
            Self::InvalidTarget { target, .. } | Self::Upstream { target, .. } => target.clone(),
        };
        let body = json!({"error": self.to_string(), "target": target});
        (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response()
    }
}

/// Copy `headers` without hop-by-hop entries or the headers `Connection`
/// names.
fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    let mut out = headers.clone();
    for name in HOP_BY_HOP {
        out.remove(name);
    }
    for name in &listed {
        out.remove(name);
    }
    out
}

/// Forward `req` to `target` and relay the upstream response.
///
/// # Errors
///
/// Returns [`ProxyError`] if `target` is not an http(s) URL or the upstream
/// request fails before a response head arrives.
pub async fn forward(
    client: &reqwest::Client,
    target: &str,
    req: Request<Body>,
) -> Result<Response, ProxyError> {
    let invalid = |message: String| ProxyError::InvalidTarget {
        target: target.to_owned(),
        message,
    };
    let url = reqwest::Url::parse(target).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }

    let (parts, body) = req.into_parts();
    let mut headers = forwardable_headers(&parts.headers);
    // reqwest sets Host from the target URL
    headers.remove(header::HOST);

    let mut upstream = client.request(parts.method, url).headers(headers);
    if body.size_hint().exact() != Some(0) {
        upstream = upstream.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    let upstream = upstream
        .send()
        .await
        .map_err(|source| ProxyError::Upstream {
            target: target.to_owned(),
            source,
        })?;

    let status = upstream.status();
    let headers = forwardable_headers(upstream.headers());

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
