//! Static file serving from the asset directory.
//!
//! Files come from `tower-http`'s `ServeDir`. When live reload is enabled,
//! HTML responses get the client script tag injected before `</body>`.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;

use crate::live_reload::CLIENT_SCRIPT_PATH;
use crate::state::AppState;

/// HTML documents larger than this are served untouched.
const MAX_INJECT_BYTES: usize = 8 * 1024 * 1024;

/// Script tag pointing at the live reload client.
fn script_tag() -> String {
    format!(r#"<script src="{CLIENT_SCRIPT_PATH}"></script>"#)
}

/// Insert the live reload script before the last `</body>`.
///
/// Documents without a closing body tag get the script appended.
#[must_use]
pub fn inject_live_reload(html: &str) -> String {
    let tag = script_tag();
    // ASCII lowercasing keeps byte offsets intact
    match html.to_ascii_lowercase().rfind("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + tag.len());
            out.push_str(&html[..idx]);
            out.push_str(&tag);
            out.push_str(&html[idx..]);
            out
        }
        None => format!("{html}{tag}"),
    }
}

/// Serve `req` from the asset directory.
pub(crate) async fn serve(state: &AppState, req: Request<Body>) -> Response {
    let is_head = req.method() == Method::HEAD;

    let response = match state.static_files.clone().oneshot(req).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };

    if state.live_reload.is_none() || is_head || !should_inject(&response) {
        return response;
    }
    inject_into(response).await
}

fn should_inject(response: &Response) -> bool {
    if response.status() != StatusCode::OK {
        return false;
    }
    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"));
    let small_enough = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .is_none_or(|len| len <= MAX_INJECT_BYTES);
    is_html && small_enough
}

async fn inject_into(response: Response) -> Response {
    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_INJECT_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read HTML for live reload injection");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Ok(html) = std::str::from_utf8(&bytes) else {
        // Not text after all; send it as-is
        return Response::from_parts(parts, Body::from(bytes));
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(inject_live_reload(html)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inject_before_body_close() {
        let html = "<html><body><p>hi</p></body></html>";
        assert_eq!(
            inject_live_reload(html),
            r#"<html><body><p>hi</p><script src="/__nd/live-reload.js"></script></body></html>"#
        );
    }

    #[test]
    fn test_inject_uses_last_body_close_case_insensitive() {
        let html = "<BODY><pre>&lt;/body&gt; </body></pre></BODY>";
        let out = inject_live_reload(html);
        assert!(out.ends_with(r#"<script src="/__nd/live-reload.js"></script></BODY>"#));
        assert!(out.starts_with("<BODY><pre>&lt;/body&gt; </body></pre>"));
    }

    #[test]
    fn test_inject_appends_without_body_close() {
        let html = "<p>fragment</p>";
        assert_eq!(
            inject_live_reload(html),
            r#"<p>fragment</p><script src="/__nd/live-reload.js"></script>"#
        );
    }

    #[test]
    fn test_inject_preserves_multibyte_text() {
        let html = "<body>Привет</body>";
        assert_eq!(
            inject_live_reload(html),
            r#"<body>Привет<script src="/__nd/live-reload.js"></script></body>"#
        );
    }

    #[test]
    fn test_should_inject_only_ok_html() {
        let html = Response::builder()
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Body::empty())
            .unwrap();
        assert!(should_inject(&html));

        let js = Response::builder()
            .header(header::CONTENT_TYPE, "text/javascript")
            .body(Body::empty())
            .unwrap();
        assert!(!should_inject(&js));

        let missing = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header(header::CONTENT_TYPE, "text/html")
            .body(Body::empty())
            .unwrap();
        assert!(!should_inject(&missing));

        let huge = Response::builder()
            .header(header::CONTENT_TYPE, "text/html")
            .header(header::CONTENT_LENGTH, (MAX_INJECT_BYTES + 1).to_string())
            .body(Body::empty())
            .unwrap();
        assert!(!should_inject(&huge));
    }
}
