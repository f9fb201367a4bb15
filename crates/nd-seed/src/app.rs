//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Route polled by token-aware Dynomite clients.
pub const CLUSTER_DESCRIBE_PATH: &str = "/REST/v1/admin/cluster_describe";

/// State shared by handlers.
pub(crate) struct AppState {
    /// Pre-rendered descriptor body.
    pub(crate) body: String,
}

/// Create the seed router.
///
/// Only [`CLUSTER_DESCRIBE_PATH`] is routed; everything else gets axum's
/// default 404.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(CLUSTER_DESCRIBE_PATH, get(cluster_describe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle GET /REST/v1/admin/cluster_describe.
async fn cluster_describe(State(state): State<Arc<AppState>>) -> String {
    state.body.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::ClusterDescriptor;

    fn router() -> Router {
        let body = ClusterDescriptor::default().render().unwrap();
        create_router(Arc::new(AppState { body }))
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cluster_describe_returns_descriptor() {
        let router = router();
        let (status, body) = send(&router, get_request(CLUSTER_DESCRIBE_PATH)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"[{"token":"1383429731","hostname":"localhost","dc":"local-dc","ip":"127.0.0.1","zone":"us-east-1c","location":"us-east-1c"}]"#
        );
    }

    #[tokio::test]
    async fn test_cluster_describe_ignores_query_and_headers() {
        let router = router();
        let (_, plain) = send(&router, get_request(CLUSTER_DESCRIBE_PATH)).await;

        let request = Request::builder()
            .uri(format!("{CLUSTER_DESCRIBE_PATH}?dc=other"))
            .header(header::ACCEPT, "application/xml")
            .header("x-dyno-app", "ndbench")
            .body(Body::empty())
            .unwrap();
        let (status, decorated) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(decorated, plain);
    }

    #[tokio::test]
    async fn test_cluster_describe_is_idempotent() {
        let router = router();
        let (_, first) = send(&router, get_request(CLUSTER_DESCRIBE_PATH)).await;
        for _ in 0..5 {
            let (status, body) = send(&router, get_request(CLUSTER_DESCRIBE_PATH)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, first);
        }
    }

    #[tokio::test]
    async fn test_other_paths_not_found() {
        let router = router();
        for uri in ["/", "/REST/v1/admin", "/REST/v1/admin/cluster_describe/extra"] {
            let (status, _) = send(&router, get_request(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }

        // Still serving after the misses
        let (status, _) = send(&router, get_request(CLUSTER_DESCRIBE_PATH)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let request = Request::builder()
            .method(Method::POST)
            .uri(CLUSTER_DESCRIBE_PATH)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router(), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
