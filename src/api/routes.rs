//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{health, prometheus_metrics, rotate, rotate_and_send, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Matrix endpoints
        .route("/rotate-and-send", post(rotate_and_send))
        .route("/rotate", post(rotate))
        // Health and metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::TokenSigner;
    use crate::stats::StatsClient;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    fn test_state(stats_url: &str) -> AppState {
        let signer = TokenSigner::new(b"0123456789abcdef0123456789abcdef", "svc", 60).unwrap();
        AppState::new(signer, StatsClient::with_http(reqwest::Client::new(), stats_url))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(test_state("http://127.0.0.1:9/stats"));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn rotate_endpoint_returns_rotation() {
        let app = create_router(test_state("http://127.0.0.1:9/stats"));

        let response = app
            .oneshot(post_json("/rotate", "[[1,2,3],[4,5,6]]"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["rows"], 3);
        assert_eq!(json["cols"], 2);
        assert_eq!(json["matrix_rotated"], serde_json::json!([[4, 1], [5, 2], [6, 3]]));
    }

    #[tokio::test]
    async fn rotate_endpoint_rejects_jagged_matrix() {
        let app = create_router(test_state("http://127.0.0.1:9/stats"));

        let response = app
            .oneshot(post_json("/rotate", "[[1,2,3],[4,5]]"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(
            json["error"],
            "matrix must be rectangular: row 1 has 2 columns, expected 3"
        );
    }

    #[tokio::test]
    async fn rotate_and_send_rejects_empty_matrix_before_calling_downstream() {
        let app = create_router(test_state("http://127.0.0.1:9/stats"));

        let response = app.oneshot(post_json("/rotate-and-send", "[]")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "matrix must not be empty");
    }

    #[tokio::test]
    async fn rotate_and_send_rejects_malformed_body() {
        let app = create_router(test_state("http://127.0.0.1:9/stats"));

        let response = app
            .oneshot(post_json("/rotate-and-send", "{\"matrix\": 1}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            crate::api::error::INVALID_BODY_MESSAGE
        );
    }

    #[tokio::test]
    async fn rotate_and_send_reports_unreachable_downstream() {
        // Nothing listens on the discard port.
        let app = create_router(test_state("http://127.0.0.1:9/stats"));

        let response = app
            .oneshot(post_json("/rotate-and-send", "[[1,2],[3,4]]"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json_body(response).await["error"],
            "statistics service unreachable"
        );
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_text() {
        crate::metrics::init_prometheus();
        let app = create_router(test_state("http://127.0.0.1:9/stats"));

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
