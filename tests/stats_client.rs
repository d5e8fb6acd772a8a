//! Tests for the statistics service client and the tokens it sends.

use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

use matrix_relay::config::Config;
use matrix_relay::error::StatsError;
use matrix_relay::matrix::Matrix;
use matrix_relay::signing::TokenSigner;
use matrix_relay::stats::{MatrixStats, StatsClient};

const SECRET: &str = "stats-client-secret-0123456789ab";

fn client_for(server: &MockServer) -> StatsClient {
    let config = Config {
        stats_api_url: server.url("/calculate-stats"),
        ..Config::with_secret(SECRET)
    };
    StatsClient::new(&config).unwrap()
}

#[tokio::test]
async fn sends_bearer_token_and_parses_stats() {
    let signer = TokenSigner::new(SECRET.as_bytes(), "go_api_service", 60).unwrap();
    let token = signer.sign().unwrap();

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/calculate-stats")
                .header("authorization", format!("Bearer {}", token))
                .json_body(json!([[3, 1], [4, 2]]));
            then.status(200).json_body(json!({
                "message": "ok",
                "stats": {
                    "valorMaximo": 4,
                    "valorMinimo": 1,
                    "promedio": 2.5,
                    "sumaTotal": 10,
                    "matrizDiagonal": false
                }
            }));
        })
        .await;

    let client = client_for(&server);
    let rotated = Matrix::new(vec![vec![3, 1], vec![4, 2]]);
    let response = tokio_test::assert_ok!(client.calculate(&rotated, &token).await);

    mock.assert_async().await;
    assert_eq!(
        response.stats,
        MatrixStats {
            max_value: 4,
            min_value: 1,
            average: 2.5,
            total_sum: 10,
            is_diagonal: false,
        }
    );
    // The downstream service can check the token with the shared secret.
    assert_eq!(signer.verify(&token).unwrap().user_id, "go_api_service");
}

#[tokio::test]
async fn non_ok_status_is_upstream_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/calculate-stats");
            then.status(500).body("boom");
        })
        .await;

    let client = client_for(&server);
    let err = tokio_test::assert_err!(
        client
            .calculate(&Matrix::new(vec![vec![1]]), "token")
            .await
    );

    match err {
        StatsError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn connection_failure_is_unreachable() {
    let client = StatsClient::with_http(reqwest::Client::new(), "http://127.0.0.1:9/calculate-stats");

    let err = client
        .calculate(&Matrix::new(vec![vec![1]]), "token")
        .await
        .unwrap_err();

    assert!(matches!(err, StatsError::Unreachable { .. }));
    assert!(err.to_string().contains("127.0.0.1:9"));
}

#[tokio::test]
async fn client_from_config_reports_unreachable() {
    let config = Config {
        stats_api_url: "http://127.0.0.1:9/calculate-stats".to_string(),
        http_timeout_ms: 250,
        ..Config::with_secret(SECRET)
    };
    let client = StatsClient::new(&config).unwrap();

    let err = tokio_test::assert_err!(
        client
            .calculate(&Matrix::new(vec![vec![1]]), "token")
            .await
    );
    assert!(matches!(err, StatsError::Unreachable { .. }));
}

#[tokio::test]
async fn truncated_error_body_is_relayed_empty() {
    use std::io::{Read, Write};

    // Announces a longer body than it sends, so reading the body fails.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.ends_with(b"[[1]]") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\npartial")
            .unwrap();
    });

    let client = StatsClient::with_http(
        reqwest::Client::new(),
        format!("http://{}/calculate-stats", addr),
    );
    let err = tokio_test::assert_err!(
        client
            .calculate(&Matrix::new(vec![vec![1]]), "token")
            .await
    );
    server.join().unwrap();

    match err {
        StatsError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}
