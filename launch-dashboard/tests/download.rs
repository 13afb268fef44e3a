// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Dataset fallback download against a local HTTP server.

use std::path::PathBuf;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use launch_dashboard::dataset::{load_dataset, DatasetError, DatasetSource};
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(5);

fn sample_csv() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/spacex_launch_dash.csv");
    std::fs::read_to_string(path).unwrap()
}

/// Serve fixed responses for the fallback URL and return the base URL.
async fn spawn_origin() -> String {
    let csv = sample_csv();
    let app = Router::new()
        .route("/launches.csv", get(move || async move { csv }))
        .route(
            "/broken.csv",
            get(|| async { "<html>Service unavailable</html>" }),
        )
        .route(
            "/missing.csv",
            get(|| async { (StatusCode::NOT_FOUND, "not found") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_absent_file_is_downloaded_once() {
    let origin = spawn_origin().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache").join("spacex_launch_dash.csv");
    let url = format!("{}/launches.csv", origin);

    let (table, source) = load_dataset(&path, &url, TIMEOUT).await.unwrap();
    assert!(matches!(source, DatasetSource::Downloaded { bytes } if bytes > 0));
    assert_eq!(table.len(), 17);
    assert!(path.exists());
    assert!(!dir.path().join("cache/spacex_launch_dash.csv.download").exists());

    // Second start reads the cached copy.
    let (table, source) = load_dataset(&path, &url, TIMEOUT).await.unwrap();
    assert_eq!(source, DatasetSource::Local);
    assert_eq!(table.len(), 17);
}

#[tokio::test]
async fn test_http_error_is_fatal() {
    let origin = spawn_origin().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("spacex_launch_dash.csv");

    let result = load_dataset(&path, &format!("{}/missing.csv", origin), TIMEOUT).await;
    assert!(matches!(result, Err(DatasetError::Download { .. })));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_invalid_content_is_fatal_and_not_cached() {
    let origin = spawn_origin().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("spacex_launch_dash.csv");

    let result = load_dataset(&path, &format!("{}/broken.csv", origin), TIMEOUT).await;
    assert!(result.is_err(), "expected failure, got {:?}", result.map(|(t, _)| t.len()));
    assert!(!path.exists());
}
