// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::FetchSettings;
use crate::engines::download_engine::DownloadEngine;
use crate::engines::traits::{FetchEngine, FetchError};
use std::time::Instant;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings() -> FetchSettings {
    FetchSettings {
        delay_ms: 0,
        num_retries: 1,
        timeout_secs: 5,
        proxy: None,
        cache_size: 0,
    }
}

fn parse(base: &str, p: &str) -> Url {
    Url::parse(&format!("{}{}", base, p)).unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let engine = DownloadEngine::from_settings(&settings(), "linkrs").unwrap();
    let body = engine.fetch(&parse(&server.uri(), "/page")).await.unwrap();

    assert_eq!(body, "<html>ok</html>");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let engine = DownloadEngine::from_settings(
        &FetchSettings {
            num_retries: 3,
            ..settings()
        },
        "linkrs",
    )
    .unwrap();
    let result = engine.fetch(&parse(&server.uri(), "/missing")).await;

    assert!(matches!(result, Err(FetchError::Status(404))));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let engine = DownloadEngine::from_settings(&settings(), "linkrs").unwrap();
    let result = engine.fetch(&parse(&server.uri(), "/flaky")).await;

    assert!(matches!(result, Err(FetchError::Status(503))));
    // 初次请求加一次重试
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_cache_serves_repeated_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body"))
        .mount(&server)
        .await;

    let engine = DownloadEngine::from_settings(
        &FetchSettings {
            cache_size: 8,
            ..settings()
        },
        "linkrs",
    )
    .unwrap();
    let url = parse(&server.uri(), "/cached");

    assert_eq!(engine.fetch(&url).await.unwrap(), "body");
    assert_eq!(engine.fetch(&url).await.unwrap(), "body");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_throttle_spaces_same_host_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let engine = DownloadEngine::from_settings(
        &FetchSettings {
            delay_ms: 300,
            ..settings()
        },
        "linkrs",
    )
    .unwrap();

    let start = Instant::now();
    engine.fetch(&parse(&server.uri(), "/a")).await.unwrap();
    engine.fetch(&parse(&server.uri(), "/b")).await.unwrap();

    assert!(start.elapsed() >= std::time::Duration::from_millis(300));
}
