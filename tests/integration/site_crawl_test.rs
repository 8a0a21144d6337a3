// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use linkrs::config::settings::FetchSettings;
use linkrs::domain::models::crawl::{CrawlConfig, Limit, TerminationReason};
use linkrs::domain::services::crawl_service::Crawler;
use linkrs::engines::download_engine::DownloadEngine;
use tokio::net::TcpListener;

/// 启动一个小型测试站点
///
/// 结构：/ 链向 /a、/private、带片段的/a与一个站外地址；/a 回链
/// 首页形成环；robots.txt 禁止 /private。
async fn start_site() -> String {
    let app = Router::new()
        .route(
            "/",
            get(|| async {
                Html(
                    r##"<html><body>
                        <a href="/a">a</a>
                        <a href="/a#frag">a again</a>
                        <a href="/private">private</a>
                        <a href="http://other.invalid/x">away</a>
                    </body></html>"##,
                )
            }),
        )
        .route("/a", get(|| async { Html(r#"<a href="/">home</a>"#) }))
        .route("/private", get(|| async { Html("secret") }))
        .route(
            "/robots.txt",
            get(|| async { "User-agent: *\nDisallow: /private\n" }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn engine() -> DownloadEngine {
    let settings = FetchSettings {
        delay_ms: 0,
        num_retries: 0,
        timeout_secs: 5,
        proxy: None,
        cache_size: 0,
    };
    DownloadEngine::from_settings(&settings, "linkrs").unwrap()
}

#[tokio::test]
async fn test_full_crawl_respects_robots_and_domain() {
    let base = start_site().await;
    let seed = format!("{}/", base);
    let config = CrawlConfig::new(&seed).unwrap();

    let report = Crawler::new(engine(), config).run().await;

    assert_eq!(report.termination, TerminationReason::FrontierExhausted);
    // 首页与/a被抓取；/private被robots拒绝但占据注册表
    assert_eq!(report.fetch_attempts, 2);
    assert_eq!(report.policy_denials, 1);
    assert_eq!(report.depth_of(&seed), Some(0));
    assert_eq!(report.depth_of(&format!("{}/a", base)), Some(1));
    assert_eq!(report.depth_of(&format!("{}/private", base)), Some(1));
    // 站外地址只注册；没有任何失败说明它从未被抓取
    assert!(report.is_seen("http://other.invalid/x"));
    assert_eq!(report.fetch_failures, 0);
}

#[tokio::test]
async fn test_full_crawl_max_urls() {
    let base = start_site().await;
    let seed = format!("{}/", base);
    let config = CrawlConfig::new(&seed)
        .unwrap()
        .with_max_urls(Limit::At(1));

    let report = Crawler::new(engine(), config).run().await;

    assert_eq!(report.termination, TerminationReason::MaxUrlsReached);
    assert_eq!(report.fetch_attempts, 1);
}
