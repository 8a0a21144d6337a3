// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Context;
use linkrs::config::settings::Settings;
use linkrs::domain::models::crawl::CrawlConfig;
use linkrs::domain::services::crawl_service::Crawler;
use linkrs::engines::download_engine::DownloadEngine;
use linkrs::utils::telemetry;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，加载配置并执行一次爬取
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting linkrs...");

    // 2. Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    info!("Configuration loaded, seed: {}", settings.crawl.seed_url);

    // 3. Build the download engine and crawler
    let engine = DownloadEngine::from_settings(&settings.fetch, &settings.crawl.user_agent)?;
    let config = CrawlConfig::from_settings(&settings.crawl)?;
    let crawler = Crawler::new(engine, config);

    // 4. Run one crawl to completion
    let report = crawler.run().await;
    info!(
        "Crawl terminated ({:?}): {} fetch attempts, {} failures, {} robots denials, {} addresses seen",
        report.termination,
        report.fetch_attempts,
        report.fetch_failures,
        report.policy_denials,
        report.visited.len()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
