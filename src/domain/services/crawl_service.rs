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

use crate::domain::models::crawl::{CrawlConfig, CrawlReport, TerminationReason};
use crate::engines::traits::FetchEngine;
use crate::queue::frontier::Frontier;
use crate::utils::links::extract_links;
use crate::utils::robots::PolitenessGate;
use crate::utils::url_utils::{normalize, same_domain};
use tracing::{debug, info, warn};
use url::Url;

/// 爬取协调器
///
/// 将队列、礼貌性检查、下载引擎与链接处理串联为单线程的顺序爬取
/// 循环：同一时刻至多一个请求在途，队列与注册表只由本循环修改。
pub struct Crawler<E: FetchEngine> {
    /// 下载引擎
    engine: E,
    /// 爬取配置
    config: CrawlConfig,
}

impl<E: FetchEngine> Crawler<E> {
    /// 创建新的爬取协调器实例
    pub fn new(engine: E, config: CrawlConfig) -> Self {
        Self { engine, config }
    }

    /// 访问下载引擎
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// 执行一次完整的爬取
    ///
    /// 从种子地址开始，直到队列耗尽或达到抓取数量上限。单个地址
    /// 的失败（抓取失败、被robots拒绝、无效链接）只计入报告，不会
    /// 中止运行。
    ///
    /// # 返回值
    ///
    /// 运行报告：终止原因、事件计数与完整的已见地址注册表
    pub async fn run(&self) -> CrawlReport {
        let config = &self.config;
        let gate = PolitenessGate::load(&self.engine, &config.seed).await;

        let mut frontier = Frontier::new();
        frontier.push(config.seed.clone(), 0);

        let mut fetch_attempts: u64 = 0;
        let mut fetch_failures: u64 = 0;
        let mut policy_denials: u64 = 0;

        let termination = loop {
            let (url, depth) = match frontier.pop() {
                Ok(entry) => entry,
                Err(_) => break TerminationReason::FrontierExhausted,
            };

            if !gate.can_fetch(&config.user_agent, &url) {
                warn!("Blocked by robots.txt: {}", url);
                policy_denials += 1;
                continue;
            }

            match self.engine.fetch(&url).await {
                Ok(payload) => {
                    debug!("Fetched {} at depth {}", url, depth);
                    self.collect_candidates(&url, depth, &payload, &mut frontier);
                }
                Err(e) => {
                    warn!("Fetch failed for {}: {}", url, e);
                    fetch_failures += 1;
                }
            }

            // 被拒绝的地址不计数，抓取失败的计数
            fetch_attempts += 1;
            if config.max_urls.is_reached(fetch_attempts) {
                break TerminationReason::MaxUrlsReached;
            }
        };

        info!(
            "Crawl finished ({:?}): {} fetch attempts, {} addresses seen",
            termination,
            fetch_attempts,
            frontier.seen_count()
        );

        CrawlReport {
            termination,
            fetch_attempts,
            fetch_failures,
            policy_denials,
            visited: frontier
                .into_seen()
                .into_iter()
                .map(|(address, depth)| (String::from(address), depth))
                .collect(),
        }
    }

    /// 处理一个已抓取页面产出的候选链接
    ///
    /// 回调产出的候选始终处理；页面中提取的链接只有在尚未到达
    /// 深度上限时才跟进，且需通过过滤正则。候选一律针对当前页面
    /// 规范化：站内新地址入队，站外新地址只注册不入队。
    fn collect_candidates(&self, url: &Url, depth: u32, payload: &str, frontier: &mut Frontier) {
        let config = &self.config;

        let mut candidates: Vec<String> = Vec::new();
        if let Some(callback) = &config.scrape_callback {
            candidates.extend(callback.scrape(url, payload));
        }

        if !config.max_depth.is_reached(depth as u64) {
            candidates.extend(
                extract_links(payload)
                    .filter(|link| config.matches_link_pattern(link))
                    .map(str::to_string),
            );
        }

        for raw_link in candidates {
            let address = match normalize(url, &raw_link) {
                Ok(address) => address,
                Err(e) => {
                    debug!("Dropping link on {}: {}", url, e);
                    continue;
                }
            };
            if frontier.contains(&address) {
                continue;
            }
            if same_domain(&config.seed, &address) {
                frontier.push(address, depth + 1);
            } else {
                frontier.mark_seen(address, depth + 1);
            }
        }
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
