// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{FetchEngine, FetchError};
use robotstxt::DefaultMatcher;
use tracing::{debug, warn};
use url::Url;

/// 礼貌性检查门
///
/// 每次爬取运行构建一次：通过下载契约获取种子所属站点的robots.txt
/// 并在整个运行期间复用。策略获取失败不是致命错误，此时门对所有
/// 地址放行。
pub struct PolitenessGate {
    /// robots.txt原文；None表示策略不可用（全部允许）
    policy: Option<String>,
}

impl PolitenessGate {
    /// 从种子地址所属站点加载robots.txt策略
    ///
    /// 站点不存在robots.txt（404）视为空策略；传输失败退化为
    /// 全部允许并记录警告。
    ///
    /// # 参数
    ///
    /// * `engine` - 用于获取robots.txt的下载引擎
    /// * `seed` - 本次运行的种子地址
    pub async fn load<E: FetchEngine + ?Sized>(engine: &E, seed: &Url) -> Self {
        let robots_url = match seed.join("/robots.txt") {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot derive robots.txt address from {}: {}", seed, e);
                return Self { policy: None };
            }
        };

        match engine.fetch(&robots_url).await {
            Ok(content) => Self {
                policy: Some(content),
            },
            Err(FetchError::Status(404)) => {
                // 404 is a valid response, meaning no robots.txt
                debug!("No robots.txt at {}", robots_url);
                Self {
                    policy: Some(String::new()),
                }
            }
            Err(e) => {
                warn!(
                    "Failed to fetch robots.txt from {}: {} (allowing all)",
                    robots_url, e
                );
                Self { policy: None }
            }
        }
    }

    /// 从给定的策略原文构建检查门
    ///
    /// None表示策略不可用，对所有地址放行。
    pub fn from_policy(policy: Option<String>) -> Self {
        Self { policy }
    }

    /// 检查该User-Agent是否被允许抓取给定地址
    pub fn can_fetch(&self, user_agent: &str, address: &Url) -> bool {
        match &self.policy {
            Some(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, address.as_str())
            }
            None => true,
        }
    }
}
