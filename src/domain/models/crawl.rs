// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrawlSettings;
use crate::utils::errors::CrawlError;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// 深度或数量上限
///
/// 用显式的无限制标记代替魔法数字，避免与实际取值冲突；配置层
/// 的-1哨兵只在转换入口出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// 无限制
    Unbounded,
    /// 具体上限
    At(u64),
}

impl Limit {
    /// 从配置层的哨兵值转换，负值表示无限制
    pub fn from_sentinel(value: i64) -> Self {
        if value < 0 {
            Limit::Unbounded
        } else {
            Limit::At(value as u64)
        }
    }

    /// 判断给定取值是否已达到上限
    ///
    /// 取值每次只前进一个单位，等值比较即可覆盖。
    pub fn is_reached(&self, value: u64) -> bool {
        matches!(self, Limit::At(n) if value == *n)
    }
}

/// 页面处理回调接口
///
/// 每个成功抓取的页面调用一次，返回的候选链接会与页面中提取的
/// 链接合并，进入同样的规范化与去重流程。
pub trait ScrapeCallback: Send + Sync {
    /// 处理抓取到的页面，返回额外的候选链接
    fn scrape(&self, url: &Url, payload: &str) -> Vec<String>;
}

impl<F> ScrapeCallback for F
where
    F: Fn(&Url, &str) -> Vec<String> + Send + Sync,
{
    fn scrape(&self, url: &Url, payload: &str) -> Vec<String> {
        self(url, payload)
    }
}

/// 爬取配置
///
/// 一次爬取运行的全部参数；种子与正则在构建时校验，运行期不再
/// 出现配置错误。
#[derive(Clone)]
pub struct CrawlConfig {
    /// 种子地址，深度为0
    pub seed: Url,
    /// 链接过滤正则，仅作用于页面中提取的链接
    pub link_pattern: Option<Regex>,
    /// 最大深度
    pub max_depth: Limit,
    /// 最大抓取数量
    pub max_urls: Limit,
    /// 礼貌性检查与请求使用的User-Agent
    pub user_agent: String,
    /// 可选的页面处理回调
    pub scrape_callback: Option<Arc<dyn ScrapeCallback>>,
}

impl CrawlConfig {
    /// 创建指向给定种子地址的配置，其余参数为默认值
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlConfig)` - 种子地址合法
    /// * `Err(CrawlError)` - 种子地址无法解析
    pub fn new(seed_url: &str) -> Result<Self, CrawlError> {
        let mut seed = Url::parse(seed_url)
            .map_err(|e| CrawlError::InvalidSeed(format!("{}: {}", seed_url, e)))?;
        // 地址一律不带片段
        seed.set_fragment(None);
        Ok(Self {
            seed,
            link_pattern: None,
            max_depth: Limit::Unbounded,
            max_urls: Limit::Unbounded,
            user_agent: "linkrs".to_string(),
            scrape_callback: None,
        })
    }

    /// 从配置设置构建
    pub fn from_settings(settings: &CrawlSettings) -> Result<Self, CrawlError> {
        let mut config = Self::new(&settings.seed_url)?
            .with_max_depth(settings.max_depth_limit())
            .with_max_urls(settings.max_urls_limit())
            .with_user_agent(&settings.user_agent);
        if let Some(pattern) = &settings.link_pattern {
            config = config.with_link_pattern(pattern)?;
        }
        Ok(config)
    }

    /// 设置链接过滤正则
    pub fn with_link_pattern(mut self, pattern: &str) -> Result<Self, CrawlError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| CrawlError::InvalidPattern(format!("{}: {}", pattern, e)))?;
        self.link_pattern = Some(pattern);
        Ok(self)
    }

    /// 设置最大深度
    pub fn with_max_depth(mut self, limit: Limit) -> Self {
        self.max_depth = limit;
        self
    }

    /// 设置最大抓取数量
    pub fn with_max_urls(mut self, limit: Limit) -> Self {
        self.max_urls = limit;
        self
    }

    /// 设置User-Agent
    pub fn with_user_agent<S: AsRef<str>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.as_ref().to_string();
        self
    }

    /// 设置页面处理回调
    pub fn with_scrape_callback(mut self, callback: Arc<dyn ScrapeCallback>) -> Self {
        self.scrape_callback = Some(callback);
        self
    }

    /// 判断提取的原始链接是否通过过滤正则
    ///
    /// 未配置过滤时全部通过；匹配锚定在链接字符串开头。
    pub fn matches_link_pattern(&self, raw_link: &str) -> bool {
        match &self.link_pattern {
            Some(pattern) => pattern
                .find(raw_link)
                .is_some_and(|m| m.start() == 0),
            None => true,
        }
    }
}

/// 终止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminationReason {
    /// 队列耗尽
    FrontierExhausted,
    /// 达到最大抓取数量
    MaxUrlsReached,
}

/// 爬取运行报告
///
/// 一次运行结束时的终态：终止原因、各类事件计数以及完整的已见
/// 地址注册表。
#[derive(Debug, Serialize)]
pub struct CrawlReport {
    /// 终止原因
    pub termination: TerminationReason,
    /// 通过礼貌性检查的抓取次数（无论抓取成败）
    pub fetch_attempts: u64,
    /// 抓取失败次数
    pub fetch_failures: u64,
    /// 被robots策略拒绝的次数
    pub policy_denials: u64,
    /// 所有发现过的地址及其首次发现深度
    pub visited: HashMap<String, u32>,
}

impl CrawlReport {
    /// 地址是否被发现过
    pub fn is_seen(&self, address: &str) -> bool {
        self.visited.contains_key(address)
    }

    /// 地址的首次发现深度
    pub fn depth_of(&self, address: &str) -> Option<u32> {
        self.visited.get(address).copied()
    }
}
