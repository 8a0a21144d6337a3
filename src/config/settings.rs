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

use crate::domain::models::crawl::Limit;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含爬取行为与下载引擎的所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 爬取配置
    pub crawl: CrawlSettings,
    /// 下载引擎配置
    pub fetch: FetchSettings,
}

/// 爬取配置设置
#[derive(Debug, Deserialize)]
pub struct CrawlSettings {
    /// 种子地址，深度为0
    pub seed_url: String,
    /// 链接过滤正则，仅作用于页面中提取的链接
    pub link_pattern: Option<String>,
    /// 最大深度（-1表示无限制）
    pub max_depth: i64,
    /// 最大抓取数量（-1表示无限制）
    pub max_urls: i64,
    /// 礼貌性检查与请求使用的User-Agent
    pub user_agent: String,
}

/// 下载引擎配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    /// 同主机请求最小间隔（毫秒）
    pub delay_ms: u64,
    /// 可重试错误的重试次数
    pub num_retries: u32,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
    /// 代理地址，原样传给HTTP客户端
    pub proxy: Option<String>,
    /// 响应缓存容量（0表示禁用）
    pub cache_size: usize,
}

impl CrawlSettings {
    /// 最大深度上限
    pub fn max_depth_limit(&self) -> Limit {
        Limit::from_sentinel(self.max_depth)
    }

    /// 最大抓取数量上限
    pub fn max_urls_limit(&self) -> Limit {
        Limit::from_sentinel(self.max_urls)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件与环境变量加载配置，支持默认值；种子地址没有
    /// 默认值，必须显式给出。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default crawl settings
            .set_default("crawl.max_depth", -1)?
            .set_default("crawl.max_urls", -1)?
            .set_default("crawl.user_agent", "linkrs")?
            // Default fetch settings
            .set_default("fetch.delay_ms", 1000)?
            .set_default("fetch.num_retries", 1)?
            .set_default("fetch.timeout_secs", 30)?
            .set_default("fetch.cache_size", 0)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("LINKRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
