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

use crate::config::settings::FetchSettings;
use crate::engines::traits::{FetchEngine, FetchError};
use crate::utils::retry_policy::RetryPolicy;
use async_trait::async_trait;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;
use url::Url;

/// 同主机请求节流器
///
/// 记录每个主机最近一次请求时间，保证对同一主机的两次请求之间
/// 至少间隔配置的延迟。
struct Throttle {
    delay: Duration,
    last_access: Mutex<HashMap<String, Instant>>,
}

impl Throttle {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_access: Mutex::new(HashMap::new()),
        }
    }

    /// 计算对该主机还需等待的时间并预约本次访问
    fn reserve(&self, host: &str) -> Duration {
        if self.delay.is_zero() {
            return Duration::ZERO;
        }

        let mut last_access = self.last_access.lock().unwrap();
        let now = Instant::now();
        let wait = match last_access.get(host) {
            Some(previous) => self.delay.saturating_sub(now.duration_since(*previous)),
            None => Duration::ZERO,
        };
        // 记录的是本次请求实际发出的时刻
        last_access.insert(host.to_string(), now + wait);
        wait
    }
}

/// 默认下载引擎
///
/// 基于reqwest实现：同主机节流、服务端错误重试与可选的LRU响应
/// 缓存。对应一次爬取运行中的全部网络访问。
pub struct DownloadEngine {
    /// HTTP客户端
    client: reqwest::Client,
    /// 同主机节流器
    throttle: Throttle,
    /// 重试策略
    retry_policy: RetryPolicy,
    /// 响应缓存，仅缓存成功响应
    cache: Option<Mutex<LruCache<String, String>>>,
}

impl DownloadEngine {
    /// 根据配置构建下载引擎
    ///
    /// # 参数
    ///
    /// * `settings` - 下载引擎配置
    /// * `user_agent` - 请求使用的User-Agent
    ///
    /// # 返回值
    ///
    /// * `Ok(DownloadEngine)` - 构建好的引擎
    /// * `Err(FetchError)` - 客户端或代理配置无效
    pub fn from_settings(settings: &FetchSettings, user_agent: &str) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs));

        if let Some(proxy_url) = &settings.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let cache = NonZeroUsize::new(settings.cache_size)
            .map(|capacity| Mutex::new(LruCache::new(capacity)));

        Ok(Self {
            client: builder.build()?,
            throttle: Throttle::new(Duration::from_millis(settings.delay_ms)),
            retry_policy: RetryPolicy {
                max_retries: settings.num_retries,
                ..RetryPolicy::fast()
            },
            cache,
        })
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl FetchEngine for DownloadEngine {
    /// 抓取单个页面
    ///
    /// 命中缓存时不产生网络访问也不消耗节流配额；未命中时先等待
    /// 同主机延迟，再按重试策略抓取。
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let key = url.as_str().to_string();

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.lock().unwrap().get(&key) {
                return Ok(body.clone());
            }
        }

        let host = url.host_str().unwrap_or_default().to_string();
        let wait = self.throttle.reserve(&host);
        if !wait.is_zero() {
            sleep(wait).await;
        }

        let mut attempt = 0;
        let result = loop {
            match self.fetch_once(url).await {
                Ok(body) => break Ok(body),
                Err(err) if err.is_retryable() && self.retry_policy.should_retry(attempt) => {
                    attempt += 1;
                    let backoff = self.retry_policy.calculate_backoff(attempt);
                    debug!("Retrying {} in {:?}: {}", url, backoff, err);
                    sleep(backoff).await;
                }
                Err(err) => break Err(err),
            }
        };

        if let (Ok(body), Some(cache)) = (&result, &self.cache) {
            cache.lock().unwrap().put(key, body.clone());
        }

        result
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "download_engine_test.rs"]
mod tests;
