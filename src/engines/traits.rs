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

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// 下载错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("HTTP status {0}")]
    Status(u16),
}

impl FetchError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request(e) => e.is_timeout() || e.is_connect(),
            // 服务端错误可重试，客户端错误不可
            FetchError::Status(code) => *code >= 500,
        }
    }
}

/// 下载引擎特质
///
/// 核心循环通过该契约进行所有网络访问，一次调用对应一个URL；
/// 重试、节流、代理与缓存都属于实现方的职责。
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// 抓取单个页面并返回其文本内容
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
