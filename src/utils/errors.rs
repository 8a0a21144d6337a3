// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 爬取配置错误类型
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("无效的种子地址: {0}")]
    InvalidSeed(String),

    #[error("无效的链接过滤正则: {0}")]
    InvalidPattern(String),
}
