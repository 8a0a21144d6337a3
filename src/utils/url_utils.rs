// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;
use url::Url;

/// 链接规范化错误
///
/// 原始链接无法针对基准地址解析为绝对地址
#[derive(Error, Debug)]
#[error("无法解析链接: {0}")]
pub struct InvalidLink(pub String);

/// 将原始链接针对基准地址解析为无片段的绝对地址
///
/// 处理相对路径、绝对路径、协议相对与已绝对的链接；片段部分
/// 一律去除以避免同页重复。无法解析时返回错误而不做猜测。
///
/// # 参数
///
/// * `base` - 基准地址（通常为当前页面）
/// * `raw_link` - 标记文本中出现的原始链接字符串
///
/// # 返回值
///
/// * `Ok(Url)` - 规范化后的绝对地址
/// * `Err(InvalidLink)` - 链接无法解析
pub fn normalize(base: &Url, raw_link: &str) -> Result<Url, InvalidLink> {
    let mut address = base
        .join(raw_link)
        .map_err(|_| InvalidLink(raw_link.to_string()))?;
    address.set_fragment(None);
    Ok(address)
}

/// 判断两个地址是否属于同一站点
///
/// 主机与端口一致即视为同站，协议不参与比较。
pub fn same_domain(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}
