// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use thiserror::Error;
use url::Url;

/// 队列错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrontierError {
    #[error("队列已空")]
    Empty,
}

/// 待抓取队列与已见地址注册表
///
/// 队列为后进先出：最近发现的地址最先被抓取（深度优先遍历顺序）。
/// 地址一经注册便在整个运行期间保留，首次发现的深度胜出；注册表
/// 同时保证同一地址至多入队一次。
#[derive(Debug, Default)]
pub struct Frontier {
    /// 待抓取地址栈，元素为地址及其首次发现深度
    pending: Vec<(Url, u32)>,
    /// 已见地址及其首次发现深度
    seen: HashMap<Url, u32>,
}

impl Frontier {
    /// 创建空的队列
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册并入队一个地址
    ///
    /// 地址已注册时不做任何事，即使给定深度与记录不同。
    ///
    /// # 返回值
    ///
    /// 地址是否为首次注册
    pub fn push(&mut self, address: Url, depth: u32) -> bool {
        if self.seen.contains_key(&address) {
            return false;
        }
        self.seen.insert(address.clone(), depth);
        self.pending.push((address, depth));
        true
    }

    /// 仅注册地址而不入队
    ///
    /// 用于站外地址：记录以防重复发现，但永不抓取。
    ///
    /// # 返回值
    ///
    /// 地址是否为首次注册
    pub fn mark_seen(&mut self, address: Url, depth: u32) -> bool {
        if self.seen.contains_key(&address) {
            return false;
        }
        self.seen.insert(address, depth);
        true
    }

    /// 弹出最近入队的地址及其记录深度
    pub fn pop(&mut self) -> Result<(Url, u32), FrontierError> {
        self.pending.pop().ok_or(FrontierError::Empty)
    }

    /// 地址是否已注册
    pub fn contains(&self, address: &Url) -> bool {
        self.seen.contains_key(address)
    }

    /// 查询地址的首次发现深度
    pub fn depth_of(&self, address: &Url) -> Option<u32> {
        self.seen.get(address).copied()
    }

    /// 队列是否为空
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// 待抓取地址数量
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// 已注册地址数量
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// 消耗队列并返回完整的注册表
    pub fn into_seen(self) -> HashMap<Url, u32> {
        self.seen
    }
}
