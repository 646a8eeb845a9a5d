//! 记账模块
//!
//! 基于注入的键值抽象做纯粹的键派生与计数/时间算术，与主存储完全解耦，
//! 计数器因此可以存放在旁路缓存中。读路径与写路径各有一组对称实现。
//!
//! 计数自增在键值层不是原子的：读-加一-写回，并发自增同一个键可能少计。
//! 这是已知限制，需要原子性的调用方应自行串行化同键的并发自增

pub mod get_path;
pub mod memcache;
pub mod set_path;

use crate::error::DocSyncResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rat_logger::debug;
use std::collections::HashMap;
use tokio::sync::RwLock;

pub use memcache::MemCacheKvStore;

/// 记账计数器/时间戳的键值存储抽象
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 读取键对应的值
    async fn get(&self, key: &str) -> DocSyncResult<Option<String>>;
    /// 写入键值
    async fn set(&self, key: &str, value: String) -> DocSyncResult<()>;
}

/// 记账条目类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    /// 读命中计数
    GetHitCount,
    /// 写命中计数
    SetHitCount,
    /// 最近访问时间
    LastAccessed,
    /// 最近更新时间
    LastUpdated,
}

impl CounterKind {
    /// 键后缀
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterKind::GetHitCount => "getHitCount",
            CounterKind::SetHitCount => "setHitCount",
            CounterKind::LastAccessed => "lastAccessed",
            CounterKind::LastUpdated => "lastUpdated",
        }
    }
}

/// 生成记账键，格式为 `{record_id}:{store_name}:{counter_kind}`
pub fn counter_key(record_id: &str, store_name: &str, kind: CounterKind) -> String {
    let key = format!("{}:{}:{}", record_id, store_name, kind.as_str());
    debug!("生成记账键: {}", key);
    key
}

/// 解析计数值，缺失或无法解析时取0
pub fn parse_hit_count(raw: Option<String>) -> i64 {
    let count = raw
        .as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0);
    debug!("解析计数值: raw={:?}, count={}", raw, count);
    count
}

/// 解析时间值，缺失或无法解析时取Unix纪元
pub fn parse_date(raw: Option<String>) -> DateTime<Utc> {
    let date = raw
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH);
    debug!("解析时间值: raw={:?}, date={}", raw, date.to_rfc3339());
    date
}

/// 进程内存键值存储
///
/// 默认的旁路计数器实现，也用于测试
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// 创建空的内存键值存储
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> DocSyncResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> DocSyncResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
