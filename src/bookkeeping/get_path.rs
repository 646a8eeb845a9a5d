//! 读路径记账
//!
//! 读命中计数与最近访问时间，作用于注入的键值存储

use super::{counter_key, parse_date, parse_hit_count, CounterKind, KeyValueStore};
use crate::error::DocSyncResult;
use chrono::{DateTime, SecondsFormat, Utc};
use rat_logger::debug;

/// 读取记录的读命中计数
pub async fn get_hit_count(
    store: &dyn KeyValueStore,
    record_id: &str,
    store_name: &str,
) -> DocSyncResult<i64> {
    let key = counter_key(record_id, store_name, CounterKind::GetHitCount);
    let count = parse_hit_count(store.get(&key).await?);
    debug!(
        "读取读命中计数: record_id={}, store_name={}, count={}",
        record_id, store_name, count
    );
    Ok(count)
}

/// 自增记录的读命中计数，返回新值
///
/// 读-加一-写回，同键并发自增可能少计（见模块说明）
pub async fn increment_get_hit_count(
    store: &dyn KeyValueStore,
    record_id: &str,
    store_name: &str,
) -> DocSyncResult<i64> {
    let key = counter_key(record_id, store_name, CounterKind::GetHitCount);
    let current = parse_hit_count(store.get(&key).await?);
    let next = current + 1;
    store.set(&key, next.to_string()).await?;
    debug!(
        "自增读命中计数: record_id={}, store_name={}, {} -> {}",
        record_id, store_name, current, next
    );
    Ok(next)
}

/// 读取记录的最近访问时间，缺失时为Unix纪元
pub async fn get_last_accessed_date(
    store: &dyn KeyValueStore,
    record_id: &str,
    store_name: &str,
) -> DocSyncResult<DateTime<Utc>> {
    let key = counter_key(record_id, store_name, CounterKind::LastAccessed);
    Ok(parse_date(store.get(&key).await?))
}

/// 写入记录的最近访问时间
pub async fn touch_last_accessed(
    store: &dyn KeyValueStore,
    record_id: &str,
    store_name: &str,
    date: DateTime<Utc>,
) -> DocSyncResult<()> {
    let key = counter_key(record_id, store_name, CounterKind::LastAccessed);
    store
        .set(&key, date.to_rfc3339_opts(SecondsFormat::Millis, true))
        .await?;
    debug!(
        "写入最近访问时间: record_id={}, store_name={}, date={}",
        record_id,
        store_name,
        date.to_rfc3339()
    );
    Ok(())
}
