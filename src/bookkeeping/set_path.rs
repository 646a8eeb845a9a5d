//! 写路径记账
//!
//! 写命中计数与最近更新时间，与读路径对称

use super::{counter_key, parse_date, parse_hit_count, CounterKind, KeyValueStore};
use crate::error::DocSyncResult;
use chrono::{DateTime, SecondsFormat, Utc};
use rat_logger::debug;

/// 读取记录的写命中计数
pub async fn get_set_hit_count(
    store: &dyn KeyValueStore,
    record_id: &str,
    store_name: &str,
) -> DocSyncResult<i64> {
    let key = counter_key(record_id, store_name, CounterKind::SetHitCount);
    Ok(parse_hit_count(store.get(&key).await?))
}

/// 自增记录的写命中计数，返回新值
///
/// 与读路径一样非原子；跨调用不去重，同一标识符连续两次更新会各计一次
pub async fn increment_set_hit_count(
    store: &dyn KeyValueStore,
    record_id: &str,
    store_name: &str,
) -> DocSyncResult<i64> {
    let key = counter_key(record_id, store_name, CounterKind::SetHitCount);
    let current = parse_hit_count(store.get(&key).await?);
    let next = current + 1;
    store.set(&key, next.to_string()).await?;
    debug!(
        "自增写命中计数: record_id={}, store_name={}, {} -> {}",
        record_id, store_name, current, next
    );
    Ok(next)
}

/// 读取记录的最近更新时间，缺失时为Unix纪元
pub async fn get_last_updated_date(
    store: &dyn KeyValueStore,
    record_id: &str,
    store_name: &str,
) -> DocSyncResult<DateTime<Utc>> {
    let key = counter_key(record_id, store_name, CounterKind::LastUpdated);
    Ok(parse_date(store.get(&key).await?))
}

/// 写入记录的最近更新时间
pub async fn touch_last_updated(
    store: &dyn KeyValueStore,
    record_id: &str,
    store_name: &str,
    date: DateTime<Utc>,
) -> DocSyncResult<()> {
    let key = counter_key(record_id, store_name, CounterKind::LastUpdated);
    store
        .set(&key, date.to_rfc3339_opts(SecondsFormat::Millis, true))
        .await?;
    debug!(
        "写入最近更新时间: record_id={}, store_name={}, date={}",
        record_id,
        store_name,
        date.to_rfc3339()
    );
    Ok(())
}
