#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rat_docsync::bookkeeping::{
        counter_key, get_path, parse_date, parse_hit_count, set_path, CounterKind, KeyValueStore,
        MemoryKvStore,
    };

    /// 记账键格式测试
    #[test]
    fn test_counter_key_format() {
        println!("🔍 测试记账键格式");

        let key = counter_key("507f1f77bcf86cd799439011", "orders", CounterKind::GetHitCount);
        assert_eq!(key, "507f1f77bcf86cd799439011:orders:getHitCount");

        let key = counter_key("507f1f77bcf86cd799439011", "orders", CounterKind::SetHitCount);
        assert_eq!(key, "507f1f77bcf86cd799439011:orders:setHitCount");

        let key = counter_key("abc", "users", CounterKind::LastAccessed);
        assert_eq!(key, "abc:users:lastAccessed");

        let key = counter_key("abc", "users", CounterKind::LastUpdated);
        assert_eq!(key, "abc:users:lastUpdated");

        println!("✅ 记账键格式测试完成");
    }

    /// 计数值解析测试：缺失与无法解析都取0
    #[test]
    fn test_parse_hit_count_defaults() {
        println!("🔍 测试计数值解析");

        assert_eq!(parse_hit_count(None), 0);
        assert_eq!(parse_hit_count(Some("42".to_string())), 42);
        assert_eq!(parse_hit_count(Some("-3".to_string())), -3);
        assert_eq!(parse_hit_count(Some("不是数字".to_string())), 0);
        assert_eq!(parse_hit_count(Some("".to_string())), 0);

        println!("✅ 计数值解析测试完成");
    }

    /// 时间值解析测试：缺失与无法解析都取Unix纪元
    #[test]
    fn test_parse_date_defaults() {
        println!("🔍 测试时间值解析");

        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(parse_date(None), epoch);
        assert_eq!(parse_date(Some("垃圾数据".to_string())), epoch);

        let parsed = parse_date(Some("2026-08-30T12:00:00.000Z".to_string()));
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap());

        println!("✅ 时间值解析测试完成");
    }

    /// 读命中计数自增测试：首次从0起步，逐次加一
    #[tokio::test]
    async fn test_increment_get_hit_count() {
        println!("🔍 测试读命中计数自增");

        let store = MemoryKvStore::new();
        let record_id = "507f1f77bcf86cd799439011";

        let initial = get_path::get_hit_count(&store, record_id, "orders")
            .await
            .unwrap();
        assert_eq!(initial, 0);

        let first = get_path::increment_get_hit_count(&store, record_id, "orders")
            .await
            .unwrap();
        assert_eq!(first, 1);

        let second = get_path::increment_get_hit_count(&store, record_id, "orders")
            .await
            .unwrap();
        assert_eq!(second, 2);

        // 不同集合的同一记录互不影响
        let other = get_path::get_hit_count(&store, record_id, "users")
            .await
            .unwrap();
        assert_eq!(other, 0);

        println!("✅ 读命中计数自增测试完成");
    }

    /// 写命中计数非幂等性测试：连续两次自增净增2
    #[tokio::test]
    async fn test_set_hit_count_not_idempotent() {
        println!("🔍 测试写命中计数非幂等性");

        let store = MemoryKvStore::new();
        let record_id = "507f1f77bcf86cd799439011";

        let before = set_path::get_set_hit_count(&store, record_id, "orders")
            .await
            .unwrap();

        set_path::increment_set_hit_count(&store, record_id, "orders")
            .await
            .unwrap();
        set_path::increment_set_hit_count(&store, record_id, "orders")
            .await
            .unwrap();

        let after = set_path::get_set_hit_count(&store, record_id, "orders")
            .await
            .unwrap();
        assert_eq!(after, before + 2);

        println!("✅ 写命中计数非幂等性测试完成");
    }

    /// 时间戳写入与回读测试
    #[tokio::test]
    async fn test_touch_and_read_dates() {
        println!("🔍 测试时间戳写入与回读");

        let store = MemoryKvStore::new();
        let record_id = "507f1f77bcf86cd799439011";
        let stamp = Utc.with_ymd_and_hms(2026, 8, 30, 8, 30, 0).unwrap();

        // 未写入时为Unix纪元
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        let missing = get_path::get_last_accessed_date(&store, record_id, "orders")
            .await
            .unwrap();
        assert_eq!(missing, epoch);

        get_path::touch_last_accessed(&store, record_id, "orders", stamp)
            .await
            .unwrap();
        let accessed = get_path::get_last_accessed_date(&store, record_id, "orders")
            .await
            .unwrap();
        assert_eq!(accessed, stamp);

        set_path::touch_last_updated(&store, record_id, "orders", stamp)
            .await
            .unwrap();
        let updated = set_path::get_last_updated_date(&store, record_id, "orders")
            .await
            .unwrap();
        assert_eq!(updated, stamp);

        println!("✅ 时间戳写入与回读测试完成");
    }

    /// 内存键值存储基础行为测试
    #[tokio::test]
    async fn test_memory_kv_store() {
        println!("🔍 测试内存键值存储");

        let store = MemoryKvStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("k1", "v1".to_string()).await.unwrap();
        assert_eq!(store.get("k1").await.unwrap(), Some("v1".to_string()));

        // 覆盖写
        store.set("k1", "v2".to_string()).await.unwrap();
        assert_eq!(store.get("k1").await.unwrap(), Some("v2".to_string()));

        println!("✅ 内存键值存储测试完成");
    }
}
