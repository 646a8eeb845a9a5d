#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rat_docsync::ops::{is_snapshot_stale, FetchOptions};

    /// 新鲜度判定矩阵测试
    #[test]
    fn test_staleness_matrix() {
        println!("🔍 测试新鲜度判定矩阵");

        let base = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();

        // 存储侧无匹配文档：缓存视为新鲜
        assert!(!is_snapshot_stale(None, Some(base)));
        assert!(!is_snapshot_stale(None, None));

        // 缓存条目提取不出新鲜度：视为陈旧
        assert!(is_snapshot_stale(Some(base), None));

        // 存储侧严格更新：陈旧
        assert!(is_snapshot_stale(
            Some(base + Duration::seconds(1)),
            Some(base)
        ));

        // 相等：新鲜（非严格大于）
        assert!(!is_snapshot_stale(Some(base), Some(base)));

        // 缓存更新：新鲜
        assert!(!is_snapshot_stale(
            Some(base),
            Some(base + Duration::seconds(1))
        ));

        println!("✅ 新鲜度判定矩阵测试完成");
    }

    /// 毫秒级边界测试：仅严格更大才判陈旧
    #[test]
    fn test_staleness_millisecond_boundary() {
        println!("🔍 测试毫秒级边界");

        let base = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let plus_ms = base + Duration::milliseconds(1);

        assert!(is_snapshot_stale(Some(plus_ms), Some(base)));
        assert!(!is_snapshot_stale(Some(base), Some(plus_ms)));

        println!("✅ 毫秒级边界测试完成");
    }

    /// 默认读取选项：无ID、空过滤器、无缓存、无旁路存储
    #[test]
    fn test_fetch_options_default() {
        println!("🔍 测试默认读取选项");

        let options = FetchOptions::default();
        assert!(options.item_id.is_none());
        assert!(options.filter.is_empty());
        assert!(options.cache.is_none());
        assert!(options.side_store.is_none());

        println!("✅ 默认读取选项测试完成");
    }
}
