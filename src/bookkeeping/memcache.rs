//! 基于 rat_memcache 的旁路键值存储
//!
//! 为记账计数器提供带TTL与LRU淘汰的进程内缓存实现，配置为纯L1（内存）模式

use super::KeyValueStore;
use crate::error::{DocSyncError, DocSyncResult};
use async_trait::async_trait;
use bytes::Bytes;
use rat_logger::{debug, info, warn};
use rat_memcache::config::CacheWarmupStrategy;
use rat_memcache::types::EvictionStrategy;
use rat_memcache::{CacheOptions, RatMemCache, RatMemCacheBuilder};
use std::sync::Arc;

/// 旁路缓存键值存储
#[derive(Clone)]
pub struct MemCacheKvStore {
    cache: Arc<RatMemCache>,
    ttl_secs: u64,
}

impl MemCacheKvStore {
    /// 创建旁路缓存存储
    ///
    /// * `max_entries` - L1缓存最大条目数
    /// * `max_memory_mb` - L1缓存内存上限（MB）
    /// * `ttl_secs` - 条目默认存活时间（秒）
    pub async fn new(max_entries: usize, max_memory_mb: usize, ttl_secs: u64) -> DocSyncResult<Self> {
        let builder = RatMemCacheBuilder::new()
            .l1_config(rat_memcache::config::L1Config {
                max_memory: max_memory_mb * 1024 * 1024,
                max_entries,
                eviction_strategy: EvictionStrategy::Lru,
            })
            .l2_config(rat_memcache::config::L2Config {
                enable_l2_cache: false,
                data_dir: None,
                max_disk_size: 500 * 1024 * 1024,
                write_buffer_size: 64 * 1024 * 1024,
                max_write_buffer_number: 3,
                block_cache_size: 16 * 1024 * 1024,
                enable_lz4: false,
                compression_threshold: 1024,
                compression_max_threshold: 10240,
                compression_level: 6,
                background_threads: 2,
                clear_on_startup: false,
                cache_size_mb: 500,
                max_file_size_mb: 250,
                smart_flush_enabled: true,
                smart_flush_base_interval_ms: 100,
                smart_flush_min_interval_ms: 20,
                smart_flush_max_interval_ms: 500,
                smart_flush_write_rate_threshold: 10000,
                smart_flush_accumulated_bytes_threshold: 4 * 1024 * 1024,
                cache_warmup_strategy: CacheWarmupStrategy::Recent,
                zstd_compression_level: None,
                l2_write_strategy: "write_through".to_string(),
                l2_write_threshold: 1024,
                l2_write_ttl_threshold: 3600,
            })
            .ttl_config(rat_memcache::config::TtlConfig {
                expire_seconds: Some(ttl_secs),
                cleanup_interval: 300,
                max_cleanup_entries: 1000,
                lazy_expiration: true,
                active_expiration: true,
            })
            .performance_config(rat_memcache::config::PerformanceConfig {
                worker_threads: 4,
                enable_concurrency: true,
                read_write_separation: true,
                batch_size: 1000,
                enable_warmup: true,
                large_value_threshold: 10240,
            })
            .logging_config(rat_memcache::config::LoggingConfig {
                level: "INFO".to_string(),
                enable_colors: true,
                show_timestamp: true,
                enable_performance_logs: true,
                enable_audit_logs: true,
                enable_cache_logs: true,
                enable_logging: true,
                enable_async: false,
                batch_size: 2048,
                batch_interval_ms: 25,
                buffer_size: 16384,
            });

        let cache = builder.build().await.map_err(|e| DocSyncError::CacheError {
            message: format!("旁路缓存创建失败: {}", e),
        })?;

        info!(
            "旁路缓存初始化成功 - 容量: {}, 内存: {}MB, TTL: {}s",
            max_entries, max_memory_mb, ttl_secs
        );

        Ok(Self {
            cache: Arc::new(cache),
            ttl_secs,
        })
    }
}

#[async_trait]
impl KeyValueStore for MemCacheKvStore {
    async fn get(&self, key: &str) -> DocSyncResult<Option<String>> {
        match self.cache.get(key).await {
            Ok(Some(data)) => {
                let value =
                    String::from_utf8(data.to_vec()).map_err(|e| DocSyncError::CacheError {
                        message: format!("旁路缓存值不是合法UTF-8: {}", e),
                    })?;
                debug!("旁路缓存命中: key={}", key);
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("旁路缓存未命中: key={}", key);
                Ok(None)
            }
            Err(e) => {
                // 读取失败按未命中处理，计数会从0重新累积
                warn!("旁路缓存读取失败: key={}, {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> DocSyncResult<()> {
        let options = CacheOptions {
            ttl_seconds: Some(self.ttl_secs),
            ..Default::default()
        };
        self.cache
            .set_with_options(key.to_string(), Bytes::from(value), &options)
            .await
            .map_err(|e| DocSyncError::CacheError {
                message: format!("旁路缓存写入失败: {}", e),
            })?;
        Ok(())
    }
}
