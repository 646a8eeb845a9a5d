//! rat_docsync - MongoDB文档访问层
//!
//! 提供带新鲜度校验的读穿透缓存协调、按作用域标识符参数化的文档读写删、
//! 记账字段的单调推进以及集合级变更订阅
//! 通过记忆化连接管理与带界限的连接池实现可预测的资源占用

// 导出所有公共模块
pub mod bookkeeping;
pub mod config;
pub mod connection;
pub mod error;
pub mod ops;
pub mod subscription;
pub mod types;

// 重新导出常用类型和函数
pub use error::{DocSyncError, DocSyncResult};
pub use types::*;
pub use config::{
    ConnectionSettings, CONNECT_TIMEOUT_SECS, MAX_IDLE_TIME_SECS, MAX_POOL_SIZE, MIN_POOL_SIZE,
};
pub use connection::{ConnectionKind, ConnectionManager};
pub use bookkeeping::{
    counter_key, parse_date, parse_hit_count, CounterKind, KeyValueStore, MemCacheKvStore,
    MemoryKvStore,
};
pub use subscription::{ChangeEvent, ChangeSubscription};
pub use ops::{
    fetch_documents, fetch_documents_with_stream, is_snapshot_stale, remove_document,
    upsert_document, CacheSnapshot, FetchData, FetchOptions, FetchResult, FetchWithStreamResult,
    RemoveOutcome, UpdateOutcome, WatchOptions,
};

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_docsync库
///
/// 注意：日志系统由调用者自行初始化，本库不再自动初始化日志
pub fn init() {
    // 库的基本初始化逻辑
    // 日志系统由调用者负责初始化
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
