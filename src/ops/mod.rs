//! 参数化文档操作模块
//!
//! 读、写、删三条操作路径，均以作用域标识符限定查询边界。写与删可选地
//! 在操作前打开变更订阅，订阅句柄在成功时移交调用方

pub mod filter;
pub mod get;
pub mod remove;
pub mod update;

use mongodb::bson::Document;

/// 变更订阅选项
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// 变更流过滤管道，空管道订阅集合全部变更
    pub pipeline: Vec<Document>,
}

pub use filter::{build_scope_filter, parse_object_id};
pub use get::{
    fetch_documents, fetch_documents_with_stream, is_snapshot_stale, CacheSnapshot, FetchData,
    FetchOptions, FetchResult, FetchWithStreamResult,
};
pub use remove::{remove_document, RemoveOutcome};
pub use update::{upsert_document, UpdateOutcome, ValidateFn};
