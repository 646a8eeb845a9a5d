//! 统一错误类型定义
//!
//! 所有公开操作均返回 [`DocSyncResult`]，错误在抛出前由各模块记录上下文日志，
//! 不做静默降级

use thiserror::Error;

/// rat_docsync 统一错误类型
#[derive(Error, Debug)]
pub enum DocSyncError {
    /// 配置错误（缺少连接URI等），致命且不重试
    #[error("配置错误: {message}")]
    ConfigError {
        /// 错误信息
        message: String,
    },

    /// 连接错误，连接槽位会被清空以便下次调用干净重试
    #[error("连接错误: {message}")]
    ConnectionError {
        /// 错误信息
        message: String,
    },

    /// 校验错误，在任何变更发起之前抛出，输入保持原样
    #[error("数据校验失败: 字段 '{field}': {message}")]
    ValidationError {
        /// 出错字段
        field: String,
        /// 错误信息
        message: String,
    },

    /// 数据库操作错误（查询/更新/删除失败），附加上下文后原样传播
    #[error("查询执行失败: {message}")]
    QueryError {
        /// 错误信息
        message: String,
    },

    /// 写入验证失败：写后回读不存在，区别于读路径的正常空结果
    #[error("记录不存在: {message}")]
    NotFoundError {
        /// 错误信息
        message: String,
    },

    /// 序列化/反序列化错误
    #[error("序列化错误: {message}")]
    SerializationError {
        /// 错误信息
        message: String,
    },

    /// 变更流订阅错误
    #[error("变更流订阅错误: {message}")]
    SubscriptionError {
        /// 错误信息
        message: String,
    },

    /// 旁路缓存错误
    #[error("缓存错误: {message}")]
    CacheError {
        /// 错误信息
        message: String,
    },
}

/// rat_docsync 统一结果类型
pub type DocSyncResult<T> = Result<T, DocSyncError>;
