//! 连接配置
//!
//! 连接URI在进程启动时从环境变量读取一次；连接池参数为固定常量，
//! 调用方不能按调用覆盖

use crate::error::{DocSyncError, DocSyncResult};
use rat_logger::debug;

/// 连接池最大连接数
pub const MAX_POOL_SIZE: u32 = 10;
/// 连接池最小连接数
pub const MIN_POOL_SIZE: u32 = 5;
/// 空闲连接最长保留时间（秒）
pub const MAX_IDLE_TIME_SECS: u64 = 30;
/// 连接建立超时（秒）
pub const CONNECT_TIMEOUT_SECS: u64 = 5;

/// MongoDB URI 环境变量名
pub const ENV_MONGODB_URI: &str = "MONGODB_URI";
/// 默认数据库名环境变量名
pub const ENV_MONGODB_DATABASE: &str = "MONGODB_DATABASE";

/// MongoDB 连接设置
///
/// 数据库名可省略，此时使用URI路径中的默认数据库
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// 连接URI
    pub uri: String,
    /// 数据库名（None 时取URI中的默认数据库）
    pub database: Option<String>,
}

impl ConnectionSettings {
    /// 从显式参数构造连接设置
    ///
    /// URI为空时立即返回配置错误，不发起任何网络I/O
    pub fn from_parts(uri: impl Into<String>, database: Option<String>) -> DocSyncResult<Self> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(DocSyncError::ConfigError {
                message: "MongoDB连接URI不能为空".to_string(),
            });
        }
        Ok(Self { uri, database })
    }

    /// 从环境变量读取连接设置
    ///
    /// 缺少 `MONGODB_URI` 时快速失败
    pub fn from_env() -> DocSyncResult<Self> {
        let uri = std::env::var(ENV_MONGODB_URI).map_err(|_| DocSyncError::ConfigError {
            message: format!("请定义 {} 环境变量", ENV_MONGODB_URI),
        })?;
        let database = std::env::var(ENV_MONGODB_DATABASE).ok();
        debug!("已从环境变量加载连接设置: database={:?}", database);
        Self::from_parts(uri, database)
    }
}
