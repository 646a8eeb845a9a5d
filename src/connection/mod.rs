//! 连接管理模块
//!
//! 按连接类别惰性建立并记忆MongoDB客户端，读路径与写路径各持一个客户端
//! （对应原始驱动层与ORM层的并行连接）。连接槽位由单把异步互斥锁保护，
//! `close` 与 `connect` 经由同一把锁串行化，不存在裸的全局可空单例

use crate::config::{
    ConnectionSettings, CONNECT_TIMEOUT_SECS, MAX_IDLE_TIME_SECS, MAX_POOL_SIZE, MIN_POOL_SIZE,
};
use crate::error::{DocSyncError, DocSyncResult};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use rat_logger::{debug, info, warn};
use std::time::Duration;
use tokio::sync::Mutex;

/// 连接类别
///
/// 读路径与写路径使用相互独立的记忆化客户端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// 读路径连接
    Read,
    /// 写路径连接
    Write,
}

impl ConnectionKind {
    fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Read => "read",
            ConnectionKind::Write => "write",
        }
    }
}

#[derive(Default)]
struct ConnectionSlots {
    read: Option<Client>,
    write: Option<Client>,
}

/// 连接管理器
///
/// 进程级共享资源：同一句柄可被并发操作共享读取，`close` 影响所有
/// 在途操作，调用方不应在有未完成操作时交错执行关闭
pub struct ConnectionManager {
    settings: ConnectionSettings,
    slots: Mutex<ConnectionSlots>,
}

impl ConnectionManager {
    /// 使用给定设置创建连接管理器，不发起任何连接
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            settings,
            slots: Mutex::new(ConnectionSlots::default()),
        }
    }

    /// 从环境变量创建连接管理器
    ///
    /// 缺少连接URI时在任何网络I/O之前以配置错误快速失败
    pub fn from_env() -> DocSyncResult<Self> {
        Ok(Self::new(ConnectionSettings::from_env()?))
    }

    /// 获取指定类别的数据库句柄
    ///
    /// 同类别的重复调用返回记忆化客户端，不重新连接；连接失败时槽位
    /// 保持为空，后续调用干净重试而不会拿到损坏的句柄
    pub async fn connect(&self, kind: ConnectionKind) -> DocSyncResult<Database> {
        let mut slots = self.slots.lock().await;
        let slot = match kind {
            ConnectionKind::Read => &mut slots.read,
            ConnectionKind::Write => &mut slots.write,
        };

        if let Some(client) = slot.as_ref() {
            debug!("复用已记忆的MongoDB连接: kind={}", kind.as_str());
            return self.database_of(client);
        }

        let client = self.establish(kind).await?;
        let database = self.database_of(&client)?;
        *slot = Some(client);
        info!("MongoDB连接已建立: kind={}", kind.as_str());
        Ok(database)
    }

    /// 释放全部记忆化连接并重置状态
    ///
    /// 之后的 `connect` 会重新建立连接
    pub async fn close(&self) {
        let mut slots = self.slots.lock().await;
        if let Some(client) = slots.read.take() {
            client.shutdown().await;
            info!("读路径MongoDB连接已关闭");
        }
        if let Some(client) = slots.write.take() {
            client.shutdown().await;
            info!("写路径MongoDB连接已关闭");
        }
    }

    /// 建立一个新客户端并验证可达性
    async fn establish(&self, kind: ConnectionKind) -> DocSyncResult<Client> {
        let mut options = ClientOptions::parse(&self.settings.uri).await.map_err(|e| {
            warn!("MongoDB连接URI解析失败: kind={}, {}", kind.as_str(), e);
            DocSyncError::ConnectionError {
                message: format!("MongoDB连接URI解析失败: {}", e),
            }
        })?;
        options.max_pool_size = Some(MAX_POOL_SIZE);
        options.min_pool_size = Some(MIN_POOL_SIZE);
        options.max_idle_time = Some(Duration::from_secs(MAX_IDLE_TIME_SECS));
        options.connect_timeout = Some(Duration::from_secs(CONNECT_TIMEOUT_SECS));

        let client = Client::with_options(options).map_err(|e| DocSyncError::ConnectionError {
            message: format!("MongoDB客户端创建失败: {}", e),
        })?;

        // 驱动惰性连接，这里主动ping一次确认可达，失败时槽位保持为空
        let database = self.database_of(&client)?;
        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                warn!("MongoDB连接验证失败: kind={}, {}", kind.as_str(), e);
                DocSyncError::ConnectionError {
                    message: format!("MongoDB连接失败: {}", e),
                }
            })?;

        Ok(client)
    }

    fn database_of(&self, client: &Client) -> DocSyncResult<Database> {
        match &self.settings.database {
            Some(name) => Ok(client.database(name)),
            None => client
                .default_database()
                .ok_or_else(|| DocSyncError::ConfigError {
                    message: "连接URI未携带默认数据库，且未设置数据库名".to_string(),
                }),
        }
    }
}
