//! 变更流订阅模块
//!
//! 打开并持有集合级变更订阅，产出惰性的变更事件序列。句柄独占服务端
//! 游标，无论外围操作成功与否都必须恰好关闭一次；未显式关闭直接丢弃
//! 会记录告警

use crate::error::{DocSyncError, DocSyncResult};
use futures::StreamExt;
use mongodb::bson::Document;
use mongodb::change_stream::event::ChangeStreamEvent;
use mongodb::change_stream::ChangeStream;
use mongodb::options::{ChangeStreamOptions, FullDocumentType};
use mongodb::Database;
use rat_logger::{debug, error, info, warn};

/// 变更事件类型别名
pub type ChangeEvent = ChangeStreamEvent<Document>;

/// 集合变更订阅句柄
///
/// 事件序列不可重启、不自行终止，关闭订阅即取消
pub struct ChangeSubscription {
    collection: String,
    stream: ChangeStream<ChangeEvent>,
    closed: bool,
}

impl ChangeSubscription {
    /// 在集合上打开变更订阅
    ///
    /// * `pipeline` - 变更流过滤管道，空管道表示订阅全部变更
    /// * `update_lookup` - 是否在更新事件中携带完整文档
    pub async fn open(
        db: &Database,
        collection: &str,
        pipeline: Vec<Document>,
        update_lookup: bool,
    ) -> DocSyncResult<Self> {
        let options = if update_lookup {
            Some(
                ChangeStreamOptions::builder()
                    .full_document(Some(FullDocumentType::UpdateLookup))
                    .build(),
            )
        } else {
            None
        };

        let stream = db
            .collection::<Document>(collection)
            .watch(pipeline, options)
            .await
            .map_err(|e| {
                error!("变更流打开失败: collection={}, {}", collection, e);
                DocSyncError::SubscriptionError {
                    message: format!("变更流打开失败: {}", e),
                }
            })?;

        info!("变更流已打开: collection={}", collection);
        Ok(Self {
            collection: collection.to_string(),
            stream,
            closed: false,
        })
    }

    /// 订阅所在集合名
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// 等待下一个变更事件
    ///
    /// 每个事件在产出前记录日志；流错误只记录、不向外传播，之后序列
    /// 视为结束。返回 `None` 表示序列结束
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        match self.stream.next().await {
            Some(Ok(event)) => {
                debug!(
                    "检测到变更: collection={}, operation={:?}",
                    self.collection, event.operation_type
                );
                Some(event)
            }
            Some(Err(e)) => {
                error!("变更流错误: collection={}, {}", self.collection, e);
                None
            }
            None => {
                debug!("变更流结束: collection={}", self.collection);
                None
            }
        }
    }

    /// 关闭订阅并释放服务端游标
    ///
    /// 消费自身，保证恰好关闭一次
    pub async fn close(mut self) {
        self.closed = true;
        info!("变更流已关闭: collection={}", self.collection);
        // 服务端游标随流的释放一并关闭
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if !self.closed {
            warn!("变更流未显式关闭即被丢弃: collection={}", self.collection);
        }
    }
}
