//! 删除路径
//!
//! 与写路径同样订阅先行；删除恰好移除一个匹配文档，零匹配不是错误，
//! 以结果标志报告

use crate::connection::{ConnectionKind, ConnectionManager};
use crate::error::{DocSyncError, DocSyncResult};
use crate::ops::filter::build_scope_filter;
use crate::ops::WatchOptions;
use crate::subscription::ChangeSubscription;
use crate::types::Identifier;
use mongodb::bson::Document;
use mongodb::Collection;
use rat_logger::{debug, error, info};

/// 删除路径结果
pub struct RemoveOutcome {
    /// 是否确实删除了文档
    pub removed: bool,
    /// 请求了订阅时的变更订阅句柄，由调用方负责关闭
    pub subscription: Option<ChangeSubscription>,
}

/// 删除单个文档
///
/// 过滤器由标识符构造，`extra_filter` 的键追加其上（同名键覆盖）
pub async fn remove_document(
    manager: &ConnectionManager,
    identifier: &Identifier,
    user_id: Option<&str>,
    collection: &str,
    extra_filter: Document,
    watch: Option<WatchOptions>,
) -> DocSyncResult<RemoveOutcome> {
    debug!("进入删除路径: collection={}", collection);
    let db = manager.connect(ConnectionKind::Write).await?;

    let subscription = match watch {
        Some(options) => {
            Some(ChangeSubscription::open(&db, collection, options.pipeline, false).await?)
        }
        None => None,
    };

    let coll = db.collection::<Document>(collection);
    match run_remove(&coll, identifier, user_id, collection, extra_filter).await {
        Ok(removed) => Ok(RemoveOutcome {
            removed,
            subscription,
        }),
        Err(e) => {
            if let Some(subscription) = subscription {
                subscription.close().await;
            }
            Err(e)
        }
    }
}

async fn run_remove(
    coll: &Collection<Document>,
    identifier: &Identifier,
    user_id: Option<&str>,
    collection: &str,
    extra_filter: Document,
) -> DocSyncResult<bool> {
    let mut filter = build_scope_filter(identifier, user_id)?;
    for (key, value) in extra_filter {
        filter.insert(key, value);
    }
    debug!("删除过滤器: {:?}", filter);

    let result = coll.delete_one(filter, None).await.map_err(|e| {
        error!("删除失败: collection={}, {}", collection, e);
        DocSyncError::QueryError {
            message: format!("MongoDB删除失败: {}", e),
        }
    })?;

    let removed = result.deleted_count > 0;
    if removed {
        info!("文档已删除: collection={}", collection);
    } else {
        debug!("没有匹配的文档可删除: collection={}", collection);
    }
    Ok(removed)
}
