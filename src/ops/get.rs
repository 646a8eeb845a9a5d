//! 读路径
//!
//! 解析过滤器、可选地对照存储侧最新 `updatedAt` 判定缓存新鲜度、
//! 取单个或多个文档、触发批量记账、序列化并返回 `{data, is_stale}`。
//! 订阅变体在计算结果之后再打开变更流，句柄的关闭责任移交调用方。
//!
//! 记账统一采用"取数后自增、返回自增前快照"的策略，读与订阅两个变体
//! 行为一致；读路径不验证自增后的状态（与写路径的写后验证相对）

use crate::bookkeeping::{get_path, KeyValueStore};
use crate::connection::{ConnectionKind, ConnectionManager};
use crate::error::{DocSyncError, DocSyncResult};
use crate::ops::filter::{build_scope_filter, parse_object_id};
use crate::subscription::ChangeSubscription;
use crate::types::{serialize_document, Identifier, SerializedDocument};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOneOptions;
use mongodb::Collection;
use rat_logger::{debug, error, info};

/// 调用方提供的缓存快照与新鲜度提取函数
///
/// 快照从不被修改，新鲜度判定后即弃用
pub struct CacheSnapshot<'a> {
    /// 此前取得的结果
    pub items: &'a [SerializedDocument],
    /// 从缓存条目提取新鲜度时间
    pub freshness: &'a dyn Fn(&SerializedDocument) -> Option<DateTime<Utc>>,
}

/// 读路径选项
#[derive(Default)]
pub struct FetchOptions<'a> {
    /// 单条模式的记录ID
    pub item_id: Option<String>,
    /// 调用方附加过滤器
    pub filter: Document,
    /// 缓存快照
    pub cache: Option<CacheSnapshot<'a>>,
    /// 旁路记账存储
    pub side_store: Option<&'a dyn KeyValueStore>,
}

/// 读路径返回的数据
#[derive(Debug, Clone, PartialEq)]
pub enum FetchData {
    /// 单条模式：命中的条目或 `None`
    One(Option<SerializedDocument>),
    /// 列表模式：匹配的条目集（可能为空）
    Many(Vec<SerializedDocument>),
}

/// 读路径结果
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    /// 返回数据
    pub data: FetchData,
    /// 缓存是否已陈旧；未提供缓存快照时恒为 `true`
    pub is_stale: bool,
}

/// 订阅变体的结果
pub struct FetchWithStreamResult {
    /// 读取结果
    pub result: FetchResult,
    /// 变更订阅句柄，由调用方负责关闭
    pub subscription: ChangeSubscription,
}

/// 新鲜度判定
///
/// 存储侧没有任何匹配文档时视为新鲜（没有权威数据能推翻缓存）；
/// 缓存条目提取不出新鲜度时视为陈旧；否则仅当存储侧时间严格更新时陈旧
pub fn is_snapshot_stale(
    latest_updated_at: Option<DateTime<Utc>>,
    cached_updated_at: Option<DateTime<Utc>>,
) -> bool {
    match (latest_updated_at, cached_updated_at) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(latest), Some(cached)) => latest > cached,
    }
}

/// 读取文档
///
/// 提供缓存快照且判定为新鲜时短路返回缓存内容本身，不做任何记账写入
pub async fn fetch_documents(
    manager: &ConnectionManager,
    identifier: &Identifier,
    user_id: Option<&str>,
    collection: &str,
    options: FetchOptions<'_>,
) -> DocSyncResult<FetchResult> {
    debug!(
        "进入读路径: collection={}, item_id={:?}",
        collection, options.item_id
    );

    let db = manager.connect(ConnectionKind::Read).await?;
    let coll = db.collection::<Document>(collection);

    let mut filter = build_scope_filter(identifier, user_id)?;
    for (key, value) in options.filter.clone() {
        filter.insert(key, value);
    }
    if let Some(item_id) = &options.item_id {
        filter.insert("_id", parse_object_id("_id", item_id)?);
    }
    debug!("查询过滤器: {:?}", filter);

    let mut is_stale = true;
    if let Some(snapshot) = &options.cache {
        if !snapshot.items.is_empty() {
            let find_options = FindOneOptions::builder()
                .sort(doc! { "updatedAt": -1 })
                .build();
            let latest_document = coll
                .find_one(filter.clone(), find_options)
                .await
                .map_err(|e| {
                    error!("新鲜度检查查询失败: collection={}, {}", collection, e);
                    DocSyncError::QueryError {
                        message: format!("MongoDB新鲜度检查失败: {}", e),
                    }
                })?;

            let latest_updated_at = latest_document
                .as_ref()
                .and_then(|document| document.get_datetime("updatedAt").ok())
                .map(|dt| dt.to_chrono());
            let cached_updated_at = (snapshot.freshness)(&snapshot.items[0]);
            is_stale = is_snapshot_stale(latest_updated_at, cached_updated_at);
            info!("缓存新鲜度判定: collection={}, is_stale={}", collection, is_stale);

            if !is_stale {
                debug!("缓存仍然新鲜，原样返回缓存内容");
                let data = match &options.item_id {
                    Some(_) => FetchData::One(snapshot.items.first().cloned()),
                    None => FetchData::Many(snapshot.items.to_vec()),
                };
                return Ok(FetchResult {
                    data,
                    is_stale: false,
                });
            }
        }
    }

    let documents: Vec<Document> = if options.item_id.is_some() {
        let document = coll.find_one(filter.clone(), None).await.map_err(|e| {
            error!("单条查询失败: collection={}, {}", collection, e);
            DocSyncError::QueryError {
                message: format!("MongoDB查询失败: {}", e),
            }
        })?;
        debug!("单条查询完成: found={}", document.is_some());
        document.into_iter().collect()
    } else {
        let cursor = coll.find(filter.clone(), None).await.map_err(|e| {
            error!("列表查询失败: collection={}, {}", collection, e);
            DocSyncError::QueryError {
                message: format!("MongoDB查询失败: {}", e),
            }
        })?;
        let documents: Vec<Document> =
            cursor.try_collect().await.map_err(|e| DocSyncError::QueryError {
                message: format!("MongoDB游标遍历失败: {}", e),
            })?;
        debug!("列表查询完成: {} 条", documents.len());
        documents
    };

    record_get_bookkeeping(&coll, &documents, options.side_store, collection).await?;

    let mut serialized = Vec::with_capacity(documents.len());
    for document in &documents {
        serialized.push(serialize_document(document)?);
    }
    debug!("文档序列化完成: {} 条", serialized.len());

    let data = if options.item_id.is_some() {
        FetchData::One(serialized.into_iter().next())
    } else {
        FetchData::Many(serialized)
    };
    Ok(FetchResult { data, is_stale })
}

/// 读取文档并附带变更订阅
///
/// 读取算法与 [`fetch_documents`] 完全一致；结果计算完成后在集合上
/// 打开空管道订阅，关闭订阅的所有权移交给调用方
pub async fn fetch_documents_with_stream(
    manager: &ConnectionManager,
    identifier: &Identifier,
    user_id: Option<&str>,
    collection: &str,
    options: FetchOptions<'_>,
) -> DocSyncResult<FetchWithStreamResult> {
    let db = manager.connect(ConnectionKind::Read).await?;
    let result = fetch_documents(manager, identifier, user_id, collection, options).await?;
    let subscription = ChangeSubscription::open(&db, collection, Vec::new(), false).await?;
    Ok(FetchWithStreamResult {
        result,
        subscription,
    })
}

/// 对取得的每个文档做批量记账：主存储上自增读命中计数并盖最近访问
/// 时间；提供了旁路存储时同步推进键值侧计数。返回值反映自增前的文档
async fn record_get_bookkeeping(
    coll: &Collection<Document>,
    documents: &[Document],
    side_store: Option<&dyn KeyValueStore>,
    store_name: &str,
) -> DocSyncResult<()> {
    if documents.is_empty() {
        return Ok(());
    }

    let ids: Vec<Bson> = documents
        .iter()
        .filter_map(|document| document.get("_id").cloned())
        .collect();
    let now = mongodb::bson::DateTime::now();

    let result = coll
        .update_many(
            doc! { "_id": { "$in": ids } },
            doc! {
                "$inc": { "getHitCount": 1i64 },
                "$set": { "lastAccessed": now },
            },
            None,
        )
        .await
        .map_err(|e| {
            error!("批量记账更新失败: {}", e);
            DocSyncError::QueryError {
                message: format!("MongoDB批量记账更新失败: {}", e),
            }
        })?;
    debug!(
        "批量记账更新完成: matched={}, modified={}",
        result.matched_count, result.modified_count
    );

    if let Some(store) = side_store {
        for document in documents {
            let record_id = record_id_hex(document);
            get_path::increment_get_hit_count(store, &record_id, store_name).await?;
            get_path::touch_last_accessed(store, &record_id, store_name, now.to_chrono()).await?;
        }
    }
    Ok(())
}

pub(crate) fn record_id_hex(document: &Document) -> String {
    match document.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
