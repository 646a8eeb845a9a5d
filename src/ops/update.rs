//! 写路径
//!
//! 订阅先行：变更订阅在任何写入之前打开，保证自身触发的变更不丢失；
//! 内层失败时订阅在返回错误前关闭。写入走带upsert的原子查改，随后单独
//! 推进写命中计数，最后按 `_id` 回读验证持久化结果

use crate::bookkeeping::{set_path, KeyValueStore};
use crate::connection::{ConnectionKind, ConnectionManager};
use crate::error::{DocSyncError, DocSyncResult};
use crate::ops::filter::{build_scope_filter, parse_object_id};
use crate::ops::get::record_id_hex;
use crate::ops::WatchOptions;
use crate::subscription::ChangeSubscription;
use crate::types::{serialize_document, Identifier, SerializedDocument, BOOKKEEPING_FIELDS};
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::Collection;
use rat_logger::{debug, error, info};

/// 内容校验函数：在任何存储写入之前执行，失败则整个操作失败
pub type ValidateFn<'a> = &'a dyn Fn(&Document) -> DocSyncResult<()>;

/// 写路径结果
pub struct UpdateOutcome {
    /// 验证回读得到的持久化文档（记账推进后的状态）
    pub document: SerializedDocument,
    /// 请求了订阅时的变更订阅句柄，由调用方负责关闭
    pub subscription: Option<ChangeSubscription>,
}

/// 更新或插入文档
///
/// 调用方提供的 `item` 中的记账字段一律剥除；`company`/`user`/`customer`
/// 归属字段由标识符与 `user_id` 重新盖章，`updatedAt`/`lastAccessed` 统一
/// 取当前时间。`item` 携带 `_id` 时按该ID定位，否则按作用域过滤器定位
pub async fn upsert_document(
    manager: &ConnectionManager,
    identifier: &Identifier,
    user_id: Option<&str>,
    collection: &str,
    item: Document,
    validate: Option<ValidateFn<'_>>,
    watch: Option<WatchOptions>,
    side_store: Option<&dyn KeyValueStore>,
) -> DocSyncResult<UpdateOutcome> {
    debug!("进入写路径: collection={}", collection);
    let db = manager.connect(ConnectionKind::Write).await?;

    let subscription = match watch {
        Some(options) => {
            Some(ChangeSubscription::open(&db, collection, options.pipeline, true).await?)
        }
        None => None,
    };

    let coll = db.collection::<Document>(collection);
    match run_upsert(&coll, identifier, user_id, collection, item, validate, side_store).await {
        Ok(document) => Ok(UpdateOutcome {
            document,
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

async fn run_upsert(
    coll: &Collection<Document>,
    identifier: &Identifier,
    user_id: Option<&str>,
    collection: &str,
    mut item: Document,
    validate: Option<ValidateFn<'_>>,
    side_store: Option<&dyn KeyValueStore>,
) -> DocSyncResult<SerializedDocument> {
    if let Some(validate) = validate {
        validate(&item)?;
        debug!("内容校验通过: collection={}", collection);
    }

    let mut filter = build_scope_filter(identifier, user_id)?;

    // item自带_id时优先按其定位，字符串形式的ID归一化为ObjectId
    if let Some(raw_id) = item.remove("_id") {
        let id = match raw_id {
            Bson::ObjectId(oid) => Bson::ObjectId(oid),
            Bson::String(s) => Bson::ObjectId(parse_object_id("_id", &s)?),
            other => other,
        };
        filter.insert("_id", id);
    }

    for field in BOOKKEEPING_FIELDS {
        if item.remove(field).is_some() {
            debug!("剥除调用方提供的记账字段: {}", field);
        }
    }

    // 归属字段统一由核心盖章，不信任调用方载荷
    if let Some(company_id) = identifier.company_id() {
        item.insert("company", parse_object_id("company", company_id)?);
    }
    if let Some(customer_id) = identifier.customer_id() {
        item.insert("customer", parse_object_id("customer", customer_id)?);
    }
    if let Some(user) = user_id {
        item.insert("user", parse_object_id("user", user)?);
    }

    let now = mongodb::bson::DateTime::now();
    item.insert("updatedAt", now);
    item.insert("lastAccessed", now);

    let update = doc! {
        "$set": item,
        "$setOnInsert": { "getHitCount": 0i64, "setHitCount": 0i64 },
    };
    let options = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();

    let updated = coll
        .find_one_and_update(filter, update, options)
        .await
        .map_err(|e| {
            error!("更新或插入失败: collection={}, {}", collection, e);
            DocSyncError::QueryError {
                message: format!("MongoDB更新或插入失败: {}", e),
            }
        })?
        .ok_or_else(|| DocSyncError::QueryError {
            message: "更新或插入文档失败：未返回文档".to_string(),
        })?;

    let id = updated
        .get("_id")
        .cloned()
        .ok_or_else(|| DocSyncError::QueryError {
            message: "更新后的文档缺少_id字段".to_string(),
        })?;
    info!("文档已写入: collection={}, _id={}", collection, id);

    coll.update_one(
        doc! { "_id": id.clone() },
        doc! { "$inc": { "setHitCount": 1i64 } },
        None,
    )
    .await
    .map_err(|e| {
        error!("写命中计数推进失败: collection={}, {}", collection, e);
        DocSyncError::QueryError {
            message: format!("MongoDB写命中计数推进失败: {}", e),
        }
    })?;

    if let Some(store) = side_store {
        let record_id = record_id_hex(&updated);
        set_path::increment_set_hit_count(store, &record_id, collection).await?;
        set_path::touch_last_updated(store, &record_id, collection, now.to_chrono()).await?;
    }

    // 写后验证：回读确认文档确实持久化且携带最新记账状态
    let verified = coll
        .find_one(doc! { "_id": id.clone() }, None)
        .await
        .map_err(|e| DocSyncError::QueryError {
            message: format!("MongoDB写后验证查询失败: {}", e),
        })?
        .ok_or_else(|| DocSyncError::NotFoundError {
            message: format!("写后验证未找到文档: collection={}, _id={}", collection, id),
        })?;

    serialize_document(&verified)
}
