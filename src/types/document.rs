//! 通用文档与边界序列化投影
//!
//! 文档在存储侧为BSON，在系统边界渲染为JSON对象：ObjectId渲染为24位十六进制
//! 字符串，时间渲染为带毫秒的RFC 3339字符串。除这两类表示转换外往返无损，
//! `serialize(deserialize(serialize(doc))) == serialize(doc)` 恒成立

use crate::debug_log;
use crate::error::{DocSyncError, DocSyncResult};
use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};

/// 边界序列化投影：引用与时间字段均为字符串的JSON对象
pub type SerializedDocument = Map<String, Value>;

/// 系统所有的记账字段，调用方不得提供，由核心单调推进
pub const BOOKKEEPING_FIELDS: [&str; 4] =
    ["getHitCount", "setHitCount", "updatedAt", "lastAccessed"];

/// 反序列化时按ObjectId解析的实体引用字段
pub const REFERENCE_FIELDS: [&str; 4] = ["_id", "company", "user", "customer"];

/// 反序列化时按RFC 3339解析的时间字段
pub const DATE_FIELDS: [&str; 2] = ["updatedAt", "lastAccessed"];

/// 将BSON文档序列化为边界投影
pub fn serialize_document(doc: &Document) -> DocSyncResult<SerializedDocument> {
    let mut out = Map::new();
    for (key, value) in doc {
        out.insert(key.clone(), bson_to_json(value)?);
    }
    debug_log!("文档序列化完成: {} 个字段", out.len());
    Ok(out)
}

/// 将边界投影还原为BSON文档
///
/// 顶层的引用字段（合法24位十六进制时）还原为ObjectId，时间字段（合法
/// RFC 3339时）还原为BSON日期；其余字段按通用JSON规则转换
pub fn deserialize_document(data: &SerializedDocument) -> DocSyncResult<Document> {
    let mut doc = Document::new();
    for (key, value) in data {
        let bson = if REFERENCE_FIELDS.contains(&key.as_str()) {
            reference_to_bson(value)
        } else if DATE_FIELDS.contains(&key.as_str()) {
            date_to_bson(value)
        } else {
            json_to_bson(value)?
        };
        doc.insert(key.clone(), bson);
    }
    Ok(doc)
}

/// 取序列化文档的记录ID字符串
pub fn document_record_id(data: &SerializedDocument) -> Option<&str> {
    data.get("_id").and_then(Value::as_str)
}

/// 按边界约定提取序列化文档的 `updatedAt` 时间
///
/// 可直接用作读路径缓存快照的新鲜度提取函数
pub fn extract_updated_at(data: &SerializedDocument) -> Option<DateTime<Utc>> {
    data.get("updatedAt")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn bson_to_json(value: &Bson) -> DocSyncResult<Value> {
    let converted = match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.to_chrono()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::Number((*i as i64).into()),
        Bson::Int64(i) => Value::Number((*i).into()),
        Bson::Double(f) => {
            let number =
                serde_json::Number::from_f64(*f).ok_or_else(|| DocSyncError::SerializationError {
                    message: format!("浮点值无法表示为JSON: {}", f),
                })?;
            Value::Number(number)
        }
        Bson::Null => Value::Null,
        Bson::Array(items) => {
            let mut array = Vec::with_capacity(items.len());
            for item in items {
                array.push(bson_to_json(item)?);
            }
            Value::Array(array)
        }
        Bson::Document(nested) => Value::Object(serialize_document(nested)?),
        other => Value::String(other.to_string()),
    };
    Ok(converted)
}

fn json_to_bson(value: &Value) -> DocSyncResult<Bson> {
    let converted = match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Bson::Int64(i)
            } else if let Some(f) = n.as_f64() {
                Bson::Double(f)
            } else {
                return Err(DocSyncError::SerializationError {
                    message: format!("无法转换的JSON数值: {}", n),
                });
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => {
            let mut array = Vec::with_capacity(items.len());
            for item in items {
                array.push(json_to_bson(item)?);
            }
            Bson::Array(array)
        }
        Value::Object(map) => {
            let mut doc = Document::new();
            for (key, item) in map {
                doc.insert(key.clone(), json_to_bson(item)?);
            }
            Bson::Document(doc)
        }
    };
    Ok(converted)
}

/// 引用字段还原：合法的24位十六进制字符串视为ObjectId，否则原样保留
fn reference_to_bson(value: &Value) -> Bson {
    match value.as_str().and_then(|s| ObjectId::parse_str(s).ok()) {
        Some(oid) => Bson::ObjectId(oid),
        None => json_value_verbatim(value),
    }
}

/// 时间字段还原：合法的RFC 3339字符串视为BSON日期，否则原样保留
fn date_to_bson(value: &Value) -> Bson {
    match value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    {
        Some(parsed) => Bson::DateTime(mongodb::bson::DateTime::from_chrono(
            parsed.with_timezone(&Utc),
        )),
        None => json_value_verbatim(value),
    }
}

fn json_value_verbatim(value: &Value) -> Bson {
    json_to_bson(value).unwrap_or(Bson::Null)
}
