//! 过滤器构造
//!
//! 从作用域标识符穷尽匹配地构造查询过滤器，不做任何运行时字段探测

use crate::error::{DocSyncError, DocSyncResult};
use crate::types::Identifier;
use mongodb::bson::{oid::ObjectId, Document};
use rat_logger::debug;

/// 解析ObjectId字符串，非法时返回校验错误
pub fn parse_object_id(field: &str, value: &str) -> DocSyncResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|e| DocSyncError::ValidationError {
        field: field.to_string(),
        message: format!("非法的ObjectId字符串 '{}': {}", value, e),
    })
}

/// 从标识符与可选的用户ID构造所有权过滤器
///
/// 标识符的每个字段恰好映射到一个谓词：`company`/`customer`/`user` 与
/// `_id` 为ObjectId等值，`additionalIdentifier` 为字符串等值
pub fn build_scope_filter(
    identifier: &Identifier,
    user_id: Option<&str>,
) -> DocSyncResult<Document> {
    let mut filter = Document::new();

    match identifier {
        Identifier::Company { company_id } => {
            filter.insert("company", parse_object_id("company", company_id)?);
        }
        Identifier::CompanyCustomer {
            company_id,
            customer_id,
        } => {
            filter.insert("company", parse_object_id("company", company_id)?);
            filter.insert("customer", parse_object_id("customer", customer_id)?);
        }
        Identifier::CompanyId { company_id, id } => {
            filter.insert("company", parse_object_id("company", company_id)?);
            filter.insert("_id", parse_object_id("_id", id)?);
        }
        Identifier::CompanyCustomerId {
            company_id,
            customer_id,
            id,
        } => {
            filter.insert("company", parse_object_id("company", company_id)?);
            filter.insert("customer", parse_object_id("customer", customer_id)?);
            filter.insert("_id", parse_object_id("_id", id)?);
        }
        Identifier::CompanyCustomerIdAdditional {
            company_id,
            customer_id,
            id,
            additional_identifier,
        } => {
            filter.insert("company", parse_object_id("company", company_id)?);
            filter.insert("customer", parse_object_id("customer", customer_id)?);
            filter.insert("_id", parse_object_id("_id", id)?);
            filter.insert("additionalIdentifier", additional_identifier.as_str());
        }
        Identifier::CompanyIdAdditional {
            company_id,
            id,
            additional_identifier,
        } => {
            filter.insert("company", parse_object_id("company", company_id)?);
            filter.insert("_id", parse_object_id("_id", id)?);
            filter.insert("additionalIdentifier", additional_identifier.as_str());
        }
        Identifier::Id { id } => {
            filter.insert("_id", parse_object_id("_id", id)?);
        }
    }

    if let Some(user) = user_id {
        filter.insert("user", parse_object_id("user", user)?);
    }

    debug!(
        "过滤器构造完成: keys={:?}",
        filter.keys().collect::<Vec<_>>()
    );
    Ok(filter)
}
