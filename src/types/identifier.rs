//! 作用域标识符
//!
//! 封闭的标识字段组合联合体。每次调用恰好一个变体生效，存在的字段决定
//! 过滤器的精确程度。由调用方构造、单次消费、从不持久化。
//!
//! 使用带标签的枚举变体而非运行时字段探测，过滤器构造因此是穷尽匹配

use serde::{Deserialize, Serialize};

/// 目标文档的作用域标识符
///
/// `company_id` / `customer_id` / `id` 均为24位十六进制ObjectId字符串，
/// `additional_identifier` 为不透明业务字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identifier {
    /// 仅按公司
    Company {
        /// 公司ID
        company_id: String,
    },
    /// 公司 + 客户
    CompanyCustomer {
        /// 公司ID
        company_id: String,
        /// 客户ID
        customer_id: String,
    },
    /// 公司 + 记录ID
    CompanyId {
        /// 公司ID
        company_id: String,
        /// 记录ID
        id: String,
    },
    /// 公司 + 客户 + 记录ID
    CompanyCustomerId {
        /// 公司ID
        company_id: String,
        /// 客户ID
        customer_id: String,
        /// 记录ID
        id: String,
    },
    /// 公司 + 客户 + 记录ID + 附加标识
    CompanyCustomerIdAdditional {
        /// 公司ID
        company_id: String,
        /// 客户ID
        customer_id: String,
        /// 记录ID
        id: String,
        /// 附加标识
        additional_identifier: String,
    },
    /// 公司 + 记录ID + 附加标识
    CompanyIdAdditional {
        /// 公司ID
        company_id: String,
        /// 记录ID
        id: String,
        /// 附加标识
        additional_identifier: String,
    },
    /// 仅按记录ID
    Id {
        /// 记录ID
        id: String,
    },
}

impl Identifier {
    /// 取标识符携带的记录ID（若有）
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Identifier::Company { .. } | Identifier::CompanyCustomer { .. } => None,
            Identifier::CompanyId { id, .. }
            | Identifier::CompanyCustomerId { id, .. }
            | Identifier::CompanyCustomerIdAdditional { id, .. }
            | Identifier::CompanyIdAdditional { id, .. }
            | Identifier::Id { id } => Some(id),
        }
    }

    /// 取标识符携带的公司ID（若有）
    pub fn company_id(&self) -> Option<&str> {
        match self {
            Identifier::Company { company_id }
            | Identifier::CompanyCustomer { company_id, .. }
            | Identifier::CompanyId { company_id, .. }
            | Identifier::CompanyCustomerId { company_id, .. }
            | Identifier::CompanyCustomerIdAdditional { company_id, .. }
            | Identifier::CompanyIdAdditional { company_id, .. } => Some(company_id),
            Identifier::Id { .. } => None,
        }
    }

    /// 取标识符携带的客户ID（若有）
    pub fn customer_id(&self) -> Option<&str> {
        match self {
            Identifier::CompanyCustomer { customer_id, .. }
            | Identifier::CompanyCustomerId { customer_id, .. }
            | Identifier::CompanyCustomerIdAdditional { customer_id, .. } => Some(customer_id),
            _ => None,
        }
    }

    /// 取附加标识（若有）
    pub fn additional_identifier(&self) -> Option<&str> {
        match self {
            Identifier::CompanyCustomerIdAdditional {
                additional_identifier,
                ..
            }
            | Identifier::CompanyIdAdditional {
                additional_identifier,
                ..
            } => Some(additional_identifier),
            _ => None,
        }
    }
}
