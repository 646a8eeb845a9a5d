//! 核心类型定义
//!
//! 标识符联合、通用文档的记账字段以及边界序列化投影

pub mod document;
pub mod identifier;

// 重新导出所有公共类型以保持API简洁
pub use document::{
    deserialize_document, document_record_id, extract_updated_at, serialize_document,
    SerializedDocument, BOOKKEEPING_FIELDS, DATE_FIELDS, REFERENCE_FIELDS,
};
pub use identifier::Identifier;
