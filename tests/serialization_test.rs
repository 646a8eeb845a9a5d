#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mongodb::bson::{doc, oid::ObjectId, Bson};
    use rat_docsync::types::{
        deserialize_document, document_record_id, extract_updated_at, serialize_document,
    };
    use serde_json::{json, Map};

    /// ObjectId与时间字段的边界渲染测试
    #[test]
    fn test_serialize_reference_and_date_fields() {
        println!("🔍 测试引用与时间字段序列化");

        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let company = ObjectId::parse_str("507f191e810c19729de860ea").unwrap();
        let updated = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();

        let document = doc! {
            "_id": oid,
            "company": company,
            "name": "订单A",
            "updatedAt": mongodb::bson::DateTime::from_chrono(updated),
            "getHitCount": 3i64,
        };

        let serialized = serialize_document(&document).unwrap();
        assert_eq!(
            serialized.get("_id"),
            Some(&json!("507f1f77bcf86cd799439011"))
        );
        assert_eq!(
            serialized.get("company"),
            Some(&json!("507f191e810c19729de860ea"))
        );
        assert_eq!(
            serialized.get("updatedAt"),
            Some(&json!("2026-08-30T12:00:00.000Z"))
        );
        assert_eq!(serialized.get("getHitCount"), Some(&json!(3)));
        assert_eq!(document_record_id(&serialized), Some("507f1f77bcf86cd799439011"));

        println!("✅ 引用与时间字段序列化测试完成");
    }

    /// 序列化往返稳定性测试：二次投影与一次投影相同
    #[test]
    fn test_round_trip_stability() {
        println!("🔍 测试序列化往返稳定性");

        let document = doc! {
            "_id": ObjectId::new(),
            "user": ObjectId::new(),
            "title": "测试文档",
            "count": 7i32,
            "ratio": 0.5,
            "active": true,
            "tags": ["a", "b"],
            "nested": { "inner": "值" },
            "updatedAt": mongodb::bson::DateTime::now(),
            "empty": Bson::Null,
        };

        let once = serialize_document(&document).unwrap();
        let restored = deserialize_document(&once).unwrap();
        let twice = serialize_document(&restored).unwrap();
        assert_eq!(once, twice);

        println!("✅ 序列化往返稳定性测试完成");
    }

    /// 反序列化的字段感知测试：仅顶层引用/时间字段做类型还原
    #[test]
    fn test_deserialize_field_awareness() {
        println!("🔍 测试反序列化字段感知");

        let mut data = Map::new();
        data.insert("_id".to_string(), json!("507f1f77bcf86cd799439011"));
        data.insert("customer".to_string(), json!("507f191e810c19729de860ea"));
        data.insert("updatedAt".to_string(), json!("2026-08-30T12:00:00.000Z"));
        // 普通字段即使长得像ObjectId也保持字符串
        data.insert("note".to_string(), json!("507f1f77bcf86cd799439011"));
        // 嵌套对象内部不做字段感知还原
        data.insert("meta".to_string(), json!({ "updatedAt": "2026-08-30T12:00:00.000Z" }));

        let document = deserialize_document(&data).unwrap();
        assert!(matches!(document.get("_id"), Some(Bson::ObjectId(_))));
        assert!(matches!(document.get("customer"), Some(Bson::ObjectId(_))));
        assert!(matches!(document.get("updatedAt"), Some(Bson::DateTime(_))));
        assert!(matches!(document.get("note"), Some(Bson::String(_))));
        let meta = document.get_document("meta").unwrap();
        assert!(matches!(meta.get("updatedAt"), Some(Bson::String(_))));

        println!("✅ 反序列化字段感知测试完成");
    }

    /// 非法引用/时间字符串按原值保留
    #[test]
    fn test_deserialize_invalid_values_kept_verbatim() {
        println!("🔍 测试非法值原样保留");

        let mut data = Map::new();
        data.insert("_id".to_string(), json!("不是ObjectId"));
        data.insert("updatedAt".to_string(), json!("不是时间"));

        let document = deserialize_document(&data).unwrap();
        assert_eq!(document.get_str("_id").unwrap(), "不是ObjectId");
        assert_eq!(document.get_str("updatedAt").unwrap(), "不是时间");

        println!("✅ 非法值原样保留测试完成");
    }

    /// updatedAt提取测试
    #[test]
    fn test_extract_updated_at() {
        println!("🔍 测试updatedAt提取");

        let mut data = Map::new();
        assert_eq!(extract_updated_at(&data), None);

        data.insert("updatedAt".to_string(), json!("2026-08-30T12:00:00.000Z"));
        assert_eq!(
            extract_updated_at(&data),
            Some(Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap())
        );

        data.insert("updatedAt".to_string(), json!(12345));
        assert_eq!(extract_updated_at(&data), None);

        println!("✅ updatedAt提取测试完成");
    }

    /// Int32序列化为JSON整数测试
    #[test]
    fn test_serialize_numbers() {
        println!("🔍 测试数值序列化");

        let document = doc! { "i32": 5i32, "i64": 6i64, "f64": 1.25 };
        let serialized = serialize_document(&document).unwrap();
        assert_eq!(serialized.get("i32"), Some(&json!(5)));
        assert_eq!(serialized.get("i64"), Some(&json!(6)));
        assert_eq!(serialized.get("f64"), Some(&json!(1.25)));
        assert!(serialized.get("i32").unwrap().is_i64());

        println!("✅ 数值序列化测试完成");
    }

    /// 非法浮点值序列化失败测试
    #[test]
    fn test_serialize_nan_fails() {
        println!("🔍 测试NaN序列化失败");

        let document = doc! { "bad": f64::NAN };
        let result = serialize_document(&document);
        assert!(result.is_err());

        println!("✅ NaN序列化失败测试完成");
    }
}
