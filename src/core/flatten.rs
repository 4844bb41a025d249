use crate::core::fields::FieldMap;
use crate::core::path::resolve_path;
use crate::domain::model::FlatRecord;
use serde_json::Value;
use std::collections::HashMap;

/// 將 Argo 列表回應攤平成表格記錄。
/// 缺少 `items` 時回傳空序列（警告，不視為錯誤）。
pub fn flatten(listing: &Value, fields: &FieldMap) -> Vec<FlatRecord> {
    let Some(items) = listing.get("items").and_then(Value::as_array) else {
        tracing::warn!("No 'items' array found in workflow listing");
        return Vec::new();
    };

    items
        .iter()
        .map(|item| flatten_item(item, fields))
        .collect()
}

fn flatten_item(item: &Value, fields: &FieldMap) -> FlatRecord {
    let mut data = HashMap::with_capacity(fields.len());
    for (output_field, source_path) in fields.iter() {
        let value = match resolve_path(item, source_path) {
            // 表格儲存成單行：字串內的換行正規化為空白
            Some(Value::String(s)) => Value::String(s.replace('\n', " ")),
            Some(value) => value,
            None => Value::Null,
        };
        data.insert(output_field.to_string(), value);
    }
    FlatRecord { data }
}
