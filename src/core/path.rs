use serde_json::Value;

/// 解析單一路徑片段。
/// Mapping 直接取 key；Sequence 對每個 mapping 元素取 key 並收集；其他節點視為不存在。
/// JSON null 與缺少的 key 同樣視為不存在。
pub fn resolve(node: &Value, part: &str) -> Option<Value> {
    match node {
        Value::Object(map) => map.get(part).filter(|v| !v.is_null()).cloned(),
        Value::Array(items) => {
            let values: Vec<Value> = items
                .iter()
                .filter(|item| item.is_object())
                .filter_map(|item| resolve(item, part))
                .collect();
            if values.is_empty() {
                None
            } else {
                Some(Value::Array(values))
            }
        }
        _ => None,
    }
}

/// 依 `.` 分隔的路徑逐層解析，任何一層失敗即回傳 None。
pub fn resolve_path(root: &Value, path: &str) -> Option<Value> {
    let mut current = root.clone();
    for part in path.split('.') {
        current = resolve(&current, part)?;
    }
    Some(current)
}
