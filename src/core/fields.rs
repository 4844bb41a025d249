use crate::utils::error::{ReportError, Result};
use std::collections::HashSet;

/// 有序的欄位對照表：輸出欄位名稱 -> 來源 JSON 的點分路徑。
/// 建構時固定，逐筆記錄懶惰解析，不做 schema 驗證。
#[derive(Debug, Clone)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new(pairs: Vec<(String, String)>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (output_field, _) in &pairs {
            if !seen.insert(output_field.clone()) {
                return Err(ReportError::InvalidConfigValueError {
                    field: "field_map".to_string(),
                    value: output_field.clone(),
                    reason: "Duplicate output field name".to_string(),
                });
            }
        }
        Ok(Self { entries: pairs })
    }

    /// Argo workflow 列表的固定欄位
    pub fn workflow_defaults() -> Self {
        let pairs = [
            ("run", "metadata.name"),
            ("owner_kind", "metadata.ownerReferences.kind"),
            ("owner_name", "metadata.ownerReferences.name"),
            ("parameters", "spec.arguments"),
            ("status", "status.phase"),
            ("start_time", "status.startedAt"),
            ("end_time", "status.finishedAt"),
            ("cpu", "status.resourcesDuration.cpu"),
            ("mem", "status.resourcesDuration.memory"),
            (
                "service_account_name",
                "status.storedWorkflowTemplateSpec.serviceAccountName",
            ),
        ];
        Self {
            entries: pairs
                .iter()
                .map(|(field, path)| (field.to_string(), path.to_string()))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(field, path)| (field.as_str(), path.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
