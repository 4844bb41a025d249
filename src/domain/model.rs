use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 扁平化後的單筆 workflow 記錄：欄位名稱 -> 解析出的 JSON 值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatRecord {
    pub data: HashMap<String, serde_json::Value>,
}

impl FlatRecord {
    pub fn text(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }
}

/// FlatRecord 加上衍生欄位（workflow 基底名稱、時間欄位）
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub data: HashMap<String, serde_json::Value>,
    pub workflow: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub start_time_of_day: Option<Duration>,
    pub end_time_of_day: Option<Duration>,
    pub duration: Option<Duration>,
    pub duration_seconds: Option<f64>,
}

impl EnrichedRecord {
    pub fn text(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }
}

/// Transform 階段的輸出：過濾排序後的記錄加上統計摘要
#[derive(Debug, Clone)]
pub struct ReportData {
    pub records: Vec<EnrichedRecord>,
    pub summary: Option<SummaryReport>,
}

/// 一次報表執行的結果
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    Written {
        output_path: String,
        summary: SummaryReport,
    },
    NothingToReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopEntry {
    pub workflow: Option<String>,
    pub run: Option<String>,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub total_workflows: usize,
    pub unique_workflows: usize,
    pub duration: Option<DurationStats>,
    pub top_longest: Vec<TopEntry>,
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bar = "=".repeat(60);
        writeln!(f, "{}", bar)?;
        writeln!(f, "WORKFLOW SUMMARY STATISTICS")?;
        writeln!(f, "{}", bar)?;
        writeln!(f, "Total workflows: {}", self.total_workflows)?;
        writeln!(f, "Unique workflows: {}", self.unique_workflows)?;

        if let Some(stats) = &self.duration {
            writeln!(f)?;
            writeln!(f, "Duration Statistics:")?;
            writeln!(f, "  Average: {:.2}s", stats.mean)?;
            writeln!(f, "  Median: {:.2}s", stats.median)?;
            writeln!(f, "  Min: {:.2}s", stats.min)?;
            writeln!(f, "  Max: {:.2}s", stats.max)?;
        }

        if !self.top_longest.is_empty() {
            writeln!(f)?;
            writeln!(f, "Top {} longest running workflows:", self.top_longest.len())?;
            for entry in &self.top_longest {
                writeln!(
                    f,
                    "  {}  {}  {:.2}s",
                    entry.workflow.as_deref().unwrap_or("-"),
                    entry.run.as_deref().unwrap_or("-"),
                    entry.duration_seconds
                )?;
            }
        }

        write!(f, "{}", bar)
    }
}
