use crate::domain::model::{DurationStats, EnrichedRecord, SummaryReport, TopEntry};
use std::collections::HashSet;

const TOP_N: usize = 5;

/// 計算統計摘要。空集合回傳 None（沒有東西可報告，不是錯誤）。
pub fn summarize(records: &[EnrichedRecord]) -> Option<SummaryReport> {
    if records.is_empty() {
        return None;
    }

    let unique_workflows: HashSet<&str> = records
        .iter()
        .filter_map(|r| r.workflow.as_deref())
        .collect();

    Some(SummaryReport {
        total_workflows: records.len(),
        unique_workflows: unique_workflows.len(),
        duration: duration_stats(records),
        top_longest: top_longest(records),
    })
}

fn duration_stats(records: &[EnrichedRecord]) -> Option<DurationStats> {
    let mut values: Vec<f64> = records.iter().filter_map(|r| r.duration_seconds).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    };

    Some(DurationStats {
        mean,
        median,
        min: values[0],
        max: values[n - 1],
    })
}

fn top_longest(records: &[EnrichedRecord]) -> Vec<TopEntry> {
    let mut ranked: Vec<&EnrichedRecord> = records
        .iter()
        .filter(|r| r.duration_seconds.is_some())
        .collect();

    // 穩定排序：同長度的記錄維持集合內的原始順序
    ranked.sort_by(|a, b| {
        b.duration_seconds
            .unwrap_or(f64::NEG_INFINITY)
            .total_cmp(&a.duration_seconds.unwrap_or(f64::NEG_INFINITY))
    });
    ranked.truncate(TOP_N);

    ranked
        .into_iter()
        .map(|r| TopEntry {
            workflow: r.workflow.clone(),
            run: r.text("run").map(str::to_string),
            duration_seconds: r.duration_seconds.unwrap_or(0.0),
        })
        .collect()
}
