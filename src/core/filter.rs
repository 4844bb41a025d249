use crate::domain::model::EnrichedRecord;
use crate::utils::error::{ReportError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// 報表的半開時間窗 `[start, end)`，以 start_date 判定是否納入。
/// 預設視窗由呼叫端注入的 `now` 建出（當日零時起算），不讀取全域狀態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportWindow {
    pub fn for_day(day: NaiveDate, days: u32) -> Self {
        let start = day.and_time(NaiveTime::MIN);
        Self {
            start,
            end: start + Duration::days(i64::from(days)),
        }
    }

    /// 預設視窗：`now` 當天的零時到 `days` 天後的零時
    pub fn current_day(now: NaiveDateTime, days: u32) -> Self {
        Self::for_day(now.date(), days)
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// workflow 基底名稱的 regex 過濾器，建構時編譯一次。
/// 無效的 pattern 是致命的設定錯誤，不是逐筆可回復的狀況。
#[derive(Debug, Clone)]
pub struct WorkflowMatcher {
    pattern: Regex,
}

impl WorkflowMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|source| ReportError::PatternError {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern: compiled })
    }

    /// search 語意（不是整串比對）；workflow 未定義一律不符合
    pub fn matches(&self, workflow: Option<&str>) -> bool {
        workflow.map(|w| self.pattern.is_match(w)).unwrap_or(false)
    }
}

/// 篩選時間窗內的記錄並依一天內的時刻排序。
/// 排序刻意用 time-of-day 而非絕對時間：跨日報表以當日位置對齊比較。
pub fn filter_records(
    records: Vec<EnrichedRecord>,
    window: &ReportWindow,
    matcher: Option<&WorkflowMatcher>,
) -> Vec<EnrichedRecord> {
    tracing::info!(
        "Filtering workflows between {} and {}",
        window.start,
        window.end
    );

    let mut kept: Vec<EnrichedRecord> = records
        .into_iter()
        .filter(|r| r.start_date.map(|t| window.contains(t)).unwrap_or(false))
        .filter(|r| {
            matcher
                .map(|m| m.matches(r.workflow.as_deref()))
                .unwrap_or(true)
        })
        .collect();

    kept.sort_by_key(|r| r.start_time_of_day);

    tracing::info!("Found {} workflows in date range", kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::enrich::enrich;
    use crate::domain::model::FlatRecord;
    use serde_json::json;
    use std::collections::HashMap;

    fn record(run: &str, start: &str, end: &str) -> FlatRecord {
        let mut data = HashMap::new();
        data.insert("run".to_string(), json!(run));
        data.insert("start_time".to_string(), json!(start));
        data.insert("end_time".to_string(), json!(end));
        FlatRecord { data }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_for_day_bounds() {
        let window = ReportWindow::for_day(day(2024, 1, 15), 1);
        assert_eq!(window.start.to_string(), "2024-01-15 00:00:00");
        assert_eq!(window.end.to_string(), "2024-01-16 00:00:00");
    }

    #[test]
    fn test_window_current_day_uses_injected_now() {
        let now = day(2024, 6, 1).and_hms_opt(13, 45, 0).unwrap();
        let window = ReportWindow::current_day(now, 2);
        assert_eq!(window.start, day(2024, 6, 1).and_time(NaiveTime::MIN));
        assert_eq!(window.end, day(2024, 6, 3).and_time(NaiveTime::MIN));
    }

    #[test]
    fn test_half_open_boundaries() {
        let window = ReportWindow::for_day(day(2024, 1, 15), 1);
        let records = enrich(vec![
            record("at-start-a1", "2024-01-15T00:00:00Z", "2024-01-15T00:10:00Z"),
            record("at-end-b2", "2024-01-16T00:00:00Z", "2024-01-16T00:10:00Z"),
            record("inside-c3", "2024-01-15T23:59:59Z", "2024-01-16T00:30:00Z"),
        ]);

        let kept = filter_records(records, &window, None);
        let runs: Vec<&str> = kept.iter().filter_map(|r| r.text("run")).collect();
        assert!(runs.contains(&"at-start-a1"));
        assert!(runs.contains(&"inside-c3"));
        assert!(!runs.contains(&"at-end-b2"));
    }

    #[test]
    fn test_undefined_start_date_excluded() {
        let window = ReportWindow::for_day(day(2024, 1, 15), 1);
        let records = enrich(vec![record("no-start-z9", "garbage", "2024-01-15T01:00:00Z")]);
        assert!(filter_records(records, &window, None).is_empty());
    }

    #[test]
    fn test_sorted_by_time_of_day_across_days() {
        let window = ReportWindow::for_day(day(2024, 1, 15), 3);
        let records = enrich(vec![
            record("late-day1-a1", "2024-01-15T22:00:00Z", "2024-01-15T23:00:00Z"),
            record("early-day2-b2", "2024-01-16T03:00:00Z", "2024-01-16T04:00:00Z"),
            record("noon-day1-c3", "2024-01-15T12:00:00Z", "2024-01-15T13:00:00Z"),
        ]);

        let kept = filter_records(records, &window, None);
        let runs: Vec<&str> = kept.iter().filter_map(|r| r.text("run")).collect();
        // 依一天內的時刻排序，日期不影響
        assert_eq!(runs, vec!["early-day2-b2", "noon-day1-c3", "late-day1-a1"]);
    }

    #[test]
    fn test_equal_time_of_day_keeps_original_order() {
        let window = ReportWindow::for_day(day(2024, 1, 15), 3);
        let records = enrich(vec![
            record("first-a1", "2024-01-16T08:00:00Z", "2024-01-16T09:00:00Z"),
            record("second-b2", "2024-01-15T08:00:00Z", "2024-01-15T09:00:00Z"),
        ]);

        let kept = filter_records(records, &window, None);
        let runs: Vec<&str> = kept.iter().filter_map(|r| r.text("run")).collect();
        assert_eq!(runs, vec!["first-a1", "second-b2"]);
    }

    #[test]
    fn test_matcher_filters_by_workflow_base_name() {
        let window = ReportWindow::for_day(day(2024, 1, 15), 1);
        let matcher = WorkflowMatcher::new("^etl").unwrap();
        let records = enrich(vec![
            record("etl-daily-a1", "2024-01-15T01:00:00Z", "2024-01-15T02:00:00Z"),
            record("report-daily-b2", "2024-01-15T03:00:00Z", "2024-01-15T04:00:00Z"),
        ]);

        let kept = filter_records(records, &window, Some(&matcher));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].workflow.as_deref(), Some("etl-daily"));
    }

    #[test]
    fn test_matcher_search_semantics() {
        let matcher = WorkflowMatcher::new("daily").unwrap();
        assert!(matcher.matches(Some("etl-daily-batch")));
        assert!(!matcher.matches(Some("weekly-batch")));
        assert!(!matcher.matches(None));
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        let err = WorkflowMatcher::new("([unclosed").unwrap_err();
        assert!(matches!(err, ReportError::PatternError { .. }));
    }
}
