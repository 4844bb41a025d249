use crate::domain::model::{EnrichedRecord, FlatRecord};
use chrono::{NaiveDateTime, NaiveTime};

/// Argo 時間戳記的嚴格格式；解析失敗視為缺值而非錯誤
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// 對每筆記錄計算衍生欄位。空輸入回傳空輸出。
pub fn enrich(records: Vec<FlatRecord>) -> Vec<EnrichedRecord> {
    records.into_iter().map(enrich_record).collect()
}

fn enrich_record(record: FlatRecord) -> EnrichedRecord {
    let workflow = record.text("run").and_then(base_name);
    let start_date = parse_timestamp("start_time", record.text("start_time"));
    let end_date = parse_timestamp("end_time", record.text("end_time"));

    let start_time_of_day = start_date.map(time_of_day);
    let end_time_of_day = end_date.map(time_of_day);

    let duration = match (start_date, end_date) {
        (Some(start), Some(end)) => Some(end - start),
        _ => None,
    };
    let duration_seconds = duration.map(|d| d.num_milliseconds() as f64 / 1000.0);

    EnrichedRecord {
        data: record.data,
        workflow,
        start_date,
        end_date,
        start_time_of_day,
        end_time_of_day,
        duration,
        duration_seconds,
    }
}

/// 去掉 run 名稱最後一段（orchestrator 產生的隨機後綴）。
/// 沒有 `-` 的名稱去掉唯一一段後什麼都不剩，視為沒有穩定的模板名稱。
fn base_name(run: &str) -> Option<String> {
    if run.is_empty() {
        return None;
    }
    let mut parts: Vec<&str> = run.split('-').collect();
    parts.pop();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("-"))
    }
}

fn parse_timestamp(field: &str, raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?;
    match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Unparseable {} value: '{}'", field, raw);
            None
        }
    }
}

fn time_of_day(instant: NaiveDateTime) -> chrono::Duration {
    instant.time() - NaiveTime::MIN
}
