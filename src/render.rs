use crate::domain::model::EnrichedRecord;
use crate::domain::ports::TimelineRenderer;
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use std::collections::HashMap;

const CHART_WIDTH: f64 = 1000.0;
const MARGIN_LEFT: f64 = 220.0;
const MARGIN_TOP: f64 = 50.0;
const ROW_HEIGHT: f64 = 30.0;
const AXIS_TICKS: i64 = 5;

/// 自含式 HTML/SVG 時間軸：每個 workflow 一列，每筆記錄一條橫條。
pub struct HtmlTimeline;

impl TimelineRenderer for HtmlTimeline {
    fn render(&self, records: &[EnrichedRecord], title: &str) -> Result<Vec<u8>> {
        Ok(render_page(records, title).into_bytes())
    }
}

struct Bar<'a> {
    row: usize,
    start: NaiveDateTime,
    end: NaiveDateTime,
    run: &'a str,
    status: &'a str,
    duration_seconds: f64,
}

fn render_page(records: &[EnrichedRecord], title: &str) -> String {
    // 列順序 = workflow 在已排序記錄中首次出現的順序
    let mut rows: Vec<&str> = Vec::new();
    let mut row_index: HashMap<&str, usize> = HashMap::new();
    let mut bars: Vec<Bar> = Vec::new();

    for record in records {
        let label = record.workflow.as_deref().unwrap_or("(unnamed)");
        let row = *row_index.entry(label).or_insert_with(|| {
            rows.push(label);
            rows.len() - 1
        });

        // 端點不完整的記錄仍計入統計，但畫不出橫條
        if let (Some(start), Some(end)) = (record.start_date, record.end_date) {
            bars.push(Bar {
                row,
                start,
                end,
                run: record.text("run").unwrap_or("-"),
                status: record.text("status").unwrap_or("unknown"),
                duration_seconds: record.duration_seconds.unwrap_or(0.0),
            });
        }
    }

    let body = if bars.is_empty() {
        "<p>No workflows to display.</p>".to_string()
    } else {
        render_svg(&rows, &bars)
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\nbody {{ font-family: sans-serif; margin: 20px; }}\n\
         svg {{ background: #fafafa; border: 1px solid #ddd; }}\n\
         .row-label {{ font-size: 12px; }}\n.tick-label {{ font-size: 11px; fill: #555; }}\n\
         </style>\n</head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    )
}

fn render_svg(rows: &[&str], bars: &[Bar]) -> String {
    let (Some(span_start), Some(span_end)) = (
        bars.iter().map(|b| b.start.min(b.end)).min(),
        bars.iter().map(|b| b.end.max(b.start)).max(),
    ) else {
        return "<p>No workflows to display.</p>".to_string();
    };
    let span_seconds = (span_end - span_start).num_seconds().max(1);

    let x = |t: NaiveDateTime| {
        MARGIN_LEFT + (t - span_start).num_seconds() as f64 / span_seconds as f64 * CHART_WIDTH
    };

    let chart_height = rows.len() as f64 * ROW_HEIGHT;
    let height = (MARGIN_TOP + chart_height + 40.0).max(400.0);
    let width = MARGIN_LEFT + CHART_WIDTH + 40.0;

    let mut svg = format!(
        "<svg width=\"{:.0}\" height=\"{:.0}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        width, height
    );

    // 時間軸刻度
    for i in 0..=AXIS_TICKS {
        let t = span_start + chrono::Duration::seconds(span_seconds * i / AXIS_TICKS);
        let tick_x = x(t);
        svg.push_str(&format!(
            "<line x1=\"{x:.1}\" y1=\"{top:.1}\" x2=\"{x:.1}\" y2=\"{bottom:.1}\" stroke=\"#ccc\"/>\n\
             <text class=\"tick-label\" x=\"{x:.1}\" y=\"{label_y:.1}\" text-anchor=\"middle\">{label}</text>\n",
            x = tick_x,
            top = MARGIN_TOP,
            bottom = MARGIN_TOP + chart_height,
            label_y = MARGIN_TOP - 10.0,
            label = t.format("%m-%d %H:%M"),
        ));
    }

    // 每個 workflow 一列
    for (row, label) in rows.iter().enumerate() {
        let y = MARGIN_TOP + row as f64 * ROW_HEIGHT;
        svg.push_str(&format!(
            "<text class=\"row-label\" x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\">{label}</text>\n",
            x = MARGIN_LEFT - 10.0,
            y = y + ROW_HEIGHT / 2.0 + 4.0,
            label = escape_html(label),
        ));
    }

    for bar in bars {
        let x1 = x(bar.start);
        let x2 = x(bar.end);
        let y = MARGIN_TOP + bar.row as f64 * ROW_HEIGHT + 5.0;
        svg.push_str(&format!(
            "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" rx=\"2\" fill=\"{fill}\">\
             <title>run: {run}\nduration_seconds: {duration:.1}\nstatus: {status}</title></rect>\n",
            x = x1.min(x2),
            y = y,
            w = (x2 - x1).abs().max(2.0),
            h = ROW_HEIGHT - 10.0,
            fill = phase_color(bar.status),
            run = escape_html(bar.run),
            duration = bar.duration_seconds,
            status = escape_html(bar.status),
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn phase_color(status: &str) -> &'static str {
    match status {
        "Succeeded" => "#2ca02c",
        "Failed" | "Error" => "#d62728",
        "Running" => "#1f77b4",
        "Pending" => "#ff7f0e",
        _ => "#7f7f7f",
    }
}

fn escape_html(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            other => other.to_string(),
        })
        .collect()
}
