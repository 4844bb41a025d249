use crate::core::enrich::enrich;
use crate::core::fields::FieldMap;
use crate::core::filter::{filter_records, ReportWindow, WorkflowMatcher};
use crate::core::flatten::flatten;
use crate::core::summary::summarize;
use crate::domain::model::ReportData;
use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TimelineRenderer};
use crate::utils::error::{ReportError, Result};
use reqwest::Client;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CHART_TITLE: &str = "Argo Workflow Timeline";

/// 單次報表執行的參數（由 CLI 組出，pipeline 不讀環境狀態）
#[derive(Debug)]
pub struct ReportRequest {
    pub phase: String,
    pub window: ReportWindow,
    pub matcher: Option<WorkflowMatcher>,
    pub output_file: String,
}

pub struct ReportPipeline<S: Storage, C: ConfigProvider, R: TimelineRenderer> {
    storage: S,
    config: C,
    renderer: R,
    request: ReportRequest,
    fields: FieldMap,
    client: Client,
}

impl<S: Storage, C: ConfigProvider, R: TimelineRenderer> ReportPipeline<S, C, R> {
    pub fn new(storage: S, config: C, renderer: R, request: ReportRequest) -> Self {
        Self {
            storage,
            config,
            renderer,
            request,
            fields: FieldMap::workflow_defaults(),
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, R: TimelineRenderer> Pipeline for ReportPipeline<S, C, R> {
    async fn extract(&self) -> Result<serde_json::Value> {
        let url = self.config.list_url(&self.request.phase);
        tracing::debug!("📡 Making API request to: {}", url);

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(REQUEST_TIMEOUT);

        if let Some(token) = self.config.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        tracing::debug!("📡 API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ReportError::ProcessingError {
                message: format!("API request failed with status: {}", response.status()),
            });
        }

        Ok(response.json().await?)
    }

    async fn transform(&self, raw: serde_json::Value) -> Result<ReportData> {
        let flat = flatten(&raw, &self.fields);
        tracing::info!("🔄 Flattened {} workflow records", flat.len());

        let enriched = enrich(flat);
        let records = filter_records(enriched, &self.request.window, self.request.matcher.as_ref());
        let summary = summarize(&records);

        Ok(ReportData { records, summary })
    }

    async fn load(&self, data: ReportData) -> Result<String> {
        let html = self.renderer.render(&data.records, CHART_TITLE)?;

        tracing::debug!(
            "💾 Writing report ({} bytes) to storage",
            html.len()
        );
        self.storage
            .write_file(&self.request.output_file, &html)
            .await?;

        Ok(format!(
            "{}/{}",
            self.config.output_path(),
            self.request.output_file
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ReportError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        api_url: String,
        bearer_token: Option<String>,
    }

    impl ConfigProvider for MockConfig {
        fn api_url(&self) -> &str {
            &self.api_url
        }

        fn bearer_token(&self) -> Option<&str> {
            self.bearer_token.as_deref()
        }

        fn workflow_limit(&self) -> usize {
            1000
        }

        fn output_path(&self) -> &str {
            "test_output"
        }
    }

    fn request_for(day: NaiveDate) -> ReportRequest {
        ReportRequest {
            phase: "Succeeded".to_string(),
            window: ReportWindow::for_day(day, 1),
            matcher: None,
            output_file: "report.html".to_string(),
        }
    }

    fn listing() -> serde_json::Value {
        serde_json::json!({
            "items": [
                {
                    "metadata": {"name": "etl-daily-a1b2c"},
                    "status": {
                        "phase": "Succeeded",
                        "startedAt": "2024-01-15T02:00:00Z",
                        "finishedAt": "2024-01-15T02:45:00Z"
                    }
                },
                {
                    "metadata": {"name": "report-hourly-d4e5f"},
                    "status": {
                        "phase": "Succeeded",
                        "startedAt": "2024-01-15T01:00:00Z",
                        "finishedAt": "2024-01-15T01:10:00Z"
                    }
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_extract_sends_phase_and_limit_query() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/workflows/batch")
                .query_param(
                    "listOptions.labelSelector",
                    "workflows.argoproj.io/phase=Succeeded",
                )
                .query_param("listOptions.limit", "1000");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(listing());
        });

        let config = MockConfig {
            api_url: server.url("/api/v1/workflows/batch"),
            bearer_token: None,
        };
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let pipeline =
            ReportPipeline::new(MockStorage::new(), config, crate::render::HtmlTimeline, request_for(day));

        let raw = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert_eq!(raw["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_extract_sends_bearer_token() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/workflows")
                .header("Authorization", "Bearer secret-token");
            then.status(200).json_body(serde_json::json!({"items": []}));
        });

        let config = MockConfig {
            api_url: server.url("/workflows"),
            bearer_token: Some("secret-token".to_string()),
        };
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let pipeline =
            ReportPipeline::new(MockStorage::new(), config, crate::render::HtmlTimeline, request_for(day));

        pipeline.extract().await.unwrap();
        api_mock.assert();
    }

    #[tokio::test]
    async fn test_extract_non_success_status_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/workflows");
            then.status(503);
        });

        let config = MockConfig {
            api_url: server.url("/workflows"),
            bearer_token: None,
        };
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let pipeline =
            ReportPipeline::new(MockStorage::new(), config, crate::render::HtmlTimeline, request_for(day));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, ReportError::ProcessingError { .. }));
    }

    #[tokio::test]
    async fn test_transform_filters_and_summarizes() {
        let config = MockConfig {
            api_url: "http://unused.example.com".to_string(),
            bearer_token: None,
        };
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let pipeline =
            ReportPipeline::new(MockStorage::new(), config, crate::render::HtmlTimeline, request_for(day));

        let data = pipeline.transform(listing()).await.unwrap();

        assert_eq!(data.records.len(), 2);
        // 依一天內的時刻排序：01:00 在 02:00 之前
        assert_eq!(data.records[0].text("run"), Some("report-hourly-d4e5f"));
        let summary = data.summary.unwrap();
        assert_eq!(summary.total_workflows, 2);
        assert_eq!(summary.unique_workflows, 2);
    }

    #[tokio::test]
    async fn test_transform_window_excludes_other_days() {
        let config = MockConfig {
            api_url: "http://unused.example.com".to_string(),
            bearer_token: None,
        };
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let pipeline =
            ReportPipeline::new(MockStorage::new(), config, crate::render::HtmlTimeline, request_for(day));

        let data = pipeline.transform(listing()).await.unwrap();

        assert!(data.records.is_empty());
        assert!(data.summary.is_none());
    }

    #[tokio::test]
    async fn test_load_writes_rendered_artifact() {
        let storage = MockStorage::new();
        let config = MockConfig {
            api_url: "http://unused.example.com".to_string(),
            bearer_token: None,
        };
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let pipeline = ReportPipeline::new(
            storage.clone(),
            config,
            crate::render::HtmlTimeline,
            request_for(day),
        );

        let data = pipeline.transform(listing()).await.unwrap();
        let output_path = pipeline.load(data).await.unwrap();

        assert_eq!(output_path, "test_output/report.html");
        let html = storage.get_file("report.html").await.unwrap();
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("Argo Workflow Timeline"));
        assert!(html.contains("etl-daily"));
    }
}
