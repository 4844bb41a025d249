use crate::domain::model::{EnrichedRecord, ReportData};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn bearer_token(&self) -> Option<&str>;
    fn workflow_limit(&self) -> usize;
    fn output_path(&self) -> &str;

    /// Argo 的列表端點：依 phase 標籤過濾並限制筆數
    fn list_url(&self, phase: &str) -> String {
        format!(
            "{}?listOptions.labelSelector=workflows.argoproj.io/phase={}&listOptions.limit={}",
            self.api_url(),
            phase,
            self.workflow_limit()
        )
    }
}

pub trait TimelineRenderer: Send + Sync {
    fn render(&self, records: &[EnrichedRecord], title: &str) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<serde_json::Value>;
    async fn transform(&self, raw: serde_json::Value) -> Result<ReportData>;
    async fn load(&self, data: ReportData) -> Result<String>;
}
