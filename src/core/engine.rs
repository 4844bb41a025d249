use crate::domain::model::ReportOutcome;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// extract -> transform -> load；過濾後沒有記錄就提早結束，不產生空報表
    pub async fn run(&self) -> Result<ReportOutcome> {
        tracing::info!("📥 Fetching workflow listing...");
        let raw = self.pipeline.extract().await?;

        tracing::info!("🔄 Building report table...");
        let data = self.pipeline.transform(raw).await?;

        let Some(summary) = data.summary.clone() else {
            tracing::warn!("No workflows found for the specified filters");
            return Ok(ReportOutcome::NothingToReport);
        };

        println!("\n{}\n", summary);

        tracing::info!("💾 Rendering timeline for {} workflows...", data.records.len());
        let output_path = self.pipeline.load(data).await?;
        tracing::info!("📁 Report saved to: {}", output_path);

        Ok(ReportOutcome::Written {
            output_path,
            summary,
        })
    }
}
