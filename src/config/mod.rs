pub mod cli;
#[cfg(feature = "s3")]
pub mod s3;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::validation::{self, Validate};
use crate::utils::error::Result;
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::Parser;
use std::env;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "argo-report")]
#[command(about = "Generate Argo workflow reports and timeline visualizations")]
pub struct CliConfig {
    /// Specific date to report on (format: YYYY-MM-DD). Default is today.
    #[arg(long)]
    pub date: Option<String>,

    /// Workflow phase to filter
    #[arg(long, default_value = "Succeeded")]
    pub phase: String,

    /// Output HTML file name (auto-generated when omitted)
    #[arg(long)]
    pub output: Option<String>,

    /// Bearer token for authentication (or set ARGO_BEARER_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Number of days to include in the report
    #[arg(long, default_value = "1")]
    pub days: u32,

    /// Filter by workflow name (supports regex patterns)
    #[arg(long)]
    pub workflow: Option<String>,

    /// Directory the rendered report is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

/// 彙整後的執行設定。來源優先序：CLI > 設定檔 > 環境變數。
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub api_url: String,
    pub bearer_token: Option<String>,
    pub workflow_limit: usize,
    pub output_path: String,
    pub s3_bucket: Option<String>,
    pub s3_prefix: String,
    pub s3_region: String,
}

impl ReportSettings {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("ARGO_API_URL").unwrap_or_default(),
            bearer_token: env::var("ARGO_BEARER_TOKEN").ok().filter(|t| !t.is_empty()),
            workflow_limit: env::var("ARGO_WORKFLOW_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            output_path: "./output".to_string(),
            s3_bucket: env::var("S3_BUCKET").ok().filter(|b| !b.is_empty()),
            s3_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "argo-reports/".to_string()),
            s3_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-central-1".to_string()),
        }
    }

    pub fn apply_file(&mut self, file: &toml_config::TomlConfig) {
        if !file.api.url.is_empty() {
            self.api_url = file.api.url.clone();
        }
        if let Some(token) = &file.api.token {
            self.bearer_token = Some(token.clone());
        }
        if let Some(limit) = file.api.workflow_limit {
            self.workflow_limit = limit;
        }
        if let Some(report) = &file.report {
            if let Some(path) = &report.output_path {
                self.output_path = path.clone();
            }
        }
        if let Some(s3) = &file.s3 {
            if let Some(bucket) = &s3.bucket {
                self.s3_bucket = Some(bucket.clone());
            }
            if let Some(prefix) = &s3.prefix {
                self.s3_prefix = prefix.clone();
            }
            if let Some(region) = &s3.region {
                self.s3_region = region.clone();
            }
        }
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli(&mut self, cli: &CliConfig) {
        if let Some(token) = &cli.token {
            self.bearer_token = Some(token.clone());
        }
        if let Some(path) = &cli.output_path {
            self.output_path = path.clone();
        }
    }
}

impl ConfigProvider for ReportSettings {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    fn workflow_limit(&self) -> usize {
        self.workflow_limit
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for ReportSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_url", &self.api_url)?;
        validation::validate_positive_number("workflow_limit", self.workflow_limit, 1)?;
        validation::validate_non_empty_string("output_path", &self.output_path)?;

        if let Some(bucket) = &self.s3_bucket {
            validation::validate_s3_bucket_name("s3_bucket", bucket)?;
            validation::validate_aws_region("s3_region", &self.s3_region)?;
        }

        Ok(())
    }
}

/// 依報表參數產生輸出檔名：argo_wfs_YYYY_MM_DD[_status_phase][_days_N].html
/// 預設情境（單日、Succeeded）加上 _full；--output 直接覆蓋。
pub fn output_filename(
    start_day: NaiveDate,
    phase: &str,
    days: u32,
    custom: Option<&str>,
) -> String {
    if let Some(name) = custom {
        return name.to_string();
    }

    let mut parts = vec![
        "argo_wfs".to_string(),
        start_day.format("%Y_%m_%d").to_string(),
    ];

    if !phase.eq_ignore_ascii_case("succeeded") {
        parts.push(format!("status_{}", phase.to_lowercase()));
    }

    if days > 1 {
        parts.push(format!("days_{}", days));
    }

    if parts.len() == 2 {
        parts.push("full".to_string());
    }

    format!("{}.html", parts.join("_"))
}
