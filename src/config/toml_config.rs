use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiSection,
    pub report: Option<ReportSection>,
    pub s3: Option<S3Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    pub url: String,
    pub token: Option<String>,
    pub workflow_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Section {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub region: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReportError::InvalidConfigValueError {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ARGO_BEARER_TOKEN})，未設定的維持原字樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env substitution pattern is valid");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.url", &self.api.url)?;

        if let Some(limit) = self.api.workflow_limit {
            validation::validate_positive_number("api.workflow_limit", limit, 1)?;
        }

        if let Some(report) = &self.report {
            if let Some(path) = &report.output_path {
                validation::validate_non_empty_string("report.output_path", path)?;
            }
        }

        if let Some(s3) = &self.s3 {
            if let Some(bucket) = &s3.bucket {
                validation::validate_s3_bucket_name("s3.bucket", bucket)?;
            }
            if let Some(region) = &s3.region {
                validation::validate_aws_region("s3.region", region)?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_config() {
        let toml_content = r#"
[api]
url = "https://argo.example.com/api/v1/workflows/batch"
workflow_limit = 500

[report]
output_path = "./reports"

[s3]
bucket = "argo-reports"
prefix = "nightly/"
region = "eu-central-1"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.url, "https://argo.example.com/api/v1/workflows/batch");
        assert_eq!(config.api.workflow_limit, Some(500));
        assert_eq!(
            config.report.unwrap().output_path.as_deref(),
            Some("./reports")
        );
        assert_eq!(config.s3.unwrap().bucket.as_deref(), Some("argo-reports"));
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_ARGO_URL", "https://argo.test.com/workflows");

        let toml_content = r#"
[api]
url = "${TEST_ARGO_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.url, "https://argo.test.com/workflows");

        std::env::remove_var("TEST_ARGO_URL");
    }

    #[test]
    fn test_unset_env_var_kept_literal() {
        let toml_content = r#"
[api]
url = "${DEFINITELY_NOT_SET_ANYWHERE_42}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.url, "${DEFINITELY_NOT_SET_ANYWHERE_42}");
    }

    #[test]
    fn test_config_validation_rejects_bad_url() {
        let toml_content = r#"
[api]
url = "invalid-url"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[api]
url = "https://argo.example.com/api/v1/workflows/batch"
"#;
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api.url, "https://argo.example.com/api/v1/workflows/batch");
    }
}
