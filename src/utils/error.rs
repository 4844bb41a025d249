use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON decoding error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid workflow pattern '{pattern}': {source}")]
    PatternError {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid date '{value}': expected format {expected}")]
    DateFormatError {
        value: String,
        expected: &'static str,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ApiError(_) => ErrorCategory::Network,
            ReportError::IoError(_) => ErrorCategory::Io,
            ReportError::SerializationError(_) | ReportError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            ReportError::PatternError { .. }
            | ReportError::DateFormatError { .. }
            | ReportError::ConfigError { .. }
            | ReportError::MissingConfigError { .. }
            | ReportError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReportError::ApiError(_) => ErrorSeverity::Medium,
            ReportError::SerializationError(_) | ReportError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            ReportError::IoError(_) => ErrorSeverity::Critical,
            ReportError::PatternError { .. }
            | ReportError::DateFormatError { .. }
            | ReportError::ConfigError { .. }
            | ReportError::MissingConfigError { .. }
            | ReportError::InvalidConfigValueError { .. } => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::ApiError(e) => format!("Could not reach the Argo API: {}", e),
            ReportError::IoError(e) => format!("File operation failed: {}", e),
            ReportError::SerializationError(e) => {
                format!("The API response was not valid JSON: {}", e)
            }
            ReportError::PatternError { pattern, .. } => {
                format!("The workflow filter '{}' is not a valid regex", pattern)
            }
            ReportError::DateFormatError { value, expected } => {
                format!("'{}' is not a valid date (expected {})", value, expected)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check ARGO_API_URL and your bearer token, then verify the server is reachable"
            }
            ErrorCategory::Data => "Inspect the API response; the listing shape may have changed",
            ErrorCategory::Configuration => {
                "Fix the flagged configuration value and run the command again"
            }
            ErrorCategory::Io => "Check that the output path exists and is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
