use thiserror::Error;

#[derive(Error, Debug)]
pub enum QualifierError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {target}")]
    HttpStatusError { status: u16, target: String },

    #[error("Provider rejected task for {target}: {status_code} {message}")]
    ProviderError {
        target: String,
        status_code: u32,
        message: String,
    },

    #[error("Malformed API response for {target}: {message}")]
    MalformedResponse { target: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Dataset is missing required column '{column}'")]
    MissingColumnError { column: String },

    #[error("Dataset line {line}, column '{column}': {message}")]
    InvalidRowError {
        line: u64,
        column: String,
        message: String,
    },

    #[error("Domain '{domain}' not found in dataset")]
    DatasetLookupError { domain: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Provider,
    Dataset,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QualifierError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::ProviderError { .. } | Self::MalformedResponse { .. } => ErrorCategory::Provider,
            Self::CsvError(_)
            | Self::MissingColumnError { .. }
            | Self::InvalidRowError { .. }
            | Self::DatasetLookupError { .. } => ErrorCategory::Dataset,
            Self::IoError(_) => ErrorCategory::Output,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DatasetLookupError { .. } => ErrorSeverity::Low,
            Self::ApiError(_)
            | Self::HttpStatusError { .. }
            | Self::ProviderError { .. }
            | Self::MalformedResponse { .. } => ErrorSeverity::Medium,
            Self::CsvError(_)
            | Self::MissingColumnError { .. }
            | Self::InvalidRowError { .. } => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Errors worth another attempt when retries are enabled.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ApiError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::HttpStatusError { status, .. } => *status == 429 || *status >= 500,
            Self::MalformedResponse { .. } => true,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the API base URL",
            ErrorCategory::Provider => {
                "Check the account balance and request parameters at the ranking provider"
            }
            ErrorCategory::Dataset => {
                "Make sure the dataset has 'Domain', 'Domain Rating (DR)' and 'Traffic (Ah)' columns"
            }
            ErrorCategory::Output => "Check that the output directory exists and is writable",
            ErrorCategory::Configuration => {
                "Set DATAFORSEO_LOGIN / DATAFORSEO_PASSWORD and review the configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            Self::MissingColumnError { column } => {
                format!("The input dataset has no '{}' column", column)
            }
            Self::ApiError(_) => "Could not reach the ranking API".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QualifierError>;
