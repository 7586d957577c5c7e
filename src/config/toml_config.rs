use crate::adapters::dataforseo::{
    Credentials, RankingClientConfig, DEFAULT_BASE_URL, DEFAULT_KEYWORD_LIMIT,
    DEFAULT_LANGUAGE_CODE, DEFAULT_LOCATION_CODE,
};
use crate::adapters::dataset::DatasetSource;
use crate::core::matcher::{TermSet, DEFAULT_DOMAIN_TERMS, DEFAULT_KEYWORD_TERMS};
use crate::core::qualification::{
    QualificationEngine, Thresholds, DEFAULT_DR_THRESHOLD, DEFAULT_TRAFFIC_THRESHOLD,
};
use crate::utils::error::{QualifierError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const LOGIN_ENV: &str = "DATAFORSEO_LOGIN";
pub const PASSWORD_ENV: &str = "DATAFORSEO_PASSWORD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub source: SourceConfig,
    pub qualification: QualificationConfig,
    pub batch: BatchConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub login: Option<String>,
    pub password: Option<String>,
    pub location_code: u32,
    pub language_code: String,
    pub keyword_limit: usize,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login: None,
            password: None,
            location_code: DEFAULT_LOCATION_CODE,
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            timeout_seconds: 30,
            retry_attempts: 0,
            retry_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Local CSV path or http(s) URL of the domain export.
    pub dataset: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dataset: "linkbuilder_export.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationConfig {
    pub domain_terms: Vec<String>,
    pub keyword_terms: Vec<String>,
    pub dr_threshold: f64,
    pub traffic_threshold: f64,
}

impl Default for QualificationConfig {
    fn default() -> Self {
        Self {
            domain_terms: DEFAULT_DOMAIN_TERMS.iter().map(|t| t.to_string()).collect(),
            keyword_terms: DEFAULT_KEYWORD_TERMS.iter().map(|t| t.to_string()).collect(),
            dr_threshold: DEFAULT_DR_THRESHOLD,
            traffic_threshold: DEFAULT_TRAFFIC_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub pacing_delay_ms: u64,
    /// Test only the first N candidates.
    pub max_domains: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: 2000,
            max_domains: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub results_filename: String,
    /// Empty disables the matched keyword export.
    pub keywords_filename: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            results_filename: "qualified_igaming_pages.csv".to_string(),
            keywords_filename: "igaming_keywords.csv".to_string(),
        }
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QualifierError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| QualifierError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| QualifierError::config(e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply_env_credentials(&mut self) {
        self.apply_credentials_from(|key| std::env::var(key).ok());
    }

    /// Environment credentials take precedence over the file.
    pub fn apply_credentials_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(login) = lookup(LOGIN_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.login = Some(login);
        }
        if let Some(password) = lookup(PASSWORD_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.password = Some(password);
        }
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let login = validation::validate_required_field("api.login", &self.api.login)?;
        let password = validation::validate_required_field("api.password", &self.api.password)?;
        Ok(Credentials {
            login: login.to_string(),
            password: password.to_string(),
        })
    }

    pub fn ranking_client_config(&self) -> Result<RankingClientConfig> {
        let mut config = RankingClientConfig::new(self.credentials()?);
        config.base_url = self.api.base_url.clone();
        config.location_code = self.api.location_code;
        config.language_code = self.api.language_code.clone();
        config.limit = self.api.keyword_limit;
        config.timeout = self.request_timeout();
        config.retry_attempts = self.api.retry_attempts;
        config.retry_delay = Duration::from_millis(self.api.retry_delay_ms);
        Ok(config)
    }

    /// Per-request HTTP timeout, shared by the ranking API and dataset download.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    pub fn dataset_source(&self) -> DatasetSource {
        DatasetSource::parse(&self.source.dataset)
    }

    pub fn domain_terms(&self) -> TermSet {
        TermSet::new(&self.qualification.domain_terms)
    }

    pub fn qualification_engine(&self) -> QualificationEngine {
        QualificationEngine::new(
            TermSet::new(&self.qualification.keyword_terms),
            Thresholds {
                authority: self.qualification.dr_threshold,
                traffic: self.qualification.traffic_threshold,
            },
        )
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.batch.pacing_delay_ms)
    }

    pub fn keywords_export(&self) -> Option<&str> {
        let name = self.load.keywords_filename.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Checks that must pass before any domain is processed, credentials included.
    pub fn validate_for_run(&self) -> Result<()> {
        self.validate()?;
        self.credentials().map(|_| ())
    }
}

impl Validate for TomlConfig {
    /// Everything except credentials, which a dry run does not need.
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_non_empty_string("api.language_code", &self.api.language_code)?;
        validation::validate_positive_number("api.keyword_limit", self.api.keyword_limit, 1)?;
        validation::validate_positive_number(
            "api.timeout_seconds",
            self.api.timeout_seconds as usize,
            1,
        )?;
        validation::validate_dataset_location("source.dataset", &self.source.dataset)?;
        validation::validate_terms("qualification.domain_terms", &self.qualification.domain_terms)?;
        validation::validate_terms(
            "qualification.keyword_terms",
            &self.qualification.keyword_terms,
        )?;
        validation::validate_threshold("qualification.dr_threshold", self.qualification.dr_threshold)?;
        validation::validate_threshold(
            "qualification.traffic_threshold",
            self.qualification.traffic_threshold,
        )?;
        if let Some(max) = self.batch.max_domains {
            validation::validate_positive_number("batch.max_domains", max, 1)?;
        }
        validation::validate_non_empty_string("load.output_path", &self.load.output_path)?;
        validation::validate_non_empty_string("load.results_filename", &self.load.results_filename)?;
        Ok(())
    }
}
