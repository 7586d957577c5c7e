pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "igaming-qualifier")]
#[command(about = "Checks iGaming domains for top-20 ranking keywords and qualifies them by DR and traffic")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Domain export: local CSV path or http(s) URL
    #[arg(long)]
    pub dataset: Option<String>,

    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Terms a hostname must contain to be tested
    #[arg(long, value_delimiter = ',')]
    pub domain_terms: Vec<String>,

    /// Terms a ranking keyword must contain to count as iGaming
    #[arg(long, value_delimiter = ',')]
    pub keyword_terms: Vec<String>,

    #[arg(long)]
    pub dr_threshold: Option<f64>,

    #[arg(long)]
    pub traffic_threshold: Option<f64>,

    /// Number of top ranking keywords to request per domain
    #[arg(long)]
    pub keyword_limit: Option<usize>,

    /// Delay between domains, in milliseconds
    #[arg(long)]
    pub pacing_ms: Option<u64>,

    /// Test only the first N candidate domains
    #[arg(short, long)]
    pub limit: Option<usize>,

    #[arg(long)]
    pub retry_attempts: Option<u32>,

    #[arg(short, long)]
    pub output_path: Option<String>,

    /// List candidate domains without calling the ranking API
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// File (or defaults), then environment credentials, then flags.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        config.apply_env_credentials();
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(dataset) = &self.dataset {
            config.source.dataset = dataset.clone();
        }
        if let Some(url) = &self.api_base_url {
            config.api.base_url = url.clone();
        }
        if !self.domain_terms.is_empty() {
            config.qualification.domain_terms = self.domain_terms.clone();
        }
        if !self.keyword_terms.is_empty() {
            config.qualification.keyword_terms = self.keyword_terms.clone();
        }
        if let Some(dr) = self.dr_threshold {
            config.qualification.dr_threshold = dr;
        }
        if let Some(traffic) = self.traffic_threshold {
            config.qualification.traffic_threshold = traffic;
        }
        if let Some(limit) = self.keyword_limit {
            config.api.keyword_limit = limit;
        }
        if let Some(pacing) = self.pacing_ms {
            config.batch.pacing_delay_ms = pacing;
        }
        if let Some(max) = self.limit {
            config.batch.max_domains = Some(max);
        }
        if let Some(retries) = self.retry_attempts {
            config.api.retry_attempts = retries;
        }
        if let Some(output) = &self.output_path {
            config.load.output_path = output.clone();
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file_values() {
        let cli = CliConfig::parse_from([
            "igaming-qualifier",
            "--dataset",
            "https://example.com/export.csv",
            "--keyword-terms",
            "roulette,bingo",
            "--dr-threshold",
            "35",
            "--limit",
            "10",
            "--pacing-ms",
            "0",
        ]);

        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.source.dataset, "https://example.com/export.csv");
        assert_eq!(config.qualification.keyword_terms, vec!["roulette", "bingo"]);
        assert_eq!(config.qualification.domain_terms.len(), 5);
        assert_eq!(config.qualification.dr_threshold, 35.0);
        assert_eq!(config.qualification.traffic_threshold, 1500.0);
        assert_eq!(config.batch.max_domains, Some(10));
        assert_eq!(config.batch.pacing_delay_ms, 0);
    }

    #[test]
    fn test_no_flags_keep_defaults() {
        let cli = CliConfig::parse_from(["igaming-qualifier"]);
        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.batch.pacing_delay_ms, 2000);
        assert_eq!(config.batch.max_domains, None);
        assert!(!cli.dry_run);
    }
}
