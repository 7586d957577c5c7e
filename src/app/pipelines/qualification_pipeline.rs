use crate::adapters::dataset;
use crate::config::TomlConfig;
use crate::core::matcher::{self, TermSet};
use crate::core::qualification::QualificationEngine;
use crate::core::report;
use crate::core::{BatchReport, CandidateSet, KeywordSource, Pipeline, Storage};
use crate::utils::error::{QualifierError, Result};
use std::time::Duration;

/// Loads the export, filters iGaming-looking domains, then checks each one's
/// ranking keywords one at a time with a fixed pause in between.
pub struct QualificationPipeline<S: Storage, K: KeywordSource> {
    storage: S,
    keywords: K,
    config: TomlConfig,
    domain_terms: TermSet,
    engine: QualificationEngine,
    pacing: Duration,
    dataset_timeout: Duration,
}

impl<S: Storage, K: KeywordSource> QualificationPipeline<S, K> {
    pub fn new(storage: S, keywords: K, config: TomlConfig) -> Self {
        Self {
            storage,
            keywords,
            domain_terms: config.domain_terms(),
            engine: config.qualification_engine(),
            pacing: config.pacing_delay(),
            dataset_timeout: config.request_timeout(),
            config,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, K: KeywordSource> Pipeline for QualificationPipeline<S, K> {
    async fn extract(&self) -> Result<CandidateSet> {
        let client = dataset::http_client(self.dataset_timeout)?;
        let dataset = dataset::load_dataset(&self.config.dataset_source(), &client).await?;

        let mut candidates = matcher::filter_records(&dataset, &self.domain_terms);
        let matched_total = candidates.len();
        tracing::info!("{} of {} domains look like iGaming sites", matched_total, dataset.len());

        if let Some(max) = self.config.batch.max_domains {
            candidates.truncate(max);
        }

        Ok(CandidateSet {
            dataset,
            candidates,
            matched_total,
        })
    }

    async fn transform(&self, candidates: CandidateSet) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        for domain in &candidates.candidates {
            println!("Checking: {}", domain);

            let Some(record) = candidates.lookup(domain) else {
                let err = QualifierError::DatasetLookupError {
                    domain: domain.clone(),
                };
                tracing::warn!("Skipping {}: {}", domain, err);
                report.skipped.push(domain.clone());
                continue;
            };

            let keywords = self.keywords.keywords_or_empty(record.host()).await;
            tracing::debug!("{} returned {} ranking keywords", domain, keywords.len());

            let result = self.engine.evaluate(record, &keywords);
            println!("{}", report::domain_line(&result));
            if result.has_matching_keyword {
                let preview: Vec<_> = result.matched_keywords.iter().take(2).collect();
                println!("  iGaming keywords: {:?}", preview);
            }
            println!();

            report.results.push(result);

            // Provider rate limit: pause after every domain that made a call.
            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        Ok(report)
    }

    async fn load(&self, report: &BatchReport) -> Result<String> {
        let results_name = &self.config.load.results_filename;
        let csv = report::results_to_csv(&report.results)?;
        self.storage.write_file(results_name, &csv).await?;
        tracing::info!("Wrote {} result rows to {}", report.results.len(), results_name);

        if let Some(keywords_name) = self.config.keywords_export() {
            let csv = report::keywords_to_csv(&report.results)?;
            self.storage.write_file(keywords_name, &csv).await?;
            tracing::debug!("Wrote matched keywords to {}", keywords_name);
        }

        Ok(format!(
            "{}/{}",
            self.config.load.output_path.trim_end_matches('/'),
            results_name
        ))
    }
}
