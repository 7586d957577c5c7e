use crate::domain::model::{BatchReport, CandidateSet, KeywordList};
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

/// Source of a domain's top ranking keywords.
#[async_trait]
pub trait KeywordSource: Send + Sync {
    async fn top_keywords(&self, domain: &str) -> Result<KeywordList>;

    /// Fail-soft variant: any error is logged and reported as no keywords.
    async fn keywords_or_empty(&self, domain: &str) -> KeywordList {
        match self.top_keywords(domain).await {
            Ok(keywords) => keywords,
            Err(e) => {
                tracing::warn!("Keyword lookup failed for {}: {}", domain, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<CandidateSet>;
    async fn transform(&self, candidates: CandidateSet) -> Result<BatchReport>;
    async fn load(&self, report: &BatchReport) -> Result<String>;
}
