use serde::{Deserialize, Serialize};

/// Ranking keywords for one domain, in provider position order.
pub type KeywordList = Vec<String>;

/// One row of the input dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub domain: String,
    pub authority_score: f64,
    pub traffic_estimate: f64,
}

impl DomainRecord {
    pub fn new(domain: impl Into<String>, authority_score: f64, traffic_estimate: f64) -> Self {
        Self {
            domain: domain.into(),
            authority_score,
            traffic_estimate,
        }
    }

    /// Hostname sent to the ranking provider. Strips a scheme and any path
    /// when the dataset cell carries a full URL.
    pub fn host(&self) -> &str {
        let rest = match self.domain.split_once("://") {
            Some((_, rest)) => rest,
            None => self.domain.as_str(),
        };
        rest.split(['/', '?', '#']).next().unwrap_or(rest)
    }

    /// Page evaluated for this domain: its root page.
    pub fn page_url(&self) -> String {
        format!("https://{}", self.host())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationStatus {
    Qualified,
    NotQualified,
}

impl QualificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qualified => "QUALIFIED",
            Self::NotQualified => "NOT_QUALIFIED",
        }
    }
}

impl std::fmt::Display for QualificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualificationResult {
    pub page_url: String,
    pub domain: String,
    pub authority_score: f64,
    pub traffic_estimate: f64,
    pub has_matching_keyword: bool,
    pub matched_keywords: Vec<String>,
    pub status: QualificationStatus,
}

impl QualificationResult {
    pub fn is_qualified(&self) -> bool {
        self.status == QualificationStatus::Qualified
    }
}

/// Output of the extract phase: the loaded dataset and the domains to test.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub dataset: Vec<DomainRecord>,
    pub candidates: Vec<String>,
    /// Domains that passed the filter before any slice was applied.
    pub matched_total: usize,
}

impl CandidateSet {
    /// First dataset row whose `Domain` cell equals `domain` exactly.
    pub fn lookup(&self, domain: &str) -> Option<&DomainRecord> {
        self.dataset.iter().find(|record| record.domain == domain)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub results: Vec<QualificationResult>,
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn tested(&self) -> usize {
        self.results.len()
    }

    pub fn qualified(&self) -> impl Iterator<Item = &QualificationResult> {
        self.results.iter().filter(|r| r.is_qualified())
    }

    pub fn qualified_count(&self) -> usize {
        self.qualified().count()
    }

    /// Qualified share of tested domains, in percent. Zero for an empty batch.
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.qualified_count() as f64 / self.results.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(domain: &str, status: QualificationStatus) -> QualificationResult {
        QualificationResult {
            page_url: format!("https://{}", domain),
            domain: domain.to_string(),
            authority_score: 30.0,
            traffic_estimate: 5000.0,
            has_matching_keyword: status == QualificationStatus::Qualified,
            matched_keywords: vec![],
            status,
        }
    }

    #[test]
    fn test_host_strips_scheme_and_path() {
        assert_eq!(DomainRecord::new("casino.com", 0.0, 0.0).host(), "casino.com");
        assert_eq!(
            DomainRecord::new("https://www.slots.io/reviews?x=1", 0.0, 0.0).host(),
            "www.slots.io"
        );
        assert_eq!(DomainRecord::new("poker.net/blog", 0.0, 0.0).host(), "poker.net");
    }

    #[test]
    fn test_page_url_uses_root_page() {
        let record = DomainRecord::new("http://bet365.com/en", 70.0, 1e6);
        assert_eq!(record.page_url(), "https://bet365.com");
    }

    #[test]
    fn test_success_rate() {
        let report = BatchReport {
            results: vec![
                result("a-casino.com", QualificationStatus::Qualified),
                result("b-casino.com", QualificationStatus::NotQualified),
                result("c-casino.com", QualificationStatus::NotQualified),
                result("d-casino.com", QualificationStatus::Qualified),
            ],
            skipped: vec![],
        };
        assert_eq!(report.tested(), 4);
        assert_eq!(report.qualified_count(), 2);
        assert_eq!(report.success_rate(), 50.0);
    }

    #[test]
    fn test_success_rate_of_empty_batch_is_zero() {
        assert_eq!(BatchReport::default().success_rate(), 0.0);
    }

    #[test]
    fn test_lookup_matches_exact_domain() {
        let set = CandidateSet {
            dataset: vec![
                DomainRecord::new("casino.com", 25.0, 2000.0),
                DomainRecord::new("casino.com.au", 10.0, 100.0),
            ],
            candidates: vec![],
            matched_total: 0,
        };
        assert_eq!(set.lookup("casino.com").unwrap().authority_score, 25.0);
        assert!(set.lookup("CASINO.com").is_none());
    }
}
