use crate::core::matcher::TermSet;
use crate::domain::model::{DomainRecord, QualificationResult, QualificationStatus};

pub const DEFAULT_DR_THRESHOLD: f64 = 20.0;
pub const DEFAULT_TRAFFIC_THRESHOLD: f64 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub authority: f64,
    pub traffic: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            authority: DEFAULT_DR_THRESHOLD,
            traffic: DEFAULT_TRAFFIC_THRESHOLD,
        }
    }
}

pub fn has_matching_keyword(keywords: &[String], terms: &TermSet) -> bool {
    keywords.iter().any(|kw| terms.matches(kw))
}

pub fn matched_keywords(keywords: &[String], terms: &TermSet) -> Vec<String> {
    keywords.iter().filter(|kw| terms.matches(kw)).cloned().collect()
}

pub fn status_for(
    authority_score: f64,
    traffic_estimate: f64,
    has_match: bool,
    thresholds: Thresholds,
) -> QualificationStatus {
    if authority_score >= thresholds.authority && traffic_estimate >= thresholds.traffic && has_match {
        QualificationStatus::Qualified
    } else {
        QualificationStatus::NotQualified
    }
}

/// Pure pass/fail decision for one domain.
#[derive(Debug, Clone)]
pub struct QualificationEngine {
    terms: TermSet,
    thresholds: Thresholds,
}

impl QualificationEngine {
    pub fn new(terms: TermSet, thresholds: Thresholds) -> Self {
        Self { terms, thresholds }
    }

    pub fn evaluate(&self, record: &DomainRecord, keywords: &[String]) -> QualificationResult {
        let matched = matched_keywords(keywords, &self.terms);
        let has_match = !matched.is_empty();

        QualificationResult {
            page_url: record.page_url(),
            domain: record.domain.clone(),
            authority_score: record.authority_score,
            traffic_estimate: record.traffic_estimate,
            has_matching_keyword: has_match,
            matched_keywords: matched,
            status: status_for(
                record.authority_score,
                record.traffic_estimate,
                has_match,
                self.thresholds,
            ),
        }
    }
}

impl Default for QualificationEngine {
    fn default() -> Self {
        Self::new(TermSet::keyword_defaults(), Thresholds::default())
    }
}
