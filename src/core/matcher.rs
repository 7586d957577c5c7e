use crate::domain::model::DomainRecord;

pub const DEFAULT_DOMAIN_TERMS: &[&str] = &["casino", "poker", "bet", "gambl", "slot"];
pub const DEFAULT_KEYWORD_TERMS: &[&str] = &["blackjack", "casino", "poker", "bet", "gambl", "slot"];

/// Case-insensitive substring vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSet {
    terms: Vec<String>,
}

impl TermSet {
    /// Blank entries are dropped; an empty pattern would match everything.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    pub fn domain_defaults() -> Self {
        Self::new(DEFAULT_DOMAIN_TERMS)
    }

    pub fn keyword_defaults() -> Self {
        Self::new(DEFAULT_KEYWORD_TERMS)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.terms.iter().any(|term| text.contains(term.as_str()))
    }
}

/// Domains whose hostname suggests iGaming relevance, in input order.
pub fn filter_domains<'a, I>(domains: I, terms: &TermSet) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    domains
        .into_iter()
        .filter(|domain| terms.matches(domain))
        .map(str::to_string)
        .collect()
}

pub fn filter_records(records: &[DomainRecord], terms: &TermSet) -> Vec<String> {
    filter_domains(records.iter().map(|r| r.domain.as_str()), terms)
}
