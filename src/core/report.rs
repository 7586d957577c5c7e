use crate::domain::model::{BatchReport, QualificationResult, QualificationStatus};
use crate::utils::error::{QualifierError, Result};
use serde::{Deserialize, Serialize};

/// One row of the results CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Page_URL")]
    pub page_url: String,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "DR")]
    pub dr: f64,
    #[serde(rename = "Traffic")]
    pub traffic: f64,
    #[serde(rename = "iGaming_In_Top20")]
    pub igaming_in_top20: bool,
    #[serde(rename = "Status")]
    pub status: QualificationStatus,
}

impl From<&QualificationResult> for ResultRow {
    fn from(result: &QualificationResult) -> Self {
        Self {
            page_url: result.page_url.clone(),
            domain: result.domain.clone(),
            dr: result.authority_score,
            traffic: result.traffic_estimate,
            igaming_in_top20: result.has_matching_keyword,
            status: result.status,
        }
    }
}

/// One matched keyword per row, for outreach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRow {
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Page_URL")]
    pub page_url: String,
    #[serde(rename = "Keyword")]
    pub keyword: String,
}

pub fn results_to_csv(results: &[QualificationResult]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if results.is_empty() {
        writer.write_record(["Page_URL", "Domain", "DR", "Traffic", "iGaming_In_Top20", "Status"])?;
    }
    for result in results {
        writer.serialize(ResultRow::from(result))?;
    }
    into_bytes(writer)
}

pub fn keywords_to_csv(results: &[QualificationResult]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let rows: Vec<KeywordRow> = results
        .iter()
        .flat_map(|r| {
            r.matched_keywords.iter().map(move |kw| KeywordRow {
                domain: r.domain.clone(),
                page_url: r.page_url.clone(),
                keyword: kw.clone(),
            })
        })
        .collect();
    if rows.is_empty() {
        writer.write_record(["Domain", "Page_URL", "Keyword"])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    into_bytes(writer)
}

pub fn results_from_csv(data: &[u8]) -> Result<Vec<ResultRow>> {
    let mut reader = csv::Reader::from_reader(data);
    let rows = reader.deserialize().collect::<std::result::Result<Vec<ResultRow>, _>>()?;
    Ok(rows)
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| QualifierError::IoError(e.into_error()))
}

/// Console line printed after each domain is evaluated.
pub fn domain_line(result: &QualificationResult) -> String {
    format!(
        "  DR: {}, Traffic: {}, iGaming in top 20: {} -> {}",
        result.authority_score, result.traffic_estimate, result.has_matching_keyword, result.status
    )
}

pub fn summary_lines(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![
        format!("Domains tested: {}", report.tested()),
        format!("Qualified pages: {}", report.qualified_count()),
    ];
    if !report.skipped.is_empty() {
        lines.push(format!(
            "Skipped (not in dataset): {}",
            report.skipped.join(", ")
        ));
    }
    lines.push(format!("Success rate: {:.0}%", report.success_rate()));

    let qualified: Vec<_> = report.qualified().collect();
    if !qualified.is_empty() {
        lines.push(String::new());
        lines.push("QUALIFIED PAGES:".to_string());
        for entry in qualified {
            lines.push(format!(
                "- {} (DR: {}, Traffic: {})",
                entry.page_url, entry.authority_score, entry.traffic_estimate
            ));
        }
    }
    lines
}
