use crate::domain::model::DomainRecord;
use crate::utils::error::{QualifierError, Result};
use reqwest::Client;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

pub const DOMAIN_COLUMN: &str = "Domain";
pub const DR_COLUMN: &str = "Domain Rating (DR)";
pub const TRAFFIC_COLUMN: &str = "Traffic (Ah)";

/// Where the domain export lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Path(PathBuf),
    Url(String),
}

impl DatasetSource {
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::Path(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

pub fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

pub async fn load_dataset(source: &DatasetSource, client: &Client) -> Result<Vec<DomainRecord>> {
    tracing::info!("Loading domain dataset from {}", source);
    let bytes = match source {
        DatasetSource::Path(path) => tokio::fs::read(path).await?,
        DatasetSource::Url(url) => {
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(QualifierError::HttpStatusError {
                    status: status.as_u16(),
                    target: url.clone(),
                });
            }
            response.bytes().await?.to_vec()
        }
    };

    let records = parse_dataset(bytes.as_slice())?;
    tracing::info!("Loaded {} domain rows", records.len());
    Ok(records)
}

/// Reads the export, checking the required columns before any row.
pub fn parse_dataset<R: Read>(reader: R) -> Result<Vec<DomainRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| QualifierError::MissingColumnError {
                column: name.to_string(),
            })
    };
    let domain_idx = column(DOMAIN_COLUMN)?;
    let dr_idx = column(DR_COLUMN)?;
    let traffic_idx = column(TRAFFIC_COLUMN)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let domain = row.get(domain_idx).unwrap_or("").trim();
        if domain.is_empty() {
            tracing::debug!("Skipping dataset line {} without a domain", line);
            continue;
        }

        let authority_score = parse_metric(row.get(dr_idx), line, DR_COLUMN)?;
        let traffic_estimate = parse_metric(row.get(traffic_idx), line, TRAFFIC_COLUMN)?;
        records.push(DomainRecord::new(domain, authority_score, traffic_estimate));
    }

    Ok(records)
}

fn parse_metric(cell: Option<&str>, line: u64, column: &str) -> Result<f64> {
    let cleaned: String = cell
        .unwrap_or("")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| QualifierError::InvalidRowError {
            line,
            column: column.to_string(),
            message: format!("'{}' is not a number", cell.unwrap_or("")),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const EXPORT: &str = "\
Domain,Domain Rating (DR),Traffic (Ah),Notes
casinoguide.com,25,2000,a
cooking.com,60,\"1,250,000\",b
slotsreview.net,12,,
,40,100,orphan
";

    #[test]
    fn test_parse_dataset() {
        let records = parse_dataset(EXPORT.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], DomainRecord::new("casinoguide.com", 25.0, 2000.0));
        assert_eq!(records[1].traffic_estimate, 1_250_000.0);
        assert_eq!(records[2].traffic_estimate, 0.0);
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let csv = "Domain,DR,Traffic (Ah)\ncasino.com,30,5000\n";
        match parse_dataset(csv.as_bytes()) {
            Err(QualifierError::MissingColumnError { column }) => assert_eq!(column, DR_COLUMN),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_metric_names_line() {
        let csv = "Domain,Domain Rating (DR),Traffic (Ah)\ncasino.com,high,5000\n";
        match parse_dataset(csv.as_bytes()) {
            Err(QualifierError::InvalidRowError { line, column, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(column, DR_COLUMN);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_byte_order_mark_on_first_header() {
        let csv = "\u{feff}Domain,Domain Rating (DR),Traffic (Ah)\npoker.com,40,9000\n";
        let records = parse_dataset(csv.as_bytes()).unwrap();
        assert_eq!(records[0].domain, "poker.com");
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            DatasetSource::parse("https://docs.google.com/export?format=csv"),
            DatasetSource::Url("https://docs.google.com/export?format=csv".to_string())
        );
        assert_eq!(
            DatasetSource::parse("data/domains.csv"),
            DatasetSource::Path(PathBuf::from("data/domains.csv"))
        );
    }

    #[tokio::test]
    async fn test_load_dataset_from_url() {
        let server = MockServer::start();
        let sheet = server.mock(|when, then| {
            when.method(GET).path("/export");
            then.status(200).header("Content-Type", "text/csv").body(EXPORT);
        });

        let source = DatasetSource::parse(&server.url("/export"));
        let records = load_dataset(&source, &Client::new()).await.unwrap();

        sheet.assert();
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_stalled_download_times_out() {
        let server = MockServer::start();
        let _sheet = server.mock(|when, then| {
            when.method(GET).path("/slow-export");
            then.status(200)
                .delay(Duration::from_secs(2))
                .body(EXPORT);
        });

        let source = DatasetSource::parse(&server.url("/slow-export"));
        let client = http_client(Duration::from_millis(200)).unwrap();
        let err = load_dataset(&source, &client).await.unwrap_err();

        match err {
            QualifierError::ApiError(e) => assert!(e.is_timeout()),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_dataset_from_missing_file() {
        let source = DatasetSource::Path(PathBuf::from("/nonexistent/domains.csv"));
        let err = load_dataset(&source, &Client::new()).await.unwrap_err();
        assert!(matches!(err, QualifierError::IoError(_)));
    }
}
