//! DataForSEO Labs "ranked keywords" client.
//!
//! `POST {base_url}/dataforseo_labs/google/ranked_keywords/live` with a one-task
//! JSON array body and HTTP Basic credentials. The response is decoded into a
//! strict schema; [`KeywordSource::keywords_or_empty`] gives the fail-soft view.

use crate::domain::model::KeywordList;
use crate::domain::ports::KeywordSource;
use crate::utils::error::{QualifierError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com/v3";
pub const RANKED_KEYWORDS_PATH: &str = "/dataforseo_labs/google/ranked_keywords/live";
pub const DEFAULT_LOCATION_CODE: u32 = 2840;
pub const DEFAULT_LANGUAGE_CODE: &str = "en";
pub const DEFAULT_KEYWORD_LIMIT: usize = 20;

const STATUS_OK: u32 = 20000;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RankingClientConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub location_code: u32,
    pub language_code: String,
    pub limit: usize,
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl RankingClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            location_code: DEFAULT_LOCATION_CODE,
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            limit: DEFAULT_KEYWORD_LIMIT,
            timeout: Duration::from_secs(30),
            retry_attempts: 0,
            retry_delay: Duration::from_secs(1),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), RANKED_KEYWORDS_PATH)
    }
}

#[derive(Debug, Serialize)]
struct RankedKeywordsTask<'a> {
    target: &'a str,
    location_code: u32,
    language_code: &'a str,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct RankedKeywordsResponse {
    status_code: Option<u32>,
    status_message: Option<String>,
    tasks: Option<Vec<TaskEnvelope>>,
}

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    status_code: Option<u32>,
    status_message: Option<String>,
    result: Option<Vec<TaskResult>>,
}

#[derive(Debug, Deserialize)]
struct TaskResult {
    items: Option<Vec<RankedItem>>,
}

#[derive(Debug, Deserialize)]
struct RankedItem {
    keyword_data: Option<KeywordData>,
}

#[derive(Debug, Deserialize)]
struct KeywordData {
    keyword: Option<String>,
}

pub struct RankingClient {
    client: Client,
    config: RankingClientConfig,
}

impl RankingClient {
    pub fn new(config: RankingClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn fetch_once(&self, target: &str) -> Result<KeywordList> {
        let body = [RankedKeywordsTask {
            target,
            location_code: self.config.location_code,
            language_code: &self.config.language_code,
            limit: self.config.limit,
        }];

        tracing::debug!("POST {} for {}", self.config.endpoint(), target);
        let response = self
            .client
            .post(self.config.endpoint())
            .basic_auth(
                &self.config.credentials.login,
                Some(&self.config.credentials.password),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Ranking API response status: {}", status);
        if !status.is_success() {
            return Err(QualifierError::HttpStatusError {
                status: status.as_u16(),
                target: target.to_string(),
            });
        }

        let text = response.text().await?;
        parse_ranked_keywords(target, &text, self.config.limit)
    }
}

#[async_trait]
impl KeywordSource for RankingClient {
    async fn top_keywords(&self, domain: &str) -> Result<KeywordList> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(domain).await {
                Ok(keywords) => return Ok(keywords),
                Err(e) if attempt < self.config.retry_attempts && e.is_recoverable() => {
                    attempt += 1;
                    tracing::warn!(
                        "Retrying {} ({}/{}) after error: {}",
                        domain,
                        attempt,
                        self.config.retry_attempts,
                        e
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Flattens `tasks[0].result[*].items[*].keyword_data.keyword`, capped at `limit`.
pub fn parse_ranked_keywords(target: &str, body: &str, limit: usize) -> Result<KeywordList> {
    let malformed = |message: String| QualifierError::MalformedResponse {
        target: target.to_string(),
        message,
    };

    let response: RankedKeywordsResponse =
        serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

    if let Some(code) = response.status_code {
        if code != STATUS_OK {
            return Err(QualifierError::ProviderError {
                target: target.to_string(),
                status_code: code,
                message: response.status_message.unwrap_or_default(),
            });
        }
    }

    let task = response
        .tasks
        .and_then(|tasks| tasks.into_iter().next())
        .ok_or_else(|| malformed("response contains no tasks".to_string()))?;

    if let Some(code) = task.status_code {
        if code != STATUS_OK {
            return Err(QualifierError::ProviderError {
                target: target.to_string(),
                status_code: code,
                message: task.status_message.unwrap_or_default(),
            });
        }
    }

    let keywords = task
        .result
        .unwrap_or_default()
        .into_iter()
        .flat_map(|result| result.items.unwrap_or_default())
        .filter_map(|item| item.keyword_data.and_then(|data| data.keyword))
        .filter(|keyword| !keyword.is_empty())
        .take(limit)
        .collect();

    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> RankingClient {
        let mut config = RankingClientConfig::new(Credentials {
            login: "user".to_string(),
            password: "pass".to_string(),
        });
        config.base_url = server.base_url();
        RankingClient::new(config).unwrap()
    }

    fn ok_body(keywords: &[&str]) -> serde_json::Value {
        let items: Vec<_> = keywords
            .iter()
            .map(|k| json!({"keyword_data": {"keyword": k}}))
            .collect();
        json!({
            "status_code": 20000,
            "status_message": "Ok.",
            "tasks": [{
                "status_code": 20000,
                "status_message": "Ok.",
                "result": [{"items": items}]
            }]
        })
    }

    #[test]
    fn test_parse_flattens_all_results() {
        let body = json!({
            "tasks": [{
                "result": [
                    {"items": [{"keyword_data": {"keyword": "casino bonus"}}]},
                    {"items": [
                        {"keyword_data": {"keyword": "poker"}},
                        {"keyword_data": {}},
                        {"other": 1}
                    ]}
                ]
            }]
        });
        let keywords = parse_ranked_keywords("casino.com", &body.to_string(), 20).unwrap();
        assert_eq!(keywords, vec!["casino bonus", "poker"]);
    }

    #[test]
    fn test_parse_caps_at_limit() {
        let body = ok_body(&["a", "b", "c", "d"]);
        let keywords = parse_ranked_keywords("casino.com", &body.to_string(), 2).unwrap();
        assert_eq!(keywords, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_null_result_is_empty() {
        let body = json!({"status_code": 20000, "tasks": [{"status_code": 20000, "result": null}]});
        let keywords = parse_ranked_keywords("casino.com", &body.to_string(), 20).unwrap();
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_parse_missing_tasks_is_malformed() {
        let err = parse_ranked_keywords("casino.com", r#"{"status_code": 20000}"#, 20).unwrap_err();
        assert!(matches!(err, QualifierError::MalformedResponse { .. }));

        let err = parse_ranked_keywords("casino.com", "<html>", 20).unwrap_err();
        assert!(matches!(err, QualifierError::MalformedResponse { .. }));
    }

    #[test]
    fn test_parse_task_error_is_provider_error() {
        let body = json!({
            "status_code": 20000,
            "tasks": [{"status_code": 40501, "status_message": "Invalid Field: 'target'.", "result": null}]
        });
        match parse_ranked_keywords("bad target", &body.to_string(), 20) {
            Err(QualifierError::ProviderError { status_code, message, .. }) => {
                assert_eq!(status_code, 40501);
                assert!(message.contains("target"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_shape_and_auth() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/dataforseo_labs/google/ranked_keywords/live")
                .header("Authorization", "Basic dXNlcjpwYXNz")
                .json_body(json!([{
                    "target": "casino.com",
                    "location_code": 2840,
                    "language_code": "en",
                    "limit": 20
                }]));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(ok_body(&["online casino", "free spins"]));
        });

        let client = client_for(&server);
        let keywords = client.top_keywords("casino.com").await.unwrap();

        api_mock.assert();
        assert_eq!(keywords, vec!["online casino", "free spins"]);
    }

    #[tokio::test]
    async fn test_http_500_is_typed_error_and_degrades_to_empty() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(500);
        });

        let client = client_for(&server);
        let err = client.top_keywords("casino.com").await.unwrap_err();
        assert!(matches!(err, QualifierError::HttpStatusError { status: 500, .. }));

        assert!(client.keywords_or_empty("casino.com").await.is_empty());
        api_mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(503);
        });

        let client = client_for(&server);
        assert!(client.top_keywords("slots.com").await.is_err());
        api_mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_retries_recoverable_errors_when_enabled() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(503);
        });

        let mut config = RankingClientConfig::new(Credentials {
            login: "user".to_string(),
            password: "pass".to_string(),
        });
        config.base_url = server.base_url();
        config.retry_attempts = 2;
        config.retry_delay = Duration::from_millis(1);
        let client = RankingClient::new(config).unwrap();

        assert!(client.top_keywords("slots.com").await.is_err());
        api_mock.assert_hits(3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(401);
        });

        let mut config = RankingClientConfig::new(Credentials {
            login: "user".to_string(),
            password: "wrong".to_string(),
        });
        config.base_url = server.base_url();
        config.retry_attempts = 3;
        config.retry_delay = Duration::from_millis(1);
        let client = RankingClient::new(config).unwrap();

        assert!(client.top_keywords("slots.com").await.is_err());
        api_mock.assert_hits(1);
    }
}
