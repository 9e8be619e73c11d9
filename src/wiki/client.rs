use crate::config::WikiConfig;
use crate::error::{Result, WikiError};
use crate::wiki::{ApiParams, WikiApi};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// MediaWiki API client
///
/// Sends GET requests with `format=json` and `formatversion=2` and turns
/// transport failures, non-success statuses and API `error` objects into
/// `WikiError::UpstreamQuery`. Retrying is opt-in through `max_retries`.
pub struct MediaWikiClient {
    client: Client,
    api_url: Url,
    max_retries: usize,
    retry_delay: Duration,
}

struct Failure {
    error: WikiError,
    retryable: bool,
}

impl MediaWikiClient {
    pub fn new(config: &WikiConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| WikiError::Config(format!("invalid wiki API URL {}: {}", config.api_url, e)))?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WikiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn query_pairs<'a>(params: &'a ApiParams) -> Vec<(&'a str, &'a str)> {
        let mut pairs = Vec::with_capacity(params.len() + 2);
        if params.get("format").is_none() {
            pairs.push(("format", "json"));
        }
        if params.get("formatversion").is_none() {
            pairs.push(("formatversion", "2"));
        }
        pairs.extend(params.iter());
        pairs
    }

    async fn send_once(&self, params: &ApiParams) -> std::result::Result<Value, Failure> {
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&Self::query_pairs(params))
            .send()
            .await
            .map_err(|e| Failure {
                retryable: e.is_timeout() || e.is_connect(),
                error: WikiError::UpstreamQuery(format!("Network error: {}", e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Failure {
                retryable: is_retryable_status(status),
                error: WikiError::UpstreamQuery(format!("HTTP {}: {}", status, body)),
            });
        }

        let payload: Value = response.json().await.map_err(|e| Failure {
            retryable: false,
            error: WikiError::MalformedResponse(format!("response is not JSON: {}", e)),
        })?;

        if let Some(error) = payload.get("error") {
            let code = error
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error");
            let info = error
                .get("info")
                .and_then(Value::as_str)
                .unwrap_or("unknown info");
            return Err(Failure {
                retryable: false,
                error: WikiError::UpstreamQuery(format!("API error [{}]: {}", code, info)),
            });
        }

        Ok(payload)
    }
}

#[async_trait]
impl WikiApi for MediaWikiClient {
    async fn get(&self, params: &ApiParams) -> Result<Value> {
        let start = std::time::Instant::now();
        let mut attempt = 0;
        let mut delay = self.retry_delay;

        loop {
            match self.send_once(params).await {
                Ok(payload) => {
                    log::debug!(
                        "Wiki API call took {:?} (attempt {}): {}",
                        start.elapsed(),
                        attempt + 1,
                        params
                    );
                    return Ok(payload);
                }
                Err(failure) if failure.retryable && attempt < self.max_retries => {
                    log::warn!(
                        "Retry {}/{} after error: {}",
                        attempt + 1,
                        self.max_retries,
                        failure.error
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
