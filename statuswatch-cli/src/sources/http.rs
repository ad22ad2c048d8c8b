//! HTTP source for vendor status endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, warn};

use statuswatch_core::config::{ServiceEntry, StatuswatchConfig};
use statuswatch_core::model::ComponentStatus;
use statuswatch_core::source::{SourceError, StatusSource};
use statuswatch_core::vendor;

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl HttpSource {
    pub fn new(config: &StatuswatchConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// Single attempt
    async fn fetch_body(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(map_reqwest)?;
        Ok(body.to_vec())
    }
}

fn map_reqwest(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else {
        SourceError::Http(e.to_string())
    }
}

/// `base * 2^attempt`, saturating instead of overflowing.
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(2_u64.saturating_pow(attempt))
}

/// Client errors other than rate limiting will not change on retry.
fn is_retryable(e: &SourceError) -> bool {
    match e {
        SourceError::Http(_) | SourceError::Timeout => true,
        SourceError::Status { code } => *code == 429 || *code >= 500,
        SourceError::Decode(_) => false,
    }
}

#[async_trait]
impl StatusSource for HttpSource {
    async fn fetch(&self, service: &ServiceEntry) -> Result<Vec<ComponentStatus>, SourceError> {
        let mut attempt: u32 = 0;

        let body = loop {
            match self.fetch_body(&service.url).await {
                Ok(body) => break body,
                Err(e) if is_retryable(&e) && attempt < self.max_retries => {
                    let backoff_ms = backoff_delay_ms(self.retry_backoff_ms, attempt);
                    warn!(
                        service = %service.slug,
                        attempt = attempt + 1,
                        backoff_ms,
                        error = %e,
                        "fetch failed, retrying"
                    );
                    sleep(Duration::from_millis(backoff_ms)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        debug!(service = %service.slug, bytes = body.len(), "fetched status payload");

        let components = vendor::decode(
            service.feed,
            &service.slug,
            &body,
            &service.components,
            &service.include,
        )?;
        Ok(components)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
