//! HTTP client for the PageSpeed Insights API

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::PageSpeedConfig;
use crate::error::{PageSpeedError, PageSpeedResult};

use super::metrics::PageSpeedMetrics;
use super::response::PageSpeedResponse;

/// External scoring lookup
///
/// `Ok(None)` is the "no data" outcome: the service answered but had no
/// first-contentful-paint audit for the page. Any failure to obtain a usable
/// answer is an `Err`.
#[async_trait]
pub trait ScoringLookup: Send + Sync {
    async fn lookup(&self, url: &str) -> PageSpeedResult<Option<PageSpeedMetrics>>;
}

/// `ScoringLookup` backed by the PageSpeed Insights v5 API
#[derive(Debug, Clone)]
pub struct PageSpeedClient {
    client: Client,
    config: PageSpeedConfig,
}

impl PageSpeedClient {
    /// Create a client with its own connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: PageSpeedConfig) -> PageSpeedResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent())
            .build()?;
        Ok(Self { client, config })
    }

    /// Create a client sharing an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(client: Client, config: PageSpeedConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &PageSpeedConfig {
        &self.config
    }

    /// Build the request URL for one audited page
    ///
    /// # Errors
    ///
    /// Returns `PageSpeedError::Config` if the configured endpoint is not a URL.
    pub fn request_url(&self, target: &str) -> PageSpeedResult<url::Url> {
        let mut endpoint = url::Url::parse(self.config.endpoint())
            .map_err(|e| PageSpeedError::Config(format!("invalid endpoint: {e}")))?;
        {
            let mut query = endpoint.query_pairs_mut();
            query.append_pair("url", target);
            if let Some(key) = self.config.api_key() {
                query.append_pair("key", key);
            }
            if let Some(strategy) = self.config.strategy() {
                query.append_pair("strategy", strategy.as_str());
            }
            if let Some(locale) = self.config.locale() {
                query.append_pair("locale", locale);
            }
        }
        Ok(endpoint)
    }

    /// Fetch and decode the raw response for one page
    ///
    /// # Errors
    ///
    /// Network failures, non-success statuses and malformed JSON all surface
    /// as errors.
    pub async fn fetch(&self, target: &str) -> PageSpeedResult<PageSpeedResponse> {
        let request_url = self.request_url(target)?;
        debug!(target: "pagespeed::client", "Requesting PageSpeed run for {target}");

        let response = self.client.get(request_url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PageSpeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ScoringLookup for PageSpeedClient {
    async fn lookup(&self, url: &str) -> PageSpeedResult<Option<PageSpeedMetrics>> {
        let response = self.fetch(url).await?;
        let metrics = PageSpeedMetrics::from_response(&response);
        if metrics.is_none() {
            debug!(target: "pagespeed::client", "No first-contentful-paint audit for {url}");
        }
        Ok(metrics)
    }
}
