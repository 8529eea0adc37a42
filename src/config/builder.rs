//! Fluent builder for `PageSpeedConfig`
//!
//! Every field has a usable default, so `PageSpeedConfig::builder().build()`
//! yields a config that talks to the public PageSpeed Insights endpoint.

use std::time::Duration;

use crate::error::{PageSpeedError, PageSpeedResult};
use crate::utils::{CHROME_USER_AGENT, DEFAULT_REQUEST_TIMEOUT_SECS, PAGESPEED_API_ENDPOINT};

use super::types::{PageSpeedConfig, Strategy};

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "PAGESPEED_API_KEY";
/// Environment variable overriding the endpoint
pub const ENV_ENDPOINT: &str = "PAGESPEED_ENDPOINT";
/// Environment variable selecting the strategy
pub const ENV_STRATEGY: &str = "PAGESPEED_STRATEGY";

#[derive(Debug, Clone)]
pub struct PageSpeedConfigBuilder {
    pub(crate) endpoint: String,
    pub(crate) api_key: Option<String>,
    pub(crate) strategy: Option<Strategy>,
    pub(crate) locale: Option<String>,
    pub(crate) request_timeout: Duration,
    pub(crate) user_agent: String,
}

impl Default for PageSpeedConfigBuilder {
    fn default() -> Self {
        Self {
            endpoint: PAGESPEED_API_ENDPOINT.to_string(),
            api_key: None,
            strategy: None,
            locale: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: CHROME_USER_AGENT.to_string(),
        }
    }
}

impl PageSpeedConfig {
    /// Create a builder for configuring a `PageSpeedConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> PageSpeedConfigBuilder {
        PageSpeedConfigBuilder::default()
    }

    /// Build a config from `PAGESPEED_*` environment variables, falling back
    /// to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns `PageSpeedError::Config` when a variable holds an invalid value.
    pub fn from_env() -> PageSpeedResult<Self> {
        Self::builder().with_env()?.build()
    }
}

impl Default for PageSpeedConfig {
    fn default() -> Self {
        let builder = PageSpeedConfigBuilder::default();
        Self {
            endpoint: builder.endpoint,
            api_key: builder.api_key,
            strategy: builder.strategy,
            locale: builder.locale,
            request_timeout: builder.request_timeout,
            user_agent: builder.user_agent,
        }
    }
}

impl PageSpeedConfigBuilder {
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn api_key(mut self, key: Option<impl Into<String>>) -> Self {
        self.api_key = key.map(Into::into).filter(|k: &String| !k.trim().is_empty());
        self
    }

    #[must_use]
    pub fn strategy(mut self, strategy: Option<Strategy>) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: Option<impl Into<String>>) -> Self {
        self.locale = locale.map(Into::into);
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overlay values found in the `PAGESPEED_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when `PAGESPEED_STRATEGY` is not `mobile` or `desktop`.
    pub fn with_env(mut self) -> PageSpeedResult<Self> {
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            self = self.api_key(Some(key));
        }
        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
            self = self.endpoint(endpoint);
        }
        if let Ok(strategy) = std::env::var(ENV_STRATEGY) {
            self.strategy = Some(strategy.parse()?);
        }
        Ok(self)
    }

    /// Validate and build the config
    ///
    /// # Errors
    ///
    /// Returns `PageSpeedError::Config` when the endpoint is not an absolute
    /// http(s) URL or the timeout is zero.
    pub fn build(self) -> PageSpeedResult<PageSpeedConfig> {
        let parsed = url::Url::parse(&self.endpoint).map_err(|e| {
            PageSpeedError::Config(format!("invalid endpoint '{}': {e}", self.endpoint))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PageSpeedError::Config(format!(
                "endpoint must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(PageSpeedError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(PageSpeedConfig {
            endpoint: self.endpoint,
            api_key: self.api_key,
            strategy: self.strategy,
            locale: self.locale,
            request_timeout: self.request_timeout,
            user_agent: self.user_agent,
        })
    }
}
