//! Core configuration types for PageSpeed lookups
//!
//! This module contains the `PageSpeedConfig` struct and the `Strategy`
//! enumeration accepted by the PageSpeed Insights API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::PageSpeedError;

/// Device profile Lighthouse emulates while scoring a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    /// Query parameter value understood by the API
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = PageSpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" => Ok(Self::Mobile),
            "desktop" => Ok(Self::Desktop),
            other => Err(PageSpeedError::Config(format!(
                "unknown strategy '{other}', expected 'mobile' or 'desktop'"
            ))),
        }
    }
}

/// Configuration for the PageSpeed Insights client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpeedConfig {
    /// Endpoint of the scoring service.
    ///
    /// **INVARIANT:** absolute http(s) URL (checked in builder).
    pub(crate) endpoint: String,

    /// Optional API key, sent as the `key` query parameter.
    /// Anonymous requests work but are heavily rate limited by Google.
    pub(crate) api_key: Option<String>,

    /// Emulated device, `None` lets the service pick its default (mobile)
    pub(crate) strategy: Option<Strategy>,

    /// Locale for localized `displayValue` strings
    pub(crate) locale: Option<String>,

    /// Timeout for one lookup, covering connect and full body read
    pub(crate) request_timeout: Duration,

    /// User agent sent with every lookup
    pub(crate) user_agent: String,
}
