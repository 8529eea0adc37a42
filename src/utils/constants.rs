//! Shared configuration constants for the PageSpeed journey module
//!
//! Default values and fixed identifiers used throughout the crate.

/// PageSpeed Insights v5 endpoint
///
/// Accepts the audited page through the `url` query parameter and returns a
/// JSON document with `lighthouseResult` and `loadingExperience` sections.
pub const PAGESPEED_API_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Default request timeout: 120 seconds
///
/// A PageSpeed run executes a full Lighthouse audit server-side and routinely
/// takes 20-60 seconds; slow origins push it further.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Logical table name the module persists its records under
pub const PAGE_SPEED_STORE: &str = "page_speed";

/// Label handed to the result logger
pub const PAGE_SPEED_LABEL: &str = "Page Speed";

/// Default event bus capacity
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 1000;

/// Chrome user agent string used by the launched browser and the API client
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
