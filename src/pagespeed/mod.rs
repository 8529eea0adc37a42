//! PageSpeed Insights lookup
//!
//! Queries the third-party scoring service for one URL and shapes its answer
//! into the fixed metric set recorded per context.

mod client;
mod metrics;
mod response;

pub use client::{PageSpeedClient, ScoringLookup};
pub use metrics::{GATE_AUDIT, METRIC_KEYS, MetricValue, PageSpeedMetrics};
pub use response::{Audit, FieldMetric, LighthouseResult, LoadingExperience, PageSpeedResponse};
