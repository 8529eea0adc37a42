//! Result record produced per analysed context

use serde::{Deserialize, Serialize};

use crate::pagespeed::PageSpeedMetrics;
use crate::storage::StoreRecord;

/// Outcome of analysing one context
///
/// `metrics` is `None` when the scoring service had no data for the context
/// URL; the record then only carries `url` and `context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Page under analysis (the pass's page reference, not the context URL)
    pub url: String,
    /// Context name
    pub context: String,
    #[serde(flatten)]
    pub metrics: Option<PageSpeedMetrics>,
}

impl AnalysisResult {
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        context: impl Into<String>,
        metrics: Option<PageSpeedMetrics>,
    ) -> Self {
        Self {
            url: url.into(),
            context: context.into(),
            metrics,
        }
    }

    #[must_use]
    pub fn has_metrics(&self) -> bool {
        self.metrics.is_some()
    }

    /// Row handed to the storage sink, metric columns omitted without data
    #[must_use]
    pub fn to_store_record(&self) -> StoreRecord {
        let mut record = StoreRecord::new()
            .with("url", self.url.as_str())
            .with("context", self.context.as_str());
        if let Some(metrics) = &self.metrics {
            for (key, value) in metrics.entries() {
                record.set(key, value.to_string());
            }
        }
        record
    }

    /// JSON object view, as emitted to listeners
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
