//! Typed view of the PageSpeed Insights v5 response
//!
//! Only the sections the module consumes are modelled; everything else in the
//! document is ignored during deserialization.

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level `runPagespeed` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpeedResponse {
    #[serde(default)]
    pub lighthouse_result: Option<LighthouseResult>,
    #[serde(default)]
    pub loading_experience: Option<LoadingExperience>,
}

/// Lab data produced by the Lighthouse run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LighthouseResult {
    #[serde(default)]
    pub audits: HashMap<String, Audit>,
}

/// One Lighthouse audit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default)]
    pub display_value: Option<String>,
    #[serde(default)]
    pub numeric_value: Option<f64>,
}

impl Audit {
    /// Whether the audit produced a value at all
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.numeric_value.is_some()
            || self
                .display_value
                .as_deref()
                .is_some_and(|v| !v.is_empty())
    }
}

/// Field data (Chrome UX report) for the origin
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadingExperience {
    #[serde(default)]
    pub metrics: HashMap<String, FieldMetric>,
}

/// One field metric, e.g. `FIRST_CONTENTFUL_PAINT_MS`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldMetric {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub percentile: Option<f64>,
}

impl PageSpeedResponse {
    /// Look up a Lighthouse audit by id
    #[must_use]
    pub fn audit(&self, id: &str) -> Option<&Audit> {
        self.lighthouse_result.as_ref()?.audits.get(id)
    }

    /// Look up a field-data metric by its upper-case key
    #[must_use]
    pub fn field_metric(&self, key: &str) -> Option<&FieldMetric> {
        self.loading_experience.as_ref()?.metrics.get(key)
    }
}
