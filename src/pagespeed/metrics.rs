//! Fixed metric set extracted from a PageSpeed response

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::response::PageSpeedResponse;

/// Audit whose presence decides between "data" and "no data"
pub const GATE_AUDIT: &str = "first-contentful-paint";

/// Metric keys in column order
pub const METRIC_KEYS: [&str; 8] = [
    "first-contentful-paint-ms",
    "first-input-delay-ms",
    "first-contentful-paint",
    "speed-index",
    "interactive",
    "first-meaningful-paint",
    "first-cpu-idle",
    "estimated-input-latency",
];

/// A single metric value
///
/// Serializes as a JSON number, a string, or `""` when the service did not
/// report the metric.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetricValue {
    Number(f64),
    Category(String),
    #[default]
    Empty,
}

impl MetricValue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn from_number(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }

    fn from_category(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::Category(v.to_string()),
            _ => Self::Empty,
        }
    }
}

/// Whole milliseconds are written without a trailing ".0"
fn is_whole(n: f64) -> bool {
    n.fract() == 0.0 && n.abs() < 1e15
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if is_whole(*n) => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Category(c) => f.write_str(c),
            Self::Empty => Ok(()),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::from_category(Some(value))
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) if is_whole(*n) => serializer.serialize_i64(*n as i64),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Category(c) => serializer.serialize_str(c),
            Self::Empty => serializer.serialize_str(""),
        }
    }
}

impl<'de> Deserialize<'de> for MetricValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetricValueVisitor;

        impl Visitor<'_> for MetricValueVisitor {
            type Value = MetricValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<MetricValue, E> {
                Ok(MetricValue::Number(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MetricValue, E> {
                Ok(MetricValue::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MetricValue, E> {
                Ok(MetricValue::Number(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MetricValue, E> {
                Ok(MetricValue::from_category(Some(v)))
            }

            fn visit_unit<E: de::Error>(self) -> Result<MetricValue, E> {
                Ok(MetricValue::Empty)
            }
        }

        deserializer.deserialize_any(MetricValueVisitor)
    }
}

/// The eight metrics recorded per analysed context
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageSpeedMetrics {
    /// Field-data category for first contentful paint (FAST / AVERAGE / SLOW)
    #[serde(rename = "first-contentful-paint-ms")]
    pub first_contentful_paint_ms: MetricValue,
    /// Field-data category for first input delay
    #[serde(rename = "first-input-delay-ms")]
    pub first_input_delay_ms: MetricValue,
    #[serde(rename = "first-contentful-paint")]
    pub first_contentful_paint: MetricValue,
    #[serde(rename = "speed-index")]
    pub speed_index: MetricValue,
    #[serde(rename = "interactive")]
    pub interactive: MetricValue,
    #[serde(rename = "first-meaningful-paint")]
    pub first_meaningful_paint: MetricValue,
    #[serde(rename = "first-cpu-idle")]
    pub first_cpu_idle: MetricValue,
    #[serde(rename = "estimated-input-latency")]
    pub estimated_input_latency: MetricValue,
}

impl PageSpeedMetrics {
    /// Extract the metric set from a response.
    ///
    /// Returns `None` ("no data") when the first-contentful-paint audit is
    /// missing or carries no value; otherwise every metric the response lacks
    /// is `MetricValue::Empty`.
    #[must_use]
    pub fn from_response(response: &PageSpeedResponse) -> Option<Self> {
        if !response.audit(GATE_AUDIT).is_some_and(|a| a.has_value()) {
            return None;
        }

        let lab = |id: &str| {
            MetricValue::from_number(response.audit(id).and_then(|a| a.numeric_value))
        };
        let field = |key: &str| {
            MetricValue::from_category(
                response
                    .field_metric(key)
                    .and_then(|m| m.category.as_deref()),
            )
        };

        Some(Self {
            first_contentful_paint_ms: field("FIRST_CONTENTFUL_PAINT_MS"),
            first_input_delay_ms: field("FIRST_INPUT_DELAY_MS"),
            first_contentful_paint: lab("first-contentful-paint"),
            speed_index: lab("speed-index"),
            interactive: lab("interactive"),
            first_meaningful_paint: lab("first-meaningful-paint"),
            first_cpu_idle: lab("first-cpu-idle"),
            estimated_input_latency: lab("estimated-input-latency"),
        })
    }

    /// Metric values paired with their keys, in `METRIC_KEYS` order
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &MetricValue); 8] {
        [
            (METRIC_KEYS[0], &self.first_contentful_paint_ms),
            (METRIC_KEYS[1], &self.first_input_delay_ms),
            (METRIC_KEYS[2], &self.first_contentful_paint),
            (METRIC_KEYS[3], &self.speed_index),
            (METRIC_KEYS[4], &self.interactive),
            (METRIC_KEYS[5], &self.first_meaningful_paint),
            (METRIC_KEYS[6], &self.first_cpu_idle),
            (METRIC_KEYS[7], &self.estimated_input_latency),
        ]
    }

    /// Look up a metric by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}
