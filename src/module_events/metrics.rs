//! Delivery counters for the module event bus
//!
//! Counts are kept per wire name (`page_speed_module__onResult`, ...) so a
//! report shows which lifecycle signals actually reached a listener.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Counters {
    delivered: AtomicU64,
    undelivered: AtomicU64,
    receiver_deliveries: AtomicU64,
    peak_subscribers: AtomicUsize,
    by_event: Mutex<BTreeMap<String, EventCount>>,
}

/// Per-event-name tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCount {
    /// Emissions that reached at least one subscriber
    pub delivered: u64,
    /// Emissions nobody was listening to
    pub undelivered: u64,
}

/// Shared between every clone of a bus
#[derive(Debug, Clone, Default)]
pub struct EventBusMetrics {
    counters: Arc<Counters>,
}

impl EventBusMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `name` was handed to `subscribers` receivers
    pub fn record_delivery(&self, name: &str, subscribers: usize) {
        let c = &self.counters;
        c.delivered.fetch_add(1, Ordering::Relaxed);
        c.receiver_deliveries
            .fetch_add(subscribers as u64, Ordering::Relaxed);
        self.observe_subscribers(subscribers);
        c.by_event.lock().entry(name.to_string()).or_default().delivered += 1;
    }

    /// `name` was emitted while no receiver existed
    pub fn record_undelivered(&self, name: &str) {
        self.counters.undelivered.fetch_add(1, Ordering::Relaxed);
        self.counters
            .by_event
            .lock()
            .entry(name.to_string())
            .or_default()
            .undelivered += 1;
    }

    pub fn observe_subscribers(&self, count: usize) {
        self.counters
            .peak_subscribers
            .fetch_max(count, Ordering::Relaxed);
    }

    /// Tally for one wire name, zero if it was never emitted
    #[must_use]
    pub fn count_for(&self, name: &str) -> EventCount {
        self.counters
            .by_event
            .lock()
            .get(name)
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let c = &self.counters;
        MetricsSnapshot {
            events_delivered: c.delivered.load(Ordering::Relaxed),
            events_undelivered: c.undelivered.load(Ordering::Relaxed),
            receiver_deliveries: c.receiver_deliveries.load(Ordering::Relaxed),
            peak_subscribers: c.peak_subscribers.load(Ordering::Relaxed),
            by_event: c.by_event.lock().clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events_delivered: u64,
    pub events_undelivered: u64,
    /// Sum over delivered events of the receivers each one reached
    pub receiver_deliveries: u64,
    pub peak_subscribers: usize,
    pub by_event: BTreeMap<String, EventCount>,
}

impl MetricsSnapshot {
    /// Share of emissions that reached a listener, in percent
    #[must_use]
    pub fn delivery_rate(&self) -> f64 {
        let attempted = self.events_delivered + self.events_undelivered;
        if attempted == 0 {
            return 100.0;
        }
        (self.events_delivered as f64 / attempted as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_per_event_name() {
        let metrics = EventBusMetrics::new();
        metrics.record_undelivered("page_speed_module__createModule");
        metrics.record_delivery("page_speed_module__onResult", 2);
        metrics.record_delivery("page_speed_module__onResult", 3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events_delivered, 2);
        assert_eq!(snapshot.events_undelivered, 1);
        assert_eq!(snapshot.receiver_deliveries, 5);
        assert_eq!(snapshot.peak_subscribers, 3);
        assert_eq!(
            metrics.count_for("page_speed_module__onResult"),
            EventCount {
                delivered: 2,
                undelivered: 0
            }
        );
        assert_eq!(
            metrics.count_for("page_speed_module__createModule").undelivered,
            1
        );
        assert_eq!(metrics.count_for("module__endsComputing"), EventCount::default());
        assert!((snapshot.delivery_rate() - 200.0 / 3.0).abs() < 1e-9);
    }
}
