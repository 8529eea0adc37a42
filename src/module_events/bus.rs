//! Event bus for publishing and subscribing to module events
//!
//! Fan-out to any number of listeners over a tokio broadcast channel. The
//! emitting module never knows who listens.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Notify, broadcast};

use super::config::EventBusConfig;
use super::errors::EventBusError;
use super::metrics::EventBusMetrics;
use super::streaming::FilteredReceiver;
use super::types::ModuleEvent;

/// Event bus for publishing and subscribing to module events
#[derive(Debug)]
pub struct ModuleEventBus {
    sender: broadcast::Sender<ModuleEvent>,
    config: Arc<EventBusConfig>,
    metrics: EventBusMetrics,
    shutdown: Arc<Notify>,
    shutdown_flag: Arc<AtomicBool>,
    /// Reference count of bus clones, the last one to drop signals shutdown
    num_instances: Arc<AtomicUsize>,
}

impl ModuleEventBus {
    /// Create a new event bus with the specified capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let config = EventBusConfig {
            capacity,
            ..Default::default()
        };
        Self::with_config(config)
    }

    /// Create a new event bus with custom configuration
    #[must_use]
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.capacity.max(1));
        Self {
            sender,
            config: Arc::new(config),
            metrics: EventBusMetrics::new(),
            shutdown: Arc::new(Notify::new()),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            num_instances: Arc::new(AtomicUsize::new(1)),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &EventBusMetrics {
        &self.metrics
    }

    /// Publish an event to all subscribers
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of active subscribers that received the event
    /// * `Err(EventBusError::NoSubscribers)` - Nobody is listening
    pub async fn publish(&self, event: ModuleEvent) -> Result<usize, EventBusError> {
        let name = self.config.enable_metrics.then(|| event.name());
        match self.sender.send(event) {
            Ok(subscriber_count) => {
                if let Some(name) = &name {
                    self.metrics.record_delivery(name, subscriber_count);
                }
                Ok(subscriber_count)
            }
            Err(_) => {
                if let Some(name) = &name {
                    self.metrics.record_undelivered(name);
                }
                Err(EventBusError::NoSubscribers)
            }
        }
    }

    /// Publish without caring whether anyone listens
    ///
    /// Emission is fire-and-forget for modules: an empty audience is normal
    /// and is only logged.
    pub async fn emit(&self, event: ModuleEvent) -> usize {
        let name = event.name();
        match self.publish(event).await {
            Ok(count) => {
                log::trace!("Emitted {name} to {count} subscribers");
                count
            }
            Err(e) => {
                log::debug!("Emitted {name} without delivery: {e}");
                0
            }
        }
    }

    /// Subscribe to every event
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ModuleEvent> {
        self.sender.subscribe()
    }

    /// Create a subscriber that only receives events passing `filter`
    pub fn subscribe_filtered<F>(&self, filter: F) -> FilteredReceiver<F>
    where
        F: Fn(&ModuleEvent) -> bool + Send + Sync + 'static,
    {
        FilteredReceiver::new(self.subscribe(), filter)
    }

    /// Get the number of active subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let count = self.sender.receiver_count();
        if self.config.enable_metrics {
            self.metrics.observe_subscribers(count);
        }
        count
    }

    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }

    /// Get detailed metrics report
    #[must_use]
    pub fn get_metrics_report(&self) -> String {
        if !self.config.enable_metrics {
            return "Metrics disabled".to_string();
        }

        let snapshot = self.metrics.snapshot();

        let mut report = format!(
            "Module Event Bus Metrics:\n\
             - Events Delivered: {}\n\
             - Events Undelivered: {}\n\
             - Receiver Deliveries: {}\n\
             - Peak Subscribers: {}\n\
             - Delivery Rate: {:.2}%",
            snapshot.events_delivered,
            snapshot.events_undelivered,
            snapshot.receiver_deliveries,
            snapshot.peak_subscribers,
            snapshot.delivery_rate()
        );
        for (name, count) in &snapshot.by_event {
            report.push_str(&format!(
                "\n   {name}: {} delivered, {} undelivered",
                count.delivered, count.undelivered
            ));
        }
        report
    }

    /// Signal shutdown to all subscribers
    ///
    /// Idempotent; all clones of this bus share the same signal.
    pub fn shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::SeqCst);
        self.shutdown.notify_waiters();
        log::debug!("Module event bus shutdown signaled");
    }

    /// Wait for shutdown signal, for use in `tokio::select!` loops
    pub async fn wait_for_shutdown(&self) {
        self.shutdown.notified().await;
    }

    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_flag.load(Ordering::SeqCst)
    }
}

impl Default for ModuleEventBus {
    fn default() -> Self {
        Self::with_config(EventBusConfig::default())
    }
}

impl Clone for ModuleEventBus {
    fn clone(&self) -> Self {
        self.num_instances.fetch_add(1, Ordering::Relaxed);
        Self {
            sender: self.sender.clone(),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
            shutdown: self.shutdown.clone(),
            shutdown_flag: self.shutdown_flag.clone(),
            num_instances: self.num_instances.clone(),
        }
    }
}

impl Drop for ModuleEventBus {
    fn drop(&mut self) {
        // fetch_sub returns the value before decrementing
        if 1 == self.num_instances.fetch_sub(1, Ordering::AcqRel) {
            self.shutdown_flag.store(true, Ordering::SeqCst);
            self.shutdown.notify_waiters();
            log::trace!("Module event bus dropped (last instance), shutdown signal sent");
        }
    }
}
