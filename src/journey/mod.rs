//! Journey lifecycle signals
//!
//! A journey is one automated browsing session made of named contexts. The
//! host engine drives the browser and tells registered listeners when a
//! journey starts and when a new context appears. Listeners are notified one
//! after another, never concurrently.

mod page;

pub use page::{ChromiumPage, PageAccessor};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::PageSpeedResult;

/// Receiver of journey lifecycle signals
#[async_trait]
pub trait JourneyListener: Send + Sync {
    /// A new journey run begins
    async fn on_journey_start(&self) -> PageSpeedResult<()>;

    /// A context named `name` became active, showing the page behind `page`
    async fn on_new_context(&self, name: &str, page: &dyn PageAccessor) -> PageSpeedResult<()>;
}

/// Journey signal as a value, for hosts that queue their signals
#[derive(Clone)]
pub enum JourneyEvent {
    Start,
    NewContext {
        name: String,
        wrapper: Arc<dyn PageAccessor>,
    },
}

impl fmt::Debug for JourneyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("Start"),
            Self::NewContext { name, .. } => {
                f.debug_struct("NewContext").field("name", name).finish_non_exhaustive()
            }
        }
    }
}

/// Dispatcher for journey signals
#[derive(Default, Clone)]
pub struct Journey {
    listeners: Vec<Arc<dyn JourneyListener>>,
}

impl Journey {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; listeners are notified in registration order
    pub fn on(&mut self, listener: Arc<dyn JourneyListener>) {
        self.listeners.push(listener);
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Signal the start of a journey run
    ///
    /// # Errors
    /// Stops at and returns the first listener error.
    pub async fn start(&self) -> PageSpeedResult<()> {
        debug!(target: "pagespeed::journey", "Journey start");
        for listener in &self.listeners {
            listener.on_journey_start().await?;
        }
        Ok(())
    }

    /// Signal that context `name` is now active
    ///
    /// # Errors
    /// Stops at and returns the first listener error, e.g. a failed URL read.
    pub async fn new_context(&self, name: &str, page: &dyn PageAccessor) -> PageSpeedResult<()> {
        debug!(target: "pagespeed::journey", "Journey new context: {name}");
        for listener in &self.listeners {
            listener.on_new_context(name, page).await?;
        }
        Ok(())
    }

    /// Dispatch a queued signal
    ///
    /// # Errors
    /// Same as [`Self::start`] and [`Self::new_context`].
    pub async fn dispatch(&self, event: &JourneyEvent) -> PageSpeedResult<()> {
        match event {
            JourneyEvent::Start => self.start().await,
            JourneyEvent::NewContext { name, wrapper } => {
                self.new_context(name, wrapper.as_ref()).await
            }
        }
    }
}
