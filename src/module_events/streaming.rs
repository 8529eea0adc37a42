//! Filtered event receivers
//!
//! Lets a listener consume only the events it cares about, e.g. only
//! `OnResult` events of one module.

use std::sync::Arc;
use tokio::sync::broadcast;

use super::errors::EventBusError;
use super::types::ModuleEvent;

/// Matching events collected by [`FilteredReceiver::drain`]
#[derive(Debug, Default)]
pub struct Drained {
    pub events: Vec<ModuleEvent>,
    /// Events overwritten in the buffer before this receiver read them
    pub missed: u64,
}

/// Filtered event receiver wrapper
pub struct FilteredReceiver<F>
where
    F: Fn(&ModuleEvent) -> bool + Send + Sync + 'static,
{
    receiver: broadcast::Receiver<ModuleEvent>,
    filter: Arc<F>,
}

impl<F> FilteredReceiver<F>
where
    F: Fn(&ModuleEvent) -> bool + Send + Sync + 'static,
{
    pub fn new(receiver: broadcast::Receiver<ModuleEvent>, filter: F) -> Self {
        Self {
            receiver,
            filter: Arc::new(filter),
        }
    }

    /// Receive the next event that passes the filter
    ///
    /// # Errors
    /// * `EventBusError::Shutdown` - every sender is gone
    /// * `EventBusError::ReceiverLagged` - the receiver missed events
    pub async fn recv(&mut self) -> Result<ModuleEvent, EventBusError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if (self.filter)(&event) {
                        return Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(EventBusError::Shutdown);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    return Err(EventBusError::ReceiverLagged(skipped));
                }
            }
        }
    }

    /// Drain buffered events without waiting, returning the first match
    ///
    /// # Errors
    /// Same conditions as [`Self::recv`].
    pub fn try_recv(&mut self) -> Result<Option<ModuleEvent>, EventBusError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if (self.filter)(&event) {
                        return Ok(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => {
                    return Ok(None);
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(EventBusError::Shutdown);
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    return Err(EventBusError::ReceiverLagged(skipped));
                }
            }
        }
    }

    /// Read every buffered event without waiting, keeping the matches
    ///
    /// Unlike [`Self::try_recv`], falling behind is not an error: the
    /// receiver skips to the oldest event still buffered and counts what was
    /// lost in [`Drained::missed`].
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if (self.filter)(&event) {
                        drained.events.push(event);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    log::warn!("Filtered receiver lagged, {skipped} events lost");
                    drained.missed += skipped;
                }
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return drained,
            }
        }
    }

    #[must_use]
    pub fn would_receive(&self, event: &ModuleEvent) -> bool {
        (self.filter)(event)
    }
}
