//! Event system for audit module lifecycle signals
//!
//! Modules publish `ModuleEvent`s on a `ModuleEventBus`; reporters, progress
//! displays and tests subscribe without the module knowing about them.

pub mod bus;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod streaming;
pub mod types;

pub use bus::ModuleEventBus;
pub use config::EventBusConfig;
pub use errors::EventBusError;
pub use metrics::{EventBusMetrics, EventCount, MetricsSnapshot};
pub use streaming::{Drained, FilteredReceiver};
pub use types::{EventChannel, ModuleEvent, ModuleInfo};
