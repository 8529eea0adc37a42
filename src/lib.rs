pub mod audit_module;
pub mod browser_setup;
pub mod config;
pub mod context_tracker;
pub mod error;
pub mod journey;
pub mod module_events;
pub mod pagespeed;
pub mod result_logger;
pub mod storage;
pub mod utils;

pub use audit_module::{AnalysisResult, AuditModule, ModuleContext, PageSpeedModule, UrlWrapper};
pub use browser_setup::{BrowserSession, download_managed_browser, find_browser_executable, launch_browser};
pub use config::{PageSpeedConfig, Strategy};
pub use context_tracker::{ContextSnapshot, ContextTracker};
pub use error::{PageSpeedError, PageSpeedResult};
pub use journey::{ChromiumPage, Journey, JourneyEvent, JourneyListener, PageAccessor};
pub use module_events::{EventChannel, ModuleEvent, ModuleEventBus, ModuleInfo};
pub use pagespeed::{MetricValue, PageSpeedClient, PageSpeedMetrics, ScoringLookup};
pub use result_logger::{NoOpResultLogger, ResultLogger, TracingResultLogger};
pub use storage::{MemoryStorage, SqliteStorage, StorageSink, StoreRecord, StoreSchema};
