//! Pluggable audit modules
//!
//! An audit module is wired to its host at construction through a
//! `ModuleContext`, listens to journey signals, and analyses a page once the
//! journey has completed.

mod page_speed;
mod result;

pub use page_speed::PageSpeedModule;
pub use result::AnalysisResult;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::{PageSpeedError, PageSpeedResult};
use crate::journey::Journey;
use crate::module_events::{ModuleEventBus, ModuleInfo};
use crate::result_logger::ResultLogger;
use crate::storage::StorageSink;

/// Host collaborators every module needs
#[derive(Clone)]
pub struct ModuleContext {
    pub event_bus: ModuleEventBus,
    pub storage: Arc<dyn StorageSink>,
    pub logger: Arc<dyn ResultLogger>,
}

impl ModuleContext {
    #[must_use]
    pub fn new(
        event_bus: ModuleEventBus,
        storage: Arc<dyn StorageSink>,
        logger: Arc<dyn ResultLogger>,
    ) -> Self {
        Self {
            event_bus,
            storage,
            logger,
        }
    }
}

impl fmt::Debug for ModuleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleContext")
            .field("event_bus", &self.event_bus)
            .finish_non_exhaustive()
    }
}

/// Reference to the page an analysis pass is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlWrapper {
    url: url::Url,
}

impl UrlWrapper {
    #[must_use]
    pub fn new(url: url::Url) -> Self {
        Self { url }
    }

    /// Parse an absolute URL
    ///
    /// # Errors
    /// `PageSpeedError::Config` if `raw` is not an absolute URL.
    pub fn parse(raw: &str) -> PageSpeedResult<Self> {
        url::Url::parse(raw)
            .map(Self::new)
            .map_err(|e| PageSpeedError::Config(format!("invalid page URL '{raw}': {e}")))
    }

    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }
}

impl fmt::Display for UrlWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl From<url::Url> for UrlWrapper {
    fn from(url: url::Url) -> Self {
        Self::new(url)
    }
}

/// Interface between the host engine and one audit module
#[async_trait]
pub trait AuditModule: Send + Sync {
    /// Stable identifier, also the prefix of module-specific event names
    fn id(&self) -> &str;

    /// Human-facing name
    fn name(&self) -> &str;

    fn info(&self) -> ModuleInfo {
        ModuleInfo::new(self.id(), self.name())
    }

    /// One-time setup: install stores, announce the module
    async fn init(&self) -> PageSpeedResult<()>;

    /// Subscribe the module to `journey`'s lifecycle signals
    fn init_events(self: Arc<Self>, journey: &mut Journey);

    /// Run one analysis pass for `url`
    ///
    /// The `bool` is a success indicator; the real output is the emitted
    /// events and persisted records.
    async fn analyse(&self, url: &UrlWrapper) -> PageSpeedResult<bool>;
}
