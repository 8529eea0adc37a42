//! PageSpeed audit module
//!
//! Tracks the URL of every context a journey opens, then scores each of them
//! with the PageSpeed Insights lookup, one context at a time.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use super::{AnalysisResult, AuditModule, ModuleContext, UrlWrapper};
use crate::context_tracker::{ContextSnapshot, ContextTracker};
use crate::error::{PageSpeedError, PageSpeedResult};
use crate::journey::{Journey, JourneyListener, PageAccessor};
use crate::module_events::{EventChannel, ModuleEvent, ModuleInfo};
use crate::pagespeed::ScoringLookup;
use crate::storage::StoreSchema;
use crate::utils::{PAGE_SPEED_LABEL, PAGE_SPEED_STORE};

const MODULE_ID: &str = "page_speed";
const MODULE_NAME: &str = "Page Speed";
/// beforeAnalyse x2, onResult, afterAnalyse x2
const EVENTS_PER_CONTEXT: usize = 5;

pub struct PageSpeedModule {
    context: ModuleContext,
    lookup: Arc<dyn ScoringLookup>,
    tracker: ContextTracker,
    info: ModuleInfo,
}

impl PageSpeedModule {
    #[must_use]
    pub fn new(context: ModuleContext, lookup: Arc<dyn ScoringLookup>) -> Self {
        Self {
            context,
            lookup,
            tracker: ContextTracker::new(),
            info: ModuleInfo::new(MODULE_ID, MODULE_NAME),
        }
    }

    /// Column schema of the `page_speed` store
    #[must_use]
    pub fn store_schema() -> StoreSchema {
        StoreSchema::new()
            .column("url", "Url")
            .column("context", "Context")
            .column("first-contentful-paint-ms", "First Contentful Paint MS")
            .column("first-input-delay-ms", "First Input Delay MS")
            .column("first-contentful-paint", "First Contentful Paint")
            .column("speed-index", "Speed Index")
            .column("interactive", "Time To Interactive")
            .column("first-meaningful-paint", "First Meaningful Paint")
            .column("first-cpu-idle", "First CPU Idle")
            .column("estimated-input-latency", "Estimated Input Latency")
    }

    /// Upper bound on the events `init` plus one pass over `contexts`
    /// contexts emit; a bus this large never overwrites an unread event.
    #[must_use]
    pub fn events_per_pass(contexts: usize) -> usize {
        contexts.saturating_mul(EVENTS_PER_CONTEXT).saturating_add(3)
    }

    #[must_use]
    pub fn tracker(&self) -> &ContextTracker {
        &self.tracker
    }

    /// Contexts tracked for the current journey
    #[must_use]
    pub fn contexts(&self) -> ContextSnapshot {
        self.tracker.snapshot()
    }

    #[must_use]
    pub fn module_context(&self) -> &ModuleContext {
        &self.context
    }

    /// Analyse a single tracked context against page `url`
    ///
    /// # Errors
    /// `UnknownContext` if the journey never reported `context_name`; any
    /// lookup or storage failure otherwise.
    pub async fn analyse_context(
        &self,
        context_name: &str,
        url: &UrlWrapper,
    ) -> PageSpeedResult<AnalysisResult> {
        let context_url = self
            .tracker
            .url_for(context_name)
            .ok_or_else(|| PageSpeedError::UnknownContext(context_name.to_string()))?;
        self.analyse_tracked(context_name, &context_url, url).await
    }

    async fn analyse_tracked(
        &self,
        context_name: &str,
        context_url: &str,
        url: &UrlWrapper,
    ) -> PageSpeedResult<AnalysisResult> {
        let bus = &self.context.event_bus;
        let page = url.to_string();

        bus.emit(ModuleEvent::before_analyse(
            EventChannel::Module,
            self.info.clone(),
            page.clone(),
        ))
        .await;
        bus.emit(ModuleEvent::before_analyse(
            EventChannel::Generic,
            self.info.clone(),
            page.clone(),
        ))
        .await;

        debug!(target: "pagespeed::module", "Scoring context '{context_name}' at {context_url}");
        let metrics = self.lookup.lookup(context_url).await?;
        let result = AnalysisResult::new(page.clone(), context_name, metrics);

        bus.emit(ModuleEvent::on_result(
            self.info.clone(),
            page.clone(),
            result.clone(),
        ))
        .await;

        self.context.logger.result(PAGE_SPEED_LABEL, &result, &page);
        self.context
            .storage
            .add(PAGE_SPEED_STORE, &result.to_store_record())
            .await?;

        bus.emit(ModuleEvent::after_analyse(
            EventChannel::Generic,
            self.info.clone(),
            page.clone(),
            result.clone(),
        ))
        .await;
        bus.emit(ModuleEvent::after_analyse(
            EventChannel::Module,
            self.info.clone(),
            page,
            result.clone(),
        ))
        .await;

        Ok(result)
    }
}

#[async_trait]
impl AuditModule for PageSpeedModule {
    fn id(&self) -> &str {
        &self.info.id
    }

    fn name(&self) -> &str {
        &self.info.name
    }

    async fn init(&self) -> PageSpeedResult<()> {
        self.context
            .storage
            .install_store(PAGE_SPEED_STORE, &Self::store_schema())
            .await?;
        self.context
            .event_bus
            .emit(ModuleEvent::create_module(self.info.clone()))
            .await;
        Ok(())
    }

    fn init_events(self: Arc<Self>, journey: &mut Journey) {
        journey.on(self);
    }

    async fn analyse(&self, url: &UrlWrapper) -> PageSpeedResult<bool> {
        let bus = &self.context.event_bus;
        bus.emit(ModuleEvent::starts_computing(self.info.clone()))
            .await;

        // The journey is over, so the snapshot no longer changes during the pass.
        let snapshot = self.tracker.snapshot();
        info!(
            target: "pagespeed::module",
            "Analysing {} context(s) for {url}",
            snapshot.len()
        );
        for (context_name, context_url) in snapshot.iter() {
            if context_name.is_empty() {
                continue;
            }
            self.analyse_tracked(context_name, context_url, url).await?;
        }

        bus.emit(ModuleEvent::ends_computing(self.info.clone()))
            .await;
        Ok(true)
    }
}

#[async_trait]
impl JourneyListener for PageSpeedModule {
    async fn on_journey_start(&self) -> PageSpeedResult<()> {
        self.tracker.reset();
        Ok(())
    }

    async fn on_new_context(&self, name: &str, page: &dyn PageAccessor) -> PageSpeedResult<()> {
        self.tracker.record(name, page).await
    }
}
