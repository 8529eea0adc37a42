//! Test doubles shared by the integration tests

use async_trait::async_trait;
use pagespeed_journey::{
    AnalysisResult, MemoryStorage, ModuleContext, ModuleEventBus, PageAccessor, PageSpeedError,
    PageSpeedMetrics, PageSpeedModule, PageSpeedResult, ResultLogger, ScoringLookup,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Page accessor returning a fixed URL, or failing
#[allow(dead_code)]
pub struct StubPage {
    url: Option<String>,
}

#[allow(dead_code)]
impl StubPage {
    pub fn at(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
        }
    }

    pub fn broken() -> Self {
        Self { url: None }
    }
}

#[async_trait]
impl PageAccessor for StubPage {
    async fn current_url(&self) -> PageSpeedResult<String> {
        self.url
            .clone()
            .ok_or_else(|| PageSpeedError::Browser("target closed".to_string()))
    }
}

enum Scripted {
    Metrics(Option<PageSpeedMetrics>),
    Fail(u16),
}

/// Scoring lookup answering from a script and logging every call
#[derive(Default)]
pub struct StubLookup {
    script: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, metrics: Option<PageSpeedMetrics>) {
        self.script
            .lock()
            .insert(url.to_string(), Scripted::Metrics(metrics));
    }

    pub fn fail(&self, url: &str, status: u16) {
        self.script.lock().insert(url.to_string(), Scripted::Fail(status));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ScoringLookup for StubLookup {
    async fn lookup(&self, url: &str) -> PageSpeedResult<Option<PageSpeedMetrics>> {
        self.calls.lock().push(url.to_string());
        match self.script.lock().get(url) {
            Some(Scripted::Metrics(metrics)) => Ok(metrics.clone()),
            Some(Scripted::Fail(status)) => Err(PageSpeedError::Status {
                status: *status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(None),
        }
    }
}

/// Result logger remembering what it was given
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(String, AnalysisResult, String)>>,
}

#[allow(dead_code)]
impl RecordingLogger {
    pub fn entries(&self) -> Vec<(String, AnalysisResult, String)> {
        self.entries.lock().clone()
    }
}

impl ResultLogger for RecordingLogger {
    fn result(&self, label: &str, record: &AnalysisResult, subject_url: &str) {
        self.entries
            .lock()
            .push((label.to_string(), record.clone(), subject_url.to_string()));
    }
}

/// A module wired to in-memory collaborators
#[allow(dead_code)]
pub struct Harness {
    pub module: Arc<PageSpeedModule>,
    pub bus: ModuleEventBus,
    pub storage: Arc<MemoryStorage>,
    pub lookup: Arc<StubLookup>,
    pub logger: Arc<RecordingLogger>,
}

#[allow(dead_code)]
pub fn harness() -> Harness {
    let bus = ModuleEventBus::new(256);
    let storage = Arc::new(MemoryStorage::new());
    let lookup = Arc::new(StubLookup::new());
    let logger = Arc::new(RecordingLogger::default());
    let context = ModuleContext::new(bus.clone(), storage.clone(), logger.clone());
    let module = Arc::new(PageSpeedModule::new(context, lookup.clone()));
    Harness {
        module,
        bus,
        storage,
        lookup,
        logger,
    }
}
