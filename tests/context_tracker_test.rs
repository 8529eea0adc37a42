mod common;

use async_trait::async_trait;
use common::StubPage;
use pagespeed_journey::{
    ContextTracker, Journey, JourneyEvent, JourneyListener, PageAccessor, PageSpeedError,
    PageSpeedResult,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[tokio::test]
async fn test_record_and_lookup() {
    let tracker = ContextTracker::new();
    tracker
        .record("main", &StubPage::at("https://example.com/"))
        .await
        .expect("record main");
    tracker
        .record("checkout", &StubPage::at("https://example.com/cart"))
        .await
        .expect("record checkout");

    assert_eq!(tracker.len(), 2);
    assert_eq!(tracker.url_for("main").as_deref(), Some("https://example.com/"));
    assert_eq!(
        tracker.url_for("checkout").as_deref(),
        Some("https://example.com/cart")
    );
    assert_eq!(tracker.url_for("missing"), None);
}

#[tokio::test]
async fn test_rerecording_overwrites_in_place() {
    let tracker = ContextTracker::new();
    tracker.record("a", &StubPage::at("https://a.test/1")).await.unwrap();
    tracker.record("b", &StubPage::at("https://b.test/")).await.unwrap();
    tracker.record("a", &StubPage::at("https://a.test/2")).await.unwrap();

    let snapshot = tracker.snapshot();
    let entries: Vec<_> = snapshot.iter().collect();
    assert_eq!(
        entries,
        vec![("a", "https://a.test/2"), ("b", "https://b.test/")]
    );
}

#[tokio::test]
async fn test_failed_read_leaves_no_entry() {
    let tracker = ContextTracker::new();
    let err = tracker
        .record("broken", &StubPage::broken())
        .await
        .expect_err("read should fail");

    assert!(matches!(err, PageSpeedError::Browser(_)));
    assert!(tracker.is_empty());
    assert_eq!(tracker.url_for("broken"), None);
}

#[tokio::test]
async fn test_reset_clears_and_is_idempotent() {
    let tracker = ContextTracker::new();
    tracker.reset();
    assert!(tracker.is_empty());

    tracker.record("main", &StubPage::at("https://example.com/")).await.unwrap();
    tracker.reset();
    tracker.reset();
    assert!(tracker.is_empty());
    assert!(tracker.snapshot().is_empty());
}

#[tokio::test]
async fn test_snapshot_is_a_copy() {
    let tracker = ContextTracker::new();
    tracker.record("main", &StubPage::at("https://example.com/")).await.unwrap();

    let before = tracker.snapshot();
    tracker.reset();
    assert_eq!(before.len(), 1);
    assert_eq!(before.get("main"), Some("https://example.com/"));
}

/// Listener recording the order in which it saw journey signals
#[derive(Default)]
struct OrderListener {
    label: &'static str,
    seen: Arc<Mutex<Vec<String>>>,
    fail_on_context: bool,
}

#[async_trait]
impl JourneyListener for OrderListener {
    async fn on_journey_start(&self) -> PageSpeedResult<()> {
        self.seen.lock().push(format!("{}:start", self.label));
        Ok(())
    }

    async fn on_new_context(&self, name: &str, page: &dyn PageAccessor) -> PageSpeedResult<()> {
        let url = page.current_url().await?;
        self.seen.lock().push(format!("{}:{name}={url}", self.label));
        if self.fail_on_context {
            return Err(PageSpeedError::Browser("listener failed".to_string()));
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_journey_dispatches_to_listeners_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut journey = Journey::new();
    journey.on(Arc::new(OrderListener {
        label: "first",
        seen: seen.clone(),
        ..Default::default()
    }));
    journey.on(Arc::new(OrderListener {
        label: "second",
        seen: seen.clone(),
        ..Default::default()
    }));
    assert_eq!(journey.listener_count(), 2);

    journey.start().await.unwrap();
    journey
        .new_context("main", &StubPage::at("https://example.com/"))
        .await
        .unwrap();

    assert_eq!(
        *seen.lock(),
        vec![
            "first:start".to_string(),
            "second:start".to_string(),
            "first:main=https://example.com/".to_string(),
            "second:main=https://example.com/".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_journey_stops_at_first_listener_error() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut journey = Journey::new();
    journey.on(Arc::new(OrderListener {
        label: "failing",
        seen: seen.clone(),
        fail_on_context: true,
    }));
    journey.on(Arc::new(OrderListener {
        label: "after",
        seen: seen.clone(),
        ..Default::default()
    }));

    let event = JourneyEvent::NewContext {
        name: "main".to_string(),
        wrapper: Arc::new(StubPage::at("https://example.com/")),
    };
    let result = journey.dispatch(&event).await;

    assert!(result.is_err());
    assert_eq!(
        *seen.lock(),
        vec!["failing:main=https://example.com/".to_string()]
    );
}
