use pagespeed_journey::AnalysisResult;
use pagespeed_journey::module_events::*;
use std::time::Duration;
use tokio::time::timeout;

fn page_speed() -> ModuleInfo {
    ModuleInfo::new("page_speed", "Page Speed")
}

#[tokio::test]
async fn test_event_bus_creation() {
    let bus = ModuleEventBus::new(100);
    assert_eq!(bus.subscriber_count(), 0);
    assert!(!bus.has_subscribers());
    assert!(!bus.is_shutdown());
}

#[tokio::test]
async fn test_publish_with_no_subscribers() {
    let bus = ModuleEventBus::new(10);
    let result = bus.publish(ModuleEvent::create_module(page_speed())).await;

    match result {
        Err(EventBusError::NoSubscribers) => {}
        other => panic!("Expected EventBusError::NoSubscribers, got: {other:?}"),
    }
    assert_eq!(bus.metrics().snapshot().events_undelivered, 1);
    assert_eq!(
        bus.metrics()
            .count_for("page_speed_module__createModule")
            .undelivered,
        1
    );
}

#[tokio::test]
async fn test_emit_without_subscribers_is_silent() {
    let bus = ModuleEventBus::new(10);
    let delivered = bus.emit(ModuleEvent::starts_computing(page_speed())).await;
    assert_eq!(delivered, 0);
}

#[tokio::test]
async fn test_subscribe_and_publish() {
    let bus = ModuleEventBus::new(10);
    let mut receiver = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 1);

    let count = bus
        .publish(ModuleEvent::before_analyse(
            EventChannel::Module,
            page_speed(),
            "https://example.com/".to_string(),
        ))
        .await
        .expect("one subscriber");
    assert_eq!(count, 1);

    let received = match timeout(Duration::from_millis(100), receiver.recv()).await {
        Ok(Ok(event)) => event,
        Ok(Err(e)) => panic!("Failed to receive event: {e}"),
        Err(_) => panic!("Timeout waiting for event"),
    };

    match received {
        ModuleEvent::BeforeAnalyse {
            channel, module, url, ..
        } => {
            assert_eq!(channel, EventChannel::Module);
            assert_eq!(module, page_speed());
            assert_eq!(url, "https://example.com/");
        }
        other => panic!("Unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_multiple_subscribers() {
    let bus = ModuleEventBus::new(10);
    let mut first = bus.subscribe();
    let mut second = bus.subscribe();

    let count = bus.emit(ModuleEvent::ends_computing(page_speed())).await;
    assert_eq!(count, 2);

    for receiver in [&mut first, &mut second] {
        let event = timeout(Duration::from_millis(100), receiver.recv())
            .await
            .expect("no timeout")
            .expect("event");
        assert_eq!(event.name(), "module__endsComputing");
    }
}

#[tokio::test]
async fn test_filtered_receiver_only_sees_results() {
    let bus = ModuleEventBus::new(10);
    let mut results = bus.subscribe_filtered(|e| matches!(e, ModuleEvent::OnResult { .. }));

    let result = AnalysisResult::new("https://example.com/", "main", None);
    bus.emit(ModuleEvent::starts_computing(page_speed())).await;
    bus.emit(ModuleEvent::on_result(
        page_speed(),
        "https://example.com/".to_string(),
        result.clone(),
    ))
    .await;
    bus.emit(ModuleEvent::ends_computing(page_speed())).await;

    let event = results.try_recv().expect("recv").expect("one match");
    assert_eq!(event.result(), Some(&result));
    assert!(results.try_recv().expect("recv").is_none());
    assert!(!results.would_receive(&ModuleEvent::create_module(page_speed())));
}

#[tokio::test]
async fn test_event_names_follow_channel() {
    let result = AnalysisResult::new("https://example.com/", "main", None);
    let cases = [
        (ModuleEvent::create_module(page_speed()), "page_speed_module__createModule"),
        (ModuleEvent::starts_computing(page_speed()), "module__startsComputing"),
        (ModuleEvent::ends_computing(page_speed()), "module__endsComputing"),
        (
            ModuleEvent::before_analyse(EventChannel::Generic, page_speed(), String::new()),
            "module__beforeAnalyse",
        ),
        (
            ModuleEvent::on_result(page_speed(), String::new(), result.clone()),
            "page_speed_module__onResult",
        ),
        (
            ModuleEvent::after_analyse(EventChannel::Module, page_speed(), String::new(), result),
            "page_speed_module__afterAnalyse",
        ),
    ];

    for (event, expected) in cases {
        assert_eq!(event.name(), expected);
    }
}

#[tokio::test]
async fn test_shutdown_signal() {
    let bus = ModuleEventBus::new(10);
    let waiter = bus.clone();
    let handle = tokio::spawn(async move {
        waiter.wait_for_shutdown().await;
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    bus.shutdown();

    timeout(Duration::from_millis(500), handle)
        .await
        .expect("shutdown observed")
        .expect("task completed");
    assert!(bus.is_shutdown());
}

#[tokio::test]
async fn test_metrics_count_deliveries_per_event_name() {
    let bus = ModuleEventBus::new(10);
    bus.emit(ModuleEvent::create_module(page_speed())).await;

    let _first = bus.subscribe();
    let _second = bus.subscribe();
    bus.emit(ModuleEvent::starts_computing(page_speed())).await;
    bus.emit(ModuleEvent::starts_computing(page_speed())).await;

    let snapshot = bus.metrics().snapshot();
    assert_eq!(snapshot.events_delivered, 2);
    assert_eq!(snapshot.events_undelivered, 1);
    assert_eq!(snapshot.receiver_deliveries, 4);
    assert_eq!(snapshot.peak_subscribers, 2);
    assert_eq!(
        snapshot.by_event.get("module__startsComputing"),
        Some(&EventCount {
            delivered: 2,
            undelivered: 0
        })
    );

    let report = bus.get_metrics_report();
    assert!(report.contains("module__startsComputing: 2 delivered, 0 undelivered"));
    assert!(report.contains("page_speed_module__createModule: 0 delivered, 1 undelivered"));
}

#[tokio::test]
async fn test_metrics_disabled_records_nothing() {
    let bus = ModuleEventBus::with_config(EventBusConfig {
        capacity: 10,
        enable_metrics: false,
    });
    let _receiver = bus.subscribe();
    bus.emit(ModuleEvent::create_module(page_speed())).await;

    assert_eq!(bus.metrics().snapshot(), MetricsSnapshot::default());
    assert_eq!(bus.get_metrics_report(), "Metrics disabled");
}

#[tokio::test]
async fn test_drain_skips_past_overwritten_events() {
    let bus = ModuleEventBus::new(4);
    let mut results = bus.subscribe_filtered(|e| matches!(e, ModuleEvent::OnResult { .. }));
    let mut strict = bus.subscribe_filtered(|e| matches!(e, ModuleEvent::OnResult { .. }));

    for i in 0..10 {
        let result = AnalysisResult::new("https://example.com/", format!("ctx-{i}"), None);
        bus.emit(ModuleEvent::on_result(page_speed(), String::new(), result))
            .await;
    }

    assert!(matches!(
        strict.try_recv(),
        Err(EventBusError::ReceiverLagged(6))
    ));

    let drained = results.drain();
    assert_eq!(drained.missed, 6);
    let contexts: Vec<_> = drained
        .events
        .iter()
        .filter_map(|e| e.result().map(|r| r.context.clone()))
        .collect();
    assert_eq!(contexts, vec!["ctx-6", "ctx-7", "ctx-8", "ctx-9"]);
    assert_eq!(results.drain().events.len(), 0);
}
