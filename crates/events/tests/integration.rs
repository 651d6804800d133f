//! Integration tests for the full forwarding pipeline

mod common;

use std::sync::Arc;

use common::*;
use oprelay_config::Config;
use oprelay_errors::{Error, ForwardError};
use oprelay_events::*;
use oprelay_types::{BuildEventSubscriptions, OperationType};

struct Pipeline {
    listener: CompositeListener,
    rx: EventReceiver,
    consumer: Arc<ChannelEventConsumer>,
    tracker: Arc<PluginApplicationTracker>,
    ancestry: Arc<OperationAncestryTracker>,
}

fn pipeline(subscriptions: &BuildEventSubscriptions) -> Pipeline {
    let (tx, rx) = channel();
    let ancestry = Arc::new(OperationAncestryTracker::new());
    let tracker = Arc::new(PluginApplicationTracker::new());
    let consumer = Arc::new(ChannelEventConsumer::new(tx, ancestry.clone()));
    let generic = Arc::new(GenericOperationForwarder::new(consumer.clone(), subscriptions));
    let forwarder = Arc::new(ConfigurationStepsForwarder::new(
        consumer.clone(),
        subscriptions,
        generic,
        tracker.clone(),
    ));
    let listener = CompositeListener::new()
        .with(ancestry.clone())
        .with(tracker.clone())
        .with(forwarder);
    Pipeline {
        listener,
        rx,
        consumer,
        tracker,
        ancestry,
    }
}

fn drain(rx: &mut EventReceiver) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_plugin_application_reaches_client_enriched() {
    init_tracing();
    let mut p = pipeline(&BuildEventSubscriptions::all());
    let root = task(1, None);
    let apply = apply_plugin(2, Some(1));

    p.listener.started(&root, &start()).unwrap();
    p.listener.started(&apply, &start()).unwrap();
    p.listener.finished(&apply, &success()).unwrap();
    p.listener.finished(&root, &success()).unwrap();

    let events = drain(&mut p.rx);
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0].descriptor(), OperationDescriptor::Generic(_)));
    match events[1].descriptor() {
        OperationDescriptor::PluginApplication(d) => {
            assert_eq!(d.id, id(2));
            assert_eq!(d.parent_id, Some(id(1)));
            assert_eq!(d.plugin, plugin(2));
        }
        other => panic!("unexpected descriptor {other:?}"),
    }
    assert!(matches!(
        events[2],
        ProgressEvent::Finished { ref result, .. } if result.is_success()
    ));

    assert_eq!(p.tracker.running_count(), 0);
    assert!(p.ancestry.is_empty());
    assert!(!p.consumer.is_started(id(1)));
}

#[tokio::test]
async fn test_parent_skips_operations_client_never_saw() {
    let mut p = pipeline(&BuildEventSubscriptions::new([
        OperationType::ConfigurationSteps,
    ]));
    let root = task(1, None);
    let outer = apply_plugin(2, Some(1));
    let configure = task(3, Some(2));
    let inner = apply_script(4, Some(3));

    for op in [&root, &outer, &configure, &inner] {
        p.listener.started(op, &start()).unwrap();
    }

    let events = drain(&mut p.rx);
    let parents: Vec<_> = events
        .iter()
        .map(|e| (e.descriptor().id(), e.descriptor().parent_id()))
        .collect();
    // root and configure are generic and not subscribed
    assert_eq!(parents, vec![(id(2), None), (id(4), Some(id(2)))]);

    for op in [&inner, &configure, &outer, &root] {
        p.listener.finished(op, &success()).unwrap();
    }
    assert_eq!(drain(&mut p.rx).len(), 2);
}

#[tokio::test]
async fn test_unsubscribed_configuration_steps_hide_subtree() {
    let mut p = pipeline(&BuildEventSubscriptions::new([OperationType::Generic]));
    let root = task(1, None);
    let apply = apply_plugin(2, Some(1));
    let nested = task(3, Some(2));
    let later = task(4, Some(1));

    for op in [&root, &apply, &nested] {
        p.listener.started(op, &start()).unwrap();
    }
    for op in [&nested, &apply] {
        p.listener.finished(op, &success()).unwrap();
    }
    p.listener.started(&later, &start()).unwrap();
    p.listener.finished(&later, &success()).unwrap();
    p.listener.finished(&root, &success()).unwrap();

    let ids: Vec<_> = drain(&mut p.rx)
        .iter()
        .map(|e| e.descriptor().id())
        .collect();
    assert_eq!(ids, vec![id(1), id(4), id(4), id(1)]);
}

#[tokio::test]
async fn test_disconnected_client_surfaces_error() {
    let p = pipeline(&BuildEventSubscriptions::all());
    drop(p.rx);

    let err = p
        .listener
        .started(&apply_plugin(1, None), &start())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Forward(ForwardError::ConsumerDisconnected { .. })
    ));
}

#[test]
fn test_forwarder_from_config() {
    let config = Config::from_toml_str(
        r#"
[subscriptions]
operation_types = ["generic"]

[forwarding]
filtered_kinds = ["apply_plugin", "execute_task"]
"#,
    )
    .unwrap();
    let consumer = Arc::new(RecordingConsumer::default());
    let delegate = Arc::new(RecordingListener::default());
    let forwarder = ConfigurationStepsForwarder::from_config(
        &config,
        consumer.clone(),
        delegate.clone(),
        Arc::new(StaticTracker::default()),
    );
    assert!(!forwarder.is_enabled());

    // execute_task is filtered by configuration, so it is suppressed too
    forwarder.started(&task(1, None), &start()).unwrap();
    forwarder.started(&apply_script(2, None), &start()).unwrap();
    assert_eq!(forwarder.suppressed_count(), 1);
    assert_eq!(delegate.calls(), vec![(Phase::Started, id(2))]);
}

#[test]
fn test_progress_event_serialization() {
    let descriptor: OperationDescriptor = PluginApplicationDescriptor {
        id: id(7),
        name: "Apply plugin".into(),
        display_name: "Apply plugin java".into(),
        parent_id: Some(id(3)),
        plugin: plugin(7),
    }
    .into();
    let event = ProgressEvent::Started {
        event_time: oprelay_types::Utc::now(),
        descriptor,
    };

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "started");
    assert_eq!(json["descriptor"]["kind"], "plugin_application");
    assert_eq!(json["descriptor"]["parentId"], 3);

    let back: ProgressEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
}
