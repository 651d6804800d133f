//! Recording fakes shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use oprelay_errors::{Error, ForwardError};
use oprelay_events::{
    BuildOperationListener, ConfigurationStepsForwarder, CorrelationTracker, OperationDescriptor,
    OperationResult, PluginApplication, ProgressEventConsumer,
};
use oprelay_types::{
    BuildEventSubscriptions, BuildOperationDescriptor, DateTime, OperationDetails,
    OperationFinishEvent, OperationIdentifier, OperationProgressEvent, OperationStartEvent,
    OperationType, PluginIdentifier, Utc,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn id(n: u64) -> OperationIdentifier {
    OperationIdentifier::new(n)
}

pub fn plugin(n: u64) -> PluginIdentifier {
    PluginIdentifier::binary(format!("org.example.Plugin{n}"), Some(format!("plugin-{n}")))
}

pub fn apply_plugin(n: u64, parent: Option<u64>) -> BuildOperationDescriptor {
    with_parent(
        BuildOperationDescriptor::new(id(n), format!("Apply plugin {n}")).with_details(
            OperationDetails::ApplyPlugin {
                plugin: plugin(n),
                target: "project :".into(),
            },
        ),
        parent,
    )
}

pub fn apply_script(n: u64, parent: Option<u64>) -> BuildOperationDescriptor {
    with_parent(
        BuildOperationDescriptor::new(id(n), format!("Apply script {n}")).with_details(
            OperationDetails::ApplyScriptPlugin {
                plugin: PluginIdentifier::script(format!("script-{n}.gradle"), None),
                target: "project :".into(),
            },
        ),
        parent,
    )
}

pub fn task(n: u64, parent: Option<u64>) -> BuildOperationDescriptor {
    with_parent(
        BuildOperationDescriptor::new(id(n), format!("Task {n}")).with_details(
            OperationDetails::ExecuteTask {
                task_path: format!(":task{n}"),
            },
        ),
        parent,
    )
}

fn with_parent(op: BuildOperationDescriptor, parent: Option<u64>) -> BuildOperationDescriptor {
    match parent {
        Some(p) => op.with_parent(id(p)),
        None => op,
    }
}

pub fn start() -> OperationStartEvent {
    OperationStartEvent::now()
}

pub fn success() -> OperationFinishEvent {
    let now = Utc::now();
    OperationFinishEvent::succeeded(now, now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Started,
    Progress,
    Finished,
}

/// Raw pass-through sink recording every call it receives.
#[derive(Default)]
pub struct RecordingListener {
    calls: Mutex<Vec<(Phase, OperationIdentifier)>>,
}

impl RecordingListener {
    pub fn calls(&self) -> Vec<(Phase, OperationIdentifier)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, phase: Phase, op: OperationIdentifier) -> usize {
        self.calls()
            .iter()
            .filter(|(p, i)| *p == phase && *i == op)
            .count()
    }

    fn record(&self, phase: Phase, op: OperationIdentifier) {
        self.calls.lock().unwrap().push((phase, op));
    }
}

impl BuildOperationListener for RecordingListener {
    fn started(
        &self,
        operation: &BuildOperationDescriptor,
        _event: &OperationStartEvent,
    ) -> Result<(), Error> {
        self.record(Phase::Started, operation.id);
        Ok(())
    }

    fn progress(
        &self,
        id: OperationIdentifier,
        _event: &OperationProgressEvent,
    ) -> Result<(), Error> {
        self.record(Phase::Progress, id);
        Ok(())
    }

    fn finished(
        &self,
        operation: &BuildOperationDescriptor,
        _event: &OperationFinishEvent,
    ) -> Result<(), Error> {
        self.record(Phase::Finished, operation.id);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Emitted {
    Started(OperationDescriptor),
    Finished(OperationDescriptor, OperationResult),
}

impl Emitted {
    pub fn id(&self) -> OperationIdentifier {
        match self {
            Self::Started(d) | Self::Finished(d, _) => d.id(),
        }
    }
}

/// Enriched sink recording every event; optionally rejects everything.
#[derive(Default)]
pub struct RecordingConsumer {
    events: Mutex<Vec<Emitted>>,
    started: Mutex<HashSet<OperationIdentifier>>,
    reject: bool,
}

impl RecordingConsumer {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Emitted> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_for(&self, op: OperationIdentifier) -> Vec<Emitted> {
        self.events().into_iter().filter(|e| e.id() == op).collect()
    }

    fn check(&self) -> Result<(), Error> {
        if self.reject {
            return Err(ForwardError::Rejected {
                consumer: "recording".into(),
                reason: "client gone".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl ProgressEventConsumer for RecordingConsumer {
    fn emit_started(
        &self,
        descriptor: OperationDescriptor,
        _event_time: DateTime<Utc>,
    ) -> Result<(), Error> {
        self.check()?;
        self.started.lock().unwrap().insert(descriptor.id());
        self.events.lock().unwrap().push(Emitted::Started(descriptor));
        Ok(())
    }

    fn emit_finished(
        &self,
        descriptor: OperationDescriptor,
        _event_time: DateTime<Utc>,
        result: OperationResult,
    ) -> Result<(), Error> {
        self.check()?;
        self.started.lock().unwrap().remove(&descriptor.id());
        self.events
            .lock()
            .unwrap()
            .push(Emitted::Finished(descriptor, result));
        Ok(())
    }

    fn resolve_started_ancestor(
        &self,
        operation: &BuildOperationDescriptor,
    ) -> Option<OperationIdentifier> {
        let started = self.started.lock().unwrap();
        operation.parent_id.filter(|parent| started.contains(parent))
    }
}

/// Correlation tracker with a fixed set of running plugin applications.
#[derive(Default)]
pub struct StaticTracker {
    running: Mutex<HashMap<OperationIdentifier, PluginApplication>>,
}

impl StaticTracker {
    pub fn with(self, n: u64) -> Self {
        self.running.lock().unwrap().insert(
            id(n),
            PluginApplication {
                plugin: plugin(n),
                target: "project :".into(),
            },
        );
        self
    }
}

impl CorrelationTracker for StaticTracker {
    fn lookup(&self, id: OperationIdentifier) -> Option<PluginApplication> {
        self.running.lock().unwrap().get(&id).cloned()
    }
}

pub struct Harness {
    pub forwarder: ConfigurationStepsForwarder,
    pub consumer: Arc<RecordingConsumer>,
    pub delegate: Arc<RecordingListener>,
}

pub fn harness(enabled: bool, tracker: StaticTracker) -> Harness {
    harness_with(enabled, tracker, RecordingConsumer::default())
}

pub fn harness_with(enabled: bool, tracker: StaticTracker, consumer: RecordingConsumer) -> Harness {
    let subscriptions = if enabled {
        BuildEventSubscriptions::new([OperationType::ConfigurationSteps])
    } else {
        BuildEventSubscriptions::new([OperationType::Generic])
    };
    let consumer = Arc::new(consumer);
    let delegate = Arc::new(RecordingListener::default());
    let forwarder = ConfigurationStepsForwarder::new(
        consumer.clone(),
        &subscriptions,
        delegate.clone(),
        Arc::new(tracker),
    );
    Harness {
        forwarder,
        consumer,
        delegate,
    }
}
