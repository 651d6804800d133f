use std::sync::Arc;

use oprelay_config::Config;
use oprelay_errors::Error;
use oprelay_types::{
    BuildEventSubscriptions, BuildOperationDescriptor, OperationFinishEvent, OperationIdentifier,
    OperationProgressEvent, OperationStartEvent, OperationType, PluginIdentifier,
};

use crate::classify::CategoryClassifier;
use crate::consumer::ProgressEventConsumer;
use crate::events::{OperationResult, PluginApplicationDescriptor};
use crate::listener::BuildOperationListener;
use crate::suppression::SuppressedSet;
use crate::tracker::CorrelationTracker;

/// Forwards configuration step operations (plugin and script plugin
/// application) to a client, enriched with the applied plugin.
///
/// Operations outside the filtered category go to `delegate` unchanged. When
/// the client did not subscribe to configuration steps, filtered operations
/// are discarded together with their entire subtree, even though descendants
/// arrive as independent calls.
pub struct ConfigurationStepsForwarder {
    consumer: Arc<dyn ProgressEventConsumer>,
    delegate: Arc<dyn BuildOperationListener>,
    tracker: Arc<dyn CorrelationTracker>,
    classifier: CategoryClassifier,
    // Listener dispatch is not serialized
    skip_events: SuppressedSet,
    enabled: bool,
}

impl ConfigurationStepsForwarder {
    #[must_use]
    pub fn new(
        consumer: Arc<dyn ProgressEventConsumer>,
        subscriptions: &BuildEventSubscriptions,
        delegate: Arc<dyn BuildOperationListener>,
        tracker: Arc<dyn CorrelationTracker>,
    ) -> Self {
        Self {
            consumer,
            delegate,
            tracker,
            classifier: CategoryClassifier::default(),
            skip_events: SuppressedSet::new(),
            enabled: subscriptions.is_requested(OperationType::ConfigurationSteps),
        }
    }

    /// Build a forwarder from loaded configuration: subscriptions decide
    /// whether it is enabled, the filtered kinds drive classification.
    #[must_use]
    pub fn from_config(
        config: &Config,
        consumer: Arc<dyn ProgressEventConsumer>,
        delegate: Arc<dyn BuildOperationListener>,
        tracker: Arc<dyn CorrelationTracker>,
    ) -> Self {
        Self::new(consumer, &config.subscriptions(), delegate, tracker)
            .with_classifier(CategoryClassifier::new(config.filtered_kinds()))
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: CategoryClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of operations currently suppressed.
    #[must_use]
    pub fn suppressed_count(&self) -> usize {
        self.skip_events.len()
    }

    fn to_plugin_application_descriptor(
        &self,
        operation: &BuildOperationDescriptor,
        plugin: PluginIdentifier,
    ) -> PluginApplicationDescriptor {
        let parent_id = self.consumer.resolve_started_ancestor(operation);
        PluginApplicationDescriptor::from_operation(operation, parent_id, plugin)
    }
}

impl BuildOperationListener for ConfigurationStepsForwarder {
    fn started(
        &self,
        operation: &BuildOperationDescriptor,
        event: &OperationStartEvent,
    ) -> Result<(), Error> {
        if let Some(parent_id) = operation.parent_id {
            if self.skip_events.contains(parent_id) {
                tracing::trace!(
                    operation = %operation.id,
                    parent = %parent_id,
                    "parent suppressed, suppressing operation"
                );
                self.skip_events.insert(operation.id);
                return Ok(());
            }
        }

        if !self.classifier.classify(operation).is_filtered() {
            return self.delegate.started(operation, event);
        }

        if !self.enabled {
            // Discard this operation and all children
            tracing::trace!(
                operation = %operation.id,
                "configuration steps not requested, suppressing subtree"
            );
            self.skip_events.insert(operation.id);
            return Ok(());
        }

        match self.tracker.lookup(operation.id) {
            Some(application) => {
                let descriptor =
                    self.to_plugin_application_descriptor(operation, application.plugin);
                self.consumer.emit_started(descriptor.into(), event.start_time)
            }
            None => {
                tracing::debug!(
                    operation = %operation.id,
                    "no running plugin application, forwarding raw start"
                );
                self.delegate.started(operation, event)
            }
        }
    }

    fn progress(
        &self,
        _id: OperationIdentifier,
        _event: &OperationProgressEvent,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn finished(
        &self,
        operation: &BuildOperationDescriptor,
        event: &OperationFinishEvent,
    ) -> Result<(), Error> {
        if self.skip_events.remove(operation.id) {
            return Ok(());
        }

        if !self.classifier.classify(operation).is_filtered() {
            return self.delegate.finished(operation, event);
        }

        match self.tracker.lookup(operation.id) {
            Some(application) => {
                let descriptor =
                    self.to_plugin_application_descriptor(operation, application.plugin);
                self.consumer.emit_finished(
                    descriptor.into(),
                    event.end_time,
                    OperationResult::from(event),
                )
            }
            None => {
                tracing::debug!(
                    operation = %operation.id,
                    "no running plugin application, forwarding raw finish"
                );
                self.delegate.finished(operation, event)
            }
        }
    }
}
