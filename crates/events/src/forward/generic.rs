use std::sync::Arc;

use oprelay_errors::Error;
use oprelay_types::{
    BuildEventSubscriptions, BuildOperationDescriptor, OperationFinishEvent, OperationIdentifier,
    OperationProgressEvent, OperationStartEvent, OperationType,
};

use crate::consumer::ProgressEventConsumer;
use crate::events::{GenericOperationDescriptor, OperationResult};
use crate::listener::BuildOperationListener;

/// Raw pass-through sink: reports every operation it receives as a generic
/// operation, or drops it when the client did not subscribe to generic events.
pub struct GenericOperationForwarder {
    consumer: Arc<dyn ProgressEventConsumer>,
    enabled: bool,
}

impl GenericOperationForwarder {
    #[must_use]
    pub fn new(
        consumer: Arc<dyn ProgressEventConsumer>,
        subscriptions: &BuildEventSubscriptions,
    ) -> Self {
        Self {
            consumer,
            enabled: subscriptions.is_requested(OperationType::Generic),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn descriptor(&self, operation: &BuildOperationDescriptor) -> GenericOperationDescriptor {
        let parent_id = self.consumer.resolve_started_ancestor(operation);
        GenericOperationDescriptor::from_operation(operation, parent_id)
    }
}

impl BuildOperationListener for GenericOperationForwarder {
    fn started(
        &self,
        operation: &BuildOperationDescriptor,
        event: &OperationStartEvent,
    ) -> Result<(), Error> {
        if !self.enabled {
            return Ok(());
        }
        tracing::trace!(operation = %operation.id, "forwarding generic start");
        self.consumer
            .emit_started(self.descriptor(operation).into(), event.start_time)
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
        if !self.enabled {
            return Ok(());
        }
        tracing::trace!(operation = %operation.id, "forwarding generic finish");
        self.consumer.emit_finished(
            self.descriptor(operation).into(),
            event.end_time,
            OperationResult::from(event),
        )
    }
}
