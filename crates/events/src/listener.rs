//! Inbound build operation listener interface
//!
//! The build engine calls listeners from the thread running each operation,
//! without serializing calls across operations. For one operation `started`
//! always completes before `finished` is issued, though `finished` may arrive
//! on a different thread.

use std::sync::Arc;

use oprelay_errors::Error;
use oprelay_types::{
    BuildOperationDescriptor, OperationFinishEvent, OperationIdentifier, OperationProgressEvent,
    OperationStartEvent,
};

/// Receives the raw build operation stream.
///
/// Also used as the raw pass-through sink: a forwarder that decides not to
/// handle an operation hands the unchanged call to a delegate listener.
pub trait BuildOperationListener: Send + Sync {
    /// Called once when `operation` starts.
    ///
    /// # Errors
    ///
    /// Returns an error if a downstream sink rejects the forwarded event.
    fn started(
        &self,
        operation: &BuildOperationDescriptor,
        event: &OperationStartEvent,
    ) -> Result<(), Error>;

    /// Called any number of times while `id` is running.
    ///
    /// # Errors
    ///
    /// Returns an error if a downstream sink rejects the forwarded event.
    fn progress(&self, id: OperationIdentifier, event: &OperationProgressEvent)
        -> Result<(), Error>;

    /// Called once when `operation` finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if a downstream sink rejects the forwarded event.
    fn finished(
        &self,
        operation: &BuildOperationDescriptor,
        event: &OperationFinishEvent,
    ) -> Result<(), Error>;
}

/// Fans one operation stream out to an ordered list of listeners.
///
/// `started` and `progress` run in registration order, `finished` in reverse,
/// so a tracker registered ahead of a forwarder holds its state for the whole
/// time the forwarder handles the operation. Dispatch stops at the first error.
#[derive(Default, Clone)]
pub struct CompositeListener {
    listeners: Vec<Arc<dyn BuildOperationListener>>,
}

impl CompositeListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener after the ones already registered.
    #[must_use]
    pub fn with(mut self, listener: Arc<dyn BuildOperationListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl BuildOperationListener for CompositeListener {
    fn started(
        &self,
        operation: &BuildOperationDescriptor,
        event: &OperationStartEvent,
    ) -> Result<(), Error> {
        self.listeners
            .iter()
            .try_for_each(|listener| listener.started(operation, event))
    }

    fn progress(
        &self,
        id: OperationIdentifier,
        event: &OperationProgressEvent,
    ) -> Result<(), Error> {
        self.listeners
            .iter()
            .try_for_each(|listener| listener.progress(id, event))
    }

    fn finished(
        &self,
        operation: &BuildOperationDescriptor,
        event: &OperationFinishEvent,
    ) -> Result<(), Error> {
        self.listeners
            .iter()
            .rev()
            .try_for_each(|listener| listener.finished(operation, event))
    }
}
