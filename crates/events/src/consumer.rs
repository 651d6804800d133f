//! Subscriber-facing event consumers

use std::sync::Arc;

use dashmap::DashSet;
use oprelay_errors::{Error, ForwardError};
use oprelay_types::{BuildOperationDescriptor, DateTime, OperationIdentifier, Utc};

use crate::ancestry::OperationAncestryTracker;
use crate::events::{OperationDescriptor, OperationResult, ProgressEvent};
use crate::EventSender;

/// Accepts forwarded events on behalf of one subscribing client.
pub trait ProgressEventConsumer: Send + Sync {
    /// Report that an operation started.
    ///
    /// # Errors
    ///
    /// Returns an error if the client can no longer receive events.
    fn emit_started(
        &self,
        descriptor: OperationDescriptor,
        event_time: DateTime<Utc>,
    ) -> Result<(), Error>;

    /// Report that an operation finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the client can no longer receive events.
    fn emit_finished(
        &self,
        descriptor: OperationDescriptor,
        event_time: DateTime<Utc>,
        result: OperationResult,
    ) -> Result<(), Error>;

    /// Nearest ancestor of `operation` this consumer has already reported as
    /// started, walking the original parent chain; `None` if there is none.
    fn resolve_started_ancestor(
        &self,
        operation: &BuildOperationDescriptor,
    ) -> Option<OperationIdentifier>;
}

/// Consumer that delivers events over an unbounded channel.
pub struct ChannelEventConsumer {
    sender: EventSender,
    ancestry: Arc<OperationAncestryTracker>,
    started: DashSet<OperationIdentifier>,
}

impl ChannelEventConsumer {
    #[must_use]
    pub fn new(sender: EventSender, ancestry: Arc<OperationAncestryTracker>) -> Self {
        Self {
            sender,
            ancestry,
            started: DashSet::new(),
        }
    }

    /// Whether a started event for `id` was delivered and not yet finished.
    #[must_use]
    pub fn is_started(&self, id: OperationIdentifier) -> bool {
        self.started.contains(&id)
    }

    fn send(&self, id: OperationIdentifier, event: ProgressEvent) -> Result<(), Error> {
        self.sender.send(event).map_err(|_| {
            tracing::debug!(operation = %id, "progress consumer disconnected");
            Error::from(ForwardError::ConsumerDisconnected {
                operation: id.to_string(),
            })
        })
    }
}

impl ProgressEventConsumer for ChannelEventConsumer {
    fn emit_started(
        &self,
        descriptor: OperationDescriptor,
        event_time: DateTime<Utc>,
    ) -> Result<(), Error> {
        let id = descriptor.id();
        tracing::trace!(operation = %id, parent = ?descriptor.parent_id(), "emit started");
        self.started.insert(id);
        self.send(
            id,
            ProgressEvent::Started {
                event_time,
                descriptor,
            },
        )
        .inspect_err(|_| {
            self.started.remove(&id);
        })
    }

    fn emit_finished(
        &self,
        descriptor: OperationDescriptor,
        event_time: DateTime<Utc>,
        result: OperationResult,
    ) -> Result<(), Error> {
        let id = descriptor.id();
        tracing::trace!(operation = %id, success = result.is_success(), "emit finished");
        self.started.remove(&id);
        self.send(
            id,
            ProgressEvent::Finished {
                event_time,
                descriptor,
                result,
            },
        )
    }

    fn resolve_started_ancestor(
        &self,
        operation: &BuildOperationDescriptor,
    ) -> Option<OperationIdentifier> {
        self.ancestry
            .find_closest_matching_ancestor(operation.parent_id, |id| self.started.contains(&id))
    }
}
