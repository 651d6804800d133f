//! Parent links of running operations

use dashmap::DashMap;
use oprelay_errors::Error;
use oprelay_types::{
    BuildOperationDescriptor, OperationFinishEvent, OperationIdentifier, OperationProgressEvent,
    OperationStartEvent,
};

use crate::listener::BuildOperationListener;

/// Remembers the parent of every running operation.
///
/// Must observe the unfiltered stream, ahead of any forwarder, so it knows
/// ancestors that were suppressed or never reported to a client.
#[derive(Debug, Default)]
pub struct OperationAncestryTracker {
    parents: DashMap<OperationIdentifier, Option<OperationIdentifier>>,
}

impl OperationAncestryTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parent of a running operation; `None` for roots and unknown ids.
    #[must_use]
    pub fn parent_of(&self, id: OperationIdentifier) -> Option<OperationIdentifier> {
        self.parents.get(&id).and_then(|entry| *entry.value())
    }

    /// Walk up from `start` (inclusive) and return the first id matching `predicate`.
    pub fn find_closest_matching_ancestor(
        &self,
        start: Option<OperationIdentifier>,
        predicate: impl Fn(OperationIdentifier) -> bool,
    ) -> Option<OperationIdentifier> {
        let mut current = start;
        while let Some(id) = current {
            if predicate(id) {
                return Some(id);
            }
            current = self.parent_of(id);
        }
        None
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl BuildOperationListener for OperationAncestryTracker {
    fn started(
        &self,
        operation: &BuildOperationDescriptor,
        _event: &OperationStartEvent,
    ) -> Result<(), Error> {
        self.parents.insert(operation.id, operation.parent_id);
        Ok(())
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
        _event: &OperationFinishEvent,
    ) -> Result<(), Error> {
        self.parents.remove(&operation.id);
        Ok(())
    }
}
