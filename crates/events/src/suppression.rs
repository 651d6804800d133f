//! Concurrent set of operations whose subtree is being discarded

use dashmap::DashSet;
use oprelay_types::OperationIdentifier;

/// Identifiers of suppressed operations.
///
/// An id is present from the moment its start is suppressed until its
/// matching finish is processed. Owned by one forwarder instance, so
/// independent forwarders never see each other's suppressions.
#[derive(Debug, Default)]
pub struct SuppressedSet {
    ids: DashSet<OperationIdentifier>,
}

impl SuppressedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the id was already suppressed.
    pub fn insert(&self, id: OperationIdentifier) -> bool {
        self.ids.insert(id)
    }

    #[must_use]
    pub fn contains(&self, id: OperationIdentifier) -> bool {
        self.ids.contains(&id)
    }

    /// Atomically remove `id`; only one concurrent caller observes `true`.
    pub fn remove(&self, id: OperationIdentifier) -> bool {
        self.ids.remove(&id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
