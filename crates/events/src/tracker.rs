//! Correlation of running operations with plugin applications

use dashmap::DashMap;
use oprelay_errors::Error;
use oprelay_types::{
    BuildOperationDescriptor, OperationDetails, OperationFinishEvent, OperationIdentifier,
    OperationProgressEvent, OperationStartEvent, PluginIdentifier,
};

use crate::listener::BuildOperationListener;

/// A plugin currently being applied by one running operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginApplication {
    pub plugin: PluginIdentifier,
    pub target: String,
}

/// Side table answering "what is operation `id` currently doing?".
pub trait CorrelationTracker: Send + Sync {
    /// The plugin application correlated with a running operation, if any.
    fn lookup(&self, id: OperationIdentifier) -> Option<PluginApplication>;
}

/// Tracks plugin applications for exactly the lifetime of their operation.
///
/// Register it ahead of any forwarder consulting it, so the record exists
/// before the forwarder sees the start and is dropped only after the
/// forwarder has handled the finish.
#[derive(Debug, Default)]
pub struct PluginApplicationTracker {
    running: DashMap<OperationIdentifier, PluginApplication>,
}

impl PluginApplicationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }
}

impl CorrelationTracker for PluginApplicationTracker {
    fn lookup(&self, id: OperationIdentifier) -> Option<PluginApplication> {
        self.running.get(&id).map(|entry| entry.value().clone())
    }
}

impl BuildOperationListener for PluginApplicationTracker {
    fn started(
        &self,
        operation: &BuildOperationDescriptor,
        _event: &OperationStartEvent,
    ) -> Result<(), Error> {
        if let Some(
            OperationDetails::ApplyPlugin { plugin, target }
            | OperationDetails::ApplyScriptPlugin { plugin, target },
        ) = &operation.details
        {
            tracing::trace!(
                operation = %operation.id,
                plugin = plugin.display_name(),
                "plugin application started"
            );
            self.running.insert(
                operation.id,
                PluginApplication {
                    plugin: plugin.clone(),
                    target: target.clone(),
                },
            );
        }
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
        self.running.remove(&operation.id);
        Ok(())
    }
}
