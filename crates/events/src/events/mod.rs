use oprelay_types::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod descriptor;
pub mod result;

pub use descriptor::*;
pub use result::*;

/// Subscriber-facing event emitted for a forwarded operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Operation started
    Started {
        event_time: DateTime<Utc>,
        descriptor: OperationDescriptor,
    },

    /// Operation finished, successfully or not
    Finished {
        event_time: DateTime<Utc>,
        descriptor: OperationDescriptor,
        result: OperationResult,
    },
}

impl ProgressEvent {
    /// The descriptor this event reports on.
    #[must_use]
    pub fn descriptor(&self) -> &OperationDescriptor {
        match self {
            Self::Started { descriptor, .. } | Self::Finished { descriptor, .. } => descriptor,
        }
    }

    #[must_use]
    pub fn event_time(&self) -> DateTime<Utc> {
        match self {
            Self::Started { event_time, .. } | Self::Finished { event_time, .. } => *event_time,
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }
}
