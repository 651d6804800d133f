//! Build operation identity, descriptors and lifecycle events

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::details::{DetailsKind, OperationDetails};

/// Unique identifier of one build operation instance.
///
/// Identifiers are assigned by the build engine and never reused while any
/// reference to the operation is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationIdentifier(u64);

impl OperationIdentifier {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for OperationIdentifier {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OperationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable description of one unit of work, created when it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOperationDescriptor {
    pub id: OperationIdentifier,
    pub parent_id: Option<OperationIdentifier>,
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<OperationDetails>,
}

impl BuildOperationDescriptor {
    /// Create a root descriptor without details; the display name defaults to `name`.
    #[must_use]
    pub fn new(id: OperationIdentifier, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            parent_id: None,
            display_name: name.clone(),
            name,
            details: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: OperationIdentifier) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: OperationDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Declared kind of the details payload; operations without details are unclassified.
    #[must_use]
    pub fn details_kind(&self) -> DetailsKind {
        self.details
            .as_ref()
            .map_or(DetailsKind::Unclassified, OperationDetails::kind)
    }
}

/// Emitted once when an operation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStartEvent {
    pub start_time: DateTime<Utc>,
}

impl OperationStartEvent {
    #[must_use]
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self { start_time }
    }

    /// Start event stamped with the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::new(Utc::now())
    }
}

/// Intermediate status reported by a running operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationProgressEvent {
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl OperationProgressEvent {
    #[must_use]
    pub fn new(time: DateTime<Utc>, status: Option<String>) -> Self {
        Self { time, status }
    }
}

/// Failure reported for an operation, with its chain of causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<OperationFailure>,
}

impl OperationFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: None,
            causes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: OperationFailure) -> Self {
        self.causes.push(cause);
        self
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Emitted once when an operation finishes, after its start event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationFinishEvent {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<OperationFailure>,
}

impl OperationFinishEvent {
    #[must_use]
    pub fn succeeded(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            failure: None,
        }
    }

    #[must_use]
    pub fn failed(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        failure: OperationFailure,
    ) -> Self {
        Self {
            start_time,
            end_time,
            failure: Some(failure),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}
