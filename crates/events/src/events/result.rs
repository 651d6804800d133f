//! Operation result summaries

use oprelay_types::{DateTime, OperationFailure, OperationFinishEvent, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a finished operation as reported to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OperationResult {
    Success {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    Failure {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        failures: Vec<OperationFailure>,
    },
}

impl OperationResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        match self {
            Self::Success { start_time, .. } | Self::Failure { start_time, .. } => *start_time,
        }
    }

    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        match self {
            Self::Success { end_time, .. } | Self::Failure { end_time, .. } => *end_time,
        }
    }
}

impl From<&OperationFinishEvent> for OperationResult {
    fn from(event: &OperationFinishEvent) -> Self {
        match &event.failure {
            None => Self::Success {
                start_time: event.start_time,
                end_time: event.end_time,
            },
            Some(failure) => Self::Failure {
                start_time: event.start_time,
                end_time: event.end_time,
                failures: vec![failure.clone()],
            },
        }
    }
}
