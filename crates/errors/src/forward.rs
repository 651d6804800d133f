//! Event forwarding error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Failures raised by a sink while accepting a forwarded event.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ForwardError {
    #[error("progress consumer disconnected while forwarding operation {operation}")]
    ConsumerDisconnected { operation: String },

    #[error("{consumer} rejected event: {reason}")]
    Rejected { consumer: String, reason: String },
}

impl UserFacingError for ForwardError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ConsumerDisconnected { .. } => {
                Some("The subscribing client went away; reconnect to resume receiving events.")
            }
            Self::Rejected { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::ConsumerDisconnected { .. } => "forward.consumer_disconnected",
            Self::Rejected { .. } => "forward.rejected",
        })
    }
}
