#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Build operation event forwarding for oprelay
//!
//! The build engine reports every unit of work as a nested stream of
//! started / progress / finished notifications. This crate turns that raw
//! stream into the events a subscribing client asked for.
//!
//! ## Architecture
//!
//! ```text
//! build engine ──► CompositeListener
//!                    ├─► OperationAncestryTracker   (id -> parent)
//!                    ├─► PluginApplicationTracker   (id -> running plugin)
//!                    └─► ConfigurationStepsForwarder
//!                          ├─ suppressed ──► dropped (whole subtree)
//!                          ├─ enriched   ──► ProgressEventConsumer
//!                          └─ other      ──► GenericOperationForwarder ──► ProgressEventConsumer
//! ```
//!
//! - **Listeners** receive the raw stream; dispatch is not serialized.
//! - **Consumers** accept subscriber-facing events and know which operations
//!   they already reported, so enriched descriptors only reference parents the
//!   client has seen.
//! - **Trackers** answer side lookups keyed by operation id.

pub mod ancestry;
pub mod classify;
pub mod consumer;
pub mod events;
pub mod forward;
pub mod listener;
pub mod suppression;
pub mod tracker;

pub use ancestry::OperationAncestryTracker;
pub use classify::{CategoryClassifier, Classification};
pub use consumer::{ChannelEventConsumer, ProgressEventConsumer};
pub use events::{
    GenericOperationDescriptor, OperationDescriptor, OperationResult,
    PluginApplicationDescriptor, ProgressEvent,
};
pub use forward::{ConfigurationStepsForwarder, GenericOperationForwarder};
pub use listener::{BuildOperationListener, CompositeListener};
pub use suppression::SuppressedSet;
pub use tracker::{CorrelationTracker, PluginApplication, PluginApplicationTracker};

use tokio::sync::mpsc::UnboundedSender;

/// Type alias for the sender half of a subscriber event channel
pub type EventSender = UnboundedSender<ProgressEvent>;

/// Type alias for the receiver half of a subscriber event channel
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<ProgressEvent>;

/// Create a new subscriber event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
