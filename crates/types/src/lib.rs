#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for oprelay
//!
//! This crate provides the data model shared by the build operation stream
//! and the subscriber-facing event forwarding layer: operation identities
//! and descriptors, typed details payloads, lifecycle events and the
//! subscription categories clients can ask for.

pub mod details;
pub mod operation;
pub mod subscription;

// Re-export commonly used types
pub use details::{DetailsKind, OperationDetails, PluginIdentifier};
pub use operation::{
    BuildOperationDescriptor, OperationFailure, OperationFinishEvent, OperationIdentifier,
    OperationProgressEvent, OperationStartEvent,
};
pub use subscription::{BuildEventSubscriptions, OperationType};

pub use chrono::{DateTime, TimeDelta, Utc};
