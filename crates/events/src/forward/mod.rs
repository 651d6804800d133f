//! Forwarders turning the raw operation stream into subscriber events

mod configuration;
mod generic;

pub use configuration::ConfigurationStepsForwarder;
pub use generic::GenericOperationForwarder;
