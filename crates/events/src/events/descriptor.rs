//! Descriptors attached to subscriber-facing events

use oprelay_types::{BuildOperationDescriptor, OperationIdentifier, PluginIdentifier};
use serde::{Deserialize, Serialize};

/// Descriptor of a forwarded operation as the client sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationDescriptor {
    /// Operation forwarded without category-specific metadata
    Generic(GenericOperationDescriptor),

    /// Plugin or script plugin application, enriched with the applied plugin
    PluginApplication(PluginApplicationDescriptor),
}

impl OperationDescriptor {
    #[must_use]
    pub fn id(&self) -> OperationIdentifier {
        match self {
            Self::Generic(d) => d.id,
            Self::PluginApplication(d) => d.id,
        }
    }

    /// Nearest ancestor the client has already been told about.
    #[must_use]
    pub fn parent_id(&self) -> Option<OperationIdentifier> {
        match self {
            Self::Generic(d) => d.parent_id,
            Self::PluginApplication(d) => d.parent_id,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Generic(d) => &d.display_name,
            Self::PluginApplication(d) => &d.display_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericOperationDescriptor {
    pub id: OperationIdentifier,
    pub name: String,
    pub display_name: String,
    pub parent_id: Option<OperationIdentifier>,
}

impl GenericOperationDescriptor {
    /// Copy identity and names from `operation`, with an already resolved parent.
    #[must_use]
    pub fn from_operation(
        operation: &BuildOperationDescriptor,
        parent_id: Option<OperationIdentifier>,
    ) -> Self {
        Self {
            id: operation.id,
            name: operation.name.clone(),
            display_name: operation.display_name.clone(),
            parent_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginApplicationDescriptor {
    pub id: OperationIdentifier,
    pub name: String,
    pub display_name: String,
    pub parent_id: Option<OperationIdentifier>,
    pub plugin: PluginIdentifier,
}

impl PluginApplicationDescriptor {
    /// Copy identity and names from `operation`, with an already resolved parent.
    #[must_use]
    pub fn from_operation(
        operation: &BuildOperationDescriptor,
        parent_id: Option<OperationIdentifier>,
        plugin: PluginIdentifier,
    ) -> Self {
        Self {
            id: operation.id,
            name: operation.name.clone(),
            display_name: operation.display_name.clone(),
            parent_id,
            plugin,
        }
    }
}

impl From<GenericOperationDescriptor> for OperationDescriptor {
    fn from(descriptor: GenericOperationDescriptor) -> Self {
        Self::Generic(descriptor)
    }
}

impl From<PluginApplicationDescriptor> for OperationDescriptor {
    fn from(descriptor: PluginApplicationDescriptor) -> Self {
        Self::PluginApplication(descriptor)
    }
}
