//! Event categories a client can subscribe to

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Category of build events a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Generic,
    Task,
    Test,
    ProjectConfiguration,
    ConfigurationSteps,
    FileDownload,
}

impl OperationType {
    pub const ALL: [OperationType; 6] = [
        Self::Generic,
        Self::Task,
        Self::Test,
        Self::ProjectConfiguration,
        Self::ConfigurationSteps,
        Self::FileDownload,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Task => "task",
            Self::Test => "test",
            Self::ProjectConfiguration => "project_configuration",
            Self::ConfigurationSteps => "configuration_steps",
            Self::FileDownload => "file_download",
        }
    }

    /// Parse the `snake_case` name used in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of operation types one subscriber asked for, fixed for its session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildEventSubscriptions {
    types: BTreeSet<OperationType>,
}

impl BuildEventSubscriptions {
    #[must_use]
    pub fn new(types: impl IntoIterator<Item = OperationType>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn all() -> Self {
        Self::new(OperationType::ALL)
    }

    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_requested(&self, operation_type: OperationType) -> bool {
        self.types.contains(&operation_type)
    }

    #[must_use]
    pub fn is_any_requested(&self) -> bool {
        !self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OperationType> + '_ {
        self.types.iter().copied()
    }
}
