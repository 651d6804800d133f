//! Typed details payloads carried by build operation descriptors

use serde::{Deserialize, Serialize};

/// Identity of an applied plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PluginIdentifier {
    /// A compiled plugin, identified by its implementation class and optional id.
    Binary {
        class_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        plugin_id: Option<String>,
    },
    /// A script plugin, identified by its display name and optional source URI.
    Script {
        display_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uri: Option<String>,
    },
}

impl PluginIdentifier {
    #[must_use]
    pub fn binary(class_name: impl Into<String>, plugin_id: Option<String>) -> Self {
        Self::Binary {
            class_name: class_name.into(),
            plugin_id,
        }
    }

    #[must_use]
    pub fn script(display_name: impl Into<String>, uri: Option<String>) -> Self {
        Self::Script {
            display_name: display_name.into(),
            uri,
        }
    }

    /// Human readable name: the plugin id when known, else the class or script name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Binary {
                plugin_id: Some(id),
                ..
            } => id,
            Self::Binary { class_name, .. } => class_name,
            Self::Script { display_name, .. } => display_name,
        }
    }
}

/// Details payload describing what a build operation does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationDetails {
    /// Applying a binary plugin to a target (project, settings, init script).
    ApplyPlugin {
        plugin: PluginIdentifier,
        target: String,
    },
    /// Applying a script plugin to a target.
    ApplyScriptPlugin {
        plugin: PluginIdentifier,
        target: String,
    },
    ConfigureProject {
        project_path: String,
    },
    ExecuteTask {
        task_path: String,
    },
    /// Any payload kind this layer does not know about.
    Custom {
        #[serde(rename = "custom_kind")]
        kind: String,
    },
}

impl OperationDetails {
    /// The declared kind of this payload.
    #[must_use]
    pub fn kind(&self) -> DetailsKind {
        match self {
            Self::ApplyPlugin { .. } => DetailsKind::ApplyPlugin,
            Self::ApplyScriptPlugin { .. } => DetailsKind::ApplyScriptPlugin,
            Self::ConfigureProject { .. } => DetailsKind::ConfigureProject,
            Self::ExecuteTask { .. } => DetailsKind::ExecuteTask,
            Self::Custom { .. } => DetailsKind::Unclassified,
        }
    }

    /// The plugin being applied, for plugin application payloads.
    #[must_use]
    pub fn plugin(&self) -> Option<&PluginIdentifier> {
        match self {
            Self::ApplyPlugin { plugin, .. } | Self::ApplyScriptPlugin { plugin, .. } => {
                Some(plugin)
            }
            _ => None,
        }
    }
}

/// Closed set of details kinds a classifier can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailsKind {
    ApplyPlugin,
    ApplyScriptPlugin,
    ConfigureProject,
    ExecuteTask,
    Unclassified,
}

impl DetailsKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApplyPlugin => "apply_plugin",
            Self::ApplyScriptPlugin => "apply_script_plugin",
            Self::ConfigureProject => "configure_project",
            Self::ExecuteTask => "execute_task",
            Self::Unclassified => "unclassified",
        }
    }

    /// Parse the `snake_case` name used in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "apply_plugin" => Some(Self::ApplyPlugin),
            "apply_script_plugin" => Some(Self::ApplyScriptPlugin),
            "configure_project" => Some(Self::ConfigureProject),
            "execute_task" => Some(Self::ExecuteTask),
            "unclassified" => Some(Self::Unclassified),
            _ => None,
        }
    }
}

impl std::fmt::Display for DetailsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
