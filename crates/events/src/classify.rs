//! Classification of operations into the filtered category

use std::collections::BTreeSet;

use oprelay_types::{BuildOperationDescriptor, DetailsKind};

/// Result of classifying one operation's details payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// One of the configured configuration step kinds
    Filtered(DetailsKind),
    /// Anything else, including operations without details
    Other,
}

impl Classification {
    #[must_use]
    pub fn is_filtered(self) -> bool {
        matches!(self, Self::Filtered(_))
    }
}

/// Decides which operations belong to the filtered category, purely from the
/// declared kind of their details payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryClassifier {
    kinds: BTreeSet<DetailsKind>,
}

impl CategoryClassifier {
    /// `Unclassified` is dropped from `kinds`; unknown payloads always pass through.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = DetailsKind>) -> Self {
        let kinds = kinds
            .into_iter()
            .filter(|kind| *kind != DetailsKind::Unclassified)
            .collect();
        Self { kinds }
    }

    /// Plugin and script plugin application.
    #[must_use]
    pub fn plugin_application() -> Self {
        Self::new([DetailsKind::ApplyPlugin, DetailsKind::ApplyScriptPlugin])
    }

    #[must_use]
    pub fn classify(&self, operation: &BuildOperationDescriptor) -> Classification {
        let kind = operation.details_kind();
        if self.kinds.contains(&kind) {
            Classification::Filtered(kind)
        } else {
            Classification::Other
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = DetailsKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::plugin_application()
    }
}
