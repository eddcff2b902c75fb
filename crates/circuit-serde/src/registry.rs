//! Kind tags accepted when parsing a layout.

use std::collections::HashMap;

use circuit_core::{ElementKind, Layout};

/// Maps kind tags (`and`, `or`, `not`, `out`, sensor tags) to element kinds.
///
/// A level only enables the sensors it needs, so parsing against a
/// level's registry rejects circuits using foreign sensors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindRegistry {
    kinds: HashMap<String, ElementKind>,
}

impl KindRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gates, the output sink, and one sensor per tag.
    pub fn standard(sensors: impl IntoIterator<Item = char>) -> Self {
        let mut registry = Self::new();
        for kind in [
            ElementKind::And,
            ElementKind::Or,
            ElementKind::Not,
            ElementKind::Output,
        ] {
            registry.register(kind);
        }
        for tag in sensors {
            registry.register(ElementKind::sensor(tag));
        }
        registry
    }

    /// Every kind used by a layout.
    pub fn for_layout(layout: &Layout) -> Self {
        let mut registry = Self::new();
        for element in layout.elements() {
            registry.register(element.kind());
        }
        registry
    }

    /// Register a kind under its display tag.
    pub fn register(&mut self, kind: ElementKind) -> &mut Self {
        self.kinds.insert(kind.to_string(), kind);
        self
    }

    /// Look up a kind by tag.
    pub fn get(&self, tag: &str) -> Option<ElementKind> {
        self.kinds.get(tag).copied()
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if no tags are registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
