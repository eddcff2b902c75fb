//! Item classification for driving sensors.
//!
//! An item is an opaque token (e.g. `"rc"` for a red circle). A
//! [`Classifier`] derives its color and shape tags; a sensor fires when its
//! own tag equals either of them.

use crate::element::SensorTag;
use crate::error::EvalError;

/// Color and shape tags derived from one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    /// Tag of the item's color.
    pub color: SensorTag,
    /// Tag of the item's shape.
    pub shape: SensorTag,
}

impl Classification {
    /// Create a classification from its two tags.
    pub fn new(color: impl Into<SensorTag>, shape: impl Into<SensorTag>) -> Self {
        Self {
            color: color.into(),
            shape: shape.into(),
        }
    }

    /// Whether the item matches a sensor's tag.
    #[inline]
    pub fn matches(&self, tag: SensorTag) -> bool {
        tag == self.color || tag == self.shape
    }
}

/// Maps an item token to its color and shape tags.
pub trait Classifier {
    /// Classify an item.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Unclassifiable`] if no tags can be derived.
    fn classify(&self, item: &str) -> Result<Classification, EvalError>;
}

/// Reads the color from the first character and the shape from the second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefixClassifier;

impl Classifier for PrefixClassifier {
    fn classify(&self, item: &str) -> Result<Classification, EvalError> {
        let mut chars = item.chars();
        match (chars.next(), chars.next()) {
            (Some(color), Some(shape)) => Ok(Classification::new(color, shape)),
            _ => Err(EvalError::Unclassifiable(item.to_string())),
        }
    }
}

impl<F> Classifier for F
where
    F: Fn(&str) -> Result<Classification, EvalError>,
{
    fn classify(&self, item: &str) -> Result<Classification, EvalError> {
        self(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_classifier() {
        let class = PrefixClassifier.classify("rc").unwrap();
        assert_eq!(class, Classification::new('r', 'c'));
        assert!(class.matches(SensorTag::new('r')));
        assert!(class.matches(SensorTag::new('c')));
        assert!(!class.matches(SensorTag::new('s')));
    }

    #[test]
    fn test_prefix_classifier_ignores_trailing() {
        let class = PrefixClassifier.classify("bsx").unwrap();
        assert_eq!(class, Classification::new('b', 's'));
    }

    #[test]
    fn test_short_item_is_unclassifiable() {
        assert_eq!(
            PrefixClassifier.classify("r"),
            Err(EvalError::Unclassifiable("r".to_string()))
        );
    }

    #[test]
    fn test_closure_classifier() {
        let fixed =
            |_: &str| -> Result<Classification, EvalError> { Ok(Classification::new('g', 't')) };
        assert_eq!(fixed.classify("anything").unwrap().shape, SensorTag::new('t'));
    }
}
