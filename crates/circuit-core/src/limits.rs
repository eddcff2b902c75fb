//! Resource limits for layouts and evaluation.

/// Resource limits for layout construction and evaluation.
///
/// `max_elements` bounds how large a layout may grow. `round_slack` bounds
/// fixed-point evaluation: a layout with `n` elements is given at most
/// `n + round_slack` propagation rounds. Every acyclic layout settles within
/// `n` rounds, so the slack only matters for circuits with feedback that
/// never stabilise, whose state at the cap is reported as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of elements in a layout.
    pub max_elements: usize,
    /// Rounds granted beyond the element count. Treated as at least 1.
    pub round_slack: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_elements: 256,
            round_slack: 4,
        }
    }
}

impl Limits {
    /// Create limits with custom values.
    pub fn new(max_elements: usize, round_slack: usize) -> Self {
        Self {
            max_elements,
            round_slack,
        }
    }

    /// Permissive limits for testing.
    pub fn permissive() -> Self {
        Self {
            max_elements: 4096,
            round_slack: 16,
        }
    }

    /// Strict limits for small on-screen puzzles.
    pub fn strict() -> Self {
        Self {
            max_elements: 64,
            round_slack: 2,
        }
    }

    /// Maximum number of propagation rounds for a layout of this size.
    pub fn round_cap(&self, element_count: usize) -> usize {
        element_count.saturating_add(self.round_slack.max(1))
    }
}
