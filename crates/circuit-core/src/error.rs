//! Error types for circuit layout editing and evaluation.

use thiserror::Error;

use crate::layout::{ElementId, PortId};

/// Errors that can occur while building or editing a layout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Both ports have the same direction, so no value can flow between them.
    #[error("cannot connect {from} to {to}: ports have the same direction")]
    InvalidConnection {
        /// First port passed to `connect`.
        from: PortId,
        /// Second port passed to `connect`.
        to: PortId,
    },

    /// Port handle was minted by another layout or its element was removed.
    #[error("port {0} does not belong to this layout")]
    UnknownPort(PortId),

    /// No element with this ID exists in the layout.
    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    /// Attempted to insert an element under an ID that is already taken.
    #[error("duplicate element {0}")]
    DuplicateElement(ElementId),

    /// Maximum element count exceeded.
    #[error("maximum elements exceeded ({0})")]
    MaxElementsExceeded(usize),

    /// Every element ID up to `u32::MAX` has been handed out.
    #[error("element ids exhausted")]
    IdsExhausted,

    /// The port arena cannot address another slot.
    #[error("port arena exhausted")]
    PortsExhausted,

    /// Positions must have finite coordinates.
    #[error("non-finite position for element {0}")]
    NonFinitePosition(ElementId),
}

/// Errors that can occur while driving an evaluator or reading a state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A forced value was assigned to an element that is not a sensor.
    #[error("element {0} is not a sensor")]
    NotASensor(ElementId),

    /// No element with this ID exists in the evaluated layout.
    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    /// Port does not belong to the layout the state was computed from.
    #[error("port {0} does not belong to the evaluated layout")]
    UnknownPort(PortId),

    /// The classifier could not derive color and shape from an item.
    #[error("cannot classify item {0:?}")]
    Unclassifiable(String),

    /// A single topological pass was requested on a layout with feedback.
    #[error("layout contains a feedback loop")]
    Cyclic,
}
