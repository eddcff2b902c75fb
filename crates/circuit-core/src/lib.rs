//! Logic-puzzle circuit engine.
//!
//! A circuit is a [`Layout`] of elements (AND, OR, NOT gates, sensors keyed
//! by a color or shape tag, and one output sink) whose ports are wired
//! together. An [`Evaluator`] forces sensor values from an item's
//! classification and propagates values to a fixed point; the settled
//! value at the output element's input is the accept verdict.
//!
//! # Overview
//!
//! - **Closed element kinds**: [`ElementKind`] fixes port arity, port
//!   directions, and the gate function
//! - **Arena of ports**: ports are addressed by [`PortId`] handles bound to
//!   the layout that minted them
//! - **Feedback allowed**: evaluation iterates to a fixed point, bounded by
//!   a round cap from [`Limits`]; circuits that never settle report their
//!   values at the cap with [`State::converged`] set to `false`
//! - **Unconnected inputs read low**
//!
//! # Example
//!
//! ```
//! use circuit_core::{ElementKind, Evaluator, Layout, PrefixClassifier};
//!
//! // SENSOR(r) AND SENSOR(c) -> OUTPUT
//! let mut layout = Layout::new();
//! let red = layout.add_element(ElementKind::sensor('r')).unwrap();
//! let circle = layout.add_element(ElementKind::sensor('c')).unwrap();
//! let and = layout.add_element(ElementKind::And).unwrap();
//! let out = layout.add_element(ElementKind::Output).unwrap();
//!
//! let wires = [((red, 0), (and, 0)), ((circle, 0), (and, 1)), ((and, 2), (out, 0))];
//! for ((from, i), (to, j)) in wires {
//!     let a = layout.port(from, i).unwrap();
//!     let b = layout.port(to, j).unwrap();
//!     layout.connect(a, b).unwrap();
//! }
//!
//! let mut eval = Evaluator::new(&layout);
//! assert!(eval.evaluate_item(&PrefixClassifier, "rc").unwrap().accept);
//! assert!(!eval.evaluate_item(&PrefixClassifier, "rs").unwrap().accept);
//! ```

pub mod classify;
pub mod element;
pub mod error;
pub mod eval;
pub mod layout;
pub mod limits;
pub mod session;
pub mod snapshot;
pub mod topo;

pub use classify::{Classification, Classifier, PrefixClassifier};
pub use element::{Direction, ElementKind, SensorTag};
pub use error::{EvalError, LayoutError};
pub use eval::{Evaluator, State};
pub use layout::{Element, ElementId, Layout, LayoutId, Point, PortId};
pub use limits::Limits;
pub use session::{EngineSession, LayoutEvent};
pub use snapshot::{snapshot, ElementView, PortView, PORT_RADIUS};
pub use topo::evaluate_acyclic;
