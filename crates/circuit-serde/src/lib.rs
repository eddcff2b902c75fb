//! Text round-trip for logic-puzzle circuit layouts.
//!
//! [`stringify`] encodes a [`Layout`](circuit_core::Layout) as a JSON
//! document; [`parse`] rebuilds it against a [`KindRegistry`] of the kinds
//! a level allows. `parse(stringify(layout))` preserves element IDs, kinds,
//! positions, and the connection set.
//!
//! ```
//! use circuit_core::{ElementKind, Layout};
//! use circuit_serde::{parse, stringify, KindRegistry};
//!
//! let mut layout = Layout::new();
//! let red = layout.add_element(ElementKind::sensor('r')).unwrap();
//! let out = layout.add_element(ElementKind::Output).unwrap();
//! let (a, b) = (layout.port(red, 0).unwrap(), layout.port(out, 0).unwrap());
//! layout.connect(a, b).unwrap();
//!
//! let text = stringify(&layout).unwrap();
//! let parsed = parse(&text, &KindRegistry::standard(['r'])).unwrap();
//! assert_eq!(parsed.connection_count(), 1);
//! ```

pub mod codec;
pub mod registry;

pub use circuit_core;
pub use codec::{parse, parse_with_limits, stringify, CodecError};
pub use registry::KindRegistry;
