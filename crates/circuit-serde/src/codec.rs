//! JSON round-trip for layouts.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "limits": { "max_elements": 256, "round_slack": 4 },
//!   "elements": [{ "id": 0, "kind": "r", "x": 10.0, "y": 20.0 }],
//!   "wires": [[{ "element": 0, "port": 0 }, { "element": 1, "port": 0 }]]
//! }
//! ```
//!
//! Each wire is listed once as `[output, input]`, sorted, so equal layouts
//! stringify identically. Documents without `limits` parse with
//! [`Limits::default`].

use circuit_core::{ElementId, Layout, LayoutError, Limits, Point, PortId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::registry::KindRegistry;

/// Errors that can occur while encoding or decoding a layout.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Text is not a well-formed layout document.
    #[error("malformed layout document: {0}")]
    Json(#[from] serde_json::Error),

    /// Kind tag is not in the registry.
    #[error("unknown element kind {0:?}")]
    UnknownKind(String),

    /// Wire endpoint names a missing element or port.
    #[error("no port {port} on element {element}")]
    UnknownEndpoint { element: u32, port: usize },

    /// Document describes an invalid layout.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LayoutDoc {
    #[serde(default)]
    limits: LimitsDoc,
    elements: Vec<ElementDoc>,
    #[serde(default)]
    wires: Vec<(Endpoint, Endpoint)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct LimitsDoc {
    max_elements: usize,
    round_slack: usize,
}

impl Default for LimitsDoc {
    fn default() -> Self {
        Limits::default().into()
    }
}

impl From<Limits> for LimitsDoc {
    fn from(limits: Limits) -> Self {
        Self {
            max_elements: limits.max_elements,
            round_slack: limits.round_slack,
        }
    }
}

impl From<LimitsDoc> for Limits {
    fn from(doc: LimitsDoc) -> Self {
        Limits::new(doc.max_elements, doc.round_slack)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ElementDoc {
    id: u32,
    kind: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
struct Endpoint {
    element: u32,
    port: usize,
}

impl Endpoint {
    fn of(layout: &Layout, port: PortId) -> Result<Self, CodecError> {
        let (element, port) = layout.owner(port)?;
        Ok(Self {
            element: element.0,
            port,
        })
    }

    fn resolve(self, layout: &Layout) -> Result<PortId, CodecError> {
        layout
            .port(ElementId(self.element), self.port)
            .ok_or(CodecError::UnknownEndpoint {
                element: self.element,
                port: self.port,
            })
    }
}

/// Encode a layout as text.
pub fn stringify(layout: &Layout) -> Result<String, CodecError> {
    let elements = layout
        .elements()
        .iter()
        .map(|e| ElementDoc {
            id: e.id().0,
            kind: e.kind().to_string(),
            x: e.position().x,
            y: e.position().y,
        })
        .collect();

    let mut wires = layout
        .wires()
        .into_iter()
        .map(|(out, inp)| -> Result<_, CodecError> {
            Ok((Endpoint::of(layout, out)?, Endpoint::of(layout, inp)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    wires.sort_unstable();

    let text = serde_json::to_string(&LayoutDoc {
        limits: layout.limits().into(),
        elements,
        wires,
    })?;
    debug!(
        elements = layout.len(),
        wires = layout.connection_count(),
        bytes = text.len(),
        "layout stringified"
    );
    Ok(text)
}

/// Decode a layout, accepting only kinds in `registry`.
///
/// The layout gets the limits recorded in the document.
pub fn parse(text: &str, registry: &KindRegistry) -> Result<Layout, CodecError> {
    let doc: LayoutDoc = serde_json::from_str(text)?;
    let limits = doc.limits.into();
    build(doc, registry, limits)
}

/// Decode a layout, overriding the limits recorded in the document.
pub fn parse_with_limits(
    text: &str,
    registry: &KindRegistry,
    limits: Limits,
) -> Result<Layout, CodecError> {
    build(serde_json::from_str(text)?, registry, limits)
}

fn build(doc: LayoutDoc, registry: &KindRegistry, limits: Limits) -> Result<Layout, CodecError> {
    let mut layout = Layout::with_limits(limits);

    for element in &doc.elements {
        let kind = registry
            .get(&element.kind)
            .ok_or_else(|| CodecError::UnknownKind(element.kind.clone()))?;
        let id = ElementId(element.id);
        layout.insert_element(id, kind)?;
        layout.set_position(id, Point::new(element.x, element.y))?;
    }

    for &(from, to) in &doc.wires {
        let a = from.resolve(&layout)?;
        let b = to.resolve(&layout)?;
        layout.connect(a, b)?;
    }

    debug!(
        elements = layout.len(),
        wires = layout.connection_count(),
        "layout parsed"
    );
    Ok(layout)
}
