//! Read-only view of a layout for drawing and hit-testing.

use crate::layout::{ElementId, Layout, Point};

/// Hit radius of a port anchor, in canvas units.
pub const PORT_RADIUS: f32 = 15.0;

/// One port as seen by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PortView {
    /// Whether this is an input port.
    pub input: bool,
    /// Elements owning the ports this one is wired to.
    pub connected_to: Vec<ElementId>,
    /// Absolute anchor point.
    pub anchor: Point,
    /// Hit radius around the anchor.
    pub radius: f32,
}

/// One element as seen by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView {
    pub id: ElementId,
    /// Kind tag (`and`, `or`, `not`, `out`, or the sensor tag).
    pub kind: String,
    pub ports: Vec<PortView>,
}

/// Snapshot every element and port of a layout, in layout order.
///
/// Never fed back into evaluation.
pub fn snapshot(layout: &Layout) -> Vec<ElementView> {
    layout
        .elements()
        .iter()
        .map(|element| {
            let ports = element
                .ports()
                .iter()
                .enumerate()
                .map(|(index, &port)| {
                    let connected_to = layout
                        .connections(port)
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|peer| layout.owner(peer).ok().map(|(id, _)| id))
                        .collect();
                    let offset = element.kind().port_offset(index).unwrap_or_default();
                    PortView {
                        input: index < element.kind().input_count(),
                        connected_to,
                        anchor: element.position().offset(offset),
                        radius: PORT_RADIUS,
                    }
                })
                .collect();
            ElementView {
                id: element.id(),
                kind: element.kind().to_string(),
                ports,
            }
        })
        .collect()
}
