//! Element/port graph for logic-puzzle circuits.
//!
//! A [`Layout`] owns its elements and an arena of ports. Ports are
//! addressed by [`PortId`] handles that carry the identity of the layout
//! that minted them, so a handle from one layout is never mistaken for a
//! port of another. Connections are stored symmetrically as adjacency sets
//! of arena slots.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use uuid::Uuid;

use crate::element::{Direction, ElementKind};
use crate::error::LayoutError;
use crate::limits::Limits;

/// Stable identity of an element within a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a layout instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(Uuid);

impl LayoutId {
    fn mint() -> Self {
        Self(Uuid::now_v7())
    }
}

/// Handle to a port in a layout's port arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId {
    layout: LayoutId,
    slot: u32,
}

impl PortId {
    /// Arena slot of this port.
    pub fn slot(&self) -> usize {
        self.slot as usize
    }

    /// Identity of the layout that minted this handle.
    pub fn layout(&self) -> LayoutId {
        self.layout
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port@{}", self.slot)
    }
}

/// Position in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    pub fn offset(self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }
}

/// A typed node in the circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    position: Point,
    /// Ports in kind-defined order.
    ports: Vec<PortId>,
}

impl Element {
    /// Identity of this element.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Kind of this element.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Canvas position (cosmetic only).
    pub fn position(&self) -> Point {
        self.position
    }

    /// Ports in kind-defined order: inputs first, then the output.
    pub fn ports(&self) -> &[PortId] {
        &self.ports
    }

    /// Port at `index`, if the kind has that many ports.
    pub fn port(&self, index: usize) -> Option<PortId> {
        self.ports.get(index).copied()
    }

    /// Input ports in order.
    pub fn input_ports(&self) -> &[PortId] {
        &self.ports[..self.kind.input_count()]
    }

    /// The output port, if the kind has one.
    pub fn output_port(&self) -> Option<PortId> {
        self.kind.output_index().and_then(|i| self.port(i))
    }
}

/// Arena entry for a live port.
#[derive(Debug, Clone)]
pub(crate) struct PortSlot {
    pub(crate) element: ElementId,
    pub(crate) index: usize,
    pub(crate) direction: Direction,
    /// Slots of connected ports (always of the opposite direction).
    pub(crate) links: BTreeSet<u32>,
}

/// The full circuit graph: elements plus the connection relation.
///
/// Element order is stable for iteration but carries no evaluation
/// meaning. Arena slots are never reused: removing an element leaves its
/// slots empty so stale handles keep failing with `UnknownPort`, and the
/// arena grows with every element ever added. Cloning a layout mints a new identity, so port handles from
/// the original are not accepted by the clone (re-resolve them with
/// [`Layout::port`]).
#[derive(Debug)]
pub struct Layout {
    id: LayoutId,
    elements: Vec<Element>,
    ports: Vec<Option<PortSlot>>,
    /// `None` once `u32::MAX` has been used.
    next_id: Option<u32>,
    limits: Limits,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Layout {
    fn clone(&self) -> Self {
        let id = LayoutId::mint();
        let rebind = |port: &PortId| PortId {
            layout: id,
            slot: port.slot,
        };
        Self {
            id,
            elements: self
                .elements
                .iter()
                .map(|e| Element {
                    ports: e.ports.iter().map(rebind).collect(),
                    ..e.clone()
                })
                .collect(),
            ports: self.ports.clone(),
            next_id: self.next_id,
            limits: self.limits,
        }
    }
}

impl Layout {
    /// Create an empty layout with default limits.
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create an empty layout with custom limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            id: LayoutId::mint(),
            elements: Vec::new(),
            ports: Vec::new(),
            next_id: Some(0),
            limits,
        }
    }

    /// Identity of this layout.
    pub fn id(&self) -> LayoutId {
        self.id
    }

    /// Limits this layout enforces.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the layout has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in layout order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Get an element by its ID.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// The first `OUTPUT` element in layout order.
    pub fn output_element(&self) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.kind == ElementKind::Output)
    }

    /// Add an element with the next free ID.
    pub fn add_element(&mut self, kind: ElementKind) -> Result<ElementId, LayoutError> {
        let id = ElementId(self.next_id.ok_or(LayoutError::IdsExhausted)?);
        self.insert_element(id, kind)?;
        Ok(id)
    }

    /// Add an element under an explicit ID.
    pub fn insert_element(&mut self, id: ElementId, kind: ElementKind) -> Result<(), LayoutError> {
        if self.elements.len() >= self.limits.max_elements {
            return Err(LayoutError::MaxElementsExceeded(self.limits.max_elements));
        }
        if self.element(id).is_some() {
            return Err(LayoutError::DuplicateElement(id));
        }
        let base = u32::try_from(self.ports.len()).map_err(|_| LayoutError::PortsExhausted)?;
        u32::try_from(kind.port_count())
            .ok()
            .and_then(|count| base.checked_add(count))
            .ok_or(LayoutError::PortsExhausted)?;

        let mut ports = Vec::with_capacity(kind.port_count());
        for (index, slot) in (0..kind.port_count()).zip(base..) {
            let Some(direction) = kind.direction(index) else {
                break;
            };
            self.ports.push(Some(PortSlot {
                element: id,
                index,
                direction,
                links: BTreeSet::new(),
            }));
            ports.push(PortId {
                layout: self.id,
                slot,
            });
        }

        self.elements.push(Element {
            id,
            kind,
            position: Point::default(),
            ports,
        });
        self.next_id = match id.0.checked_add(1) {
            Some(next) => self.next_id.map(|current| current.max(next)),
            None => None,
        };
        Ok(())
    }

    /// Remove an element together with its ports and their connections.
    pub fn remove_element(&mut self, id: ElementId) -> Result<Element, LayoutError> {
        let pos = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or(LayoutError::UnknownElement(id))?;
        let element = self.elements.remove(pos);

        for port in &element.ports {
            let Some(slot) = self.ports.get_mut(port.slot()).and_then(Option::take) else {
                continue;
            };
            for peer in slot.links {
                if let Some(Some(peer)) = self.ports.get_mut(peer as usize) {
                    peer.links.remove(&port.slot);
                }
            }
        }
        Ok(element)
    }

    /// Move an element. Never alters identity or connections.
    ///
    /// Both coordinates must be finite.
    pub fn set_position(&mut self, id: ElementId, position: Point) -> Result<(), LayoutError> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(LayoutError::NonFinitePosition(id));
        }
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(LayoutError::UnknownElement(id))?;
        element.position = position;
        Ok(())
    }

    /// Port `index` of element `id`.
    pub fn port(&self, id: ElementId, index: usize) -> Option<PortId> {
        self.element(id).and_then(|e| e.port(index))
    }

    /// Direction of a port.
    pub fn direction(&self, port: PortId) -> Result<Direction, LayoutError> {
        Ok(self.slot(port)?.direction)
    }

    /// Element owning a port, and the port's index on that element.
    pub fn owner(&self, port: PortId) -> Result<(ElementId, usize), LayoutError> {
        let slot = self.slot(port)?;
        Ok((slot.element, slot.index))
    }

    /// Ports connected to `port`, in arena order.
    pub fn connections(&self, port: PortId) -> Result<Vec<PortId>, LayoutError> {
        let slot = self.slot(port)?;
        Ok(slot.links.iter().map(|&s| self.handle(s)).collect())
    }

    /// The output port feeding an input port, if connected.
    pub fn driver(&self, port: PortId) -> Result<Option<PortId>, LayoutError> {
        let slot = self.slot(port)?;
        if slot.direction == Direction::Output {
            return Ok(None);
        }
        Ok(slot.links.iter().next().map(|&s| self.handle(s)))
    }

    /// Connect two ports of opposite direction.
    ///
    /// An input port is fed by at most one output: connecting an input
    /// that is already wired replaces its previous connection. An output
    /// may fan out to any number of inputs. Connecting an already
    /// connected pair is a no-op.
    pub fn connect(&mut self, a: PortId, b: PortId) -> Result<(), LayoutError> {
        let da = self.direction(a)?;
        let db = self.direction(b)?;
        if da == db {
            return Err(LayoutError::InvalidConnection { from: a, to: b });
        }
        let (out, inp) = if da == Direction::Output { (a, b) } else { (b, a) };

        let stale: Vec<u32> = self
            .slot(inp)?
            .links
            .iter()
            .copied()
            .filter(|&s| s != out.slot)
            .collect();
        for s in stale {
            self.unlink(inp.slot, s);
        }
        self.link(out.slot, inp.slot);
        Ok(())
    }

    /// Remove the connection between two ports.
    ///
    /// Returns whether a connection existed.
    pub fn disconnect(&mut self, a: PortId, b: PortId) -> Result<bool, LayoutError> {
        self.slot(a)?;
        self.slot(b)?;
        Ok(self.unlink(a.slot, b.slot))
    }

    /// Number of output→input connections.
    pub fn connection_count(&self) -> usize {
        self.ports
            .iter()
            .flatten()
            .filter(|s| s.direction == Direction::Output)
            .map(|s| s.links.len())
            .sum()
    }

    /// All connections as `(output, input)` pairs, ordered by arena slot.
    pub fn wires(&self) -> Vec<(PortId, PortId)> {
        let mut wires = Vec::new();
        for (slot, port) in self.ports.iter().enumerate() {
            let Some(port) = port else { continue };
            if port.direction != Direction::Output {
                continue;
            }
            for &peer in &port.links {
                wires.push((self.handle(slot as u32), self.handle(peer)));
            }
        }
        wires
    }

    /// Elements ordered so every element follows the elements feeding it.
    ///
    /// Returns `None` if the layout contains a feedback loop. Ties are
    /// broken by layout order.
    pub fn topological_order(&self) -> Option<Vec<ElementId>> {
        let n = self.elements.len();
        let index_of = |id: ElementId| self.elements.iter().position(|e| e.id == id);

        let mut indegree = vec![0usize; n];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (out, inp) in self.wires() {
            let from = self.owner(out).ok().and_then(|(id, _)| index_of(id))?;
            let to = self.owner(inp).ok().and_then(|(id, _)| index_of(id))?;
            successors[from].push(to);
            indegree[to] += 1;
        }

        let mut ready: VecDeque<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(i) = ready.pop_front() {
            order.push(self.elements[i].id);
            for &j in &successors[i] {
                indegree[j] -= 1;
                if indegree[j] == 0 {
                    ready.push_back(j);
                }
            }
        }

        (order.len() == n).then_some(order)
    }

    /// Number of arena slots, including the empty slots of removed elements.
    pub(crate) fn slot_count(&self) -> usize {
        self.ports.len()
    }

    /// Arena entry for a slot index, if live.
    pub(crate) fn slot_at(&self, slot: usize) -> Option<&PortSlot> {
        self.ports.get(slot).and_then(Option::as_ref)
    }

    /// Resolve a handle to its live arena entry.
    pub(crate) fn slot(&self, port: PortId) -> Result<&PortSlot, LayoutError> {
        if port.layout != self.id {
            return Err(LayoutError::UnknownPort(port));
        }
        self.slot_at(port.slot()).ok_or(LayoutError::UnknownPort(port))
    }

    fn handle(&self, slot: u32) -> PortId {
        PortId {
            layout: self.id,
            slot,
        }
    }

    fn link(&mut self, a: u32, b: u32) {
        if let Some(Some(port)) = self.ports.get_mut(a as usize) {
            port.links.insert(b);
        }
        if let Some(Some(port)) = self.ports.get_mut(b as usize) {
            port.links.insert(a);
        }
    }

    fn unlink(&mut self, a: u32, b: u32) -> bool {
        let mut removed = false;
        if let Some(Some(port)) = self.ports.get_mut(a as usize) {
            removed |= port.links.remove(&b);
        }
        if let Some(Some(port)) = self.ports.get_mut(b as usize) {
            removed |= port.links.remove(&a);
        }
        removed
    }
}
