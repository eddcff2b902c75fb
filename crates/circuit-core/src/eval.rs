//! Fixed-point evaluator for circuit layouts.
//!
//! Circuits may contain feedback, so evaluation is not a single topological
//! pass. Each round recomputes every element's output from its current
//! inputs, then pulls every input port from the output feeding it. Rounds
//! repeat until one changes nothing or the round cap from [`Limits`] is hit.
//!
//! A circuit that never settles (an inverter feeding itself, for instance)
//! is not an error: the values at the cap are returned with
//! [`State::converged`] set to `false`.

use tracing::{debug, trace, warn};

use crate::classify::{Classification, Classifier};
use crate::element::{Direction, ElementKind};
use crate::error::EvalError;
use crate::layout::{ElementId, Layout, LayoutId, PortId};
use crate::limits::Limits;

/// Port values produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    layout: LayoutId,
    /// Indexed by arena slot; `None` for slots of removed elements.
    values: Vec<Option<bool>>,
    /// Settled value of the accept port, or `false` if there is none.
    pub accept: bool,
    /// Whether a round without changes was reached before the cap.
    pub converged: bool,
}

impl State {
    pub(crate) fn from_parts(
        layout: LayoutId,
        values: Vec<Option<bool>>,
        accept: bool,
        converged: bool,
    ) -> Self {
        Self {
            layout,
            values,
            accept,
            converged,
        }
    }

    /// Propagated value of a port.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownPort`] if the port does not belong to
    /// the layout this state was computed from.
    pub fn get_value(&self, port: PortId) -> Result<bool, EvalError> {
        if port.layout() != self.layout {
            return Err(EvalError::UnknownPort(port));
        }
        self.values
            .get(port.slot())
            .copied()
            .flatten()
            .ok_or(EvalError::UnknownPort(port))
    }

    /// Identity of the layout this state was computed from.
    pub fn layout(&self) -> LayoutId {
        self.layout
    }
}

/// An element compiled for evaluation.
#[derive(Debug, Clone)]
struct Node {
    id: ElementId,
    kind: ElementKind,
    /// Arena slots of the input ports, in port order.
    inputs: Vec<usize>,
    /// Arena slot of the output port.
    output: Option<usize>,
    /// Forced output value (sensors only).
    forced: bool,
}

/// Evaluates a layout against a mutable sensor assignment.
///
/// The evaluator snapshots the layout's structure at construction; build a
/// new evaluator to pick up edits. It keeps the last settled port values
/// as the seed for the next evaluation, so feedback circuits that can hold
/// state (latches) remember it between items.
#[derive(Debug)]
pub struct Evaluator<'a> {
    layout: &'a Layout,
    accept_port: Option<PortId>,
    limits: Limits,
    nodes: Vec<Node>,
    /// `(input slot, driving output slot)` for every live input port.
    drivers: Vec<(usize, Option<usize>)>,
    /// Slot liveness, copied into every state.
    live: Vec<bool>,
    seed: Vec<bool>,
    last_rounds: usize,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator using the layout's limits.
    pub fn new(layout: &'a Layout) -> Self {
        Self::with_limits(layout, layout.limits())
    }

    /// Create an evaluator with custom limits.
    pub fn with_limits(layout: &'a Layout, limits: Limits) -> Self {
        let accept_port = layout.output_element().and_then(|e| e.port(0));

        let nodes: Vec<Node> = layout
            .elements()
            .iter()
            .map(|e| Node {
                id: e.id(),
                kind: e.kind(),
                inputs: e.input_ports().iter().map(PortId::slot).collect(),
                output: e.output_port().map(|p| p.slot()),
                forced: false,
            })
            .collect();

        let slot_count = layout.slot_count();
        let mut drivers = Vec::new();
        let mut live = vec![false; slot_count];
        for (slot, is_live) in live.iter_mut().enumerate() {
            let Some(port) = layout.slot_at(slot) else {
                continue;
            };
            *is_live = true;
            if port.direction == Direction::Input {
                let driver = port.links.iter().next().map(|&s| s as usize);
                drivers.push((slot, driver));
            }
        }

        debug!(
            elements = nodes.len(),
            wires = layout.connection_count(),
            has_accept = accept_port.is_some(),
            "evaluator constructed"
        );

        Self {
            layout,
            accept_port,
            limits,
            nodes,
            drivers,
            live,
            seed: vec![false; slot_count],
            last_rounds: 0,
        }
    }

    /// The layout being evaluated.
    pub fn layout(&self) -> &'a Layout {
        self.layout
    }

    /// Input port of the first `OUTPUT` element, if any.
    pub fn accept_port(&self) -> Option<PortId> {
        self.accept_port
    }

    /// Rounds executed by the most recent evaluation.
    pub fn last_rounds(&self) -> usize {
        self.last_rounds
    }

    /// Force a sensor's output for subsequent evaluations.
    ///
    /// Does not propagate; call [`Evaluator::evaluate`] afterwards.
    pub fn set_sensor(&mut self, id: ElementId, value: bool) -> Result<(), EvalError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(EvalError::UnknownElement(id))?;
        if !node.kind.is_sensor() {
            return Err(EvalError::NotASensor(id));
        }
        node.forced = value;
        Ok(())
    }

    /// Currently forced value of a sensor.
    pub fn sensor(&self, id: ElementId) -> Result<bool, EvalError> {
        let node = self
            .nodes
            .iter()
            .find(|n| n.id == id)
            .ok_or(EvalError::UnknownElement(id))?;
        if !node.kind.is_sensor() {
            return Err(EvalError::NotASensor(id));
        }
        Ok(node.forced)
    }

    /// Force every sensor according to an item's classification.
    pub fn apply(&mut self, classification: &Classification) {
        for node in &mut self.nodes {
            if let Some(tag) = node.kind.sensor_tag() {
                node.forced = classification.matches(tag);
            }
        }
    }

    /// Classify an item, force the sensors accordingly, and evaluate.
    pub fn evaluate_item<C>(&mut self, classifier: &C, item: &str) -> Result<State, EvalError>
    where
        C: Classifier + ?Sized,
    {
        let classification = classifier.classify(item)?;
        self.apply(&classification);
        let state = self.evaluate();
        debug!(item, accept = state.accept, "item evaluated");
        Ok(state)
    }

    /// Forget settled values; the next evaluation starts from all-low.
    pub fn reset(&mut self) {
        self.seed.iter_mut().for_each(|v| *v = false);
    }

    /// Propagate values to a fixed point (or the round cap).
    ///
    /// Calling this twice without changing sensors in between returns
    /// identical states: the seed only advances when a run settles.
    pub fn evaluate(&mut self) -> State {
        let cap = self.limits.round_cap(self.nodes.len());
        let mut values = self.seed.clone();
        let mut rounds = 0;
        let mut converged = false;

        while rounds < cap {
            rounds += 1;
            if !self.round(&mut values) {
                converged = true;
                break;
            }
            trace!(round = rounds, "values changed");
        }

        if converged {
            self.seed.clone_from(&values);
        } else {
            warn!(
                rounds,
                elements = self.nodes.len(),
                "circuit did not settle within round cap; reporting values at cap"
            );
        }
        self.last_rounds = rounds;

        let accept = self.accept_port.map_or(false, |p| values[p.slot()]);
        debug!(rounds, converged, accept, "circuit evaluated");

        let values = values
            .iter()
            .zip(&self.live)
            .map(|(&v, &live)| live.then_some(v))
            .collect();
        State::from_parts(self.layout.id(), values, accept, converged)
    }

    /// Run one propagation round. Returns whether any port changed.
    fn round(&self, values: &mut [bool]) -> bool {
        let mut changed = false;

        // Outputs only read inputs here, so element order is irrelevant.
        for node in &self.nodes {
            let Some(out) = node.output else { continue };
            let next = match node.kind {
                ElementKind::Sensor(_) => node.forced,
                kind => {
                    let mut buf = [false; 2];
                    for (b, &slot) in buf.iter_mut().zip(&node.inputs) {
                        *b = values[slot];
                    }
                    kind.gate(&buf[..node.inputs.len()]).unwrap_or(false)
                }
            };
            changed |= values[out] != next;
            values[out] = next;
        }

        // Unconnected inputs read low.
        for &(inp, driver) in &self.drivers {
            let next = driver.map_or(false, |d| values[d]);
            changed |= values[inp] != next;
            values[inp] = next;
        }

        changed
    }
}
