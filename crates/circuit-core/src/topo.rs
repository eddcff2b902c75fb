//! Single-pass evaluation for layouts without feedback.

use std::collections::HashMap;

use crate::element::ElementKind;
use crate::error::EvalError;
use crate::eval::State;
use crate::layout::{ElementId, Layout};

/// Evaluate an acyclic layout in one topological pass.
///
/// Sensors missing from `sensors` read low, as do unconnected inputs.
///
/// # Errors
///
/// Returns an error if:
/// - The layout contains a feedback loop
/// - A key of `sensors` is not an element of the layout, or not a sensor
pub fn evaluate_acyclic(
    layout: &Layout,
    sensors: &HashMap<ElementId, bool>,
) -> Result<State, EvalError> {
    for &id in sensors.keys() {
        let element = layout.element(id).ok_or(EvalError::UnknownElement(id))?;
        if !element.kind().is_sensor() {
            return Err(EvalError::NotASensor(id));
        }
    }

    let order = layout.topological_order().ok_or(EvalError::Cyclic)?;
    let mut values: Vec<Option<bool>> = (0..layout.slot_count())
        .map(|slot| layout.slot_at(slot).map(|_| false))
        .collect();

    for id in order {
        let Some(element) = layout.element(id) else {
            continue;
        };

        let mut inputs = Vec::with_capacity(element.kind().input_count());
        for &port in element.input_ports() {
            let driver = layout.driver(port).map_err(|_| EvalError::UnknownPort(port))?;
            let value = driver
                .and_then(|d| values[d.slot()])
                .unwrap_or(false);
            values[port.slot()] = Some(value);
            inputs.push(value);
        }

        let Some(out) = element.output_port() else {
            continue;
        };
        let value = match element.kind() {
            ElementKind::Sensor(_) => sensors.get(&id).copied().unwrap_or(false),
            kind => kind.gate(&inputs).unwrap_or(false),
        };
        values[out.slot()] = Some(value);
    }

    let accept = layout
        .output_element()
        .and_then(|e| e.port(0))
        .and_then(|p| values[p.slot()])
        .unwrap_or(false);

    Ok(State::from_parts(layout.id(), values, accept, true))
}
