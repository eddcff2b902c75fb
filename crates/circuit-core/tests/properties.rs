//! Property tests over randomly wired circuits.

use std::collections::HashMap;

use circuit_core::{evaluate_acyclic, ElementId, ElementKind, Evaluator, Layout, Limits};
use proptest::prelude::*;
use proptest::sample::Index;

/// Shape of a random circuit: sensors first, then gates, then one output.
#[derive(Debug, Clone)]
struct Circuit {
    sensors: usize,
    gates: Vec<(u8, [Option<Index>; 2])>,
    sink: Option<Index>,
    forced: Vec<bool>,
}

fn circuit() -> impl Strategy<Value = Circuit> {
    (
        1usize..4,
        prop::collection::vec(
            (0u8..3, proptest::array::uniform2(any::<Option<Index>>())),
            0..12,
        ),
        any::<Option<Index>>(),
        prop::collection::vec(any::<bool>(), 4),
    )
        .prop_map(|(sensors, gates, sink, forced)| Circuit {
            sensors,
            gates,
            sink,
            forced,
        })
}

/// Build the layout. With `acyclic`, gates only read earlier elements.
fn build(circuit: &Circuit, acyclic: bool) -> (Layout, HashMap<ElementId, bool>) {
    let mut layout = Layout::with_limits(Limits::permissive());
    let mut sources = Vec::new();
    let mut sensors = HashMap::new();

    for i in 0..circuit.sensors {
        let tag = char::from(b'a' + i as u8);
        let id = layout.add_element(ElementKind::sensor(tag)).unwrap();
        sources.push(layout.port(id, 0).unwrap());
        sensors.insert(id, circuit.forced[i]);
    }

    let mut gates = Vec::new();
    for (code, _) in &circuit.gates {
        let kind = match code {
            0 => ElementKind::And,
            1 => ElementKind::Or,
            _ => ElementKind::Not,
        };
        let id = layout.add_element(kind).unwrap();
        gates.push(id);
    }
    for &id in &gates {
        let out = layout.element(id).unwrap().output_port().unwrap();
        sources.push(out);
    }

    for (k, (_, picks)) in circuit.gates.iter().enumerate() {
        let element = layout.element(gates[k]).unwrap().clone();
        let pool = if acyclic { circuit.sensors + k } else { sources.len() };
        for (&input, pick) in element.input_ports().iter().zip(picks) {
            if let (Some(pick), true) = (pick, pool > 0) {
                let source = sources[pick.index(pool)];
                layout.connect(source, input).unwrap();
            }
        }
    }

    let out = layout.add_element(ElementKind::Output).unwrap();
    if let Some(pick) = &circuit.sink {
        let source = sources[pick.index(sources.len())];
        layout.connect(source, layout.port(out, 0).unwrap()).unwrap();
    }

    (layout, sensors)
}

fn evaluator_for<'a>(layout: &'a Layout, sensors: &HashMap<ElementId, bool>) -> Evaluator<'a> {
    let mut eval = Evaluator::new(layout);
    for (&id, &value) in sensors {
        eval.set_sensor(id, value).unwrap();
    }
    eval
}

proptest! {
    #[test]
    fn test_evaluate_is_idempotent(circuit in circuit()) {
        let (layout, sensors) = build(&circuit, false);
        let mut eval = evaluator_for(&layout, &sensors);
        let first = eval.evaluate();
        let second = eval.evaluate();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_acyclic_matches_topological_pass(circuit in circuit()) {
        let (layout, sensors) = build(&circuit, true);
        let reference = evaluate_acyclic(&layout, &sensors).unwrap();
        let mut eval = evaluator_for(&layout, &sensors);
        let state = eval.evaluate();
        prop_assert!(state.converged);
        prop_assert!(eval.last_rounds() <= layout.len() + 1);
        prop_assert_eq!(state, reference);
    }

    #[test]
    fn test_feedback_terminates_within_cap(circuit in circuit()) {
        let (layout, sensors) = build(&circuit, false);
        let mut eval = evaluator_for(&layout, &sensors);
        let state = eval.evaluate();
        prop_assert!(eval.last_rounds() <= layout.limits().round_cap(layout.len()));

        if state.converged {
            // A settled state satisfies every gate and wire.
            for element in layout.elements() {
                let inputs: Vec<bool> = element
                    .input_ports()
                    .iter()
                    .map(|&p| state.get_value(p).unwrap())
                    .collect();
                for &p in element.input_ports() {
                    let driven = layout
                        .driver(p)
                        .unwrap()
                        .map_or(false, |d| state.get_value(d).unwrap());
                    prop_assert_eq!(state.get_value(p).unwrap(), driven);
                }
                if let (Some(out), Some(expected)) =
                    (element.output_port(), element.kind().gate(&inputs))
                {
                    prop_assert_eq!(state.get_value(out).unwrap(), expected);
                }
            }
        }
    }

    #[test]
    fn test_sensor_outputs_follow_forced_values(circuit in circuit()) {
        let (layout, sensors) = build(&circuit, false);
        let mut eval = evaluator_for(&layout, &sensors);
        let state = eval.evaluate();
        for (&id, &value) in &sensors {
            let port = layout.port(id, 0).unwrap();
            prop_assert_eq!(state.get_value(port).unwrap(), value);
        }
    }
}
