//! Element kinds for logic-puzzle circuits.
//!
//! This module defines the closed set of element kinds a circuit is built
//! from. Each kind fixes its port arity, the direction of every port, and
//! (for gates) the boolean function relating inputs to the output.

use std::fmt;

use crate::layout::Point;

/// Horizontal distance from an element's position to its port anchors.
const PORT_DX: f32 = 20.0;
/// Vertical spacing between the two inputs of a binary gate.
const PORT_DY: f32 = 10.0;

/// Single-character discriminator carried by a sensor.
///
/// A sensor fires when an item's color or shape carries the same tag,
/// e.g. `r` for red or `c` for circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SensorTag(char);

impl SensorTag {
    /// Create a tag from its character.
    pub const fn new(tag: char) -> Self {
        Self(tag)
    }

    /// The tag character.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl From<char> for SensorTag {
    fn from(tag: char) -> Self {
        Self(tag)
    }
}

impl fmt::Display for SensorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of value flow through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Port consumes a value from a connected output.
    Input,
    /// Port drives a value into connected inputs.
    Output,
}

/// Element kind - closed, finite set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Logical AND: A ∧ B. Ports: 0, 1 inputs; 2 output.
    And,
    /// Logical OR: A ∨ B. Ports: 0, 1 inputs; 2 output.
    Or,
    /// Logical NOT: ¬A. Ports: 0 input; 1 output.
    Not,
    /// Externally forced value. Ports: 0 output.
    Sensor(SensorTag),
    /// Circuit verdict. Ports: 0 input.
    Output,
}

impl ElementKind {
    /// Create a sensor kind for a tag character.
    pub const fn sensor(tag: char) -> Self {
        ElementKind::Sensor(SensorTag::new(tag))
    }

    /// Total number of ports.
    pub fn port_count(self) -> usize {
        self.input_count() + self.output_count()
    }

    /// Number of input ports.
    pub fn input_count(self) -> usize {
        match self {
            ElementKind::And | ElementKind::Or => 2,
            ElementKind::Not | ElementKind::Output => 1,
            ElementKind::Sensor(_) => 0,
        }
    }

    /// Number of output ports.
    pub fn output_count(self) -> usize {
        match self {
            ElementKind::Output => 0,
            _ => 1,
        }
    }

    /// Direction of the port at `index`, or `None` if out of range.
    ///
    /// Inputs always come first, followed by the output (if any).
    pub fn direction(self, index: usize) -> Option<Direction> {
        if index < self.input_count() {
            Some(Direction::Input)
        } else if index < self.port_count() {
            Some(Direction::Output)
        } else {
            None
        }
    }

    /// Index of the output port, if this kind has one.
    pub fn output_index(self) -> Option<usize> {
        (self.output_count() > 0).then(|| self.input_count())
    }

    /// Check if this is a sensor.
    pub fn is_sensor(self) -> bool {
        matches!(self, ElementKind::Sensor(_))
    }

    /// The sensor tag, if this is a sensor.
    pub fn sensor_tag(self) -> Option<SensorTag> {
        match self {
            ElementKind::Sensor(tag) => Some(tag),
            _ => None,
        }
    }

    /// Apply the gate function to the given input values.
    ///
    /// Returns `None` for sensors and outputs, whose values are not
    /// computed from inputs, and when the arity does not match.
    #[inline]
    pub fn gate(self, inputs: &[bool]) -> Option<bool> {
        match (self, inputs) {
            (ElementKind::And, &[a, b]) => Some(a && b),
            (ElementKind::Or, &[a, b]) => Some(a || b),
            (ElementKind::Not, &[a]) => Some(!a),
            _ => None,
        }
    }

    /// Anchor of the port at `index`, relative to the element position.
    pub fn port_offset(self, index: usize) -> Option<Point> {
        let offset = match (self, self.direction(index)?) {
            (ElementKind::And | ElementKind::Or, Direction::Input) => {
                let dy = if index == 0 { -PORT_DY } else { PORT_DY };
                Point::new(-PORT_DX, dy)
            }
            (_, Direction::Input) => Point::new(-PORT_DX, 0.0),
            (_, Direction::Output) => Point::new(PORT_DX, 0.0),
        };
        Some(offset)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::And => f.write_str("and"),
            ElementKind::Or => f.write_str("or"),
            ElementKind::Not => f.write_str("not"),
            ElementKind::Sensor(tag) => write!(f, "{tag}"),
            ElementKind::Output => f.write_str("out"),
        }
    }
}
