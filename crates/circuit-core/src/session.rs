//! Per-puzzle engine session.
//!
//! An [`EngineSession`] owns one layout and the listeners interested in
//! its edits. Each puzzle instance owns its own session; nothing here is
//! shared between sessions.

use std::fmt;

use tracing::debug;

use crate::element::{Direction, ElementKind};
use crate::error::LayoutError;
use crate::eval::Evaluator;
use crate::layout::{ElementId, Layout, Point, PortId};
use crate::limits::Limits;
use crate::snapshot::{snapshot, ElementView};

/// Structural change to a session's layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    ElementAdded(ElementId),
    ElementRemoved(ElementId),
    Connected { output: PortId, input: PortId },
    Disconnected { output: PortId, input: PortId },
    Moved(ElementId),
    /// The whole layout was swapped (e.g. on a level change).
    Replaced,
}

type Listener = Box<dyn FnMut(&LayoutEvent)>;

/// Owns a layout and notifies listeners of every edit.
pub struct EngineSession {
    layout: Layout,
    limits: Limits,
    listeners: Vec<Listener>,
}

impl fmt::Debug for EngineSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSession")
            .field("layout", &self.layout)
            .field("limits", &self.limits)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for EngineSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineSession {
    /// Create a session with an empty layout and default limits.
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create a session with an empty layout and custom limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            layout: Layout::with_limits(limits),
            limits,
            listeners: Vec::new(),
        }
    }

    /// Create a session around an existing layout, adopting its limits.
    pub fn from_layout(layout: Layout) -> Self {
        Self {
            limits: layout.limits(),
            layout,
            listeners: Vec::new(),
        }
    }

    /// The current layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Limits applied to evaluation.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Register a listener for layout edits.
    pub fn add_listener(&mut self, listener: impl FnMut(&LayoutEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Add an element (toolbox placement).
    pub fn add_element(&mut self, kind: ElementKind) -> Result<ElementId, LayoutError> {
        let id = self.layout.add_element(kind)?;
        debug!(%id, %kind, "element added");
        self.notify(LayoutEvent::ElementAdded(id));
        Ok(id)
    }

    /// Remove an element and its connections (eraser).
    pub fn remove_element(&mut self, id: ElementId) -> Result<(), LayoutError> {
        self.layout.remove_element(id)?;
        debug!(%id, "element removed");
        self.notify(LayoutEvent::ElementRemoved(id));
        Ok(())
    }

    /// Connect two ports. See [`Layout::connect`].
    ///
    /// If the input was already driven, listeners see the old connection
    /// removed before the new one is added.
    pub fn connect(&mut self, a: PortId, b: PortId) -> Result<(), LayoutError> {
        let (output, input) = match self.layout.direction(a)? {
            Direction::Output => (a, b),
            Direction::Input => (b, a),
        };
        let previous = self.layout.driver(input)?;
        self.layout.connect(a, b)?;

        if let Some(old) = previous.filter(|&p| p != output) {
            self.notify(LayoutEvent::Disconnected { output: old, input });
        }
        debug!(%output, %input, "ports connected");
        self.notify(LayoutEvent::Connected { output, input });
        Ok(())
    }

    /// Disconnect two ports. Returns whether they were connected.
    pub fn disconnect(&mut self, a: PortId, b: PortId) -> Result<bool, LayoutError> {
        let (output, input) = match self.layout.direction(a)? {
            Direction::Output => (a, b),
            Direction::Input => (b, a),
        };
        let removed = self.layout.disconnect(a, b)?;
        if removed {
            debug!(%output, %input, "ports disconnected");
            self.notify(LayoutEvent::Disconnected { output, input });
        }
        Ok(removed)
    }

    /// Move an element. Never alters identity or connections.
    pub fn set_position(&mut self, id: ElementId, position: Point) -> Result<(), LayoutError> {
        self.layout.set_position(id, position)?;
        self.notify(LayoutEvent::Moved(id));
        Ok(())
    }

    /// Swap in a new layout, adopting its limits, and return the previous one.
    pub fn replace_layout(&mut self, layout: Layout) -> Layout {
        let old = std::mem::replace(&mut self.layout, layout);
        self.limits = self.layout.limits();
        debug!(
            old_elements = old.len(),
            new_elements = self.layout.len(),
            "layout replaced"
        );
        self.notify(LayoutEvent::Replaced);
        old
    }

    /// Build an evaluator over the current layout.
    ///
    /// The evaluator borrows the session, so edits require dropping it
    /// first; a fresh evaluator then sees the edited structure.
    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::with_limits(&self.layout, self.limits)
    }

    /// Renderer snapshot of the current layout.
    pub fn elements(&self) -> Vec<ElementView> {
        snapshot(&self.layout)
    }

    fn notify(&mut self, event: LayoutEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::classify::PrefixClassifier;

    fn recording(session: &mut EngineSession) -> Rc<RefCell<Vec<LayoutEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.add_listener(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_edits_notify_listeners() {
        let mut session = EngineSession::new();
        let events = recording(&mut session);

        let red = session.add_element(ElementKind::sensor('r')).unwrap();
        let out = session.add_element(ElementKind::Output).unwrap();
        let from = session.layout().port(red, 0).unwrap();
        let to = session.layout().port(out, 0).unwrap();
        session.connect(to, from).unwrap();
        assert!(session.disconnect(from, to).unwrap());
        assert!(!session.disconnect(from, to).unwrap());
        session.set_position(red, Point::new(1.0, 2.0)).unwrap();
        session.remove_element(red).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                LayoutEvent::ElementAdded(red),
                LayoutEvent::ElementAdded(out),
                LayoutEvent::Connected {
                    output: from,
                    input: to
                },
                LayoutEvent::Disconnected {
                    output: from,
                    input: to
                },
                LayoutEvent::Moved(red),
                LayoutEvent::ElementRemoved(red),
            ]
        );
    }

    #[test]
    fn test_rewire_reports_replaced_driver() {
        let mut session = EngineSession::new();
        let a = session.add_element(ElementKind::sensor('a')).unwrap();
        let b = session.add_element(ElementKind::sensor('b')).unwrap();
        let not = session.add_element(ElementKind::Not).unwrap();
        let pa = session.layout().port(a, 0).unwrap();
        let pb = session.layout().port(b, 0).unwrap();
        let input = session.layout().port(not, 0).unwrap();
        session.connect(pa, input).unwrap();

        let events = recording(&mut session);
        session.connect(pb, input).unwrap();
        assert_eq!(
            *events.borrow(),
            vec![
                LayoutEvent::Disconnected { output: pa, input },
                LayoutEvent::Connected { output: pb, input },
            ]
        );
    }

    #[test]
    fn test_failed_edit_is_silent() {
        let mut session = EngineSession::new();
        let and = session.add_element(ElementKind::And).unwrap();
        let events = recording(&mut session);

        let a = session.layout().port(and, 0).unwrap();
        let b = session.layout().port(and, 1).unwrap();
        assert!(session.connect(a, b).is_err());
        assert!(session.remove_element(ElementId(42)).is_err());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_replace_layout_returns_previous() {
        let mut session = EngineSession::new();
        session.add_element(ElementKind::Output).unwrap();
        let events = recording(&mut session);

        let old = session.replace_layout(Layout::new());
        assert_eq!(old.len(), 1);
        assert!(session.layout().is_empty());
        assert_eq!(*events.borrow(), vec![LayoutEvent::Replaced]);
    }

    #[test]
    fn test_replace_layout_adopts_limits() {
        let mut session = EngineSession::with_limits(Limits::strict());
        let mut level = Layout::with_limits(Limits::permissive());
        let not = level.add_element(ElementKind::Not).unwrap();
        let out = level.port(not, 1).unwrap();
        let inp = level.port(not, 0).unwrap();
        level.connect(out, inp).unwrap();

        session.replace_layout(level);
        assert_eq!(session.limits(), Limits::permissive());

        let mut eval = session.evaluator();
        assert!(!eval.evaluate().converged);
        assert_eq!(eval.last_rounds(), Limits::permissive().round_cap(1));
    }

    #[test]
    fn test_evaluator_sees_edits_after_rebuild() {
        let mut session = EngineSession::new();
        let red = session.add_element(ElementKind::sensor('r')).unwrap();
        let out = session.add_element(ElementKind::Output).unwrap();

        {
            let mut eval = session.evaluator();
            assert!(!eval.evaluate_item(&PrefixClassifier, "rc").unwrap().accept);
        }

        let from = session.layout().port(red, 0).unwrap();
        let to = session.layout().port(out, 0).unwrap();
        session.connect(from, to).unwrap();

        let mut eval = session.evaluator();
        assert!(eval.evaluate_item(&PrefixClassifier, "rc").unwrap().accept);
        assert!(!eval.evaluate_item(&PrefixClassifier, "bs").unwrap().accept);
        assert_eq!(session.elements().len(), 2);
    }
}
