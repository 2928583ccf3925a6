//! Roving Tabindex
//!
//! One Tab stop for a whole group (dance-style filter chips, rating stars,
//! share buttons). Arrow keys move the stop; Tab leaves the group.
//!
//! The active stop is an index into the managed list rather than a flag on
//! each element, so "exactly one `tabindex=0`" holds by construction: every
//! transition rewrites the whole group from that single index.

use std::cell::RefCell;
use std::rc::Rc;

use groove_dom::{Document, Event, EventKind, Key, ListenerId, NodeId};

use crate::A11yError;

#[derive(Debug, Default)]
struct RovingState {
    elements: Vec<NodeId>,
    /// `None` iff `elements` is empty
    active: Option<usize>,
}

impl RovingState {
    fn position(&self, element: NodeId) -> Option<usize> {
        self.elements.iter().position(|&e| e == element)
    }

    fn clamp(&mut self, index: usize) {
        self.active = match self.elements.len() {
            0 => None,
            len => Some(index.min(len - 1)),
        };
    }
}

/// Roving tabindex over a fixed, ordered element list
#[derive(Debug)]
pub struct RovingTabindex {
    doc: Document,
    state: Rc<RefCell<RovingState>>,
    listeners: Vec<ListenerId>,
}

impl RovingTabindex {
    /// Manage `elements`, giving the Tab stop to `initial_index` (clamped).
    /// Duplicate ids keep their first position only.
    pub fn new(doc: &Document, elements: Vec<NodeId>, initial_index: usize) -> Result<Self, A11yError> {
        let elements = validated(doc, elements)?;
        let mut state = RovingState { elements, active: None };
        state.clamp(initial_index);

        let mut roving = Self {
            doc: doc.clone(),
            state: Rc::new(RefCell::new(state)),
            listeners: Vec::new(),
        };
        apply_tab_indices(&roving.doc, &roving.state);
        roving.bind();
        Ok(roving)
    }

    /// Index of the current Tab stop
    pub fn active_index(&self) -> Option<usize> {
        self.state.borrow().active
    }

    /// Element holding the Tab stop
    pub fn active_element(&self) -> Option<NodeId> {
        let state = self.state.borrow();
        state.active.map(|i| state.elements[i])
    }

    pub fn elements(&self) -> Vec<NodeId> {
        self.state.borrow().elements.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Listeners currently attached by this manager
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Move the Tab stop to `index` (clamped) and focus it
    pub fn focus_index(&self, index: usize) {
        move_to(&self.doc, &self.state, index);
    }

    /// Swap the managed list. Old listeners go first, then the current index
    /// is clamped into the new list and listeners are bound to it.
    pub fn update_elements(&mut self, elements: Vec<NodeId>) -> Result<(), A11yError> {
        let elements = validated(&self.doc, elements)?;
        self.cleanup();
        {
            let mut state = self.state.borrow_mut();
            let index = state.active.unwrap_or(0);
            state.elements = elements;
            state.clamp(index);
        }
        apply_tab_indices(&self.doc, &self.state);
        self.bind();
        Ok(())
    }

    /// Remove every listener this manager attached
    pub fn cleanup(&mut self) {
        for id in self.listeners.drain(..) {
            self.doc.remove_event_listener(id);
        }
    }

    fn bind(&mut self) {
        let elements = self.state.borrow().elements.clone();
        for element in elements {
            let state = Rc::clone(&self.state);
            self.listeners.push(self.doc.add_event_listener(
                element,
                EventKind::KeyDown,
                move |doc, event| on_key_down(doc, &state, element, event),
            ));

            let state = Rc::clone(&self.state);
            self.listeners.push(self.doc.add_event_listener(
                element,
                EventKind::Focus,
                move |doc, _| on_focus(doc, &state, element),
            ));
        }
        tracing::debug!("roving tabindex bound {} listeners", self.listeners.len());
    }
}

impl Drop for RovingTabindex {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn validated(doc: &Document, elements: Vec<NodeId>) -> Result<Vec<NodeId>, A11yError> {
    let mut unique = Vec::with_capacity(elements.len());
    for id in elements {
        if !doc.is_element(id) {
            return Err(A11yError::NotAnElement(id));
        }
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    Ok(unique)
}

fn on_key_down(doc: &Document, state: &RefCell<RovingState>, element: NodeId, event: &mut Event) {
    if event.modifiers.has_command_modifier() {
        return;
    }
    let Some(key) = event.key.as_ref() else {
        return;
    };

    let next = {
        let state = state.borrow();
        let Some(pos) = state.position(element) else {
            return;
        };
        let len = state.elements.len();
        match key {
            Key::ArrowRight | Key::ArrowDown => (pos + 1) % len,
            Key::ArrowLeft | Key::ArrowUp => (pos + len - 1) % len,
            Key::Home => 0,
            Key::End => len - 1,
            _ => return,
        }
    };

    event.prevent_default();
    move_to(doc, state, next);
}

fn on_focus(doc: &Document, state: &RefCell<RovingState>, element: NodeId) {
    {
        let mut state = state.borrow_mut();
        let Some(pos) = state.position(element) else {
            return;
        };
        if state.active == Some(pos) {
            return;
        }
        state.active = Some(pos);
    }
    apply_tab_indices(doc, state);
}

fn move_to(doc: &Document, state: &RefCell<RovingState>, index: usize) {
    let target = {
        let mut state = state.borrow_mut();
        state.clamp(index);
        match state.active {
            Some(i) => state.elements[i],
            None => return,
        }
    };
    apply_tab_indices(doc, state);
    doc.focus(target);
}

fn apply_tab_indices(doc: &Document, state: &RefCell<RovingState>) {
    let stops: Vec<(NodeId, i32)> = {
        let state = state.borrow();
        state
            .elements
            .iter()
            .enumerate()
            .map(|(i, &el)| (el, if state.active == Some(i) { 0 } else { -1 }))
            .collect()
    };
    for (element, value) in stops {
        if let Err(err) = doc.set_tab_index(element, value) {
            tracing::warn!("roving tabindex could not update {}: {}", element, err);
        }
    }
}
