//! Focus Trap
//!
//! Keeps Tab and Shift+Tab cycling inside one container while a modal,
//! drawer or lightbox is open.
//!
//! # Invariants
//!
//! 1. While active, Tab from the last element goes to the first and
//!    Shift+Tab from the first goes to the last. Focus never leaves the
//!    container through sequential navigation.
//! 2. The focusable set is resolved again on every Tab press, so content
//!    that appears while the modal is open joins the cycle. The cycle's
//!    edges are the first and last elements Tab can reach; `tabindex="-1"`
//!    controls do not count as edges.
//! 3. Exactly one `keydown` listener exists per active session and it is
//!    removed on deactivate or drop.
//! 4. Deactivate restores focus to the element focused before activation,
//!    but only if it is still connected and focusable.

use groove_dom::{Document, Event, EventKind, Key, ListenerId, NodeId};

use crate::config::FocusTrapConfig;
use crate::focusable::{focusable_elements, is_focusable, next_in_sequence, tab_sequence};
use crate::{ensure_element, A11yError};

/// State that exists only between `activate` and `deactivate`
#[derive(Debug)]
struct TrapSession {
    previously_focused: Option<NodeId>,
    focusable_snapshot: Vec<NodeId>,
    listener: ListenerId,
}

/// Focus trap over a single container
#[derive(Debug)]
pub struct FocusTrap {
    doc: Document,
    container: NodeId,
    config: FocusTrapConfig,
    session: Option<TrapSession>,
}

impl FocusTrap {
    /// Create an inactive trap with default settings
    pub fn new(doc: &Document, container: NodeId) -> Result<Self, A11yError> {
        Self::with_config(doc, container, FocusTrapConfig::default())
    }

    /// Create an inactive trap
    pub fn with_config(
        doc: &Document,
        container: NodeId,
        config: FocusTrapConfig,
    ) -> Result<Self, A11yError> {
        ensure_element(doc, container)?;
        Ok(Self {
            doc: doc.clone(),
            container,
            config,
            session: None,
        })
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Elements resolved at activation time
    pub fn focusable_snapshot(&self) -> &[NodeId] {
        self.session
            .as_ref()
            .map(|s| s.focusable_snapshot.as_slice())
            .unwrap_or(&[])
    }

    /// Element that will get focus back on deactivate
    pub fn previously_focused(&self) -> Option<NodeId> {
        self.session.as_ref().and_then(|s| s.previously_focused)
    }

    /// Start trapping. Already active traps are left alone.
    pub fn activate(&mut self) {
        if self.session.is_some() {
            tracing::debug!("focus trap on {} already active", self.container);
            return;
        }

        let previously_focused = self.doc.active_element();
        let focusable_snapshot = focusable_elements(&self.doc, Some(self.container));
        if self.config.initial_focus {
            match focusable_snapshot.first() {
                Some(&first) => {
                    self.doc.focus(first);
                }
                None => tracing::debug!("focus trap on {} has nothing to focus", self.container),
            }
        }

        let container = self.container;
        let listener = self.doc.add_event_listener(container, EventKind::KeyDown, move |doc, event| {
            trap_tab(doc, container, event);
        });

        self.session = Some(TrapSession {
            previously_focused,
            focusable_snapshot,
            listener,
        });
    }

    /// Stop trapping and restore focus. Safe to call at any time.
    pub fn deactivate(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.doc.remove_event_listener(session.listener);

        if !self.config.restore_focus {
            return;
        }
        match session.previously_focused {
            Some(prev) if is_focusable(&self.doc, prev) => {
                self.doc.focus(prev);
            }
            Some(prev) => {
                tracing::debug!("not restoring focus to {}: no longer focusable", prev);
            }
            None => {}
        }
    }
}

impl Drop for FocusTrap {
    fn drop(&mut self) {
        self.deactivate();
    }
}

fn trap_tab(doc: &Document, container: NodeId, event: &mut Event) {
    if !event.is_key(&Key::Tab) {
        return;
    }

    // Edges come from what Tab really visits; a trailing tabindex=-1
    // element would otherwise hide the true last stop.
    let sequence = tab_sequence(doc, Some(container));
    let (Some(&first), Some(&last)) = (sequence.first(), sequence.last()) else {
        // Nothing inside can hold focus; keep it where it is.
        event.prevent_default();
        return;
    };

    let backwards = event.modifiers.shift;
    let active = doc.active_element();
    match active.and_then(|a| sequence.iter().position(|&e| e == a)) {
        Some(pos) => {
            let at_edge = if backwards { pos == 0 } else { pos == sequence.len() - 1 };
            if at_edge {
                event.prevent_default();
                doc.focus(if backwards { last } else { first });
            }
        }
        None => {
            // Off the sequence (outside the container, or on a tabindex=-1
            // element inside it): the default move could leave, so move here.
            event.prevent_default();
            let target = active
                .filter(|&a| doc.contains(container, a))
                .and_then(|a| next_in_sequence(doc, &sequence, Some(a), backwards))
                .unwrap_or(if backwards { last } else { first });
            doc.focus(target);
        }
    }
}
