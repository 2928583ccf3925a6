//! Default key actions
//!
//! `Document::key_down` only dispatches. A browser also performs a default
//! action when nothing called `preventDefault`; for keyboard navigation the
//! one that matters is sequential Tab traversal. `press_key` adds it so
//! hosts and tests can drive a page the way a keyboard user would.

use groove_dom::{Document, Event, Key, KeyModifiers};

use crate::focusable::{next_in_sequence, tab_sequence};

/// Dispatch a keydown on the focused element (or `<body>`) and run the
/// default action if it was not prevented. Returns the dispatched event.
pub fn press_key(doc: &Document, key: Key, modifiers: KeyModifiers) -> Event {
    let event = doc.key_down(key.clone(), modifiers);
    if event.is_default_prevented() {
        return event;
    }

    if key == Key::Tab && !modifiers.has_command_modifier() {
        let sequence = tab_sequence(doc, Some(doc.body()));
        match next_in_sequence(doc, &sequence, doc.active_element(), modifiers.shift) {
            Some(next) => {
                doc.focus(next);
            }
            None => tracing::debug!("no sequential focus target on the page"),
        }
    }
    event
}
