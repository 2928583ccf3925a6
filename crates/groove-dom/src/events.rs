//! Events
//!
//! Keyboard and focus events, listener registration and the handles used to
//! remove exactly the listeners a component attached.

use std::fmt;
use std::rc::Rc;

use crate::{Document, NodeId};

/// Event types the engine listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    Focus,
    Blur,
}

impl EventKind {
    /// Focus and blur do not bubble
    pub fn bubbles(&self) -> bool {
        matches!(self, EventKind::KeyDown)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }
}

/// Key value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Tab,
    Escape,
    Space,
    Backspace,
    Delete,
    Unidentified(String),
}

impl Key {
    /// Parse from a `KeyboardEvent.key` string
    pub fn parse(s: &str) -> Self {
        match s {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            " " => Self::Space,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified(s.to_string()),
                }
            }
        }
    }

    /// `KeyboardEvent.key` string
    pub fn as_key_string(&self) -> String {
        match self {
            Self::Character(c) => c.to_string(),
            Self::Space => " ".to_string(),
            Self::Unidentified(s) => s.clone(),
            other => format!("{other:?}"),
        }
    }
}

/// Key modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: KeyModifiers = KeyModifiers { shift: true, ctrl: false, alt: false, meta: false };

    /// Ctrl, Alt or Meta held. Shift alone does not count: it only
    /// reverses direction for navigation keys.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Dispatched event
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    /// Set for keyboard events
    pub key: Option<Key>,
    pub modifiers: KeyModifiers,
    /// Element losing or gaining focus, for focus/blur
    pub related_target: Option<NodeId>,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create a keydown event aimed at `target`
    pub fn key_down(target: NodeId, key: Key, modifiers: KeyModifiers) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target,
            current_target: None,
            key: Some(key),
            modifiers,
            related_target: None,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a focus event
    pub fn focus(target: NodeId, related_target: Option<NodeId>) -> Self {
        Self {
            kind: EventKind::Focus,
            target,
            current_target: None,
            key: None,
            modifiers: KeyModifiers::NONE,
            related_target,
            cancelable: false,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a blur event
    pub fn blur(target: NodeId, related_target: Option<NodeId>) -> Self {
        Self {
            kind: EventKind::Blur,
            ..Self::focus(target, related_target)
        }
    }

    /// True for a keydown of `key`
    pub fn is_key(&self, key: &Key) -> bool {
        self.key.as_ref() == Some(key)
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Event listener callback
pub type Listener = Rc<dyn Fn(&Document, &mut Event)>;

/// Handle returned by `add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    target: NodeId,
    kind: EventKind,
    listener: Listener,
}

/// Listener storage in registration order
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    entries: Vec<Registration>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn add(&mut self, target: NodeId, kind: EventKind, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push(Registration { id, target, kind, listener });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        self.entries.len() < before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    /// Snapshot of listeners for a target, in registration order
    pub fn matching(&self, target: NodeId, kind: EventKind) -> Vec<(ListenerId, Listener)> {
        self.entries
            .iter()
            .filter(|r| r.target == target && r.kind == kind)
            .map(|r| (r.id, Rc::clone(&r.listener)))
            .collect()
    }

    pub fn count(&self, target: NodeId, kind: Option<EventKind>) -> usize {
        self.entries
            .iter()
            .filter(|r| r.target == target && kind.is_none_or(|k| r.kind == k))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
