//! Keyboard Navigation
//!
//! Arrow-key list navigation, Escape handling and autofocus for a container
//! the host owns (listing grids, comment threads, menus).
//!
//! The controller mirrors a render-driven effect: the host calls `sync`
//! with the current container and options every render. When nothing that
//! matters changed, `sync` does nothing. Otherwise it removes every
//! listener it attached and installs fresh ones, so rapid option churn
//! never stacks duplicate handlers.

use std::fmt;
use std::rc::Rc;

use groove_dom::{Document, Event, EventKind, Key, ListenerId, NodeId};

use crate::focusable::focusable_elements;
use crate::{ensure_element, A11yError};

/// Escape callback. Compared by pointer identity, so a new `Rc` on each
/// render counts as a changed option.
pub type EscapeHandler = Rc<dyn Fn()>;

/// Which arrow keys move focus and whether movement wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationAxes {
    pub vertical: bool,
    pub horizontal: bool,
    pub looping: bool,
}

impl Default for NavigationAxes {
    fn default() -> Self {
        Self {
            vertical: true,
            horizontal: false,
            looping: true,
        }
    }
}

/// Per-render navigation options
#[derive(Clone)]
pub struct NavigationOptions {
    pub vertical: bool,
    pub horizontal: bool,
    pub looping: bool,
    pub on_escape: Option<EscapeHandler>,
    pub auto_focus: bool,
    pub enabled: bool,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        let axes = NavigationAxes::default();
        Self {
            vertical: axes.vertical,
            horizontal: axes.horizontal,
            looping: axes.looping,
            on_escape: None,
            auto_focus: false,
            enabled: true,
        }
    }
}

impl fmt::Debug for NavigationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationOptions")
            .field("vertical", &self.vertical)
            .field("horizontal", &self.horizontal)
            .field("looping", &self.looping)
            .field("on_escape", &self.on_escape.is_some())
            .field("auto_focus", &self.auto_focus)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl NavigationOptions {
    pub fn axes(&self) -> NavigationAxes {
        NavigationAxes {
            vertical: self.vertical,
            horizontal: self.horizontal,
            looping: self.looping,
        }
    }

    pub fn with_on_escape(mut self, handler: impl Fn() + 'static) -> Self {
        self.on_escape = Some(Rc::new(handler));
        self
    }

    pub fn with_auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn horizontal_only(mut self) -> Self {
        self.vertical = false;
        self.horizontal = true;
        self
    }

    /// Same effect dependencies as `other`
    fn same_deps(&self, other: &NavigationOptions) -> bool {
        let same_escape = match (&self.on_escape, &other.on_escape) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.axes() == other.axes()
            && self.enabled == other.enabled
            && self.auto_focus == other.auto_focus
            && same_escape
    }
}

/// Move focus within `elements` according to the key in `event`.
///
/// Returns true and prevents the default action when the key was handled.
/// If focus is not on one of `elements`, forward keys land on the first
/// element and backward keys on the last.
pub fn handle_list_navigation(
    doc: &Document,
    event: &mut Event,
    elements: &[NodeId],
    axes: NavigationAxes,
) -> bool {
    let len = elements.len();
    if len == 0 {
        return false;
    }
    if event.modifiers.has_command_modifier() {
        return false;
    }
    let current = doc
        .active_element()
        .and_then(|active| elements.iter().position(|&e| e == active));

    let next = match event.key.as_ref() {
        Some(Key::ArrowDown) if axes.vertical => forward(current, len, axes.looping),
        Some(Key::ArrowRight) if axes.horizontal => forward(current, len, axes.looping),
        Some(Key::ArrowUp) if axes.vertical => backward(current, len, axes.looping),
        Some(Key::ArrowLeft) if axes.horizontal => backward(current, len, axes.looping),
        Some(Key::Home) => 0,
        Some(Key::End) => len - 1,
        _ => return false,
    };

    event.prevent_default();
    doc.focus(elements[next]);
    true
}

fn forward(current: Option<usize>, len: usize, looping: bool) -> usize {
    match current {
        Some(i) if i + 1 < len => i + 1,
        Some(_) if looping => 0,
        Some(_) => len - 1,
        None => 0,
    }
}

fn backward(current: Option<usize>, len: usize, looping: bool) -> usize {
    match current {
        Some(0) if looping => len - 1,
        Some(0) => 0,
        Some(i) => i - 1,
        None => len - 1,
    }
}

/// Listener lifecycle for keyboard navigation over one container
#[derive(Debug)]
pub struct KeyboardNavigationController {
    doc: Document,
    container: Option<NodeId>,
    options: NavigationOptions,
    /// Navigation listener first, escape listener second
    listeners: Vec<ListenerId>,
    synced: bool,
}

impl KeyboardNavigationController {
    pub fn new(doc: &Document) -> Self {
        Self {
            doc: doc.clone(),
            container: None,
            options: NavigationOptions::default(),
            listeners: Vec::new(),
            synced: false,
        }
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn options(&self) -> &NavigationOptions {
        &self.options
    }

    /// Number of listeners this controller currently owns
    pub fn attached_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Apply this render's container and options.
    ///
    /// A container that exists but is not an element is a caller bug and is
    /// rejected before anything is detached.
    pub fn sync(&mut self, container: Option<NodeId>, options: NavigationOptions) -> Result<(), A11yError> {
        if let Some(container) = container {
            ensure_element(&self.doc, container)?;
        }
        if self.synced && self.container == container && self.options.same_deps(&options) {
            return Ok(());
        }

        self.detach();
        self.container = container;
        self.options = options;
        self.synced = true;

        if !self.options.enabled {
            tracing::debug!("keyboard navigation disabled; no listeners attached");
            return Ok(());
        }
        let Some(container) = container.filter(|&c| self.doc.is_element(c)) else {
            tracing::debug!("keyboard navigation has no container yet");
            return Ok(());
        };

        let axes = self.options.axes();
        self.listeners.push(self.doc.add_event_listener(
            container,
            EventKind::KeyDown,
            move |doc, event| {
                let elements = focusable_elements(doc, Some(container));
                handle_list_navigation(doc, event, &elements, axes);
            },
        ));

        if let Some(on_escape) = self.options.on_escape.clone() {
            self.listeners.push(self.doc.add_event_listener(
                container,
                EventKind::KeyDown,
                move |_, event| {
                    if event.is_key(&Key::Escape) {
                        on_escape();
                    }
                },
            ));
        }

        if self.options.auto_focus {
            self.focus_first();
        }
        Ok(())
    }

    /// Focus the first focusable element. No-op on an empty or unset container.
    pub fn focus_first(&self) -> bool {
        let elements = focusable_elements(&self.doc, self.container);
        match elements.first() {
            Some(&first) => self.doc.focus(first),
            None => false,
        }
    }

    /// Focus the last focusable element. No-op on an empty or unset container.
    pub fn focus_last(&self) -> bool {
        let elements = focusable_elements(&self.doc, self.container);
        match elements.last() {
            Some(&last) => self.doc.focus(last),
            None => false,
        }
    }

    /// Remove all listeners and forget the container
    pub fn unmount(&mut self) {
        self.detach();
        self.container = None;
        self.synced = false;
    }

    fn detach(&mut self) {
        for id in self.listeners.drain(..) {
            self.doc.remove_event_listener(id);
        }
    }
}

impl Drop for KeyboardNavigationController {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groove_dom::KeyModifiers;

    fn list(doc: &Document, count: usize) -> (NodeId, Vec<NodeId>) {
        let ul = doc.create_element("ul");
        doc.append_child(doc.body(), ul).unwrap();
        let items = (0..count)
            .map(|_| {
                let item = doc.create_element("button");
                doc.append_child(ul, item).unwrap();
                item
            })
            .collect();
        (ul, items)
    }

    fn press(doc: &Document, key: Key) -> Event {
        doc.key_down(key, KeyModifiers::NONE)
    }

    #[test]
    fn test_vertical_navigation_loops() {
        let doc = Document::new();
        let (ul, items) = list(&doc, 3);
        let mut nav = KeyboardNavigationController::new(&doc);
        nav.sync(Some(ul), NavigationOptions::default()).unwrap();
        doc.focus(items[2]);

        assert!(press(&doc, Key::ArrowDown).is_default_prevented());
        assert_eq!(doc.active_element(), Some(items[0]));
        press(&doc, Key::ArrowUp);
        assert_eq!(doc.active_element(), Some(items[2]));
    }

    #[test]
    fn test_no_loop_clamps() {
        let doc = Document::new();
        let (ul, items) = list(&doc, 2);
        let mut nav = KeyboardNavigationController::new(&doc);
        let options = NavigationOptions { looping: false, ..NavigationOptions::default() };
        nav.sync(Some(ul), options).unwrap();
        doc.focus(items[1]);

        press(&doc, Key::ArrowDown);
        assert_eq!(doc.active_element(), Some(items[1]));
        press(&doc, Key::Home);
        press(&doc, Key::ArrowUp);
        assert_eq!(doc.active_element(), Some(items[0]));
    }

    #[test]
    fn test_horizontal_ignores_vertical_keys() {
        let doc = Document::new();
        let (ul, items) = list(&doc, 3);
        let mut nav = KeyboardNavigationController::new(&doc);
        nav.sync(Some(ul), NavigationOptions::default().horizontal_only()).unwrap();
        doc.focus(items[0]);

        assert!(!press(&doc, Key::ArrowDown).is_default_prevented());
        press(&doc, Key::ArrowRight);
        assert_eq!(doc.active_element(), Some(items[1]));
    }

    #[test]
    fn test_same_options_do_not_reattach() {
        let doc = Document::new();
        let (ul, _) = list(&doc, 2);
        let mut nav = KeyboardNavigationController::new(&doc);
        let options = NavigationOptions::default().with_on_escape(|| {});

        nav.sync(Some(ul), options.clone()).unwrap();
        nav.sync(Some(ul), options).unwrap();
        assert_eq!(doc.stats().listeners_added, 2);
        assert_eq!(nav.attached_listeners(), 2);
    }

    #[test]
    fn test_new_escape_closure_reattaches() {
        let doc = Document::new();
        let (ul, _) = list(&doc, 2);
        let mut nav = KeyboardNavigationController::new(&doc);

        nav.sync(Some(ul), NavigationOptions::default().with_on_escape(|| {})).unwrap();
        nav.sync(Some(ul), NavigationOptions::default().with_on_escape(|| {})).unwrap();
        assert_eq!(doc.stats().listeners_removed, 2);
        assert_eq!(doc.listener_count(ul, None), 2);
    }

    #[test]
    fn test_unset_container_is_noop() {
        let doc = Document::new();
        let mut nav = KeyboardNavigationController::new(&doc);
        nav.sync(None, NavigationOptions::default().with_auto_focus(true)).unwrap();
        assert!(!nav.focus_first());
        assert!(!nav.focus_last());
        assert_eq!(doc.total_listeners(), 0);
    }

    #[test]
    fn test_text_container_rejected() {
        let doc = Document::new();
        let text = doc.create_text("Upcoming socials");
        let mut nav = KeyboardNavigationController::new(&doc);
        assert_eq!(
            nav.sync(Some(text), NavigationOptions::default()).unwrap_err(),
            A11yError::NotAnElement(text)
        );
    }

    #[test]
    fn test_forward_backward_helpers() {
        assert_eq!(forward(None, 3, true), 0);
        assert_eq!(forward(Some(2), 3, true), 0);
        assert_eq!(forward(Some(2), 3, false), 2);
        assert_eq!(backward(None, 3, false), 2);
        assert_eq!(backward(Some(0), 3, true), 2);
        assert_eq!(backward(Some(0), 3, false), 0);
    }
}
