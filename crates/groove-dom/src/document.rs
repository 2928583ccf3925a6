//! Document - High-level document API
//!
//! `Document` is a cheap, cloneable handle. Every component that attaches
//! listeners keeps a clone so it can detach them on drop. All state sits
//! behind `RefCell`s that are borrowed only for the duration of a single
//! operation; no borrow is held while a listener or timer callback runs,
//! so callbacks are free to mutate the document.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::events::{Event, EventKind, Key, KeyModifiers, Listener, ListenerId, ListenerRegistry};
use crate::geometry::DomRect;
use crate::observer::{TextMutation, TextObserver};
use crate::timers::{TimerId, TimerQueue};
use crate::{DomError, DomTree, ElementData, NodeId};

type TimerCallback = Box<dyn FnOnce(&Document)>;

/// Counters for listener and focus traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub listeners_added: usize,
    pub listeners_removed: usize,
    pub focus_calls: usize,
    pub timers_fired: usize,
}

struct Inner {
    tree: RefCell<DomTree>,
    listeners: RefCell<ListenerRegistry>,
    active: Cell<Option<NodeId>>,
    timers: RefCell<TimerQueue<TimerCallback>>,
    now_ms: Cell<u64>,
    observer: RefCell<TextObserver>,
    stats: Cell<DocumentStats>,
    html_element: NodeId,
    body_element: NodeId,
}

/// HTML Document handle
#[derive(Clone)]
pub struct Document {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.inner.tree.borrow().len())
            .field("listeners", &self.inner.listeners.borrow().len())
            .field("active", &self.inner.active.get())
            .field("now_ms", &self.inner.now_ms.get())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with `<html><body></body></html>`
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        // Fresh nodes under the root cannot violate the hierarchy.
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, body);

        Self {
            inner: Rc::new(Inner {
                tree: RefCell::new(tree),
                listeners: RefCell::new(ListenerRegistry::default()),
                active: Cell::new(None),
                timers: RefCell::new(TimerQueue::new()),
                now_ms: Cell::new(0),
                observer: RefCell::new(TextObserver::default()),
                stats: Cell::new(DocumentStats::default()),
                html_element: html,
                body_element: body,
            }),
        }
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.inner.html_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.inner.body_element
    }

    /// True if both handles point at the same document
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // === Tree ===

    /// Read access to the tree
    pub fn with_tree<R>(&self, f: impl FnOnce(&DomTree) -> R) -> R {
        f(&self.inner.tree.borrow())
    }

    /// Read access to an element's data
    pub fn with_element<R>(&self, id: NodeId, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        let tree = self.inner.tree.borrow();
        tree.get(id).and_then(|n| n.as_element()).map(f)
    }

    fn with_element_mut<R>(&self, id: NodeId, f: impl FnOnce(&mut ElementData) -> R) -> Result<R, DomError> {
        let mut tree = self.inner.tree.borrow_mut();
        let node = tree.get_mut(id).ok_or(DomError::InvalidNode(id))?;
        let element = node.as_element_mut().ok_or(DomError::NotAnElement(id))?;
        Ok(f(element))
    }

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner.tree.borrow_mut().create_element(tag)
    }

    /// Create a detached text node
    pub fn create_text(&self, content: &str) -> NodeId {
        self.inner.tree.borrow_mut().create_text(content)
    }

    /// Append `child` under `parent`
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.inner.tree.borrow_mut().append_child(parent, child)?;
        self.drop_focus_if_disconnected();
        Ok(())
    }

    /// Remove `child` from `parent`. Focus inside the removed subtree is lost.
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.inner.tree.borrow_mut().remove_child(parent, child)?;
        self.drop_focus_if_disconnected();
        Ok(())
    }

    fn drop_focus_if_disconnected(&self) {
        if let Some(active) = self.inner.active.get() {
            if !self.is_connected(active) {
                tracing::debug!("focused node {} was removed from the document", active);
                self.inner.active.set(None);
            }
        }
    }

    /// True if the node exists and is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.with_tree(|t| t.get(id).is_some_and(|n| n.is_element()))
    }

    /// True if the node exists in the arena
    pub fn exists(&self, id: NodeId) -> bool {
        self.with_tree(|t| t.get(id).is_some())
    }

    /// True if the node is attached to the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.with_tree(|t| t.is_connected(id))
    }

    /// `ancestor.contains(node)`
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.with_tree(|t| t.is_inclusive_ancestor(ancestor, node))
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.with_tree(|t| t.parent(id))
    }

    /// Find element by `id` attribute
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.with_tree(|t| t.get_element_by_id(element_id))
    }

    // === Attributes ===

    pub fn set_attribute(&self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.with_element_mut(id, |e| {
            e.set_attr(name, value);
        })
    }

    pub fn remove_attribute(&self, id: NodeId, name: &str) -> Result<(), DomError> {
        self.with_element_mut(id, |e| {
            e.remove_attr(name);
        })
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.with_element(id, |e| e.get_attr(name).map(str::to_string)).flatten()
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.with_element(id, |e| e.has_attr(name)).unwrap_or(false)
    }

    /// `element.tabIndex`
    pub fn tab_index(&self, id: NodeId) -> Option<i32> {
        self.with_element(id, |e| e.tab_index())
    }

    /// `element.tabIndex = value`
    pub fn set_tab_index(&self, id: NodeId, value: i32) -> Result<(), DomError> {
        self.set_attribute(id, "tabindex", &value.to_string())
    }

    /// Record the layout box the host measured
    pub fn set_rect(&self, id: NodeId, rect: DomRect) -> Result<(), DomError> {
        self.with_element_mut(id, |e| e.rect = Some(rect))
    }

    /// Toggle `display: none`
    pub fn set_displayed(&self, id: NodeId, displayed: bool) -> Result<(), DomError> {
        self.with_element_mut(id, |e| e.displayed = displayed)
    }

    // === Text ===

    pub fn text_content(&self, id: NodeId) -> String {
        self.with_tree(|t| t.text_content(id))
    }

    /// Replace the node's content; observed nodes record the change
    pub fn set_text_content(&self, id: NodeId, text: &str) -> Result<(), DomError> {
        let old = {
            let mut tree = self.inner.tree.borrow_mut();
            let old = tree.text_content(id);
            tree.set_text_content(id, text)?;
            old
        };
        let mut observer = self.inner.observer.borrow_mut();
        if observer.is_observed(id) {
            observer.push_record(TextMutation {
                target: id,
                old_value: old,
                new_value: text.to_string(),
                at_ms: self.inner.now_ms.get(),
            });
        }
        Ok(())
    }

    /// Start recording text changes on a node
    pub fn observe_text(&self, id: NodeId) {
        self.inner.observer.borrow_mut().observe(id);
    }

    /// Stop recording text changes on a node
    pub fn unobserve_text(&self, id: NodeId) {
        self.inner.observer.borrow_mut().disconnect(id);
    }

    /// Drain recorded text changes
    pub fn take_text_mutations(&self) -> Vec<TextMutation> {
        self.inner.observer.borrow_mut().take_records()
    }

    // === Focus ===

    /// `document.activeElement`, or `None` when focus sits on the body
    pub fn active_element(&self) -> Option<NodeId> {
        self.inner.active.get()
    }

    /// `element.focus()`. Returns false for detached or non-element nodes.
    pub fn focus(&self, id: NodeId) -> bool {
        self.bump(|s| s.focus_calls += 1);
        if !self.is_element(id) || !self.is_connected(id) {
            tracing::debug!("focus({}) ignored: not a connected element", id);
            return false;
        }
        let previous = self.inner.active.get();
        if previous == Some(id) {
            return true;
        }
        self.inner.active.set(Some(id));
        if let Some(prev) = previous {
            self.dispatch(Event::blur(prev, Some(id)));
        }
        self.dispatch(Event::focus(id, previous));
        true
    }

    /// `document.activeElement.blur()`
    pub fn blur(&self) {
        if let Some(prev) = self.inner.active.take() {
            self.dispatch(Event::blur(prev, None));
        }
    }

    // === Events ===

    /// `target.addEventListener(kind, listener)`
    pub fn add_event_listener(
        &self,
        target: NodeId,
        kind: EventKind,
        listener: impl Fn(&Document, &mut Event) + 'static,
    ) -> ListenerId {
        let listener: Listener = Rc::new(listener);
        let id = self.inner.listeners.borrow_mut().add(target, kind, listener);
        self.bump(|s| s.listeners_added += 1);
        tracing::trace!("added {} listener {:?} on {}", kind.name(), id, target);
        id
    }

    /// `removeEventListener` by handle. Unknown handles are ignored.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let removed = self.inner.listeners.borrow_mut().remove(id);
        if removed {
            self.bump(|s| s.listeners_removed += 1);
            tracing::trace!("removed listener {:?}", id);
        }
        removed
    }

    /// True if the handle is still registered
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow().contains(id)
    }

    /// Listeners registered on a node, optionally filtered by kind
    pub fn listener_count(&self, target: NodeId, kind: Option<EventKind>) -> usize {
        self.inner.listeners.borrow().count(target, kind)
    }

    /// Listeners registered anywhere in the document
    pub fn total_listeners(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Dispatch an event to its target, bubbling if the kind bubbles.
    /// Returns the event so the caller can inspect `is_default_prevented`.
    pub fn dispatch(&self, mut event: Event) -> Event {
        let path: Vec<NodeId> = if event.kind.bubbles() {
            self.with_tree(|t| t.ancestors(event.target).collect())
        } else {
            vec![event.target]
        };

        for node in path {
            event.current_target = Some(node);
            let snapshot = self.inner.listeners.borrow().matching(node, event.kind);
            for (id, listener) in snapshot {
                // A listener detached earlier in this dispatch must not run.
                if !self.has_listener(id) {
                    continue;
                }
                listener(self, &mut event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event.current_target = None;
        event
    }

    /// Dispatch a keydown at the focused element (or the body)
    pub fn key_down(&self, key: Key, modifiers: KeyModifiers) -> Event {
        let target = self.active_element().unwrap_or(self.body());
        self.dispatch(Event::key_down(target, key, modifiers))
    }

    // === Timers ===

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.inner.now_ms.get()
    }

    /// `setTimeout(callback, delay_ms)`
    pub fn set_timeout(&self, delay_ms: u64, callback: impl FnOnce(&Document) + 'static) -> TimerId {
        let now = self.now_ms();
        self.inner.timers.borrow_mut().set_timeout(now, delay_ms, Box::new(callback))
    }

    /// `clearTimeout(id)`
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.timers.borrow_mut().clear(id)
    }

    /// Number of timers not yet fired
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Advance the clock by `ms`, firing every timer that comes due,
    /// including ones scheduled by callbacks inside the window
    pub fn advance_time(&self, ms: u64) -> usize {
        let deadline = self.now_ms().saturating_add(ms);
        let mut fired = 0;
        loop {
            let next = self.inner.timers.borrow_mut().pop_due(deadline);
            let Some((due, id, callback)) = next else {
                break;
            };
            self.inner.now_ms.set(due.max(self.now_ms()));
            tracing::trace!("timer {:?} fired at {}ms", id, due);
            callback(self);
            fired += 1;
        }
        self.inner.now_ms.set(deadline);
        self.bump(|s| s.timers_fired += fired);
        fired
    }

    /// Fire timers until none remain; returns the number fired
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        loop {
            let next = self.inner.timers.borrow().next_deadline();
            let Some(next) = next else {
                return fired;
            };
            fired += self.advance_time(next.saturating_sub(self.now_ms()));
        }
    }

    // === Stats ===

    pub fn stats(&self) -> DocumentStats {
        self.inner.stats.get()
    }

    fn bump(&self, f: impl FnOnce(&mut DocumentStats)) {
        let mut stats = self.inner.stats.get();
        f(&mut stats);
        self.inner.stats.set(stats);
    }
}
