//! Property-based invariant tests for groove-a11y (public API only).
//!
//! 1. RovingTabindex keeps exactly one `tabindex=0` member under any mix of
//!    keys, pointer focus and list swaps
//! 2. An active FocusTrap keeps focus inside its container for any Tab
//!    sequence, including modals with `tabindex=-1` controls and a roving
//!    group
//! 3. KeyboardNavigationController never owns listeners while disabled and
//!    never owns more than two

use groove_a11y::{press_key, FocusTrap, KeyboardNavigationController, NavigationOptions, RovingTabindex};
use groove_dom::{Document, Key, KeyModifiers, NodeId};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Action {
    Key(Key, bool),
    FocusItem(usize),
    Swap(usize),
}

fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::ArrowUp),
        Just(Key::ArrowDown),
        Just(Key::ArrowLeft),
        Just(Key::ArrowRight),
        Just(Key::Home),
        Just(Key::End),
        Just(Key::Tab),
        Just(Key::Enter),
        Just(Key::Character('a')),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (arb_key(), any::<bool>()).prop_map(|(k, m)| Action::Key(k, m)),
        2 => (0usize..16).prop_map(Action::FocusItem),
        1 => (0usize..8).prop_map(Action::Swap),
    ]
}

fn buttons(doc: &Document, parent: NodeId, count: usize) -> Vec<NodeId> {
    (0..count)
        .map(|_| {
            let id = doc.create_element("button");
            doc.append_child(parent, id).unwrap();
            id
        })
        .collect()
}

fn zero_stops(doc: &Document, elements: &[NodeId]) -> usize {
    elements.iter().filter(|&&e| doc.tab_index(e) == Some(0)).count()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Roving tabindex: exactly one stop
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn roving_has_exactly_one_stop(
        count in 0usize..8,
        initial in 0usize..10,
        actions in proptest::collection::vec(arb_action(), 0..40),
    ) {
        let doc = Document::new();
        let toolbar = doc.create_element("div");
        doc.append_child(doc.body(), toolbar).unwrap();
        let mut elements = buttons(&doc, toolbar, count);
        let mut roving = RovingTabindex::new(&doc, elements.clone(), initial).unwrap();

        for action in actions {
            match action {
                Action::Key(key, ctrl) => {
                    let modifiers = KeyModifiers { ctrl, ..KeyModifiers::NONE };
                    press_key(&doc, key, modifiers);
                }
                Action::FocusItem(i) => {
                    if let Some(&e) = elements.get(i) {
                        doc.focus(e);
                    }
                }
                Action::Swap(n) => {
                    elements = buttons(&doc, toolbar, n);
                    roving.update_elements(elements.clone()).unwrap();
                }
            }

            let expected = usize::from(!elements.is_empty());
            prop_assert_eq!(zero_stops(&doc, &elements), expected);
            prop_assert_eq!(roving.active_index().is_some(), !elements.is_empty());
            if let Some(active) = roving.active_element() {
                prop_assert_eq!(doc.tab_index(active), Some(0));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Focus trap: focus stays inside
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn trap_contains_focus(
        skipped in proptest::collection::vec(any::<bool>(), 1..6),
        chips in 0usize..4,
        active_chip in 0usize..4,
        outside in 0usize..4,
        shifts in proptest::collection::vec(any::<bool>(), 1..30),
    ) {
        let doc = Document::new();
        buttons(&doc, doc.body(), outside);
        let dialog = doc.create_element("div");
        doc.append_child(doc.body(), dialog).unwrap();
        let mut items = buttons(&doc, dialog, skipped.len());
        for (&item, &skip) in items.iter().zip(&skipped) {
            if skip {
                doc.set_tab_index(item, -1).unwrap();
            }
        }
        let toolbar = doc.create_element("div");
        doc.append_child(dialog, toolbar).unwrap();
        let chip_ids = buttons(&doc, toolbar, chips);
        let _roving = RovingTabindex::new(&doc, chip_ids.clone(), active_chip).unwrap();
        items.extend(chip_ids);
        buttons(&doc, doc.body(), outside);

        let mut trap = FocusTrap::new(&doc, dialog).unwrap();
        trap.activate();

        for shift in shifts {
            let modifiers = if shift { KeyModifiers::SHIFT } else { KeyModifiers::NONE };
            press_key(&doc, Key::Tab, modifiers);
            let active = doc.active_element();
            prop_assert!(active.is_some_and(|a| items.contains(&a)), "focus left the dialog");
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Keyboard navigation: listener bounds under option churn
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn navigation_listener_bounds(
        renders in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), 0usize..3), 1..25),
    ) {
        let doc = Document::new();
        let containers = [
            doc.create_element("ul"),
            doc.create_element("ul"),
        ];
        for &c in &containers {
            doc.append_child(doc.body(), c).unwrap();
        }
        let mut nav = KeyboardNavigationController::new(&doc);

        for (enabled, escape, horizontal, which) in renders {
            let mut options = NavigationOptions::default().with_enabled(enabled);
            options.horizontal = horizontal;
            if escape {
                options = options.with_on_escape(|| {});
            }
            let container = containers.get(which).copied();
            nav.sync(container, options).unwrap();

            let expected = if enabled && container.is_some() { 1 + usize::from(escape) } else { 0 };
            prop_assert_eq!(nav.attached_listeners(), expected);
            prop_assert_eq!(doc.total_listeners(), expected);
        }

        drop(nav);
        prop_assert_eq!(doc.total_listeners(), 0);
    }
}
