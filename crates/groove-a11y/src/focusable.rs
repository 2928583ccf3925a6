//! Focusable element resolution
//!
//! Every call walks the container again. Listings, comments and filters
//! re-render between keypresses, so a cached list would go stale.

use std::collections::HashMap;

use groove_dom::{Document, DomTree, ElementData, NodeId};

/// Descendants of `container` reachable with Tab, in tab order: positive
/// `tabindex` ascending first, then everything else in document order.
///
/// `None`, unknown or detached containers yield an empty list.
pub fn focusable_elements(doc: &Document, container: Option<NodeId>) -> Vec<NodeId> {
    let Some(container) = container else {
        tracing::debug!("no container set; nothing is focusable");
        return Vec::new();
    };
    if !doc.is_connected(container) {
        tracing::debug!("container {} is detached; nothing is focusable", container);
        return Vec::new();
    }

    doc.with_tree(|tree| {
        let mut found: Vec<(i32, NodeId)> = tree
            .descendants(container)
            .into_iter()
            .filter_map(|id| {
                let element = tree.get(id)?.as_element()?;
                if !is_tabbable(element) || !is_rendered(tree, id, container) {
                    return None;
                }
                Some((element.tab_index_attr().unwrap_or(0).max(0), id))
            })
            .collect();

        // Stable sort keeps document order inside each tabindex bucket.
        found.sort_by_key(|&(tab_index, _)| if tab_index > 0 { (0, tab_index) } else { (1, 0) });
        found.into_iter().map(|(_, id)| id).collect()
    })
}

/// Whether `id` can currently take focus at all, Tab-reachable or not.
/// A `tabindex="-1"` element qualifies: scripts can still focus it.
pub fn is_focusable(doc: &Document, id: NodeId) -> bool {
    if !doc.is_connected(id) {
        return false;
    }
    doc.with_tree(|tree| {
        let Some(element) = tree.get(id).and_then(|n| n.as_element()) else {
            return false;
        };
        !element.is_disabled()
            && (element.is_interactive() || element.tab_index_attr().is_some())
            && is_rendered(tree, id, NodeId::ROOT)
    })
}

/// The part of [`focusable_elements`] that sequential Tab actually visits:
/// elements whose effective `tabindex` is negative are dropped.
pub fn tab_sequence(doc: &Document, container: Option<NodeId>) -> Vec<NodeId> {
    focusable_elements(doc, container)
        .into_iter()
        .filter(|&id| doc.tab_index(id).is_some_and(|t| t >= 0))
        .collect()
}

/// Where Tab (or Shift+Tab when `backwards`) goes from `from` within
/// `sequence`, wrapping at both ends.
///
/// With no `from`, forward goes to the first element and backward to the
/// last. A `from` outside the sequence continues from its document
/// position.
pub fn next_in_sequence(
    doc: &Document,
    sequence: &[NodeId],
    from: Option<NodeId>,
    backwards: bool,
) -> Option<NodeId> {
    let (&first, &last) = (sequence.first()?, sequence.last()?);
    let wrapped = if backwards { last } else { first };
    let Some(from) = from else {
        return Some(wrapped);
    };

    if let Some(pos) = sequence.iter().position(|&id| id == from) {
        let len = sequence.len();
        let next = if backwards { (pos + len - 1) % len } else { (pos + 1) % len };
        return Some(sequence[next]);
    }

    let positions: HashMap<NodeId, usize> = doc.with_tree(|tree| {
        tree.descendants(NodeId::ROOT)
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect()
    });
    let Some(&anchor) = positions.get(&from) else {
        return Some(wrapped);
    };
    let position = |id: &&NodeId| positions.get(*id).copied();

    let found = if backwards {
        sequence.iter().rev().find(|id| position(id).is_some_and(|p| p < anchor))
    } else {
        sequence.iter().find(|id| position(id).is_some_and(|p| p > anchor))
    };
    Some(found.copied().unwrap_or(wrapped))
}

fn is_tabbable(element: &ElementData) -> bool {
    if element.is_disabled() {
        return false;
    }
    // Native controls stay in the list even with tabindex="-1".
    element.is_interactive() || element.tab_index_attr().is_some_and(|t| t >= 0)
}

/// Not `hidden` or `display: none` anywhere between `id` and `boundary`,
/// and not a zero-size box itself
fn is_rendered(tree: &DomTree, id: NodeId, boundary: NodeId) -> bool {
    let zero_size = tree
        .get(id)
        .and_then(|n| n.as_element())
        .and_then(|e| e.rect)
        .is_some_and(|r| r.is_empty());
    if zero_size {
        return false;
    }

    for ancestor in tree.ancestors(id) {
        if let Some(element) = tree.get(ancestor).and_then(|n| n.as_element()) {
            if element.has_attr("hidden") || !element.displayed {
                return false;
            }
        }
        if ancestor == boundary {
            break;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use groove_dom::DomRect;

    fn child(doc: &Document, parent: NodeId, tag: &str) -> NodeId {
        let id = doc.create_element(tag);
        doc.append_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_document_order_and_filters() {
        let doc = Document::new();
        let form = child(&doc, doc.body(), "form");
        let name = child(&doc, form, "input");
        let disabled = child(&doc, form, "button");
        doc.set_attribute(disabled, "disabled", "").unwrap();
        child(&doc, form, "div");
        let custom = child(&doc, form, "div");
        doc.set_tab_index(custom, 0).unwrap();
        let skipped = child(&doc, form, "div");
        doc.set_tab_index(skipped, -1).unwrap();
        let submit = child(&doc, form, "button");

        assert_eq!(focusable_elements(&doc, Some(form)), vec![name, custom, submit]);
    }

    #[test]
    fn test_interactive_with_negative_tabindex_kept() {
        let doc = Document::new();
        let toolbar = child(&doc, doc.body(), "div");
        let like = child(&doc, toolbar, "button");
        doc.set_tab_index(like, -1).unwrap();
        assert_eq!(focusable_elements(&doc, Some(toolbar)), vec![like]);
    }

    #[test]
    fn test_positive_tabindex_first() {
        let doc = Document::new();
        let panel = child(&doc, doc.body(), "div");
        let a = child(&doc, panel, "button");
        let b = child(&doc, panel, "button");
        doc.set_tab_index(b, 2).unwrap();
        let c = child(&doc, panel, "button");
        doc.set_tab_index(c, 1).unwrap();

        assert_eq!(focusable_elements(&doc, Some(panel)), vec![c, b, a]);
    }

    #[test]
    fn test_hidden_and_zero_size_excluded() {
        let doc = Document::new();
        let panel = child(&doc, doc.body(), "div");
        let visible = child(&doc, panel, "button");
        let collapsed = child(&doc, panel, "div");
        doc.set_attribute(collapsed, "hidden", "").unwrap();
        child(&doc, collapsed, "button");
        let zero = child(&doc, panel, "button");
        doc.set_rect(zero, DomRect::default()).unwrap();
        let undisplayed = child(&doc, panel, "a");
        doc.set_attribute(undisplayed, "href", "#map").unwrap();
        doc.set_displayed(undisplayed, false).unwrap();

        assert_eq!(focusable_elements(&doc, Some(panel)), vec![visible]);
    }

    #[test]
    fn test_missing_or_detached_container() {
        let doc = Document::new();
        assert!(focusable_elements(&doc, None).is_empty());

        let orphan = doc.create_element("div");
        child(&doc, orphan, "button");
        assert!(focusable_elements(&doc, Some(orphan)).is_empty());
    }

    #[test]
    fn test_requery_sees_mutations() {
        let doc = Document::new();
        let list = child(&doc, doc.body(), "ul");
        let first = child(&doc, list, "button");
        assert_eq!(focusable_elements(&doc, Some(list)), vec![first]);

        let second = child(&doc, list, "button");
        assert_eq!(focusable_elements(&doc, Some(list)), vec![first, second]);
    }

    #[test]
    fn test_tab_sequence_drops_negative_tabindex() {
        let doc = Document::new();
        let toolbar = child(&doc, doc.body(), "div");
        let active_chip = child(&doc, toolbar, "button");
        let other_chip = child(&doc, toolbar, "button");
        doc.set_tab_index(other_chip, -1).unwrap();

        assert_eq!(focusable_elements(&doc, Some(toolbar)), vec![active_chip, other_chip]);
        assert_eq!(tab_sequence(&doc, Some(toolbar)), vec![active_chip]);
    }

    #[test]
    fn test_next_in_sequence() {
        let doc = Document::new();
        let a = child(&doc, doc.body(), "button");
        let skipped = child(&doc, doc.body(), "button");
        doc.set_tab_index(skipped, -1).unwrap();
        let b = child(&doc, doc.body(), "button");
        let sequence = [a, b];

        assert_eq!(next_in_sequence(&doc, &sequence, None, false), Some(a));
        assert_eq!(next_in_sequence(&doc, &sequence, None, true), Some(b));
        assert_eq!(next_in_sequence(&doc, &sequence, Some(b), false), Some(a));
        assert_eq!(next_in_sequence(&doc, &sequence, Some(skipped), false), Some(b));
        assert_eq!(next_in_sequence(&doc, &sequence, Some(skipped), true), Some(a));
        assert_eq!(next_in_sequence(&doc, &[], Some(a), false), None);
    }

    #[test]
    fn test_is_focusable() {
        let doc = Document::new();
        let heading = child(&doc, doc.body(), "h2");
        assert!(!is_focusable(&doc, heading));
        doc.set_tab_index(heading, -1).unwrap();
        assert!(is_focusable(&doc, heading));

        let button = child(&doc, doc.body(), "button");
        assert!(is_focusable(&doc, button));
        doc.remove_child(doc.body(), button).unwrap();
        assert!(!is_focusable(&doc, button));
    }
}
