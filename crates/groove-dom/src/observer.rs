//! Text mutation observation
//!
//! A narrow MutationObserver: assistive technology watches live regions for
//! text changes, so the document records every `set_text_content` on an
//! observed node, timestamped with the virtual clock.

use crate::NodeId;

/// One observed text change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMutation {
    pub target: NodeId,
    pub old_value: String,
    pub new_value: String,
    pub at_ms: u64,
}

/// Observed targets and their pending records
#[derive(Debug, Default)]
pub(crate) struct TextObserver {
    observed: Vec<NodeId>,
    records: Vec<TextMutation>,
}

impl TextObserver {
    pub fn observe(&mut self, target: NodeId) {
        if !self.observed.contains(&target) {
            self.observed.push(target);
        }
    }

    pub fn disconnect(&mut self, target: NodeId) {
        self.observed.retain(|&t| t != target);
    }

    pub fn is_observed(&self, target: NodeId) -> bool {
        self.observed.contains(&target)
    }

    pub fn push_record(&mut self, record: TextMutation) {
        self.records.push(record);
    }

    pub fn take_records(&mut self) -> Vec<TextMutation> {
        std::mem::take(&mut self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_is_idempotent() {
        let mut observer = TextObserver::default();
        observer.observe(NodeId(3));
        observer.observe(NodeId(3));
        assert!(observer.is_observed(NodeId(3)));

        observer.disconnect(NodeId(3));
        assert!(!observer.is_observed(NodeId(3)));
    }

    #[test]
    fn test_take_records_drains() {
        let mut observer = TextObserver::default();
        observer.push_record(TextMutation {
            target: NodeId(1),
            old_value: String::new(),
            new_value: "Loading".into(),
            at_ms: 0,
        });
        assert_eq!(observer.take_records().len(), 1);
        assert!(observer.take_records().is_empty());
    }
}
