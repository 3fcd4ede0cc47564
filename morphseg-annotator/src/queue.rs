//! Queue manager
//!
//! Owns the word backlog (buckets), the deferred (skipped) set and the
//! backlog of split-off senses, and decides what the worker sees next.
//!
//! Priority of `next_item`:
//! 1. pending senses (FIFO, grouped by word form)
//! 2. deferred words, while deferred mode is on
//! 3. the front bucket, after dropping exhausted buckets
//! 4. leftover deferred words (deferred mode switches on by itself)
//! 5. exhaustion

use crate::models::{PendingSense, SenseUnit, WordBucket};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Where a word form came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Bucket { label: String, has_prediction: bool },
    Deferred,
}

/// One unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    /// A word form to fetch from the backend
    Word { form: String, origin: Origin },
    /// Split-off senses of a word, re-presented on their own
    Sense(SenseUnit),
}

impl WorkItem {
    pub fn word_type(&self) -> &str {
        match self {
            WorkItem::Word { form, .. } => form,
            WorkItem::Sense(unit) => &unit.word_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextItem {
    Item(WorkItem),
    Exhausted,
}

/// Result of a queue command that may be unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueAction {
    Applied,
    Disabled,
}

/// Externally visible phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseLabel {
    Bucket { label: String, has_prediction: bool },
    Deferred,
    Exhausted,
}

/// Status line counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub deferred: usize,
    /// Forms left in each bucket, front first
    pub remaining: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct QueueManager {
    buckets: VecDeque<WordBucket>,
    deferred: VecDeque<String>,
    deferred_mode: bool,
    pending: VecDeque<PendingSense>,
    /// Phase of the most recently yielded item
    phase: Option<PhaseLabel>,
}

impl QueueManager {
    pub fn new(buckets: Vec<WordBucket>) -> Self {
        Self {
            buckets: buckets.into(),
            ..Default::default()
        }
    }

    /// Select the next unit of work
    pub fn next_item(&mut self) -> NextItem {
        if let Some(unit) = self.pop_sense_unit() {
            debug!(word = %unit.word_type, contexts = unit.contexts.len(), "Next item: pending senses");
            return NextItem::Item(WorkItem::Sense(unit));
        }

        if self.deferred_mode {
            if let Some(form) = self.pop_deferred() {
                return NextItem::Item(form);
            }
            debug!("Deferred set drained, leaving deferred mode");
            self.deferred_mode = false;
        }

        while self.buckets.front().is_some_and(|b| b.forms.is_empty()) {
            if let Some(bucket) = self.buckets.pop_front() {
                debug!(label = %bucket.phase_label, "Dropping exhausted bucket");
            }
        }
        if let Some(bucket) = self.buckets.front_mut() {
            if let Some(form) = bucket.forms.pop_front() {
                let origin = Origin::Bucket {
                    label: bucket.phase_label.clone(),
                    has_prediction: bucket.has_prediction,
                };
                self.phase = Some(PhaseLabel::Bucket {
                    label: bucket.phase_label.clone(),
                    has_prediction: bucket.has_prediction,
                });
                debug!(word = %form, "Next item: bucket");
                return NextItem::Item(WorkItem::Word { form, origin });
            }
        }

        if !self.deferred.is_empty() {
            info!(count = self.deferred.len(), "Buckets exhausted, revisiting skipped words");
            self.deferred_mode = true;
            if let Some(form) = self.pop_deferred() {
                return NextItem::Item(form);
            }
        }

        self.phase = Some(PhaseLabel::Exhausted);
        NextItem::Exhausted
    }

    fn pop_sense_unit(&mut self) -> Option<SenseUnit> {
        let word_type = self.pending.front()?.word_type.clone();
        let mut group = Vec::new();
        while self.pending.front().is_some_and(|p| p.word_type == word_type) {
            group.extend(self.pending.pop_front());
        }
        SenseUnit::from_pending(group)
    }

    fn pop_deferred(&mut self) -> Option<WorkItem> {
        let form = self.deferred.pop_front()?;
        self.phase = Some(PhaseLabel::Deferred);
        debug!(word = %form, "Next item: deferred");
        Some(WorkItem::Word {
            form,
            origin: Origin::Deferred,
        })
    }

    /// Postpone a word; unavailable while revisiting skipped words
    pub fn defer(&mut self, form: impl Into<String>) -> QueueAction {
        if self.deferred_mode {
            return QueueAction::Disabled;
        }
        let form = form.into();
        debug!(word = %form, "Word deferred");
        self.deferred.push_back(form);
        QueueAction::Applied
    }

    /// Serve deferred words first until the deferred set is empty
    pub fn activate_deferred(&mut self) -> QueueAction {
        if !self.unskip_available() {
            return QueueAction::Disabled;
        }
        info!(count = self.deferred.len(), "Deferred mode activated");
        self.deferred_mode = true;
        QueueAction::Applied
    }

    pub fn unskip_available(&self) -> bool {
        !self.deferred.is_empty() && !self.deferred_mode
    }

    pub fn is_deferred_mode(&self) -> bool {
        self.deferred_mode
    }

    pub fn push_pending(&mut self, sense: PendingSense) {
        self.pending.push_back(sense);
    }

    /// Put an interrupted item back at the head of its source
    pub fn restore_front(&mut self, item: WorkItem) {
        match item {
            WorkItem::Sense(unit) => {
                for sense in unit.into_pending().into_iter().rev() {
                    self.pending.push_front(sense);
                }
            }
            WorkItem::Word {
                form,
                origin: Origin::Deferred,
            } => self.deferred.push_front(form),
            WorkItem::Word {
                form,
                origin: Origin::Bucket {
                    label,
                    has_prediction,
                },
            } => match self.buckets.front_mut() {
                Some(bucket) if bucket.phase_label == label => bucket.forms.push_front(form),
                _ => self
                    .buckets
                    .push_front(WordBucket::new(label, has_prediction, [form])),
            },
        }
    }

    /// Phase of the current item, or of the front bucket before the first item
    pub fn phase_label(&self) -> PhaseLabel {
        if let Some(phase) = &self.phase {
            return phase.clone();
        }
        match self.buckets.iter().find(|b| !b.forms.is_empty()) {
            Some(bucket) => PhaseLabel::Bucket {
                label: bucket.phase_label.clone(),
                has_prediction: bucket.has_prediction,
            },
            None if !self.deferred.is_empty() => PhaseLabel::Deferred,
            None => PhaseLabel::Exhausted,
        }
    }

    pub fn counts(&self) -> QueueCounts {
        QueueCounts {
            deferred: self.deferred.len(),
            remaining: self.buckets.iter().map(|b| b.forms.len()).collect(),
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SenseContext;

    fn word(item: NextItem) -> String {
        match item {
            NextItem::Item(item) => item.word_type().to_string(),
            NextItem::Exhausted => "<exhausted>".to_string(),
        }
    }

    fn sense(word_type: &str, id: &str) -> PendingSense {
        PendingSense {
            word_type: word_type.to_string(),
            initial_boundaries: vec![false; word_type.chars().count() - 1],
            context: SenseContext::new("", "", id),
        }
    }

    #[test]
    fn test_buckets_in_order_then_exhausted() {
        let mut queue = QueueManager::new(vec![
            WordBucket::new("A", false, ["fox", "foxes"]),
            WordBucket::new("B", true, ["ox"]),
        ]);
        assert_eq!(word(queue.next_item()), "fox");
        assert_eq!(word(queue.next_item()), "foxes");
        assert_eq!(word(queue.next_item()), "ox");
        assert_eq!(queue.next_item(), NextItem::Exhausted);
        assert_eq!(queue.phase_label(), PhaseLabel::Exhausted);
    }

    #[test]
    fn test_empty_buckets_dropped_transparently() {
        let empty: [&str; 0] = [];
        let mut queue = QueueManager::new(vec![
            WordBucket::new("A", false, empty),
            WordBucket::new("B", false, empty),
            WordBucket::new("C", true, ["ox"]),
        ]);
        assert_eq!(queue.phase_label(), PhaseLabel::Bucket { label: "C".into(), has_prediction: true });
        assert_eq!(word(queue.next_item()), "ox");
        assert_eq!(queue.next_item(), NextItem::Exhausted);

        let mut queue = QueueManager::new(vec![WordBucket::new("A", false, empty)]);
        assert_eq!(queue.next_item(), NextItem::Exhausted);
    }

    #[test]
    fn test_pending_senses_first() {
        let mut queue = QueueManager::new(vec![WordBucket::new("A", false, ["fox", "ox"])]);
        queue.defer("gnu");
        queue.activate_deferred();
        queue.push_pending(sense("bank", "c2"));
        queue.push_pending(sense("bank", "c3"));
        queue.push_pending(sense("bat", "c7"));

        match queue.next_item() {
            NextItem::Item(WorkItem::Sense(unit)) => {
                assert_eq!(unit.word_type, "bank");
                let ids: Vec<_> = unit.contexts.iter().map(|c| c.context_id.as_str()).collect();
                assert_eq!(ids, vec!["c2", "c3"]);
            }
            other => panic!("expected sense unit, got {:?}", other),
        }
        assert_eq!(word(queue.next_item()), "bat");
        assert_eq!(word(queue.next_item()), "gnu");
        assert_eq!(word(queue.next_item()), "fox");
    }

    #[test]
    fn test_deferred_mode_preempts_bucket() {
        let mut queue = QueueManager::new(vec![WordBucket::new("A", false, ["fox", "foxes", "ox"])]);
        assert_eq!(word(queue.next_item()), "fox");
        assert_eq!(word(queue.next_item()), "foxes");
        assert_eq!(queue.defer("foxes"), QueueAction::Applied);
        assert!(queue.unskip_available());

        assert_eq!(queue.activate_deferred(), QueueAction::Applied);
        assert_eq!(
            queue.next_item(),
            NextItem::Item(WorkItem::Word { form: "foxes".into(), origin: Origin::Deferred })
        );
        assert_eq!(queue.phase_label(), PhaseLabel::Deferred);
        assert!(!queue.unskip_available());
        // Deferred set drained; mode reverts on the next selection
        assert_eq!(word(queue.next_item()), "ox");
        assert!(!queue.is_deferred_mode());
    }

    #[test]
    fn test_activate_deferred_disabled_when_empty() {
        let mut queue = QueueManager::new(vec![WordBucket::new("A", false, ["fox"])]);
        assert!(!queue.unskip_available());
        assert_eq!(queue.activate_deferred(), QueueAction::Disabled);
        assert!(!queue.is_deferred_mode());
    }

    #[test]
    fn test_defer_disabled_in_deferred_mode() {
        let mut queue = QueueManager::new(vec![WordBucket::new("A", false, ["ox"])]);
        queue.defer("fox");
        queue.defer("foxes");
        queue.activate_deferred();
        assert_eq!(queue.activate_deferred(), QueueAction::Disabled);
        assert_eq!(word(queue.next_item()), "fox");
        assert_eq!(queue.defer("fox"), QueueAction::Disabled);
        assert_eq!(queue.counts().deferred, 1);
    }

    #[test]
    fn test_leftover_deferred_drained_before_exhaustion() {
        let mut queue = QueueManager::new(vec![WordBucket::new("A", false, ["fox"])]);
        assert_eq!(word(queue.next_item()), "fox");
        queue.defer("fox");
        assert_eq!(word(queue.next_item()), "fox");
        assert_eq!(queue.phase_label(), PhaseLabel::Deferred);
        assert_eq!(queue.next_item(), NextItem::Exhausted);
    }

    #[test]
    fn test_restore_front() {
        let mut queue = QueueManager::new(vec![WordBucket::new("A", false, ["fox", "ox"])]);
        let item = match queue.next_item() {
            NextItem::Item(item) => item,
            NextItem::Exhausted => panic!("queue should not be empty"),
        };
        queue.restore_front(item);
        assert_eq!(word(queue.next_item()), "fox");

        // Bucket already dropped: a new one is recreated with the same label
        let mut queue = QueueManager::new(vec![WordBucket::new("A", false, ["fox"])]);
        let item = match queue.next_item() {
            NextItem::Item(item) => item,
            NextItem::Exhausted => panic!("queue should not be empty"),
        };
        queue.next_item();
        queue.restore_front(item);
        assert_eq!(queue.counts().remaining, vec![1]);
        assert_eq!(word(queue.next_item()), "fox");
    }

    #[test]
    fn test_counts() {
        let mut queue = QueueManager::new(vec![
            WordBucket::new("A", false, ["fox", "foxes"]),
            WordBucket::new("B", false, ["ox"]),
        ]);
        queue.next_item();
        queue.defer("fox");
        assert_eq!(queue.counts(), QueueCounts { deferred: 1, remaining: vec![1, 1] });
    }
}
