//! Word workspace
//!
//! Mutable annotation state of the word currently being segmented: its
//! boundary vector and which usage contexts are still attached to it.
//! A new workspace is built for every word and dropped on submission, skip
//! or noise marking.

use crate::error::WorkspaceError;
use crate::models::{PendingSense, SenseContext, SenseUnit, WordDetail};
use morphseg_common::segmentation::{boundaries_to_morphs, boundary_slots, char_len};
use std::collections::BTreeMap;
use tracing::debug;

/// Immutable view of a workspace, as transmitted to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSnapshot {
    pub word_type: String,
    pub boundaries: Vec<bool>,
    pub contexts: BTreeMap<String, bool>,
}

#[derive(Debug, Clone)]
pub struct WordWorkspace {
    word_type: String,
    initial_boundaries: Vec<bool>,
    boundaries: Vec<bool>,
    /// Contexts in presentation order
    rows: Vec<SenseContext>,
    /// context id -> still attached to this word
    contexts: BTreeMap<String, bool>,
}

impl WordWorkspace {
    /// Create a workspace for `word_type` starting from `initial_boundaries`
    ///
    /// Fails with `InvalidShape` unless the vector has `len(word_type) - 1`
    /// entries. The empty word has no valid shape.
    pub fn create(
        word_type: impl Into<String>,
        initial_boundaries: Vec<bool>,
        contexts: Vec<SenseContext>,
    ) -> Result<Self, WorkspaceError> {
        let word_type = word_type.into();
        let expected = boundary_slots(&word_type);
        if expected != Some(initial_boundaries.len()) {
            return Err(WorkspaceError::InvalidShape {
                word: word_type,
                expected: expected.unwrap_or(0),
                actual: initial_boundaries.len(),
            });
        }

        let contexts_map = contexts
            .iter()
            .map(|c| (c.context_id.clone(), true))
            .collect();

        Ok(Self {
            word_type,
            boundaries: initial_boundaries.clone(),
            initial_boundaries,
            rows: contexts,
            contexts: contexts_map,
        })
    }

    /// Workspace for a freshly fetched word
    pub fn from_detail(detail: WordDetail) -> Result<Self, WorkspaceError> {
        Self::create(detail.word, detail.boundaries, detail.contexts)
    }

    /// Workspace for a re-surfaced group of split-off senses
    pub fn from_sense_unit(unit: SenseUnit) -> Result<Self, WorkspaceError> {
        Self::create(unit.word_type, unit.initial_boundaries, unit.contexts)
    }

    pub fn word_type(&self) -> &str {
        &self.word_type
    }

    pub fn boundaries(&self) -> &[bool] {
        &self.boundaries
    }

    pub fn initial_boundaries(&self) -> &[bool] {
        &self.initial_boundaries
    }

    /// Flip the boundary between character `index` and `index + 1`
    ///
    /// Returns the new value of the slot.
    pub fn toggle_boundary(&mut self, index: usize) -> Result<bool, WorkspaceError> {
        let len = self.boundaries.len();
        let slot = self
            .boundaries
            .get_mut(index)
            .ok_or(WorkspaceError::Index { index, len })?;
        *slot = !*slot;
        debug!(word = %self.word_type, index, value = *slot, "Boundary toggled");
        Ok(*slot)
    }

    /// Clear every set boundary
    ///
    /// Returns the indices that were cleared, in ascending order, so the
    /// caller can report each one exactly as an individual toggle.
    pub fn reset_all(&mut self) -> Vec<usize> {
        let cleared: Vec<usize> = self
            .boundaries
            .iter()
            .enumerate()
            .filter_map(|(i, set)| set.then_some(i))
            .collect();
        for &i in &cleared {
            self.boundaries[i] = false;
        }
        cleared
    }

    /// Detach a context as a distinct sense
    ///
    /// Returns the pending sense to be queued, or `None` if the id is
    /// unknown or was already split off.
    pub fn split_off_context(&mut self, context_id: &str) -> Option<PendingSense> {
        let active = self.contexts.get_mut(context_id)?;
        if !*active {
            return None;
        }
        let context = self
            .rows
            .iter()
            .find(|c| c.context_id == context_id)?
            .clone();
        *active = false;

        debug!(word = %self.word_type, context_id, "Context split off");
        Some(PendingSense {
            word_type: self.word_type.clone(),
            initial_boundaries: self.initial_boundaries.clone(),
            context,
        })
    }

    /// Contexts still attached to the word, in presentation order
    pub fn active_contexts(&self) -> impl Iterator<Item = &SenseContext> + '_ {
        self.rows
            .iter()
            .filter(|c| self.contexts.get(&c.context_id).copied().unwrap_or(false))
    }

    pub fn active_count(&self) -> usize {
        self.contexts.values().filter(|active| **active).count()
    }

    /// All contexts with their attachment flag, in presentation order
    pub fn context_rows(&self) -> impl Iterator<Item = (&SenseContext, bool)> + '_ {
        self.rows.iter().map(|c| {
            let active = self.contexts.get(&c.context_id).copied().unwrap_or(false);
            (c, active)
        })
    }

    /// Splitting senses only makes sense with more than one context
    pub fn split_allowed(&self) -> bool {
        self.rows.len() > 1
    }

    /// Submission needs at least one attached context
    pub fn can_submit(&self) -> bool {
        self.active_count() > 0
    }

    /// Current boundaries applied to the word
    pub fn morphs(&self) -> Vec<String> {
        // Shape is checked on creation and preserved by every edit
        boundaries_to_morphs(&self.word_type, &self.boundaries)
            .unwrap_or_else(|_| vec![self.word_type.clone()])
    }

    pub fn char_count(&self) -> usize {
        char_len(&self.word_type)
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            word_type: self.word_type.clone(),
            boundaries: self.boundaries.clone(),
            contexts: self.contexts.clone(),
        }
    }
}
