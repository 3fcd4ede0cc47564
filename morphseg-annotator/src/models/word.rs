//! Word queue and per-word data

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Labeled group of word forms belonging to one annotation phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBucket {
    /// Phase label shown to the worker (e.g. "Training words")
    pub phase_label: String,
    /// Whether the backend suggests a segmentation for these words
    pub has_prediction: bool,
    /// Word forms still to annotate, front first
    pub forms: VecDeque<String>,
}

impl WordBucket {
    pub fn new<I, S>(phase_label: impl Into<String>, has_prediction: bool, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phase_label: phase_label.into(),
            has_prediction,
            forms: forms.into_iter().map(Into::into).collect(),
        }
    }
}

/// One usage example of a word form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseContext {
    pub left_text: String,
    pub right_text: String,
    pub context_id: String,
}

impl SenseContext {
    pub fn new(
        left_text: impl Into<String>,
        right_text: impl Into<String>,
        context_id: impl Into<String>,
    ) -> Self {
        Self {
            left_text: left_text.into(),
            right_text: right_text.into(),
            context_id: context_id.into(),
        }
    }
}

/// Fetch-word response: grapheme form, suggested boundaries, contexts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDetail {
    pub word: String,
    pub boundaries: Vec<bool>,
    pub contexts: Vec<SenseContext>,
}

/// Context split off a word as a distinct sense, waiting to be re-presented
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSense {
    /// Word form the context was split from
    pub word_type: String,
    /// Boundary vector the backend suggested for that word
    pub initial_boundaries: Vec<bool>,
    pub context: SenseContext,
}

/// Pending senses of one word form, re-surfaced together as one unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseUnit {
    pub word_type: String,
    pub initial_boundaries: Vec<bool>,
    pub contexts: Vec<SenseContext>,
}

impl SenseUnit {
    /// Group pending senses; all entries are expected to share one word form
    pub fn from_pending(senses: Vec<PendingSense>) -> Option<Self> {
        let first = senses.first()?;
        Some(Self {
            word_type: first.word_type.clone(),
            initial_boundaries: first.initial_boundaries.clone(),
            contexts: senses.into_iter().map(|s| s.context).collect(),
        })
    }

    /// Split the unit back into its pending senses (front first)
    pub fn into_pending(self) -> Vec<PendingSense> {
        let SenseUnit {
            word_type,
            initial_boundaries,
            contexts,
        } = self;
        contexts
            .into_iter()
            .map(|context| PendingSense {
                word_type: word_type.clone(),
                initial_boundaries: initial_boundaries.clone(),
                context,
            })
            .collect()
    }
}
