//! Worker-facing message catalogue
//!
//! Every text the session controller shows the worker comes from here. All
//! fields have English defaults and can be overridden from the `[ui]` table
//! of a TOML configuration file, e.g. to run the tool in the annotators'
//! own language. Watch capitalisation, whitespace and punctuation when
//! overriding: the strings are concatenated as-is.

use serde::Deserialize;

/// UI strings used in notices and status lines
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiStrings {
    /// Header of the phase-change notice
    pub next_phase: String,
    /// Explanation for buckets that come with a suggested segmentation
    pub pred: String,
    /// Explanation for buckets without suggestions
    pub no_pred: String,
    /// Phase label while revisiting skipped words
    pub skipped: String,
    pub skipped_expl: String,
    /// Phase label once everything has been annotated
    pub iter_done: String,
    pub thanks: String,
    /// Tagging incomplete
    pub tag_all: String,
    /// Prefix immediately followed by suffix
    pub illegal: String,
    /// Submission blocked because every context was split off
    pub no_contexts: String,
    /// Word could not be fetched
    pub fetch_failed: String,
    /// Shown when the session is exhausted
    pub done: String,
    pub cur_iter: String,
    pub cur_phase: String,
    pub c_annot: String,
    pub c_skip: String,
    pub c_rem: String,
}

impl Default for UiStrings {
    fn default() -> Self {
        Self {
            next_phase: "Next phase: ".to_string(),
            pred: "The segmentation of the current model is given as a suggestion.".to_string(),
            no_pred: "No segmentation is suggested for these words.".to_string(),
            skipped: "Skipped words".to_string(),
            skipped_expl: "Asks again the words you skipped.".to_string(),
            iter_done: "The iteration has ended".to_string(),
            thanks: "Thank you for your help!".to_string(),
            tag_all: "Choose a tag for every morph".to_string(),
            illegal: "A prefix (PRE) can not be immediately followed by a suffix (SUF).".to_string(),
            no_contexts: "Every usage example was split off as a different sense; skip the word or mark it as a non-word.".to_string(),
            fetch_failed: "Error in retrieving the next word to annotate".to_string(),
            done: "That was all for this iteration. Thank you!".to_string(),
            cur_iter: "Iteration: ".to_string(),
            cur_phase: "Phase: ".to_string(),
            c_annot: "Annotated: ".to_string(),
            c_skip: ", skipped: ".to_string(),
            c_rem: ", remaining: ".to_string(),
        }
    }
}

impl UiStrings {
    /// Text of the one-time notice shown when the phase changes
    pub fn phase_notice(&self, label: &str, explanation: &str) -> String {
        format!("{}{}\n\n{}", self.next_phase, label, explanation)
    }

    /// Top status row: iteration and phase
    pub fn status_header(&self, iteration: u32, phase: &str) -> String {
        format!("{}{}. {}{}.", self.cur_iter, iteration, self.cur_phase, phase)
    }

    /// Bottom status row: annotated, skipped and remaining counts
    pub fn status_counts(&self, annotated: u64, skipped: usize, remaining: &[usize]) -> String {
        let remaining = remaining
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        format!("{}{}{}{}{}{}", self.c_annot, annotated, self.c_skip, skipped, self.c_rem, remaining)
    }
}
