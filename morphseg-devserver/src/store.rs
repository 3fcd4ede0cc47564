//! In-memory annotation store
//!
//! Tracks logged-in workers, which words each has annotated, and the
//! recorded annotations. Nothing is persisted.

use crate::corpus::{truncate_left, truncate_right, Corpus};
use chrono::{DateTime, Utc};
use morphseg_common::api::{LoginResponse, WordResponse, WordsResponse};
use morphseg_common::segmentation::boundaries_to_morphs;
use morphseg_common::TagKind;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, warn};

/// Minimum context width in characters
const MIN_CHAR_WIDTH: usize = 8;

/// How a final annotation relates to the suggested segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnnotationStatus {
    /// Same morphs as suggested
    Predicted,
    /// Differs from the suggestion
    Modified,
    /// No suggestion existed
    Eval,
    Nonword,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotationRecord {
    pub word: String,
    /// `morph/TAG` pairs separated by spaces, `!` for non-words
    pub analysis: String,
    pub status: AnnotationStatus,
    /// Context ids still attached to the word on submission
    pub contexts: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Annotator {
    email: String,
    char_width: usize,
    seen: HashSet<String>,
    records: Vec<AnnotationRecord>,
}

/// Store-level failures, mapped to HTTP errors by the handlers
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("User not logged in: {0}")]
    UnknownWorker(String),

    #[error("{0}")]
    InvalidSegmentation(String),
}

#[derive(Debug)]
pub struct DevStore {
    corpus: Corpus,
    annotators: HashMap<String, Annotator>,
}

/// Worker id: first 32 hex characters of SHA-256(email)
pub fn worker_id(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(32);
    hex
}

/// Context width in characters for a display width in pixels
pub fn char_width(display_width: u32) -> usize {
    MIN_CHAR_WIDTH.max((display_width as f64 * 0.02) as usize)
}

impl DevStore {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            annotators: HashMap::new(),
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn login(&mut self, email: &str, display_width: u32) -> LoginResponse {
        let uid = worker_id(email);
        let annotator = self.annotators.entry(uid.clone()).or_insert_with(|| {
            info!(uid = %uid, email = %email, "New worker");
            Annotator {
                email: email.to_string(),
                char_width: MIN_CHAR_WIDTH,
                seen: HashSet::new(),
                records: Vec::new(),
            }
        });
        annotator.char_width = char_width(display_width);

        LoginResponse {
            uid,
            annotated: annotator.seen.len() as u64,
            iteration: self.corpus.iteration,
        }
    }

    fn annotator(&self, uid: &str) -> Result<&Annotator, StoreError> {
        self.annotators
            .get(uid)
            .ok_or_else(|| StoreError::UnknownWorker(uid.to_string()))
    }

    fn annotator_mut(&mut self, uid: &str) -> Result<&mut Annotator, StoreError> {
        self.annotators
            .get_mut(uid)
            .ok_or_else(|| StoreError::UnknownWorker(uid.to_string()))
    }

    /// Words the worker has not annotated yet, per bucket
    ///
    /// Words annotated earlier in this run count towards a bucket's quota.
    pub fn queue(&self, uid: &str) -> Result<WordsResponse, StoreError> {
        let annotator = self.annotator(uid)?;
        let words = self
            .corpus
            .buckets
            .iter()
            .map(|bucket| {
                let mut quota = bucket.truncate;
                let mut forms = Vec::new();
                for word in &bucket.words {
                    if quota == Some(forms.len()) {
                        break;
                    }
                    if annotator.seen.contains(word) {
                        quota = quota.map(|q| q.saturating_sub(1));
                        continue;
                    }
                    forms.push(word.clone());
                }
                if let Some(q) = quota {
                    forms.truncate(q);
                }
                (bucket.label.clone(), bucket.has_prediction, forms)
            })
            .collect();
        Ok(WordsResponse { words })
    }

    /// Suggested boundaries and contexts sized to the worker's display
    pub fn word(&self, uid: &str, word: &str) -> Result<WordResponse, StoreError> {
        let width = self.annotator(uid)?.char_width;
        let mut contexts: Vec<_> = self
            .corpus
            .contexts_of(word)
            .map(|c| {
                (
                    truncate_left(&c.left, width),
                    truncate_right(&c.right, width),
                    c.id.clone(),
                )
            })
            .collect();
        if contexts.is_empty() {
            contexts.push((String::new(), String::new(), "0".to_string()));
        }

        Ok(WordResponse {
            word: word.to_string(),
            boundaries: self.corpus.suggested_boundaries(word),
            contexts,
        })
    }

    /// Apply a boundary vector to a word
    pub fn segment(&self, word: &str, boundaries: &[bool]) -> Result<Vec<String>, StoreError> {
        boundaries_to_morphs(word, boundaries).map_err(|e| StoreError::InvalidSegmentation(e.to_string()))
    }

    /// Record a final annotation
    pub fn record_final(
        &mut self,
        uid: &str,
        word: &str,
        boundaries: &[bool],
        tags: &[TagKind],
        contexts: &BTreeMap<String, bool>,
    ) -> Result<AnnotationRecord, StoreError> {
        let morphs = self.segment(word, boundaries)?;
        if morphs.len() != tags.len() {
            warn!(uid = %uid, word = %word, morphs = ?morphs, tags = ?tags, "Morph/tag count mismatch");
        }
        let analysis = morphs
            .iter()
            .zip(tags)
            .map(|(morph, tag)| format!("{}/{}", morph, tag))
            .collect::<Vec<_>>()
            .join(" ");
        let status = match self.corpus.suggestion(word) {
            Some(suggested) if suggested == morphs.as_slice() => AnnotationStatus::Predicted,
            Some(_) => AnnotationStatus::Modified,
            None => AnnotationStatus::Eval,
        };
        let record = AnnotationRecord {
            word: word.to_string(),
            analysis,
            status,
            contexts: contexts
                .iter()
                .filter(|(_, active)| **active)
                .map(|(id, _)| id.clone())
                .collect(),
            recorded_at: Utc::now(),
        };

        let annotator = self.annotator_mut(uid)?;
        annotator.seen.insert(word.to_string());
        annotator.records.push(record.clone());
        info!(uid = %uid, word = %word, analysis = %record.analysis, status = ?status, "Annotation recorded");
        Ok(record)
    }

    pub fn record_nonword(&mut self, uid: &str, word: &str) -> Result<AnnotationRecord, StoreError> {
        let record = AnnotationRecord {
            word: word.to_string(),
            analysis: "!".to_string(),
            status: AnnotationStatus::Nonword,
            contexts: Vec::new(),
            recorded_at: Utc::now(),
        };
        let annotator = self.annotator_mut(uid)?;
        annotator.seen.insert(word.to_string());
        annotator.records.push(record.clone());
        info!(uid = %uid, word = %word, "Non-word recorded");
        Ok(record)
    }

    pub fn annotations(&self, uid: &str) -> Result<&[AnnotationRecord], StoreError> {
        Ok(&self.annotator(uid)?.records)
    }

    /// Email a worker logged in with
    pub fn email(&self, uid: &str) -> Result<&str, StoreError> {
        Ok(&self.annotator(uid)?.email)
    }
}
