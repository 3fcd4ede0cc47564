//! In-memory backend
//!
//! Serves scripted data, records every call and can be told to fail
//! selected operations. Used by tests and offline demos.

use super::{Backend, BackendError, Operation};
use crate::models::{SenseContext, WordBucket, WordDetail, WorkerSession};
use async_trait::async_trait;
use morphseg_common::segmentation::boundaries_to_morphs;
use morphseg_common::TagKind;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Login { email: String, width: u32 },
    FetchQueue { uid: String },
    FetchWord { form: String },
    SplitSense { context_id: String },
    AuditReset { form: String },
    AuditBoundaryClick { index: usize },
    MarkNoise { form: String },
    MarkSkip { form: String },
    SubmitSegmentation {
        form: String,
        boundaries: Vec<bool>,
        contexts: BTreeMap<String, bool>,
    },
    SubmitFinal {
        form: String,
        boundaries: Vec<bool>,
        tags: Vec<TagKind>,
        contexts: BTreeMap<String, bool>,
    },
}

impl BackendCall {
    pub fn operation(&self) -> Operation {
        match self {
            BackendCall::Login { .. } => Operation::Login,
            BackendCall::FetchQueue { .. } => Operation::FetchQueue,
            BackendCall::FetchWord { .. } => Operation::FetchWord,
            BackendCall::SplitSense { .. } => Operation::SplitSense,
            BackendCall::AuditReset { .. } => Operation::AuditReset,
            BackendCall::AuditBoundaryClick { .. } => Operation::AuditBoundaryClick,
            BackendCall::MarkNoise { .. } => Operation::MarkNoise,
            BackendCall::MarkSkip { .. } => Operation::MarkSkip,
            BackendCall::SubmitSegmentation { .. } => Operation::SubmitSegmentation,
            BackendCall::SubmitFinal { .. } => Operation::SubmitFinal,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    workers: HashMap<String, WorkerSession>,
    buckets: Vec<WordBucket>,
    words: HashMap<String, WordDetail>,
    failing: HashSet<Operation>,
    calls: Vec<BackendCall>,
}

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the session returned when `email` logs in
    pub fn with_worker(self, email: impl Into<String>, session: WorkerSession) -> Self {
        self.lock().workers.insert(email.into(), session);
        self
    }

    pub fn with_bucket(self, bucket: WordBucket) -> Self {
        self.lock().buckets.push(bucket);
        self
    }

    /// Register a word with its suggested boundaries and contexts
    pub fn with_word(self, word: impl Into<String>, boundaries: Vec<bool>, contexts: Vec<SenseContext>) -> Self {
        let word = word.into();
        self.lock().words.insert(
            word.clone(),
            WordDetail {
                word,
                boundaries,
                contexts,
            },
        );
        self
    }

    /// Make every subsequent call of `op` fail with a network error
    pub fn fail(&self, op: Operation) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: Operation) {
        self.lock().failing.remove(&op);
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Calls of one operation, in order
    pub fn calls_of(&self, op: Operation) -> Vec<BackendCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation() == op)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the recorded calls
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a call and fail it if its operation is scripted to fail
    fn record(&self, call: BackendCall) -> Result<(), BackendError> {
        self.record_locked(call).map(drop)
    }

    /// Like `record`, keeping the state locked for the response
    fn record_locked(&self, call: BackendCall) -> Result<MutexGuard<'_, State>, BackendError> {
        let mut state = self.lock();
        let op = call.operation();
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(BackendError::Network(format!("{} unavailable", op)));
        }
        Ok(state)
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn login(&self, email: &str, width: u32) -> Result<WorkerSession, BackendError> {
        let state = self.record_locked(BackendCall::Login {
            email: email.to_string(),
            width,
        })?;
        Ok(state
            .workers
            .get(email)
            .cloned()
            .unwrap_or_else(|| WorkerSession::new(email, 0, 1)))
    }

    async fn fetch_queue(&self, uid: &str) -> Result<Vec<WordBucket>, BackendError> {
        let state = self.record_locked(BackendCall::FetchQueue {
            uid: uid.to_string(),
        })?;
        Ok(state.buckets.clone())
    }

    async fn fetch_word(&self, form: &str, _uid: &str) -> Result<WordDetail, BackendError> {
        let state = self.record_locked(BackendCall::FetchWord {
            form: form.to_string(),
        })?;
        state
            .words
            .get(form)
            .cloned()
            .ok_or_else(|| BackendError::Status(404, format!("Unknown word: {}", form)))
    }

    async fn split_sense(&self, context_id: &str, _uid: &str) -> Result<(), BackendError> {
        self.record(BackendCall::SplitSense {
            context_id: context_id.to_string(),
        })?;
        Ok(())
    }

    async fn audit_reset(&self, _uid: &str, form: &str) -> Result<(), BackendError> {
        self.record(BackendCall::AuditReset {
            form: form.to_string(),
        })?;
        Ok(())
    }

    async fn audit_boundary_click(&self, _uid: &str, index: usize) -> Result<(), BackendError> {
        self.record(BackendCall::AuditBoundaryClick { index })?;
        Ok(())
    }

    async fn mark_noise(&self, form: &str, _uid: &str) -> Result<(), BackendError> {
        self.record(BackendCall::MarkNoise {
            form: form.to_string(),
        })?;
        Ok(())
    }

    async fn mark_skip(&self, form: &str, _uid: &str) -> Result<(), BackendError> {
        self.record(BackendCall::MarkSkip {
            form: form.to_string(),
        })?;
        Ok(())
    }

    async fn submit_segmentation(
        &self,
        form: &str,
        _uid: &str,
        boundaries: &[bool],
        contexts: &BTreeMap<String, bool>,
    ) -> Result<Vec<String>, BackendError> {
        self.record(BackendCall::SubmitSegmentation {
            form: form.to_string(),
            boundaries: boundaries.to_vec(),
            contexts: contexts.clone(),
        })?;
        boundaries_to_morphs(form, boundaries).map_err(|e| BackendError::Status(400, e.to_string()))
    }

    async fn submit_final(
        &self,
        form: &str,
        _uid: &str,
        boundaries: &[bool],
        tags: &[TagKind],
        contexts: &BTreeMap<String, bool>,
    ) -> Result<(), BackendError> {
        self.record(BackendCall::SubmitFinal {
            form: form.to_string(),
            boundaries: boundaries.to_vec(),
            tags: tags.to_vec(),
            contexts: contexts.clone(),
        })?;
        Ok(())
    }
}
