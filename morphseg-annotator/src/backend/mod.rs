//! Backend port
//!
//! The annotation store the session talks to. Every call is a suspension
//! point of the session; nothing else in the core awaits.

use crate::models::{WordBucket, WordDetail, WorkerSession};
use async_trait::async_trait;
use morphseg_common::TagKind;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub mod http;
pub mod memory;

pub use http::HttpBackend;
pub use memory::{BackendCall, InMemoryBackend};

/// Backend call failure
///
/// Every variant is non-fatal for the session: the failed step is reported
/// to the worker and can be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Backend operations, used to name calls in logs and test scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    FetchQueue,
    FetchWord,
    SplitSense,
    AuditReset,
    AuditBoundaryClick,
    MarkNoise,
    MarkSkip,
    SubmitSegmentation,
    SubmitFinal,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::FetchQueue => "fetch_queue",
            Operation::FetchWord => "fetch_word",
            Operation::SplitSense => "split_sense",
            Operation::AuditReset => "audit_reset",
            Operation::AuditBoundaryClick => "audit_boundary_click",
            Operation::MarkNoise => "mark_noise",
            Operation::MarkSkip => "mark_skip",
            Operation::SubmitSegmentation => "submit_segmentation",
            Operation::SubmitFinal => "submit_final",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annotation backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Log a worker in; `width` is the client display width in pixels
    async fn login(&self, email: &str, width: u32) -> Result<WorkerSession, BackendError>;

    /// Word queue of the worker, front bucket first
    async fn fetch_queue(&self, uid: &str) -> Result<Vec<WordBucket>, BackendError>;

    /// Grapheme form, suggested boundaries and usage contexts of a word
    async fn fetch_word(&self, form: &str, uid: &str) -> Result<WordDetail, BackendError>;

    async fn split_sense(&self, context_id: &str, uid: &str) -> Result<(), BackendError>;

    async fn audit_reset(&self, uid: &str, form: &str) -> Result<(), BackendError>;

    async fn audit_boundary_click(&self, uid: &str, index: usize) -> Result<(), BackendError>;

    async fn mark_noise(&self, form: &str, uid: &str) -> Result<(), BackendError>;

    async fn mark_skip(&self, form: &str, uid: &str) -> Result<(), BackendError>;

    /// Send a proposed segmentation; returns the backend's morph split
    async fn submit_segmentation(
        &self,
        form: &str,
        uid: &str,
        boundaries: &[bool],
        contexts: &BTreeMap<String, bool>,
    ) -> Result<Vec<String>, BackendError>;

    /// Store the final annotation of a word
    async fn submit_final(
        &self,
        form: &str,
        uid: &str,
        boundaries: &[bool],
        tags: &[TagKind],
        contexts: &BTreeMap<String, bool>,
    ) -> Result<(), BackendError>;
}
