//! Error types for morphseg-annotator

use crate::backend::BackendError;
use morphseg_common::TagKind;
use thiserror::Error;

/// Workspace construction and edit errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    /// Boundary vector length does not match the word; the backend broke its contract
    #[error("Boundary vector for '{word}' has {actual} slots, expected {expected}")]
    InvalidShape {
        word: String,
        expected: usize,
        actual: usize,
    },

    /// Boundary index outside the word
    #[error("Boundary index {index} out of range (0..{len})")]
    Index { index: usize, len: usize },
}

/// Session controller command errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Command not available in the current state
    #[error("Can not {action} while in state {state}")]
    InvalidState {
        state: &'static str,
        action: &'static str,
    },

    /// Submission gated off (no active contexts, tags incomplete or illegal)
    #[error("Submission blocked: {0}")]
    SubmissionBlocked(String),

    #[error("Tag {tag} can not be selected for morph {morph}")]
    TagNotSelectable { morph: usize, tag: TagKind },

    #[error("Not logged in")]
    NotLoggedIn,
}

impl SessionError {
    /// Failed backend call, as opposed to a rejected command
    pub fn is_backend(&self) -> bool {
        matches!(self, SessionError::Backend(_))
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
