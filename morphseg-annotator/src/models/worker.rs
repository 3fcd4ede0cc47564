//! Worker session (one per login)

use serde::{Deserialize, Serialize};

/// Logged-in worker
///
/// Created from the login response; lives until the session is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSession {
    /// Opaque worker identifier issued by the backend
    pub id: String,
    /// Words annotated so far (incremented on every accepted tag submission)
    pub completed_count: u64,
    /// Annotation iteration the backend placed this worker in
    pub iteration: u32,
}

impl WorkerSession {
    pub fn new(id: impl Into<String>, completed_count: u64, iteration: u32) -> Self {
        Self {
            id: id.into(),
            completed_count,
            iteration,
        }
    }

    /// Count one more finished annotation
    pub fn record_submission(&mut self) {
        self.completed_count += 1;
    }
}
