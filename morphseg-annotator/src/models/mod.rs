//! Annotation session data model

mod word;
mod worker;

pub use word::{PendingSense, SenseContext, SenseUnit, WordBucket, WordDetail};
pub use worker::WorkerSession;
