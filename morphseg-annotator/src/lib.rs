//! # morphseg annotator
//!
//! Annotation session core for morph segmentation and tagging: the worker
//! is shown a word, proposes morph boundaries, separates distinct senses of
//! the word and tags each morph as prefix, stem or suffix.
//!
//! - [`tagging`]: tag legality checking
//! - [`workspace`]: per-word work in progress
//! - [`queue`]: what comes next (buckets, skipped words, split-off senses)
//! - [`session`]: the session state machine
//! - [`backend`]: the annotation store port, over HTTP or in memory
//! - [`view`]: the presentation port

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod queue;
pub mod session;
pub mod tagging;
pub mod terminal;
pub mod view;
pub mod workspace;

pub use crate::error::{Result, SessionError, WorkspaceError};
pub use crate::session::{SessionConfig, SessionController, SessionState};
