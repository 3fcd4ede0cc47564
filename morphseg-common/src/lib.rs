//! # morphseg common library
//!
//! Shared code for the morph-segmentation annotation tools:
//! - Wire types of the annotation backend API
//! - Morph tag kinds
//! - Boundary vector / morph sequence conversion
//! - Worker-facing message catalogue
//! - Configuration file resolution

pub mod api;
pub mod config;
pub mod error;
pub mod messages;
pub mod segmentation;
pub mod tags;

pub use error::{Error, Result};
pub use messages::UiStrings;
pub use tags::TagKind;
