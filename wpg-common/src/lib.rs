//! # WPG Common Library
//!
//! Shared code for the Wantumeni post generator tools:
//! - Hashtag normalization and tag-set rendering
//! - Caption templates and post composition
//! - Post and analytics logs (comma-delimited, full-rewrite)
//! - Weekly engagement digest
//! - Configuration loading

pub mod compose;
pub mod config;
pub mod digest;
pub mod error;
pub mod logs;
pub mod records;
pub mod store;
pub mod tags;
pub mod time;
pub mod workspace;

pub use error::{Error, Result};
pub use workspace::Workspace;
