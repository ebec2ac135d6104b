//! # RankScout Common Library
//!
//! Shared code for the RankScout workspace:
//! - Error type used across crates
//! - TOML configuration model and root folder resolution
//! - Record and CSV cell helpers

pub mod config;
pub mod error;
pub mod record;

pub use error::{Error, Result};
pub use record::Record;
