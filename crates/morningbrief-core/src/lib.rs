//! `morningbrief-core` — shared configuration and error types.

pub mod config;
pub mod error;

pub use config::MorningBriefConfig;
pub use error::{CoreError, Result};
