//! Shared utilities, configuration, and error handling for Coursecraft
//!
//! This crate provides common functionality used across the Coursecraft workspace:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Request extractors (validated JSON, pagination)

pub mod config;
pub mod error;
pub mod extractors;
pub mod state;

pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
pub use state::StateError;
