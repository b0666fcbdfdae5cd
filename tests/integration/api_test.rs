//! API endpoint integration tests
//!
//! Router-level tests for the courses and uploads domains. Tests that only
//! exercise authentication or uploads run against a lazy pool; tests that
//! read or write course data need a migrated database and are ignored by
//! default.

#![allow(dead_code)]

mod attachments;
mod categories;
mod chapters;
mod common;
mod courses;
mod uploads;
