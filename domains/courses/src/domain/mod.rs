//! Domain layer for Courses
//!
//! Entities plus the pure rules that gate writes: publish readiness,
//! chapter reordering, and the chapter video lifecycle.

pub mod entities;
pub mod readiness;
pub mod reorder;
pub mod state;
