//! Upload rules and object key naming

pub mod keys;
pub mod rules;
