//! Domain layer types and invariants.

pub mod content;
pub mod document;
pub mod error;
