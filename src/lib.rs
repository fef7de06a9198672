//! Deterministic rendering of structured rich-text documents.
//!
//! Content arrives as a JSON document tree, a JSON-encoded string of one, a
//! legacy HTML string, or nothing. [`application::render`] turns any of these
//! into a presentational output tree and reports whether the content is
//! long. Rendering never fails: malformed input degrades to markup or to a
//! fallback notice.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
