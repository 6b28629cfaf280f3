//! JSON helpers for fixtures and run reports.
//!
//! Reports are written with 2-space indentation and a trailing newline so
//! successive runs diff cleanly.

mod json;

pub use json::{SerializationError, from_json, from_json_bytes, to_json_stable};
