//! Profile decoding and schema definitions.
//!
//! This module handles:
//! - Decoding the binary allocation profile format
//! - Encoding profiles back into that format
//! - The in-memory profile model shared by every report

pub mod decoder;
pub mod encoder;
pub mod schema;

// Re-export main types
pub use decoder::decode;
pub use encoder::encode;
pub use schema::{FunctionId, FunctionTable, Profile, Sample};
