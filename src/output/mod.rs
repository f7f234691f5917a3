//! Output writers for reports, graphs and dumps.
//!
//! This module handles writing data to disk in various formats:
//! - JSON reports
//! - Rendered call graphs (PNG/SVG) and DOT text
//! - Detail dumps

pub mod artifact;
pub mod json;

// Re-export main functions
pub use artifact::{validate_path, write_artifact};
pub use json::{read_report, write_report};
