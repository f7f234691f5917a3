//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::parser::schema::FunctionId;
use thiserror::Error;

/// Errors that can occur while decoding or encoding the binary profile format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("buffer of {len} bytes is shorter than the 4-byte header")]
    HeaderTooShort { len: usize },

    #[error("declared body length {declared} does not match actual body length {actual}")]
    LengthMismatch { declared: u32, actual: usize },

    #[error("truncated {what} at offset {offset}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("profile body of {len} bytes does not fit the 32-bit length header")]
    BodyTooLarge { len: usize },

    #[error("{what} count {count} does not fit in 32 bits")]
    CountOverflow { what: &'static str, count: usize },
}

/// Errors raised while turning aggregated data into reports
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("profile has no data: total selected volume is zero")]
    EmptyProfile,

    #[error("function id {0} is not present in the function table")]
    UnresolvedFunctionId(FunctionId),
}

/// Errors from the external graph layout program
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to launch renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("IO error while talking to renderer: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
