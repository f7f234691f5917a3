//! Configuration and constants for the decoder and report builders.

/// Length of the big-endian body-length header
pub const HEADER_LEN: usize = 4;

/// Function names longer than this are truncated when a profile is encoded
pub const MAX_FUNC_NAME_LEN: usize = 80;

/// Number of leading ranked entries highlighted in reports
pub const TOP_EMPHASIS: usize = 5;

// Call graph node/edge styling
pub const MIN_FONT_SIZE: f64 = 10.0;
pub const MIN_EDGE_WIDTH: f64 = 0.2;
pub const EDGE_WIDTH_SCALE: f64 = 8.0;

/// Name shown for ids referenced by a stack but missing from the function table
pub const UNRESOLVED_FUNCTION_NAME: &str = "<unresolved>";

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Layout program used when none is configured
pub const DEFAULT_RENDERER: &str = "dot";
