//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod inspect;
pub mod report;
pub mod utils;

// Re-export main command functions
pub use inspect::{execute_inspect, summarize, ProfileSummary};
pub use report::{execute_report, execute_report_with, validate_args, ReportArgs, ReportOutcome};
pub use utils::load_profile;
