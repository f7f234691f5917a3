//! Human- and machine-readable reports built from a decoded profile.
//!
//! - Text hot-spot ranking
//! - Detail dump of every sample
//! - JSON report

pub mod detail;
pub mod ranking;
pub mod schema;
pub mod summary;

pub use detail::format_detail;
pub use ranking::{format_ranking, RankingOptions};
pub use schema::{ProfileReport, ReportEntry};
pub use summary::to_report;
