//! Aggregation of decoded samples into per-function statistics.
//!
//! This module transforms a decoded profile into:
//! - Flat (self) and cumulative volume per function
//! - A ranked hot-spot ordering

pub mod ranker;
pub mod stats;

// Re-export main types and functions
pub use ranker::{rank, RankBy, RankedEntry};
pub use stats::{aggregate, selected_volume, AccountingMode, Aggregation, Stat};
