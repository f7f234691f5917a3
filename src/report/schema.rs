//! Output JSON schema definitions for report data.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::ranker::RankBy;
use crate::aggregator::stats::AccountingMode;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    pub mode: AccountingMode,
    pub rank_by: RankBy,

    /// Sum of all flat volume under `mode`
    pub total_bytes: i64,
    pub total_objects: i64,

    pub sample_count: usize,
    pub function_count: usize,

    /// Functions in ranking order
    pub entries: Vec<ReportEntry>,
}

/// One ranked function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub rank: usize,
    pub function_id: u64,
    pub name: String,
    pub flat_bytes: i64,
    pub flat_objects: i64,
    pub cumulative_bytes: i64,
    pub cumulative_objects: i64,

    /// Absent when the total volume is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_percentage: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_percentage: Option<f64>,

    pub emphasized: bool,
}
