//! Assemble the serialisable report from an aggregation.

use super::schema::{ProfileReport, ReportEntry};
use crate::aggregator::ranker::{rank, RankBy};
use crate::aggregator::stats::Aggregation;
use crate::parser::schema::Profile;
use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use log::debug;

/// Convert an aggregation into the JSON report format
///
/// **Public** - used by commands to create final output
pub fn to_report(profile: &Profile, aggregation: &Aggregation, by: RankBy) -> ProfileReport {
    let entries: Vec<ReportEntry> = rank(aggregation, by)
        .into_iter()
        .map(|entry| ReportEntry {
            rank: entry.rank,
            function_id: entry.function_id.0,
            name: profile
                .functions
                .display_name(entry.function_id)
                .into_owned(),
            flat_bytes: entry.flat.bytes,
            flat_objects: entry.flat.objects,
            cumulative_bytes: entry.cumulative.bytes,
            cumulative_objects: entry.cumulative.objects,
            flat_percentage: aggregation.percentage(entry.flat.bytes),
            cumulative_percentage: aggregation.percentage(entry.cumulative.bytes),
            emphasized: entry.emphasized,
        })
        .collect();

    debug!("Report holds {} entries", entries.len());

    ProfileReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        mode: aggregation.mode,
        rank_by: by,
        total_bytes: aggregation.total.bytes,
        total_objects: aggregation.total.objects,
        sample_count: profile.samples.len(),
        function_count: profile.functions.len(),
        entries,
    }
}
