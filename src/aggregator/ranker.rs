//! Ranking of aggregated functions by volume.
//!
//! Entries are ordered by bytes descending, then objects descending, then id
//! ascending so the order is total and reproducible.

use super::stats::{Aggregation, Stat};
use crate::parser::schema::FunctionId;
use crate::utils::config::TOP_EMPHASIS;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Which statistic drives the ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    #[default]
    Flat,
    #[value(alias = "cum")]
    Cumulative,
}

impl fmt::Display for RankBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankBy::Flat => write!(f, "flat"),
            RankBy::Cumulative => write!(f, "cumulative"),
        }
    }
}

/// One ranked function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub function_id: FunctionId,

    /// The volume the ranking was computed on
    pub stat: Stat,

    /// Self volume (zero for frames that were never a leaf)
    pub flat: Stat,

    pub cumulative: Stat,

    /// 1-based position
    pub rank: usize,

    /// Within the top entries and carrying positive volume
    pub emphasized: bool,
}

/// Order by bytes, then objects, both descending
pub fn compare_volume(a: &Stat, b: &Stat) -> Ordering {
    b.bytes.cmp(&a.bytes).then_with(|| b.objects.cmp(&a.objects))
}

/// Rank the functions of an aggregation
///
/// **Public** - main entry point for ranking
///
/// When ranking by flat volume, frames that only ever appeared as ancestors
/// follow all flat-bearing frames, ordered among themselves by cumulative volume.
pub fn rank(aggregation: &Aggregation, by: RankBy) -> Vec<RankedEntry> {
    let ordered: Vec<(FunctionId, Stat)> = match by {
        RankBy::Flat => {
            let mut leaves = sorted(aggregation.flat.iter().map(|(id, s)| (*id, *s)));
            let ancestors = sorted(
                aggregation
                    .cumulative
                    .iter()
                    .filter(|(id, _)| !aggregation.flat.contains_key(*id))
                    .map(|(id, s)| (*id, *s)),
            );
            // Ancestor-only frames contribute no flat volume of their own
            leaves.extend(ancestors.into_iter().map(|(id, _)| (id, Stat::default())));
            leaves
        }
        RankBy::Cumulative => {
            sorted(aggregation.cumulative.iter().map(|(id, s)| (*id, *s)))
        }
    };

    let entries: Vec<RankedEntry> = ordered
        .into_iter()
        .enumerate()
        .map(|(index, (function_id, stat))| RankedEntry {
            function_id,
            stat,
            flat: aggregation.flat_of(function_id),
            cumulative: aggregation.cumulative_of(function_id),
            rank: index + 1,
            emphasized: index < TOP_EMPHASIS && stat.bytes > 0,
        })
        .collect();

    debug!("Ranked {} functions by {}", entries.len(), by);
    entries
}

fn sorted(items: impl Iterator<Item = (FunctionId, Stat)>) -> Vec<(FunctionId, Stat)> {
    let mut items: Vec<_> = items.collect();
    items.sort_by(|(a_id, a), (b_id, b)| compare_volume(a, b).then_with(|| a_id.cmp(b_id)));
    items
}
