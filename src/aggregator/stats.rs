//! Per-function flat and cumulative allocation statistics.
//!
//! Flat volume goes to the leaf frame of each sample. Cumulative volume goes
//! to every distinct frame of the stack, once per sample, so recursive frames
//! are not counted twice.

use crate::parser::schema::{FunctionId, Profile, Sample};
use crate::utils::error::ReportError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::AddAssign;

/// Which volume a sample contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AccountingMode {
    /// Raw allocation volume, ignoring frees
    Allocated,
    /// Allocated minus freed volume (live memory)
    #[default]
    #[value(name = "inuse")]
    #[serde(rename = "inuse")]
    InUse,
}

impl fmt::Display for AccountingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountingMode::Allocated => write!(f, "alloc"),
            AccountingMode::InUse => write!(f, "inuse"),
        }
    }
}

/// Byte and object volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stat {
    pub bytes: i64,
    pub objects: i64,
}

impl Stat {
    pub fn new(bytes: i64, objects: i64) -> Self {
        Self { bytes, objects }
    }
}

impl AddAssign for Stat {
    fn add_assign(&mut self, rhs: Self) {
        self.bytes += rhs.bytes;
        self.objects += rhs.objects;
    }
}

/// Volume a sample contributes under `mode`, or `None` when it must be skipped
///
/// Fully freed samples (net bytes == 0) are skipped in in-use mode. Negative
/// net volume is passed through unclamped.
pub fn selected_volume(sample: &Sample, mode: AccountingMode) -> Option<Stat> {
    match mode {
        AccountingMode::Allocated => Some(Stat::new(
            i64::from(sample.alloc_bytes),
            i64::from(sample.alloc_objects),
        )),
        AccountingMode::InUse => {
            let net_bytes = sample.net_bytes();
            if net_bytes == 0 {
                None
            } else {
                Some(Stat::new(net_bytes, sample.net_objects()))
            }
        }
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub mode: AccountingMode,

    /// Self volume, keyed by leaf frame
    pub flat: BTreeMap<FunctionId, Stat>,

    /// Self plus descendants volume, keyed by every frame that appeared on a stack
    pub cumulative: BTreeMap<FunctionId, Stat>,

    /// Sum of all flat contributions
    pub total: Stat,

    /// Samples that contributed
    pub samples_counted: usize,

    /// Samples skipped (empty stack, or fully freed in in-use mode)
    pub samples_skipped: usize,
}

impl Aggregation {
    pub fn flat_of(&self, id: FunctionId) -> Stat {
        self.flat.get(&id).copied().unwrap_or_default()
    }

    pub fn cumulative_of(&self, id: FunctionId) -> Stat {
        self.cumulative.get(&id).copied().unwrap_or_default()
    }

    pub fn has_data(&self) -> bool {
        self.total.bytes != 0
    }

    /// Total bytes, failing when there is nothing to take a percentage of
    pub fn require_data(&self) -> Result<i64, ReportError> {
        if self.has_data() {
            Ok(self.total.bytes)
        } else {
            Err(ReportError::EmptyProfile)
        }
    }

    /// Share of the total in percent, `None` when the total is zero
    pub fn percentage(&self, bytes: i64) -> Option<f64> {
        self.require_data()
            .ok()
            .map(|total| bytes as f64 * 100.0 / total as f64)
    }
}

/// Compute flat and cumulative statistics for every function in `profile`
///
/// **Public** - main entry point for aggregation
///
/// Never fails: degenerate samples are skipped and an empty profile yields
/// empty maps with a zero total.
pub fn aggregate(profile: &Profile, mode: AccountingMode) -> Aggregation {
    debug!(
        "Aggregating {} samples in {} mode",
        profile.samples.len(),
        mode
    );

    let mut aggregation = Aggregation {
        mode,
        ..Aggregation::default()
    };
    let mut seen: HashSet<FunctionId> = HashSet::new();

    for sample in &profile.samples {
        let Some(leaf) = sample.leaf() else {
            debug!("Skipping sample with empty stack");
            aggregation.samples_skipped += 1;
            continue;
        };
        let Some(volume) = selected_volume(sample, mode) else {
            aggregation.samples_skipped += 1;
            continue;
        };

        *aggregation.flat.entry(leaf).or_default() += volume;
        aggregation.total += volume;

        seen.clear();
        for &frame in &sample.stack {
            if seen.insert(frame) {
                *aggregation.cumulative.entry(frame).or_default() += volume;
            }
        }

        aggregation.samples_counted += 1;
    }

    debug!(
        "Aggregated {} samples ({} skipped): {} bytes, {} objects across {} functions",
        aggregation.samples_counted,
        aggregation.samples_skipped,
        aggregation.total.bytes,
        aggregation.total.objects,
        aggregation.cumulative.len()
    );

    aggregation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::FunctionTable;

    const F1: FunctionId = FunctionId(1);
    const F2: FunctionId = FunctionId(2);
    const F3: FunctionId = FunctionId(3);

    fn profile(samples: Vec<Sample>) -> Profile {
        Profile::new(FunctionTable::new(), samples)
    }

    #[test]
    fn test_fully_freed_sample_in_use_contributes_nothing() {
        let p = profile(vec![Sample::new(4, 1000, 4, 1000, vec![F1, F2])]);

        let agg = aggregate(&p, AccountingMode::InUse);
        assert!(agg.flat.is_empty());
        assert!(agg.cumulative.is_empty());
        assert_eq!(agg.total, Stat::default());
        assert_eq!(agg.samples_skipped, 1);
    }

    #[test]
    fn test_fully_freed_sample_allocated_mode() {
        let p = profile(vec![Sample::new(4, 1000, 4, 1000, vec![F1, F2])]);

        let agg = aggregate(&p, AccountingMode::Allocated);
        assert_eq!(agg.flat_of(F1), Stat::new(1000, 4));
        assert_eq!(agg.flat_of(F2), Stat::default());
        assert_eq!(agg.cumulative_of(F1), Stat::new(1000, 4));
        assert_eq!(agg.cumulative_of(F2), Stat::new(1000, 4));
    }

    #[test]
    fn test_recursive_frame_counted_once() {
        let p = profile(vec![Sample::new(1, 500, 0, 0, vec![F1, F1, F2])]);

        let agg = aggregate(&p, AccountingMode::InUse);
        assert_eq!(agg.cumulative_of(F1).bytes, 500);
        assert_eq!(agg.cumulative_of(F2).bytes, 500);
        assert_eq!(agg.flat_of(F1).bytes, 500);
    }

    #[test]
    fn test_ancestor_only_frame_has_zero_flat() {
        let p = profile(vec![Sample::new(1, 64, 0, 0, vec![F1, F2, F3])]);

        let agg = aggregate(&p, AccountingMode::Allocated);
        assert!(!agg.flat.contains_key(&F3));
        assert_eq!(agg.cumulative_of(F3).bytes, 64);
    }

    #[test]
    fn test_negative_net_volume_is_not_clamped() {
        let p = profile(vec![
            Sample::new(1, 100, 2, 300, vec![F1]),
            Sample::new(1, 50, 0, 0, vec![F1]),
        ]);

        let agg = aggregate(&p, AccountingMode::InUse);
        assert_eq!(agg.flat_of(F1), Stat::new(-150, 0));
        assert_eq!(agg.total.bytes, -150);
    }

    #[test]
    fn test_empty_stack_is_skipped() {
        let p = profile(vec![
            Sample::new(1, 10, 0, 0, vec![]),
            Sample::new(1, 20, 0, 0, vec![F2]),
        ]);

        let agg = aggregate(&p, AccountingMode::Allocated);
        assert_eq!(agg.total.bytes, 20);
        assert_eq!(agg.samples_counted, 1);
        assert_eq!(agg.samples_skipped, 1);
    }

    #[test]
    fn test_percentage_requires_data() {
        let agg = aggregate(&profile(vec![]), AccountingMode::InUse);
        assert_eq!(agg.percentage(10), None);
        assert_eq!(agg.require_data(), Err(ReportError::EmptyProfile));

        let agg = aggregate(
            &profile(vec![Sample::new(1, 200, 0, 0, vec![F1])]),
            AccountingMode::InUse,
        );
        assert_eq!(agg.percentage(50), Some(25.0));
    }
}
