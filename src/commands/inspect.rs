//! Inspect command: decode a profile and print what it contains.

use super::utils::load_profile;
use crate::aggregator::{aggregate, AccountingMode, Stat};
use crate::parser::Profile;
use anyhow::Result;
use log::warn;
use std::path::Path;

/// Headline numbers for a decoded profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub function_count: usize,
    pub sample_count: usize,
    pub empty_stacks: usize,
    pub allocated: Stat,
    pub in_use: Stat,
    pub unresolved_ids: usize,
}

/// Compute the summary of a profile
pub fn summarize(profile: &Profile) -> ProfileSummary {
    ProfileSummary {
        function_count: profile.functions.len(),
        sample_count: profile.samples.len(),
        empty_stacks: profile.samples.iter().filter(|s| s.stack.is_empty()).count(),
        allocated: aggregate(profile, AccountingMode::Allocated).total,
        in_use: aggregate(profile, AccountingMode::InUse).total,
        unresolved_ids: profile.unresolved_ids().len(),
    }
}

/// Decode a profile file and print its summary
pub fn execute_inspect(path: &Path) -> Result<ProfileSummary> {
    println!("Inspecting profile: {}", path.display());

    let profile = load_profile(path)?;
    let summary = summarize(&profile);

    println!("✓ Valid profile");
    println!("  Functions:      {}", summary.function_count);
    println!("  Samples:        {}", summary.sample_count);
    println!(
        "  Allocated:      {} bytes / {} objects",
        summary.allocated.bytes, summary.allocated.objects
    );
    println!(
        "  In use:         {} bytes / {} objects",
        summary.in_use.bytes, summary.in_use.objects
    );

    if summary.empty_stacks > 0 {
        warn!("{} samples have an empty stack", summary.empty_stacks);
    }
    if summary.unresolved_ids > 0 {
        println!("  Unresolved ids: {}", summary.unresolved_ids);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{FunctionId, FunctionTable, Sample};

    #[test]
    fn test_summarize() {
        let mut table = FunctionTable::new();
        table.insert(FunctionId(1), "f");
        let profile = Profile::new(
            table,
            vec![
                Sample::new(2, 300, 1, 100, vec![FunctionId(1), FunctionId(5)]),
                Sample::new(1, 50, 1, 50, vec![FunctionId(1)]),
                Sample::new(0, 0, 0, 0, vec![]),
            ],
        );

        let summary = summarize(&profile);
        assert_eq!(summary.function_count, 1);
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.empty_stacks, 1);
        assert_eq!(summary.allocated, Stat::new(350, 3));
        assert_eq!(summary.in_use, Stat::new(200, 1));
        assert_eq!(summary.unresolved_ids, 1);
    }
}
