//! Plain-text hot-spot ranking table.

use crate::aggregator::ranker::{RankBy, RankedEntry};
use crate::aggregator::stats::{AccountingMode, Aggregation};
use crate::parser::schema::Profile;
use colored::Colorize;

/// Rendering options for the ranking table
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingOptions {
    pub by: RankBy,

    /// Highlight emphasized rows with ANSI color
    pub color: bool,
}

/// Render ranked entries as a tab-separated table
///
/// **Public** - used by the report command for `--text`
pub fn format_ranking(
    profile: &Profile,
    aggregation: &Aggregation,
    ranked: &[RankedEntry],
    options: RankingOptions,
) -> String {
    let mut out = String::new();
    out.push_str(&header(aggregation.mode, options.by));
    out.push('\n');

    if !aggregation.has_data() {
        out.push_str("(no data: total volume is zero)\n");
    }

    for entry in ranked {
        let name = profile.functions.display_name(entry.function_id);
        let mut line = format!(
            "{}\t{}(kb)\t{}\t{}",
            ordinal(entry.rank),
            kilobytes(entry.stat.bytes),
            percentage(aggregation, entry.stat.bytes),
            entry.stat.objects,
        );
        if options.by == RankBy::Cumulative {
            line.push_str(&format!(
                "\t{}(kb) flat\t{}",
                kilobytes(entry.flat.bytes),
                percentage(aggregation, entry.flat.bytes)
            ));
        }
        line.push('\t');
        line.push_str(&name);

        if options.color && entry.emphasized {
            out.push_str(&line.red().to_string());
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }

    out
}

fn header(mode: AccountingMode, by: RankBy) -> String {
    let space = match mode {
        AccountingMode::Allocated => "alloc",
        AccountingMode::InUse => "inuse",
    };
    match by {
        RankBy::Flat => format!("-----------{} space ranking----------", space),
        RankBy::Cumulative => format!("-----------{} space ranking (cumulative)----------", space),
    }
}

fn kilobytes(bytes: i64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0)
}

fn percentage(aggregation: &Aggregation, bytes: i64) -> String {
    aggregation
        .percentage(bytes)
        .map(|p| format!("{:.2}%", p))
        .unwrap_or_else(|| "n/a".to_string())
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{aggregate, rank};
    use crate::parser::schema::{FunctionId, FunctionTable, Sample};
    use pretty_assertions::assert_eq;

    fn sample_profile() -> Profile {
        let mut table = FunctionTable::new();
        table.insert(FunctionId(1), "alloc_buffer");
        table.insert(FunctionId(2), "main");
        Profile::new(
            table,
            vec![
                Sample::new(2, 2048, 0, 0, vec![FunctionId(1), FunctionId(2)]),
                Sample::new(1, 2048, 1, 1024, vec![FunctionId(2)]),
            ],
        )
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn test_flat_table() {
        let profile = sample_profile();
        let agg = aggregate(&profile, AccountingMode::InUse);
        let ranked = rank(&agg, RankBy::Flat);

        let text = format_ranking(&profile, &agg, &ranked, RankingOptions::default());
        assert_eq!(
            text,
            "-----------inuse space ranking----------\n\
             1st\t2.00(kb)\t66.67%\t2\talloc_buffer\n\
             2nd\t1.00(kb)\t33.33%\t0\tmain\n"
        );
    }

    #[test]
    fn test_cumulative_table() {
        let profile = sample_profile();
        let agg = aggregate(&profile, AccountingMode::Allocated);
        let ranked = rank(&agg, RankBy::Cumulative);

        let options = RankingOptions {
            by: RankBy::Cumulative,
            color: false,
        };
        let text = format_ranking(&profile, &agg, &ranked, options);
        assert_eq!(
            text,
            "-----------alloc space ranking (cumulative)----------\n\
             1st\t4.00(kb)\t100.00%\t3\t2.00(kb) flat\t50.00%\tmain\n\
             2nd\t2.00(kb)\t50.00%\t2\t2.00(kb) flat\t50.00%\talloc_buffer\n"
        );
    }

    #[test]
    fn test_no_data_marker() {
        let profile = Profile::default();
        let agg = aggregate(&profile, AccountingMode::InUse);
        let text = format_ranking(&profile, &agg, &[], RankingOptions::default());
        assert_eq!(
            text,
            "-----------inuse space ranking----------\n(no data: total volume is zero)\n"
        );
    }
}
