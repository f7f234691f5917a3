//! Full dump of the decoded profile: the function table, then every sample
//! sorted by net bytes with its stack printed root first.

use crate::parser::schema::{Profile, Sample};

const SEPARATOR: &str =
    "--------------------------------------------------------------------";

/// Render the function table and all samples as plain text
///
/// **Public** - backs the `--info` dump
pub fn format_detail(profile: &Profile) -> String {
    let mut out = String::from("FuncId\t:\tFuncName\n");
    for (id, name) in profile.functions.iter() {
        out.push_str(&format!("{}\t:\t{}\n", id, name));
    }
    out.push_str(SEPARATOR);
    out.push('\n');

    // Stable sort keeps decode order among equal net volumes
    let mut samples: Vec<&Sample> = profile.samples.iter().collect();
    samples.sort_by(|a, b| b.net_bytes().cmp(&a.net_bytes()));

    out.push_str("AllocBytes\tFreeBytes\tAllocObjs\tFreeObjs\t:\tBacktrace\n");
    for sample in samples {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t:\t",
            sample.alloc_bytes, sample.free_bytes, sample.alloc_objects, sample.free_objects
        ));
        let frames: Vec<String> = sample
            .frames_outermost_first()
            .map(|id| id.to_string())
            .collect();
        out.push_str(&frames.join(" -> "));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{FunctionId, FunctionTable};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detail_layout() {
        let mut table = FunctionTable::new();
        table.insert(FunctionId(20), "main");
        table.insert(FunctionId(10), "malloc");
        let profile = Profile::new(
            table,
            vec![
                Sample::new(1, 100, 1, 100, vec![FunctionId(10)]),
                Sample::new(3, 300, 1, 50, vec![FunctionId(10), FunctionId(20)]),
            ],
        );

        let expected = format!(
            "FuncId\t:\tFuncName\n\
             10\t:\tmalloc\n\
             20\t:\tmain\n\
             {}\n\
             AllocBytes\tFreeBytes\tAllocObjs\tFreeObjs\t:\tBacktrace\n\
             300\t50\t3\t1\t:\t20 -> 10\n\
             100\t100\t1\t1\t:\t10\n",
            SEPARATOR
        );
        assert_eq!(format_detail(&profile), expected);
    }

    #[test]
    fn test_detail_does_not_reorder_profile() {
        let profile = Profile::new(
            FunctionTable::new(),
            vec![
                Sample::new(1, 1, 0, 0, vec![FunctionId(1)]),
                Sample::new(1, 9, 0, 0, vec![FunctionId(2)]),
            ],
        );
        let before = profile.clone();
        let _ = format_detail(&profile);
        assert_eq!(profile, before);
    }

    #[test]
    fn test_empty_stack_renders_empty_backtrace() {
        let profile = Profile::new(FunctionTable::new(), vec![Sample::new(0, 0, 0, 0, vec![])]);
        assert!(format_detail(&profile).ends_with("0\t0\t0\t0\t:\t\n"));
    }
}
