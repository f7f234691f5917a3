use mprof_studio::aggregator::{aggregate, rank, selected_volume, AccountingMode, RankBy, Stat};
use mprof_studio::parser::{decode, encode, FunctionId, FunctionTable, Profile, Sample};

const F1: FunctionId = FunctionId(1);
const F2: FunctionId = FunctionId(2);
const F3: FunctionId = FunctionId(3);

fn mixed_profile() -> Profile {
    Profile::new(
        FunctionTable::new(),
        vec![
            Sample::new(4, 1000, 4, 1000, vec![F1, F2]),
            Sample::new(1, 500, 0, 0, vec![F1, F1, F2]),
            Sample::new(6, 900, 2, 300, vec![F2, F3]),
            Sample::new(2, 100, 3, 250, vec![F3]),
            Sample::new(1, 64, 0, 0, vec![]),
        ],
    )
}

#[test]
fn test_flat_sum_equals_selected_volume_in_both_modes() {
    let profile = mixed_profile();

    for mode in [AccountingMode::Allocated, AccountingMode::InUse] {
        let agg = aggregate(&profile, mode);

        let mut flat_sum = Stat::default();
        for stat in agg.flat.values() {
            flat_sum += *stat;
        }

        let mut selected = Stat::default();
        for sample in profile.samples.iter().filter(|s| !s.stack.is_empty()) {
            if let Some(volume) = selected_volume(sample, mode) {
                selected += volume;
            }
        }

        assert_eq!(flat_sum, selected, "mode {}", mode);
        assert_eq!(agg.total, selected, "mode {}", mode);
    }
}

#[test]
fn test_recursion_collapses_to_single_attribution() {
    let recursive = Profile::new(
        FunctionTable::new(),
        vec![Sample::new(1, 500, 0, 0, vec![F1, F1, F2])],
    );
    let flat = Profile::new(
        FunctionTable::new(),
        vec![Sample::new(1, 500, 0, 0, vec![F1, F2])],
    );

    let a = aggregate(&recursive, AccountingMode::InUse);
    let b = aggregate(&flat, AccountingMode::InUse);
    assert_eq!(a.cumulative, b.cumulative);
    assert_eq!(a.cumulative_of(F1).bytes, 500);
    assert_eq!(a.cumulative_of(F2).bytes, 500);
}

#[test]
fn test_fully_freed_sample_by_mode() {
    let profile = Profile::new(
        FunctionTable::new(),
        vec![Sample::new(1, 1000, 1, 1000, vec![F1, F2])],
    );

    let in_use = aggregate(&profile, AccountingMode::InUse);
    assert_eq!(in_use.total.bytes, 0);
    assert!(in_use.cumulative.is_empty());

    let allocated = aggregate(&profile, AccountingMode::Allocated);
    assert_eq!(allocated.flat_of(F1).bytes, 1000);
    assert_eq!(allocated.cumulative_of(F1).bytes, 1000);
    assert_eq!(allocated.cumulative_of(F2).bytes, 1000);
}

#[test]
fn test_empty_profile_queries_do_not_divide_by_zero() {
    let profile = decode(&[0, 0, 0, 0]).unwrap();

    for mode in [AccountingMode::Allocated, AccountingMode::InUse] {
        let agg = aggregate(&profile, mode);
        assert!(agg.flat.is_empty());
        assert!(agg.cumulative.is_empty());
        assert_eq!(agg.total, Stat::default());
        assert!(!agg.has_data());
        assert_eq!(agg.percentage(100), None);
        assert!(rank(&agg, RankBy::Flat).is_empty());
    }
}

#[test]
fn test_ranking_is_a_total_order() {
    let profile = decode(&encode(&mixed_profile()).unwrap()).unwrap();
    let agg = aggregate(&profile, AccountingMode::Allocated);

    for by in [RankBy::Flat, RankBy::Cumulative] {
        let ranked = rank(&agg, by);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0].stat, &pair[1].stat);
            assert!(
                a.bytes > b.bytes || (a.bytes == b.bytes && a.objects >= b.objects),
                "{:?} ranked before {:?}",
                pair[0],
                pair[1]
            );
        }
        for (i, entry) in ranked.iter().enumerate() {
            assert_eq!(entry.rank, i + 1);
        }
    }
}

#[test]
fn test_aggregation_is_deterministic() {
    let profile = mixed_profile();
    let first = aggregate(&profile, AccountingMode::InUse);
    let second = aggregate(&profile, AccountingMode::InUse);
    assert_eq!(first, second);
    assert_eq!(
        rank(&first, RankBy::Cumulative),
        rank(&second, RankBy::Cumulative)
    );
}
