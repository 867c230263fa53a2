//! The sequence comparer: position-by-position walk with displacement
//! tracking.
//!
//! Misaligned items are held in pending lists and cross-matched against the
//! other side's later items; a cross-match is a `Moved` record. Whatever the
//! pending lists still hold at the end pairs up as `FoundInsteadOf`, and the
//! whole comparison counts as equivalent only when nothing unmatched is left
//! over — the two sequences were permutations of one another.

use valdiff_types::{AggregatedDifference, DifferenceRecord, Value};

use crate::dispatch::{dispatch, VisitedSet};
use crate::registry::ComparerRegistry;

/// Compare two elementwise sequences. `labeler` turns an element index into
/// its subject label, so the array comparer can substitute multi-dimensional
/// coordinates for flat indices.
pub fn compare_sequences(
    registry: &ComparerRegistry,
    actual: &[Value],
    expected: &[Value],
    labeler: &dyn Fn(usize) -> String,
    visited: &mut VisitedSet,
) -> AggregatedDifference {
    let mut agg = AggregatedDifference::new();
    let mut pending_actual: Vec<(usize, Value)> = Vec::new();
    let mut pending_expected: Vec<(usize, Value)> = Vec::new();

    let len = actual.len().max(expected.len());
    for i in 0..len {
        match (actual.get(i), expected.get(i)) {
            (Some(av), Some(ev)) => {
                let sub = dispatch(registry, av, &labeler(i), ev, visited);
                if !sub.is_different() {
                    continue;
                }
                if sub.is_equivalent() {
                    // Same contents in a different order; the pair stays
                    // aligned.
                    agg.record(DifferenceRecord::equivalent(
                        labeler(i),
                        av.clone(),
                        ev.clone(),
                    ));
                    continue;
                }

                // Misaligned. Try to pair the actual item with an expected
                // value seen earlier.
                if let Some(pos) = pending_expected
                    .iter()
                    .position(|(_, pv)| matches_value(registry, av, pv, visited))
                {
                    let (origin, _) = pending_expected.remove(pos);
                    agg.record(DifferenceRecord::moved(labeler(i), av.clone(), i, origin));
                } else {
                    pending_actual.push((i, av.clone()));
                }

                // And symmetrically: the current expected item against
                // actual values with no home yet.
                if let Some(pos) = pending_actual
                    .iter()
                    .position(|(_, pv)| matches_value(registry, pv, ev, visited))
                {
                    let (origin, pv) = pending_actual.remove(pos);
                    agg.record(DifferenceRecord::moved(labeler(origin), pv, origin, i));
                } else {
                    pending_expected.push((i, ev.clone()));
                }
            }
            (Some(av), None) => {
                agg.record(
                    DifferenceRecord::extra(labeler(i), av.clone()).with_actual_index(i),
                );
            }
            (None, Some(ev)) => {
                agg.record(
                    DifferenceRecord::missing(labeler(i), ev.clone()).with_expected_index(i),
                );
            }
            (None, None) => unreachable!("loop bounded by the longer sequence"),
        }
    }

    // Unmatched leftovers pair up by position across the two pending lists.
    let paired = pending_actual.len().min(pending_expected.len());
    for k in 0..paired {
        let (ai, av) = &pending_actual[k];
        let (ei, ev) = &pending_expected[k];
        agg.record(
            DifferenceRecord::found_instead_of(labeler(*ai), av.clone(), ev.clone())
                .with_actual_index(*ai)
                .with_expected_index(*ei),
        );
    }
    for (ai, av) in pending_actual.iter().skip(paired) {
        agg.record(DifferenceRecord::extra(labeler(*ai), av.clone()).with_actual_index(*ai));
    }
    for (ei, ev) in pending_expected.iter().skip(paired) {
        agg.record(DifferenceRecord::missing(labeler(*ei), ev.clone()).with_expected_index(*ei));
    }

    agg
}

/// Whether the dispatcher would call the two values the same element:
/// either no difference at all, or different only by internal ordering.
fn matches_value(
    registry: &ComparerRegistry,
    actual: &Value,
    expected: &Value,
    visited: &mut VisitedSet,
) -> bool {
    let sub = dispatch(registry, actual, "", expected, visited);
    !sub.is_different() || sub.is_equivalent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use valdiff_types::{DiffKind, IntValue};

    fn int(v: i32) -> Value {
        Value::Int(IntValue::I32(v))
    }

    fn ints(vs: &[i32]) -> Vec<Value> {
        vs.iter().copied().map(int).collect()
    }

    fn compare(actual: &[i32], expected: &[i32]) -> AggregatedDifference {
        let registry = ComparerRegistry::new();
        let mut visited = VisitedSet::new();
        let labeler = |i: usize| format!("[{i}]");
        compare_sequences(&registry, &ints(actual), &ints(expected), &labeler, &mut visited)
    }

    #[test]
    fn identical_sequences_have_no_differences() {
        assert!(!compare(&[1, 2, 3], &[1, 2, 3]).is_different());
    }

    #[test]
    fn permutation_is_different_but_equivalent() {
        let agg = compare(&[1, 2, 3], &[3, 2, 1]);
        assert!(agg.is_different());
        assert!(agg.is_equivalent());
        assert_eq!(agg.count_of(DiffKind::Moved), 2);
    }

    #[test]
    fn substituted_element_pairs_as_found_instead_of() {
        let agg = compare(&[1, 2, 3], &[1, 9, 3]);
        assert!(agg.is_different());
        assert!(!agg.is_equivalent());
        assert_eq!(agg.count_of(DiffKind::FoundInsteadOf), 1);
        let leaves = agg.leaves();
        assert_eq!(leaves[0].actual, Some(int(2)));
        assert_eq!(leaves[0].expected, Some(int(9)));
    }

    #[test]
    fn longer_actual_reports_extras() {
        let agg = compare(&[1, 2, 3, 4], &[1, 2]);
        assert_eq!(agg.count_of(DiffKind::Extra), 2);
        assert!(!agg.is_equivalent());
    }

    #[test]
    fn longer_expected_reports_missing() {
        let agg = compare(&[1], &[1, 2, 3]);
        assert_eq!(agg.count_of(DiffKind::Missing), 2);
        let leaves = agg.leaves();
        assert_eq!(leaves[0].expected_index, Some(1));
        assert_eq!(leaves[1].expected_index, Some(2));
    }

    #[test]
    fn moved_records_carry_both_positions() {
        let agg = compare(&[2, 1], &[1, 2]);
        assert!(agg.is_equivalent());
        let leaves = agg.leaves();
        assert_eq!(leaves.len(), 2);
        assert!(leaves.iter().all(|r| r.kind() == DiffKind::Moved));
        assert!(leaves
            .iter()
            .any(|r| r.actual_index == Some(0) && r.expected_index == Some(1)));
    }

    #[test]
    fn duplicate_elements_match_one_to_one() {
        // Each occurrence pairs off exactly once; the surplus is a leftover.
        let agg = compare(&[5, 5], &[5, 7]);
        assert!(!agg.is_equivalent());
        assert_eq!(agg.count_of(DiffKind::FoundInsteadOf), 1);
    }

    #[test]
    fn nested_equivalent_sequences_stay_aligned() {
        let registry = ComparerRegistry::new();
        let mut visited = VisitedSet::new();
        let labeler = |i: usize| format!("[{i}]");
        let actual = vec![Value::seq(ints(&[1, 2])), Value::seq(ints(&[3]))];
        let expected = vec![Value::seq(ints(&[2, 1])), Value::seq(ints(&[3]))];
        let agg = compare_sequences(&registry, &actual, &expected, &labeler, &mut visited);
        assert!(agg.is_different());
        assert!(agg.is_equivalent());
        assert_eq!(agg.count_of(DiffKind::Equivalent), 1);
    }
}
