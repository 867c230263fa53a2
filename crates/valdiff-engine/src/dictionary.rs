//! The dictionary comparer: keyed, order-independent comparison.

use valdiff_types::{AggregatedDifference, DifferenceRecord, Value};

use crate::dispatch::{dispatch, VisitedSet};
use crate::registry::ComparerRegistry;

/// Compare two dictionaries by key.
///
/// Keys present only on the actual side are `Extra`, keys present only on
/// the expected side are `Missing`, and matched keys recurse on their
/// values. Pair order never matters; the result is equivalent when every
/// matched value comparison was itself non-different or equivalent and no
/// key is missing or extra.
pub fn compare_maps(
    registry: &ComparerRegistry,
    label: &str,
    actual: &[(Value, Value)],
    expected: &[(Value, Value)],
    visited: &mut VisitedSet,
) -> AggregatedDifference {
    let mut agg = AggregatedDifference::new();

    for (key, actual_value) in actual {
        let entry_label = format!("{label}[{key}]");
        match expected.iter().find(|(ek, _)| ek == key) {
            None => {
                agg.record(DifferenceRecord::extra(entry_label, actual_value.clone()));
            }
            Some((_, expected_value)) => {
                let sub = dispatch(registry, actual_value, &entry_label, expected_value, visited);
                if !sub.is_different() {
                    continue;
                }
                if sub.is_equivalent() {
                    agg.record(DifferenceRecord::equivalent(
                        entry_label,
                        actual_value.clone(),
                        expected_value.clone(),
                    ));
                } else {
                    agg.merge(entry_label, sub);
                }
            }
        }
    }

    for (key, expected_value) in expected {
        if !actual.iter().any(|(ak, _)| ak == key) {
            agg.record(DifferenceRecord::missing(
                format!("{label}[{key}]"),
                expected_value.clone(),
            ));
        }
    }

    agg
}
