//! The value dispatcher: the recursive entry point of the engine.
//!
//! Classifies a value pair and routes it to the right comparer, or emits a
//! leaf difference. Routing is an exhaustive match over the closed value
//! model; the visited set bounds traversal of self-referential graphs to one
//! visit per record per path.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::trace;
use valdiff_graph::build_graph;
use valdiff_types::{AggregatedDifference, Criteria, DifferenceRecord, Value};

use crate::registry::ComparerRegistry;
use crate::{array, dictionary, sequence};

/// Identity set of record pointers visited along the current path.
pub type VisitedSet = HashSet<usize>;

/// Compare a value pair, producing its aggregated differences.
///
/// In order: null expected, registered/default equality, null actual, cycle
/// guard, numeric coercion, transient-record member comparison, sequence
/// shape routing, and finally the opaque leaf difference. Never fails and
/// has no side effect beyond the returned accumulator.
pub fn dispatch(
    registry: &ComparerRegistry,
    actual: &Value,
    label: &str,
    expected: &Value,
    visited: &mut VisitedSet,
) -> AggregatedDifference {
    trace!(%label, actual = %actual.type_name(), expected = %expected.type_name(), "dispatch");
    let mut agg = AggregatedDifference::new();

    // 1. Null expected: difference iff actual is non-null.
    if expected.is_null() {
        if !actual.is_null() {
            agg.record(DifferenceRecord::value(label, actual.clone(), expected.clone()));
        }
        return agg;
    }

    // 2. A registered or default equality test deciding "equal" ends it.
    if let Some(comparer) = registry.lookup_comparer(actual) {
        if comparer.equal(actual, expected) {
            return agg;
        }
    }
    if actual == expected {
        return agg;
    }

    // 3. Null actual against a non-null expected: leaf difference, no
    // recursion.
    if actual.is_null() {
        agg.record(DifferenceRecord::value(label, actual.clone(), expected.clone()));
        return agg;
    }

    // 4. Cycle guard: one visit per record per path. A revisited record is
    // reported once and recursion stops there.
    let guarded = match actual {
        Value::Record(rec) => {
            let ptr = Rc::as_ptr(rec) as usize;
            if !visited.insert(ptr) {
                trace!(%label, "cycle detected");
                agg.record(DifferenceRecord::value(label, actual.clone(), expected.clone()));
                return agg;
            }
            Some(ptr)
        }
        _ => None,
    };

    let agg = dispatch_shape(registry, actual, label, expected, visited);

    if let Some(ptr) = guarded {
        visited.remove(&ptr);
    }
    agg
}

fn dispatch_shape(
    registry: &ComparerRegistry,
    actual: &Value,
    label: &str,
    expected: &Value,
    visited: &mut VisitedSet,
) -> AggregatedDifference {
    let mut agg = AggregatedDifference::new();

    // 5. Numeric coercion: distinct concrete numeric types meet in the
    // common type, making numeric equality intentionally type-insensitive.
    if let (Some(a), Some(e)) = (actual.as_numeric(), expected.as_numeric()) {
        if !a.equals(e) {
            agg.record(DifferenceRecord::value(label, actual.clone(), expected.clone()));
        }
        return agg;
    }

    // 6. Transient (anonymous-type analogue) expected record: structural
    // member comparison through the graph walker.
    if let Value::Record(rec) = expected {
        if rec.transient {
            return compare_transient(registry, actual, label, expected, visited);
        }
    }

    // 7. Sequence-shaped pairs: dictionary, then array, then the generic
    // sequence walk for everything else that enumerates.
    match (actual, expected) {
        (Value::Map(a), Value::Map(e)) => {
            return dictionary::compare_maps(registry, label, a, e, visited);
        }
        (
            Value::Array { dims: a_dims, elems: a_elems },
            Value::Array { dims: e_dims, elems: e_elems },
        ) => {
            return array::compare_arrays(registry, label, a_dims, a_elems, e_dims, e_elems, visited);
        }
        _ => {}
    }
    if let (Some(a_elems), Some(e_elems)) = (actual.elements(), expected.elements()) {
        let labeler = |i: usize| format!("{label}[{i}]");
        return sequence::compare_sequences(registry, &a_elems, &e_elems, &labeler, visited);
    }

    // 8. Opaque leaves.
    agg.record(DifferenceRecord::value(label, actual.clone(), expected.clone()));
    agg
}

/// Member-by-member comparison of a transient expected record.
///
/// Members pair by normalized label; matched pairs dispatch on their values,
/// expected members with no counterpart become `Missing`, actual members
/// with no counterpart become `Extra`.
fn compare_transient(
    registry: &ComparerRegistry,
    actual: &Value,
    label: &str,
    expected: &Value,
    visited: &mut VisitedSet,
) -> AggregatedDifference {
    let mut agg = AggregatedDifference::new();
    if !matches!(actual, Value::Record(_)) {
        agg.record(DifferenceRecord::value(label, actual.clone(), expected.clone()));
        return agg;
    }

    let criteria = Criteria::all_members();
    let actual_graph = build_graph(actual.clone(), actual.type_name(), criteria.clone());
    let expected_graph = build_graph(expected.clone(), expected.type_name(), criteria);

    actual_graph.map_fields(&expected_graph, 0, &mut |mine, theirs, _depth| {
        let member_label = format!("{label}.{}", theirs.label);
        match mine {
            Some(node) => {
                let sub = dispatch(registry, &node.value, &member_label, &theirs.value, visited);
                agg.merge(member_label, sub);
            }
            None => {
                agg.record(DifferenceRecord::missing(member_label, theirs.value.clone()));
            }
        }
        // The dispatcher already recursed; no walker-level recursion.
        false
    });

    // Reverse walk surfaces actual-side members that were not expected.
    expected_graph.map_fields(&actual_graph, 0, &mut |mine, theirs, _depth| {
        if mine.is_none() {
            let member_label = format!("{label}.{}", theirs.label);
            agg.record(DifferenceRecord::extra(member_label, theirs.value.clone()));
        }
        false
    });

    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use valdiff_types::{DiffKind, FloatValue, IntValue, Member};

    fn dispatch_pair(actual: &Value, expected: &Value) -> AggregatedDifference {
        let registry = ComparerRegistry::new();
        let mut visited = VisitedSet::new();
        dispatch(&registry, actual, "value", expected, &mut visited)
    }

    fn int32(v: i32) -> Value {
        Value::Int(IntValue::I32(v))
    }

    fn int64(v: i64) -> Value {
        Value::Int(IntValue::I64(v))
    }

    #[test]
    fn both_null_is_no_difference() {
        assert!(!dispatch_pair(&Value::Unit, &Value::Unit).is_different());
    }

    #[test]
    fn null_expected_against_value() {
        let agg = dispatch_pair(&int32(1), &Value::Unit);
        assert!(agg.is_different());
        assert_eq!(agg.count_of(DiffKind::Value), 1);
    }

    #[test]
    fn null_actual_against_value() {
        let agg = dispatch_pair(&Value::Unit, &int32(1));
        assert!(agg.is_different());
        assert_eq!(agg.leaf_count(), 1);
    }

    #[test]
    fn numeric_coercion_across_widths() {
        assert!(!dispatch_pair(&int32(1), &int64(1)).is_different());

        let agg = dispatch_pair(&int32(1), &int64(2));
        assert!(agg.is_different());
        assert_eq!(agg.count_of(DiffKind::Value), 1);
        assert_eq!(agg.leaf_count(), 1);
    }

    #[test]
    fn numeric_coercion_int_against_float() {
        let three = Value::Float(FloatValue::F64(3.0));
        assert!(!dispatch_pair(&int64(3), &three).is_different());
        assert!(dispatch_pair(&int64(3), &Value::Float(FloatValue::F64(3.5))).is_different());
    }

    #[test]
    fn strings_compare_atomically() {
        let agg = dispatch_pair(&Value::Str("abc".into()), &Value::Str("abd".into()));
        // One leaf for the whole string, never per-character records.
        assert_eq!(agg.leaf_count(), 1);
    }

    #[test]
    fn custom_comparer_short_circuits_equal() {
        let registry = ComparerRegistry::new();
        registry
            .register("str", Some(std::sync::Arc::new(|_: &Value, _: &Value| true)))
            .unwrap();
        let mut visited = VisitedSet::new();
        let agg = dispatch(
            &registry,
            &Value::Str("a".into()),
            "value",
            &Value::Str("b".into()),
            &mut visited,
        );
        assert!(!agg.is_different());
    }

    #[test]
    fn transient_record_members_are_compared() {
        let actual = Value::transient_record(
            "Anon",
            vec![
                Member::field("x", int32(1)),
                Member::field("y", int32(2)),
            ],
        );
        let expected = Value::transient_record(
            "Anon",
            vec![
                Member::field("x", int32(1)),
                Member::field("y", int32(3)),
                Member::field("z", int32(4)),
            ],
        );
        let agg = dispatch_pair(&actual, &expected);
        assert!(agg.is_different());
        assert_eq!(agg.count_of(DiffKind::Value), 1);
        assert_eq!(agg.count_of(DiffKind::Missing), 1);
        let leaves = agg.leaves();
        assert!(leaves.iter().any(|r| r.subject_name == "value.field 'y'"));
        assert!(leaves.iter().any(|r| r.subject_name == "value.field 'z'"));
    }

    #[test]
    fn transient_record_reports_extra_actual_members() {
        let actual = Value::transient_record(
            "Anon",
            vec![
                Member::field("x", int32(1)),
                Member::field("only_actual", int32(9)),
            ],
        );
        let expected = Value::transient_record("Anon", vec![Member::field("x", int32(1))]);
        let agg = dispatch_pair(&actual, &expected);
        assert_eq!(agg.count_of(DiffKind::Extra), 1);
    }

    #[test]
    fn ordinary_records_are_leaf_differences() {
        let a = Value::record("Point", vec![Member::field("x", int32(1))]);
        let b = Value::record("Point", vec![Member::field("x", int32(1))]);
        let agg = dispatch_pair(&a, &b);
        // Identity inequality, compared as opaque leaves without recursion.
        assert_eq!(agg.leaf_count(), 1);
        assert_eq!(agg.count_of(DiffKind::Value), 1);
    }

    #[test]
    fn mixed_seq_and_array_fall_back_to_sequence_walk() {
        let seq = Value::seq([int32(1), int32(2)]);
        let arr = Value::array(vec![2], vec![int32(1), int32(2)]).unwrap();
        assert!(!dispatch_pair(&seq, &arr).is_different());
    }
}
