//! The array comparer: rank and dimension checks, then the sequence walk
//! over the row-major flattening with coordinate labels.

use valdiff_graph::coordinate_label;
use valdiff_types::{AggregatedDifference, DifferenceRecord, IntValue, Value};

use crate::dispatch::VisitedSet;
use crate::registry::ComparerRegistry;
use crate::sequence;

/// Compare two rectangular arrays.
///
/// A rank mismatch or a dimension-length mismatch is a single top-level
/// `Attribute` difference; elements are not visited. Same-shape arrays are
/// compared element by element exactly like sequences, with each element
/// labeled by its reconstructed multi-dimensional coordinate.
pub fn compare_arrays(
    registry: &ComparerRegistry,
    label: &str,
    actual_dims: &[usize],
    actual_elems: &[Value],
    expected_dims: &[usize],
    expected_elems: &[Value],
    visited: &mut VisitedSet,
) -> AggregatedDifference {
    let mut agg = AggregatedDifference::new();

    if actual_dims.len() != expected_dims.len() {
        agg.record(DifferenceRecord::attribute(
            format!("{label} rank"),
            Value::Int(IntValue::U64(actual_dims.len() as u64)),
            Value::Int(IntValue::U64(expected_dims.len() as u64)),
        ));
        return agg;
    }

    if let Some(axis) = actual_dims
        .iter()
        .zip(expected_dims)
        .position(|(a, e)| a != e)
    {
        agg.record(DifferenceRecord::attribute(
            format!("{label} dimension {axis} length"),
            Value::Int(IntValue::U64(actual_dims[axis] as u64)),
            Value::Int(IntValue::U64(expected_dims[axis] as u64)),
        ));
        return agg;
    }

    let labeler = |i: usize| format!("{label}[{}]", coordinate_label(actual_dims, i));
    sequence::compare_sequences(registry, actual_elems, expected_elems, &labeler, visited)
}
