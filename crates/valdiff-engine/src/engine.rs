//! The equality orchestrator: the top-level comparison API.
//!
//! Resolves, in priority order: a registered custom comparer for the actual
//! value's type (exact, then lineage); the dedicated floating-point
//! comparison; and the generic structural dispatcher, which itself falls
//! back to default equality at the leaves. Operator-based equality is a
//! separate mode.

use std::sync::Arc;

use tracing::debug;
use valdiff_types::{AggregatedDifference, DifferenceRecord, FloatValue, Value};

use crate::dispatch::{dispatch, VisitedSet};
use crate::registry::ComparerRegistry;

/// Root subject label for top-level comparisons.
const SUBJECT: &str = "value";

/// Relative difference below which the raw numeric difference is attached
/// to the failure.
const NEAR_RATIO: f64 = 1.0 / 10240.0;
/// Relative difference below which an approximate comparison is suggested,
/// for the narrower floating kind.
const F32_CLOSE_RATIO: f64 = 1e-5;
/// The same suggestion threshold for the wider floating kind.
const F64_CLOSE_RATIO: f64 = 1e-8;

/// The comparison engine.
///
/// Cheap to construct; owns (a handle to) its comparer registry. Sharing
/// one registry between engines shares its registrations.
#[derive(Debug, Default)]
pub struct Engine {
    registry: Arc<ComparerRegistry>,
}

impl Engine {
    /// An engine with its own empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine over a shared registry.
    pub fn with_registry(registry: Arc<ComparerRegistry>) -> Self {
        Self { registry }
    }

    /// The engine's registry, for registration and scoped overrides.
    pub fn registry(&self) -> &Arc<ComparerRegistry> {
        &self.registry
    }

    /// Structurally compare two values, producing every difference found.
    ///
    /// Comparison outcomes are data, never errors; this cannot fail.
    pub fn compare_values(&self, actual: &Value, expected: &Value) -> AggregatedDifference {
        debug!(
            actual = %actual.type_name(),
            expected = %expected.type_name(),
            "comparing values"
        );

        // A registered custom comparer preempts any structural comparison.
        if let Some(comparer) = self.registry.lookup_comparer(actual) {
            let mut agg = AggregatedDifference::new();
            if !comparer.equal(actual, expected) {
                agg.record(DifferenceRecord::value(
                    SUBJECT,
                    actual.clone(),
                    expected.clone(),
                ));
            }
            return agg;
        }

        // Floating-point pairs get the dedicated near-equality diagnosis and
        // never recurse structurally.
        if let (Value::Float(a), Value::Float(e)) = (actual, expected) {
            return compare_floats(*a, *e);
        }

        let mut visited = VisitedSet::new();
        dispatch(&self.registry, actual, SUBJECT, expected, &mut visited)
    }

    /// Plain default-equality mode: structural for unshared values, identity
    /// for records.
    pub fn equals_default(&self, actual: &Value, expected: &Value) -> bool {
        actual == expected
    }

    /// Operator-based equality: consult the equality operator registered for
    /// either operand's type (actual first), falling back to default
    /// equality when neither type defines one.
    pub fn equals_by_operator(&self, actual: &Value, expected: &Value) -> bool {
        let operator = self
            .registry
            .lookup_operator(actual)
            .or_else(|| self.registry.lookup_operator(expected));
        match operator {
            Some(op) => op.equal(actual, expected),
            None => actual == expected,
        }
    }
}

/// Dedicated floating-point comparison.
///
/// Equal only on zero difference. Otherwise the relative difference decides
/// the diagnosis: below [`NEAR_RATIO`] the raw difference is attached, and
/// below the width's close-ratio a tolerance-based comparison is suggested.
/// A zero expected value contributes a divisor of `1.0`, so the ratio is
/// always defined.
fn compare_floats(actual: FloatValue, expected: FloatValue) -> AggregatedDifference {
    let mut agg = AggregatedDifference::new();
    let (a, e) = (actual.as_f64(), expected.as_f64());
    let diff = (a - e).abs();
    if diff == 0.0 {
        return agg;
    }

    let divisor = if e == 0.0 { 1.0 } else { e.abs() };
    let ratio = diff / divisor;

    let mut record =
        DifferenceRecord::value(SUBJECT, Value::Float(actual), Value::Float(expected));
    if ratio < NEAR_RATIO {
        let close_ratio = if actual.is_narrow() && expected.is_narrow() {
            F32_CLOSE_RATIO
        } else {
            F64_CLOSE_RATIO
        };
        let mut note = format!("difference of {diff:e}");
        if ratio < close_ratio {
            note.push_str("; the values are close, consider an approximate comparison with an explicit tolerance");
        }
        record = record.with_annotation(note);
    }
    agg.record(record);
    agg
}
