//! Structural difference / equivalence engine.
//!
//! Given two values classified into the [`valdiff_types::Value`] model, the
//! engine decides whether they are equal and, if not, produces a precise
//! hierarchical description of every difference: mismatched leaves, missing,
//! extra and displaced elements, dimension mismatches, and member-level
//! differences of transient records. Order-insensitive "equivalence" is
//! detected and reported separately from genuine content differences, and
//! cyclic graphs are handled, never rejected.
//!
//! # Quick Start
//!
//! ```rust
//! use valdiff_engine::Engine;
//! use valdiff_types::Reflect;
//!
//! let engine = Engine::new();
//! let diff = engine.compare_values(&vec![1, 2, 3].reflect(), &vec![3, 2, 1].reflect());
//! assert!(diff.is_different());
//! assert!(diff.is_equivalent()); // same contents, different order
//! ```
//!
//! # Key Types
//!
//! - [`Engine`] — The equality orchestrator and top-level API
//! - [`ComparerRegistry`] / [`ScopedComparer`] — Type-keyed custom comparers
//! - [`dispatch`] — The recursive value dispatcher
//! - [`valdiff_types::AggregatedDifference`] — The returned difference tree

pub mod array;
pub mod dictionary;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod registry;
pub mod sequence;

pub use dispatch::{dispatch, VisitedSet};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use registry::{ComparerRegistry, CustomComparer, ScopedComparer};

use valdiff_types::Value;

/// Whether two values are structurally equal under a fresh engine.
pub fn structurally_equal(actual: &Value, expected: &Value) -> bool {
    !Engine::new().compare_values(actual, expected).is_different()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use valdiff_types::{
        DiffKind, FloatValue, IntValue, Member, RecordValue, Reflect, Value,
    };

    use super::*;

    fn int(v: i32) -> Value {
        Value::Int(IntValue::I32(v))
    }

    // -----------------------------------------------------------------------
    // Reflexivity
    // -----------------------------------------------------------------------
    #[test]
    fn reflexivity_over_assorted_values() {
        let engine = Engine::new();
        let values = [
            Value::Unit,
            Value::Bool(true),
            int(42),
            Value::Float(FloatValue::F64(2.5)),
            Value::Str("hello".into()),
            Value::seq([int(1), int(2)]),
            Value::map(vec![(Value::Str("k".into()), int(1))]),
            Value::array(vec![2, 2], vec![int(1), int(2), int(3), int(4)]).unwrap(),
        ];
        for v in &values {
            assert!(
                !engine.compare_values(v, v).is_different(),
                "expected {v} to equal itself"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Numeric coercion
    // -----------------------------------------------------------------------
    #[test]
    fn numeric_equality_is_type_insensitive() {
        let engine = Engine::new();
        assert!(!engine
            .compare_values(&1i32.reflect(), &1i64.reflect())
            .is_different());

        let agg = engine.compare_values(&1i32.reflect(), &2i64.reflect());
        assert!(agg.is_different());
        assert_eq!(agg.leaf_count(), 1);
        assert_eq!(agg.count_of(DiffKind::Value), 1);
    }

    // -----------------------------------------------------------------------
    // Sequence equivalence
    // -----------------------------------------------------------------------
    #[test]
    fn permuted_sequences_are_equivalent_not_equal() {
        let engine = Engine::new();
        let agg = engine.compare_values(&vec![1, 2, 3].reflect(), &vec![3, 2, 1].reflect());
        assert!(agg.is_different());
        assert!(agg.is_equivalent());

        let agg = engine.compare_values(&vec![1, 2, 3].reflect(), &vec![1, 2, 3].reflect());
        assert!(!agg.is_different());
    }

    // -----------------------------------------------------------------------
    // Dictionary diff
    // -----------------------------------------------------------------------
    #[test]
    fn dictionary_diff_reports_extra_and_missing_keys() {
        let engine = Engine::new();
        let actual = Value::map(vec![
            (Value::Str("a".into()), int(1)),
            (Value::Str("b".into()), int(2)),
        ]);
        let expected = Value::map(vec![
            (Value::Str("a".into()), int(1)),
            (Value::Str("c".into()), int(2)),
        ]);
        let agg = engine.compare_values(&actual, &expected);
        assert_eq!(agg.count_of(DiffKind::Extra), 1);
        assert_eq!(agg.count_of(DiffKind::Missing), 1);
        assert_eq!(agg.leaf_count(), 2);
    }

    // -----------------------------------------------------------------------
    // Array rank and dimensions
    // -----------------------------------------------------------------------
    #[test]
    fn transposed_dims_yield_one_attribute_record() {
        let engine = Engine::new();
        let elems: Vec<Value> = (0..6).map(int).collect();
        let a = Value::array(vec![2, 3], elems.clone()).unwrap();
        let e = Value::array(vec![3, 2], elems).unwrap();
        let agg = engine.compare_values(&a, &e);
        assert_eq!(agg.leaf_count(), 1);
        assert_eq!(agg.count_of(DiffKind::Attribute), 1);
    }

    // -----------------------------------------------------------------------
    // Cycle safety
    // -----------------------------------------------------------------------
    fn self_loop() -> Value {
        let node = Rc::new(RecordValue {
            type_name: "Node".into(),
            lineage: Vec::new(),
            transient: true,
            members: std::cell::RefCell::new(Vec::new()),
        });
        node.members
            .borrow_mut()
            .push(Member::field("next", Value::Record(Rc::clone(&node))));
        Value::Record(node)
    }

    #[test]
    fn self_referential_graphs_terminate() {
        let engine = Engine::new();
        let a = self_loop();
        let b = self_loop();
        let agg = engine.compare_values(&a, &b);
        assert!(agg.is_different());
        let next_mentions = agg
            .leaves()
            .iter()
            .filter(|r| r.subject_name.contains("next"))
            .count();
        assert_eq!(next_mentions, 1);
    }

    // -----------------------------------------------------------------------
    // Rendering end to end
    // -----------------------------------------------------------------------
    #[test]
    fn message_for_equivalent_sequences_carries_suffix() {
        let engine = Engine::new();
        let agg = engine.compare_values(&vec![2, 1].reflect(), &vec![1, 2].reflect());
        let msg = agg.render_message("actual", "expected", true);
        assert!(msg.starts_with("2 differences found between actual and expected:"));
        assert!(msg.ends_with("But they are equivalent."));
    }

    #[test]
    fn json_fixtures_compare_structurally() {
        let engine = Engine::new();
        let actual = Value::from_json(&serde_json::json!({"id": 1, "tags": ["x", "y"]}));
        let expected = Value::from_json(&serde_json::json!({"id": 1, "tags": ["y", "x"]}));
        let agg = engine.compare_values(&actual, &expected);
        assert!(agg.is_different());
        assert!(agg.is_equivalent());
    }

    #[test]
    fn structurally_equal_helper() {
        assert!(structurally_equal(&int(1), &1i64.reflect()));
        assert!(!structurally_equal(&int(1), &Value::Str("1".into())));
    }
}
