// Property-based tests for the dynamic value model.

use proptest::prelude::*;

use valdiff_types::{IntValue, Value};

/// Arbitrary acyclic value tree: scalar leaves, with sequences and maps one
/// level of nesting at a time.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Unit),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Int(IntValue::I64(v))),
        any::<u32>().prop_map(|v| Value::Int(IntValue::U32(v))),
        "[a-z]{0,8}".prop_map(Value::Str),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::seq),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4).prop_map(|pairs| {
                Value::map(
                    pairs
                        .into_iter()
                        .map(|(k, v)| (Value::Str(k), v))
                        .collect(),
                )
            }),
        ]
    })
}

proptest! {
    /// Default equality is reflexive over acyclic value trees.
    #[test]
    fn default_equality_is_reflexive(v in arb_value()) {
        prop_assert_eq!(&v, &v.clone());
    }

    /// Display rendering never panics and is stable across calls.
    #[test]
    fn display_is_deterministic(v in arb_value()) {
        prop_assert_eq!(v.to_string(), v.to_string());
    }

    /// Sequence-shaped values expose exactly their element count.
    #[test]
    fn seq_elements_match_len(items in prop::collection::vec(any::<i64>(), 0..8)) {
        let value = Value::seq(items.iter().map(|v| Value::Int(IntValue::I64(*v))));
        let elems = value.elements().unwrap();
        prop_assert_eq!(elems.len(), items.len());
    }
}
