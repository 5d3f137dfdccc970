use proptest::prelude::*;
use serde_json::Value;

/// Leaf values: null, booleans, integers, floats and strings (some of which
/// start with the reference sentinel).
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-zA-Z0-9 ._-]{0,16}".prop_map(Value::String),
        "/[a-z0-9/_-]{0,24}(\\.json)?".prop_map(Value::String),
    ]
}

/// Trees built only from scalars and nested sequences.
pub fn scalar_tree_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(4, 64, 8, |inner| {
        prop::collection::vec(inner, 0..8).prop_map(Value::Array)
    })
}

/// Mapping keys that never collide with the discriminator.
pub fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}".prop_filter("discriminator key is reserved", |k| k != "class")
}

/// Trees with plain mappings (no discriminator) mixed in.
pub fn plain_data_tree_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(key_strategy(), inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}
