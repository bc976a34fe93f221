//! Argument canonicalization property tests
//!
//! Argument records that are deep-equal must map to the same storage slot no
//! matter how they were built, and reads through any slot must be stable.

use proptest::collection::btree_map;
use proptest::prelude::*;

use familiar_mocks::{field_name_in_store, FieldArgs, MockStore, Record, Schema, Value};

fn arg_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<bool>().prop_map(Value::Bool),
        "[a-z]{0,8}".prop_map(Value::String),
        Just(Value::Null),
    ]
}

fn arg_entries() -> impl Strategy<Value = Vec<(String, Value)>> {
    btree_map("[a-z]{1,6}", arg_value(), 0..6).prop_map(|map| map.into_iter().collect())
}

fn store() -> MockStore {
    let schema = Schema::from_sdl(
        "type User { id: ID! name: String! friends(first: Int): [User!]! } type Query { viewer: User! }",
    )
    .unwrap();
    MockStore::new(schema).with_seed(17)
}

proptest! {
    #[test]
    fn slot_name_ignores_entry_order(entries in arg_entries()) {
        let forward: Record = entries.iter().cloned().collect();
        let backward: Record = entries.iter().rev().cloned().collect();

        let a = field_name_in_store("friends", Some(&FieldArgs::Record(forward)));
        let b = field_name_in_store("friends", Some(&FieldArgs::Record(backward)));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn slot_name_roundtrips_through_json(entries in arg_entries()) {
        let record: Record = entries.into_iter().collect();
        let args = FieldArgs::Record(record.clone());
        let reparsed = FieldArgs::from(Value::Record(record).to_json());

        prop_assert_eq!(
            field_name_in_store("friends", Some(&args)),
            field_name_in_store("friends", Some(&reparsed))
        );
    }

    #[test]
    fn reads_with_arguments_are_stable(entries in arg_entries()) {
        let mut store = store();
        let args = FieldArgs::Record(entries.into_iter().collect());

        let first = store.get_with_args("User", "me", "friends", args.clone()).unwrap();
        let second = store.get_with_args("User", "me", "friends", args).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn set_scalar_reads_back(name in ".{0,32}") {
        let mut store = store();
        store.set_field("User", "me", "name", name.clone()).unwrap();
        prop_assert_eq!(store.get_field("User", "me", "name").unwrap(), Value::from(name));
    }
}
