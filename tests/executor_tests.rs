//! Executor Tests
//!
//! Runs selection trees through the resolver hook and checks the rendered
//! JSON responses.

use serde_json::json;

use familiar_mocks::{execute, MockStore, OperationKind, Schema, Selection, Value};

fn store() -> MockStore {
    let schema = Schema::from_sdl(include_str!("fixtures/social.graphql")).unwrap();
    MockStore::new(schema).with_seed(5)
}

fn viewer_query() -> Vec<Selection> {
    Selection::list_from_json(
        r#"[{"name": "viewer", "selections": [{"name": "id"}, {"name": "name"}, {"name": "age"}]}]"#,
    )
    .unwrap()
}

#[test]
fn test_repeated_query_returns_same_viewer() {
    let mut store = store();
    let first = execute(&mut store, OperationKind::Query, &viewer_query()).unwrap();
    let second = execute(&mut store, OperationKind::Query, &viewer_query()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first["viewer"]["name"], json!("Hello World"));
    assert!(first["viewer"]["id"].is_string());
    assert!(first["viewer"]["age"].is_i64());
}

#[test]
fn test_query_reflects_overrides() {
    let mut store = store();
    store
        .set_field("Query", "ROOT", "viewer", Value::from(json!({"id": "me", "name": "Alexandre"})))
        .unwrap();

    let result = execute(&mut store, OperationKind::Query, &viewer_query()).unwrap();
    assert_eq!(result["viewer"]["id"], json!("me"));
    assert_eq!(result["viewer"]["name"], json!("Alexandre"));
}

#[test]
fn test_nested_lists_and_arguments() {
    let mut store = store();
    store
        .set_with_args(
            "User",
            "me",
            "friends",
            json!({"first": 2}),
            Value::from(json!([{"name": "A"}, {"name": "B"}])),
        )
        .unwrap();
    store
        .set_field("Query", "ROOT", "viewer", Value::from(json!({"id": "me"})))
        .unwrap();

    let selections = vec![Selection::new("viewer").select([Selection::new("friends")
        .args(json!({"first": 2}))
        .select([Selection::new("name")])])];
    let result = execute(&mut store, OperationKind::Query, &selections).unwrap();

    assert_eq!(
        result,
        json!({"viewer": {"friends": [{"name": "A"}, {"name": "B"}]}})
    );
}

#[test]
fn test_same_field_under_two_aliases() {
    let mut store = store();
    let selections = vec![
        Selection::new("viewer").alias("a").select([Selection::new("id")]),
        Selection::new("viewer").alias("b").select([Selection::new("id")]),
    ];
    let result = execute(&mut store, OperationKind::Query, &selections).unwrap();
    assert_eq!(result["a"], result["b"]);
}

#[test]
fn test_reference_without_selection_renders_ref() {
    let mut store = store();
    store
        .set_field("Query", "ROOT", "viewer", Value::from(json!({"id": "me"})))
        .unwrap();
    let result = execute(&mut store, OperationKind::Query, &[Selection::new("viewer")]).unwrap();
    assert_eq!(
        result,
        json!({"viewer": {"$ref": {"typeName": "User", "key": "me"}}})
    );
}

#[test]
fn test_mutation_root() {
    let mut store = store();
    let selections = vec![Selection::new("renameViewer")
        .args(json!({"name": "New"}))
        .select([Selection::new("__typename"), Selection::new("name")])];

    let result = execute(&mut store, OperationKind::Mutation, &selections).unwrap();
    assert_eq!(result["renameViewer"]["__typename"], json!("User"));
    assert_eq!(result["renameViewer"]["name"], json!("Hello World"));
}

#[test]
fn test_unknown_field_fails() {
    let mut store = store();
    let result = execute(&mut store, OperationKind::Query, &[Selection::new("nope")]);
    assert!(result.is_err());
}
