mod test_support;

use std::collections::HashMap;

use clove_types::{Node, Operator, ResolveError, Value};
use serde_json::json;
use test_support::*;

fn empty() -> HashMap<String, Value> {
    HashMap::new()
}

#[test]
fn test_literal_indexes_are_kept() {
    let node = Node::variable(vec![
        Node::segment("my"),
        Node::segment("path"),
        int(2),
        Node::segment("to"),
        int(20),
        Node::segment("something"),
    ]);
    let path = build(node).resolve_storage_path(&empty()).unwrap();
    assert_eq!(path, "my/path[2]/to[20]/something");
}

#[test]
fn test_computed_index_is_substituted() {
    let node = bracketed("path", binary(int(1), Operator::Add, int(1)), &["leaf"]);
    let path = build(node).resolve_storage_path(&empty()).unwrap();
    assert_eq!(path, "path[2]/leaf");
}

#[test]
fn test_index_read_from_content() {
    let content = object(vec![("idx", Value::Integer(3))]);
    let node = bracketed("path", path("idx"), &[]);
    assert_eq!(build(node).resolve_storage_path(&content).unwrap(), "path[3]");
}

#[test]
fn test_increment_is_an_index() {
    let content = object(vec![("idx", Value::Integer(1))]);
    let step = |op| Node::classic(vec![path("idx"), Node::Operator(op)]);

    let node = bracketed("path", step(Operator::Increase), &[]);
    assert_eq!(build(node).resolve_storage_path(&content).unwrap(), "path[2]");

    let node = bracketed("path", step(Operator::Decrease), &[]);
    assert_eq!(build(node).resolve_storage_path(&content).unwrap(), "path[0]");
}

#[test]
fn test_negative_index_is_rejected() {
    let node = bracketed("path", binary(int(0), Operator::Subtract, int(1)), &[]);
    assert!(matches!(
        build(node).resolve_storage_path(&empty()),
        Err(ResolveError::NegativeIndex(-1))
    ));
}

#[test]
fn test_filter_is_rejected() {
    let node = bracketed("path", binary(path("a"), Operator::Greater, int(1)), &[]);
    assert!(matches!(
        build(node).resolve_storage_path(&empty()),
        Err(ResolveError::FilterInStoragePath(_))
    ));

    let node = bracketed("path", boolean(true), &[]);
    assert!(matches!(
        build(node).resolve_storage_path(&empty()),
        Err(ResolveError::FilterInStoragePath(_))
    ));
}

#[test]
fn test_non_numeric_index_is_rejected() {
    let node = bracketed("path", string("x"), &[]);
    match build(node).resolve_storage_path(&empty()) {
        Err(ResolveError::NonNumericIndex { value, .. }) => assert_eq!(value, "x"),
        other => panic!("expected a non numeric index, got {:?}", other),
    }
}

#[test]
fn test_integral_float_index_is_accepted() {
    let node = bracketed("path", dec(2.0), &[]);
    assert_eq!(build(node).resolve_storage_path(&empty()).unwrap(), "path[2]");

    let node = bracketed("path", dec(2.5), &[]);
    assert!(matches!(
        build(node).resolve_storage_path(&empty()),
        Err(ResolveError::NonNumericIndex { .. })
    ));
}

#[test]
fn test_only_variables_have_storage_paths() {
    assert!(matches!(
        build(int(1)).resolve_storage_path(&empty()),
        Err(ResolveError::NotAPath(_))
    ));
}

#[test]
fn test_leading_root_marker_is_dropped() {
    let path = build(path("/my/path")).resolve_storage_path(&empty()).unwrap();
    assert_eq!(path, "my/path");
}

#[test]
fn test_missing_values_continue_against_enclosing_content() {
    let content = object(vec![("idx", Value::Integer(1))]);
    let node = Node::variable(vec![
        Node::segment("missing"),
        Node::segment("child"),
        path("idx"),
        Node::segment("leaf"),
    ]);
    assert_eq!(
        build(node).resolve_storage_path(&content).unwrap(),
        "missing/child[1]/leaf"
    );
}

#[test]
fn test_nested_index_reads_the_indexed_item() {
    let item = object(vec![
        ("pos", Value::Integer(4)),
        ("sub", Value::Array(vec![])),
    ]);
    let content = object(vec![
        ("pos", Value::Integer(7)),
        ("items", Value::Array(vec![Value::Object(item)])),
    ]);

    let node = |index: i64| {
        Node::variable(vec![
            Node::segment("items"),
            int(index),
            Node::segment("sub"),
            path("pos"),
        ])
    };

    assert_eq!(
        build(node(0)).resolve_storage_path(&content).unwrap(),
        "items[0]/sub[4]"
    );
    // no sixth item, the index is read from the root instead
    assert_eq!(
        build(node(5)).resolve_storage_path(&content).unwrap(),
        "items[5]/sub[7]"
    );
}

#[test]
fn test_json_content() {
    let document = json!({
        "idx": 0,
        "groups": [{ "slot": 2 }],
    });
    let content = document.as_object().cloned().unwrap_or_default();

    let node = Node::variable(vec![
        Node::segment("groups"),
        path("idx"),
        Node::segment("values"),
        path("slot"),
    ]);
    assert_eq!(
        build(node).resolve_storage_path(&content).unwrap(),
        "groups[0]/values[2]"
    );
}
