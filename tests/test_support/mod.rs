#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use clove_types::{
    CollectionStrategy, ComplexRef, Converter, DefaultConverter, Diagnostic, Element,
    Environment, Expression, Literal, NativeClass, Node, OperationFactory, Operator, Record, Type,
    Value,
};

/// `Test { myInteger: Integer }`
pub fn item_type() -> ComplexRef {
    Record::new("Test")
        .field("myInteger", Type::Simple(NativeClass::Integer))
        .shared()
}

/// The schema most tests run against:
///
/// ```text
/// Test2
/// ├── myDouble: Double
/// ├── test: Test
/// ├── list: Test*
/// ├── groups: Group*          Group { test: Test }
/// ├── tags: String*           (custom "set" strategy)
/// ├── records: Test*          (array strategy)
/// ├── anything: Object
/// └── payload: <opaque>
/// ```
pub fn schema() -> ComplexRef {
    let item = item_type();
    let group = Record::new("Group")
        .field("test", Type::Complex(item.clone()))
        .shared();
    Record::new("Test2")
        .field("myDouble", Type::Simple(NativeClass::Double))
        .field("test", Type::Complex(item.clone()))
        .list_field("list", Type::Complex(item.clone()))
        .list_field("groups", Type::Complex(group))
        .with(
            Element::new("tags", Type::Simple(NativeClass::String))
                .list()
                .with_collection(CollectionStrategy::Custom("set".to_string())),
        )
        .with(
            Element::new("records", Type::Complex(item))
                .list()
                .with_collection(CollectionStrategy::Array),
        )
        .field("anything", Type::Simple(NativeClass::Object))
        .field("payload", Type::Complex(Arc::new(Record::opaque("Payload"))))
        .shared()
}

pub fn int(n: i64) -> Node {
    Node::literal(Literal::Integer(n))
}

pub fn dec(n: f64) -> Node {
    Node::literal(Literal::Decimal(n))
}

pub fn boolean(b: bool) -> Node {
    Node::literal(Literal::Boolean(b))
}

pub fn string(s: &str) -> Node {
    Node::literal(Literal::String(s.to_string()))
}

pub fn binary(left: Node, op: Operator, right: Node) -> Node {
    Node::classic(vec![left, Node::Operator(op), right])
}

/// A plain path, `a/b/c`; a leading `/` stays on the first segment.
pub fn path(text: &str) -> Node {
    let (absolute, rest) = match text.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let segments = rest
        .split('/')
        .enumerate()
        .map(|(i, s)| {
            if i == 0 && absolute {
                Node::segment(format!("/{}", s))
            } else {
                Node::segment(s)
            }
        })
        .collect();
    Node::variable(segments)
}

/// `segment[bracket]/rest...`
pub fn bracketed(segment: &str, bracket: Node, rest: &[&str]) -> Node {
    let mut children = vec![Node::segment(segment), bracket];
    children.extend(rest.iter().map(|s| Node::segment(*s)));
    Node::variable(children)
}

pub fn build(node: Node) -> Expression {
    OperationFactory::default().build(&node).unwrap()
}

pub fn build_with(env: Environment, node: Node) -> Expression {
    OperationFactory::new(env).build(&node).unwrap()
}

pub fn validate(node: Node, schema: Option<&ComplexRef>) -> Vec<Diagnostic> {
    build(node).validate(schema).unwrap()
}

pub fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.message().to_string()).collect()
}

pub fn object(pairs: Vec<(&str, Value)>) -> HashMap<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Converter of a runtime that also casts booleans to and from numbers.
#[derive(Debug)]
pub struct PermissiveConverter;

impl Converter for PermissiveConverter {
    fn can_convert(&self, from: &NativeClass, to: &NativeClass) -> bool {
        DefaultConverter.can_convert(from, to)
            || (from.is_boolean() && to.is_number())
            || (from.is_number() && to.is_boolean())
    }
}

pub fn permissive() -> Environment {
    Environment::new().with_converter(PermissiveConverter)
}
