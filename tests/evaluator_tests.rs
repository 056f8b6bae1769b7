mod test_support;

use std::collections::HashMap;

use clove_types::{
    ComplexContent, Environment, EvalError, MethodRegistry, NativeClass, Node, Operator, Parameter,
    Returns, Signature, Value,
};
use test_support::*;

fn eval(node: Node) -> Result<Value, EvalError> {
    build(node).evaluate(&HashMap::<String, Value>::new())
}

fn records() -> HashMap<String, Value> {
    let list = [2, 3, 4, 5]
        .iter()
        .map(|n| Value::Object(object(vec![("myInteger", Value::Integer(*n))])))
        .collect();
    object(vec![
        ("list", Value::Array(list)),
        (
            "tags",
            Value::Array(vec![
                Value::String("a".to_string()),
                Value::String("b".to_string()),
            ]),
        ),
        ("id", Value::String("x1".to_string())),
    ])
}

#[test]
fn test_integer_division_truncates() {
    assert_eq!(eval(binary(int(7), Operator::Divide, int(2))).unwrap(), Value::Integer(3));
    assert_eq!(eval(binary(dec(7.0), Operator::Divide, int(2))).unwrap(), Value::Float(3.5));
}

#[test]
fn test_left_operand_decides_result() {
    assert_eq!(eval(binary(int(1), Operator::Add, dec(0.5))).unwrap(), Value::Integer(1));
    assert_eq!(eval(binary(dec(0.5), Operator::Add, int(1))).unwrap(), Value::Float(1.5));
    assert_eq!(
        eval(binary(string("a"), Operator::Add, int(1))).unwrap(),
        Value::String("a1".to_string())
    );
}

#[test]
fn test_division_by_zero() {
    assert!(matches!(
        eval(binary(int(1), Operator::Divide, int(0))),
        Err(EvalError::DivisionByZero)
    ));
    assert!(matches!(
        eval(binary(int(1), Operator::Mod, int(0))),
        Err(EvalError::DivisionByZero)
    ));
}

#[test]
fn test_power() {
    assert_eq!(eval(binary(int(2), Operator::Power, int(10))).unwrap(), Value::Integer(1024));
    assert_eq!(eval(binary(dec(4.0), Operator::Power, dec(0.5))).unwrap(), Value::Float(2.0));
}

#[test]
fn test_comparisons() {
    assert_eq!(eval(binary(int(3), Operator::Greater, int(2))).unwrap(), Value::Boolean(true));
    assert_eq!(eval(binary(string("a"), Operator::Lesser, string("b"))).unwrap(), Value::Boolean(true));
    assert_eq!(eval(binary(int(1), Operator::Lesser, dec(1.5))).unwrap(), Value::Boolean(true));
    assert_eq!(eval(binary(int(2), Operator::Equals, dec(2.0))).unwrap(), Value::Boolean(true));
    assert!(matches!(
        eval(binary(string("a"), Operator::Lesser, int(1))),
        Err(EvalError::TypeError(_))
    ));
}

#[test]
fn test_logical_operators() {
    assert_eq!(
        eval(binary(boolean(true), Operator::LogicalAnd, boolean(false))).unwrap(),
        Value::Boolean(false)
    );
    assert_eq!(
        eval(Node::classic(vec![Node::Operator(Operator::Not), boolean(true)])).unwrap(),
        Value::Boolean(false)
    );
}

#[test]
fn test_pattern_matches_whole_string() {
    assert_eq!(
        eval(binary(string("abc"), Operator::Matches, string("a.*"))).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        eval(binary(string("xabc"), Operator::Matches, string("a.*"))).unwrap(),
        Value::Boolean(false)
    );
    assert!(matches!(
        eval(binary(string("abc"), Operator::Matches, string("("))),
        Err(EvalError::InvalidPattern(_))
    ));
}

#[test]
fn test_path_over_list_keeps_order() {
    let content = records();
    let value = build(path("list/myInteger")).evaluate(&content).unwrap();
    assert_eq!(
        value,
        Value::Array(vec![
            Value::Integer(2),
            Value::Integer(3),
            Value::Integer(4),
            Value::Integer(5),
        ])
    );
}

#[test]
fn test_membership() {
    let content = records();
    let node = binary(int(4), Operator::In, path("list/myInteger"));
    assert_eq!(build(node).evaluate(&content).unwrap(), Value::Boolean(true));

    let node = binary(string("c"), Operator::NotIn, path("tags"));
    assert_eq!(build(node).evaluate(&content).unwrap(), Value::Boolean(true));
}

#[test]
fn test_filter_selects_matching_records() {
    let content = records();
    let node = bracketed(
        "list",
        binary(path("myInteger"), Operator::Greater, int(3)),
        &["myInteger"],
    );
    assert_eq!(
        build(node).evaluate(&content).unwrap(),
        Value::Array(vec![Value::Integer(4), Value::Integer(5)])
    );
}

#[test]
fn test_negative_index_counts_from_end() {
    let content = records();
    let node = bracketed("list", binary(int(0), Operator::Subtract, int(1)), &["myInteger"]);
    assert_eq!(build(node).evaluate(&content).unwrap(), Value::Integer(5));

    let node = bracketed("list", int(10), &["myInteger"]);
    assert_eq!(build(node).evaluate(&content).unwrap(), Value::Null);
}

#[test]
fn test_increment_indexes_instead_of_filtering() {
    let mut content = records();
    content.insert("i".to_string(), Value::Integer(1));
    let node = bracketed(
        "list",
        Node::classic(vec![path("i"), Node::Operator(Operator::Increase)]),
        &["myInteger"],
    );
    assert_eq!(build(node).evaluate(&content).unwrap(), Value::Integer(4));
}

#[test]
fn test_self_reference_over_scalars() {
    let content = records();
    let node = bracketed("tags", binary(path("$this"), Operator::Equals, string("b")), &[]);
    assert_eq!(
        build(node).evaluate(&content).unwrap(),
        Value::Array(vec![Value::String("b".to_string())])
    );
}

#[test]
fn test_attribute_folds_onto_field() {
    let content = records();
    assert_eq!(
        build(path("@id")).evaluate(&content).unwrap(),
        Value::String("x1".to_string())
    );
    assert_eq!(build(path("missing/child")).evaluate(&content).unwrap(), Value::Null);
}

#[test]
fn test_schema_content() {
    let item = ComplexContent::new(item_type())
        .with("myInteger", Value::Integer(3))
        .unwrap();
    let node = binary(path("myInteger"), Operator::Multiply, int(2));
    assert_eq!(build(node).evaluate(&item).unwrap(), Value::Integer(6));
}

#[test]
fn test_method_implementation_is_called() {
    let methods = MethodRegistry::new()
        .with(
            Signature::new(
                "double",
                vec![Parameter::coerced(NativeClass::Long)],
                Returns::Native(NativeClass::Long),
            )
            .implemented_by(|arguments| match arguments {
                [Value::Integer(n)] => Ok(Value::Integer(n * 2)),
                _ => Err(EvalError::TypeError("double expects an integer".to_string())),
            }),
        )
        .with(Signature::new(
            "declared",
            vec![],
            Returns::Native(NativeClass::Long),
        ));
    let env = Environment::new().with_methods(methods);
    let content = HashMap::<String, Value>::new();

    let expression = build_with(env.clone(), Node::call("double", vec![int(21)]));
    assert_eq!(expression.evaluate(&content).unwrap(), Value::Integer(42));

    let expression = build_with(env.clone(), Node::call("declared", vec![]));
    assert!(matches!(expression.evaluate(&content), Err(EvalError::NotInvocable(_))));

    let expression = build_with(env, Node::call("missing", vec![]));
    assert!(matches!(expression.evaluate(&content), Err(EvalError::UnknownMethod(_))));
}
