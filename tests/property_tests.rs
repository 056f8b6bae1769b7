mod test_support;

use std::collections::HashMap;

use clove_types::{
    Literal, LiteralKind, NativeClass, Node, Operator, OperatorClass, ResolveError, Type, Value,
};
use proptest::prelude::*;
use test_support::*;

const BINARY_OPERATORS: [Operator; 22] = [
    Operator::Add,
    Operator::Subtract,
    Operator::Multiply,
    Operator::Divide,
    Operator::Mod,
    Operator::Power,
    Operator::Equals,
    Operator::NotEquals,
    Operator::Lesser,
    Operator::LesserOrEquals,
    Operator::Greater,
    Operator::GreaterOrEquals,
    Operator::LogicalAnd,
    Operator::LogicalOr,
    Operator::BitwiseAnd,
    Operator::BitwiseOr,
    Operator::Xor,
    Operator::NotXor,
    Operator::In,
    Operator::NotIn,
    Operator::Matches,
    Operator::NotMatches,
];

fn arb_literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        any::<bool>().prop_map(Literal::Boolean),
        "[a-zA-Z0-9 ]{0,8}".prop_map(Literal::String),
        any::<i64>().prop_map(Literal::Integer),
        (-1.0e6..1.0e6f64).prop_map(Literal::Decimal),
    ]
}

fn arb_operator() -> impl Strategy<Value = Operator> {
    prop::sample::select(BINARY_OPERATORS.to_vec())
}

fn arb_segment() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,7}"
}

fn expected_type(literal: &Literal) -> Type {
    Type::Simple(match literal.kind() {
        LiteralKind::Boolean => NativeClass::Boolean,
        LiteralKind::String => NativeClass::String,
        LiteralKind::Integer => NativeClass::Long,
        LiteralKind::Decimal => NativeClass::Double,
    })
}

proptest! {
    #[test]
    fn literal_type_follows_kind(literal in arb_literal()) {
        let expected = expected_type(&literal);
        let expression = build(Node::literal(literal));
        prop_assert_eq!(expression.infer_type(None).unwrap(), expected);
        prop_assert!(!expression.is_collection(None).unwrap());
    }

    #[test]
    fn binary_type_follows_operator_class(
        left in arb_literal(),
        op in arb_operator(),
        right in arb_literal(),
    ) {
        let expected = if op.class() == OperatorClass::Arithmetic {
            expected_type(&left)
        } else {
            Type::boolean()
        };
        let expression = build(binary(Node::literal(left), op, Node::literal(right)));
        prop_assert_eq!(expression.infer_type(None).unwrap(), expected);
    }

    #[test]
    fn not_rejects_any_left_operand(left in arb_literal(), right in arb_literal()) {
        let node = binary(Node::literal(left), Operator::Not, Node::literal(right));
        prop_assert_eq!(validate(node, None).len(), 1);
    }

    #[test]
    fn validation_is_deterministic(
        left in arb_literal(),
        op in arb_operator(),
        right in arb_literal(),
    ) {
        let expression = build(binary(Node::literal(left), op, Node::literal(right)));
        let first = expression.validate(None).unwrap();
        let second = expression.validate(None).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn storage_path_keeps_literal_indexes(
        steps in prop::collection::vec((arb_segment(), proptest::option::of(0i64..10_000)), 1..6),
    ) {
        let mut children = Vec::new();
        let mut expected = Vec::new();
        for (segment, index) in &steps {
            children.push(Node::segment(segment.as_str()));
            match index {
                Some(index) => {
                    children.push(int(*index));
                    expected.push(format!("{}[{}]", segment, index));
                }
                None => expected.push(segment.clone()),
            }
        }

        let content: HashMap<String, Value> = HashMap::new();
        let path = build(Node::variable(children)).resolve_storage_path(&content).unwrap();
        prop_assert_eq!(path, expected.join("/"));
    }

    #[test]
    fn storage_path_rejects_negative_indexes(segment in arb_segment(), n in 1i64..10_000) {
        let node = bracketed(&segment, binary(int(0), Operator::Subtract, int(n)), &[]);
        let content: HashMap<String, Value> = HashMap::new();
        let result = build(node).resolve_storage_path(&content);
        prop_assert!(matches!(result, Err(ResolveError::NegativeIndex(index)) if index == -n));
    }
}
