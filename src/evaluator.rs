use std::{borrow::Cow, cmp::Ordering};

use regex::Regex;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use thiserror::Error;

use crate::{
    ATTRIBUTE_MARKER, ROOT_MARKER, SELF_REFERENCE,
    ast::{Literal, Operator},
    content::Content,
    factory::Environment,
    operations::{ClassicOperation, MethodOperation, Operation, Part},
    value::Value,
};

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// Type mismatch or invalid operation for the given type
    #[error("Type error: {0}")]
    TypeError(String),

    /// Invalid field access or array index
    #[error("Access error: {0}")]
    AccessError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// The method is known to the resolver but has no implementation
    #[error("The method {0} has no implementation")]
    NotInvocable(String),
}

/// Where paths are read from.
#[derive(Clone, Copy)]
struct Frame<'a> {
    /// Content absolute paths start from
    root: &'a dyn Content,
    /// Content relative paths start from
    current: &'a dyn Content,
    /// The element a filter is applied to
    this: Option<&'a Value>,
}

/// Evaluates operations against live content.
///
/// Used to compute indexes while resolving storage paths, and exposed for
/// callers that want the value of a small expression. Arithmetic follows the
/// left operand: an integer left operand yields an integer.
///
/// # Examples
///
/// ```
/// use clove_types::{Evaluator, Environment, Literal, Node, OperationFactory, Operator, Value};
/// use std::collections::HashMap;
///
/// let factory = OperationFactory::default();
/// let expression = factory
///     .build(&Node::classic(vec![
///         Node::path(&["size"]),
///         Node::Operator(Operator::Multiply),
///         Node::literal(Literal::Integer(2)),
///     ]))
///     .unwrap();
///
/// let mut content = HashMap::new();
/// content.insert("size".to_string(), Value::Integer(21));
///
/// let env = Environment::default();
/// let result = Evaluator::new(&env).evaluate(expression.operation(), &content).unwrap();
/// assert_eq!(result, Value::Integer(42));
/// ```
pub struct Evaluator<'e> {
    env: &'e Environment,
}

impl<'e> Evaluator<'e> {
    pub fn new(env: &'e Environment) -> Self {
        Evaluator { env }
    }

    pub fn evaluate(&self, operation: &Operation, content: &dyn Content) -> Result<Value, EvalError> {
        self.evaluate_in(operation, content, content)
    }

    /// Evaluate with relative paths starting at `current` and absolute ones at `root`.
    pub fn evaluate_in(
        &self,
        operation: &Operation,
        root: &dyn Content,
        current: &dyn Content,
    ) -> Result<Value, EvalError> {
        let frame = Frame {
            root,
            current,
            this: None,
        };
        self.eval(operation, frame)
    }

    fn eval(&self, operation: &Operation, frame: Frame<'_>) -> Result<Value, EvalError> {
        match operation {
            Operation::Literal(op) => match op.parts() {
                [Part::Literal(literal)] => Ok(literal_value(literal)),
                _ => Err(EvalError::TypeError(format!(
                    "{} is not a single literal",
                    op
                ))),
            },
            Operation::Classic(op) => self.eval_classic(op, frame),
            Operation::Variable(op) => self.eval_path(op.parts(), frame),
            Operation::Method(op) => self.eval_method(op, frame),
        }
    }

    fn eval_part(&self, part: &Part, frame: Frame<'_>) -> Result<Value, EvalError> {
        match part {
            Part::Literal(literal) => Ok(literal_value(literal)),
            Part::Null => Ok(Value::Null),
            Part::Operation(operation) => self.eval(operation, frame),
            other => Err(EvalError::TypeError(format!(
                "{} can not be used as an operand",
                other
            ))),
        }
    }

    fn eval_path<'a>(&self, parts: &[Part], frame: Frame<'a>) -> Result<Value, EvalError> {
        let Some((Part::Segment(first), rest)) = parts.split_first() else {
            return Err(EvalError::AccessError("a path must start with a field".to_string()));
        };

        // fields are borrowed from the content until a step has to build a value
        let mut current: Cow<'a, Value> = if let Some(name) = first.strip_prefix(ROOT_MARKER) {
            field(frame.root, name)
        } else if first == SELF_REFERENCE {
            frame
                .this
                .map_or(Cow::Owned(Value::Null), Cow::Borrowed)
        } else {
            field(frame.current, first)
        };

        for part in rest {
            current = match part {
                Part::Segment(name) => match current {
                    Cow::Borrowed(value) => select(value, name),
                    Cow::Owned(value) => Cow::Owned(select(&value, name).into_owned()),
                },
                Part::Operation(bracket) if bracket.is_predicate() => {
                    Cow::Owned(self.filter(current.into_owned(), bracket, frame)?)
                }
                Part::Operation(bracket) => {
                    let index = self.eval(bracket, frame)?;
                    Cow::Owned(apply_index(&current, &index)?)
                }
                other => {
                    return Err(EvalError::AccessError(format!(
                        "{} can not be used in a path",
                        other
                    )));
                }
            };
        }
        Ok(current.into_owned())
    }

    /// Keep the elements for which `predicate` holds.
    fn filter(
        &self,
        value: Value,
        predicate: &Operation,
        frame: Frame<'_>,
    ) -> Result<Value, EvalError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Null => return Ok(Value::Array(Vec::new())),
            single => vec![single],
        };
        let mut kept = Vec::new();
        for item in items {
            let matches = match item.as_content() {
                Some(content) => {
                    let inner = Frame {
                        root: frame.root,
                        current: content,
                        this: Some(&item),
                    };
                    self.eval(predicate, inner)?.as_bool()
                }
                None => {
                    let inner = Frame {
                        this: Some(&item),
                        ..frame
                    };
                    self.eval(predicate, inner)?.as_bool()
                }
            };
            if matches {
                kept.push(item);
            }
        }
        Ok(Value::Array(kept))
    }

    fn eval_classic(&self, op: &ClassicOperation, frame: Frame<'_>) -> Result<Value, EvalError> {
        let Some((index, operator)) =
            op.parts()
                .iter()
                .enumerate()
                .find_map(|(i, part)| match part {
                    Part::Operator(operator) => Some((i, *operator)),
                    _ => None,
                })
        else {
            return Err(EvalError::TypeError(format!("no operator found in {}", op)));
        };

        let left = match op.parts().get(..index).and_then(<[Part]>::last) {
            Some(part) => self.eval_part(part, frame)?,
            None => Value::Null,
        };
        let right = match op.parts().get(index + 1) {
            Some(part) => self.eval_part(part, frame)?,
            None => Value::Null,
        };
        apply_operator(operator, &left, &right)
    }

    fn eval_method(&self, op: &MethodOperation, frame: Frame<'_>) -> Result<Value, EvalError> {
        let name = op
            .name()
            .map_err(|_| EvalError::UnknownMethod(op.to_string()))?;
        let signature = self
            .env
            .methods()
            .resolve(name, op.arguments().len())
            .map_err(|e| EvalError::UnknownMethod(e.to_string()))?;
        let implementation = signature
            .implementation
            .as_ref()
            .ok_or_else(|| EvalError::NotInvocable(name.to_string()))?;

        let mut arguments = Vec::with_capacity(op.arguments().len());
        for argument in op.arguments() {
            arguments.push(self.eval_part(argument, frame)?);
        }
        (**implementation)(&arguments)
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Decimal(n) => Value::Float(*n),
    }
}

/// Read a field, folding `@name` onto `name` when only the latter exists.
fn field<'a>(content: &'a dyn Content, name: &str) -> Cow<'a, Value> {
    content
        .get(name)
        .or_else(|| {
            name.strip_prefix(ATTRIBUTE_MARKER)
                .and_then(|stripped| content.get(stripped))
        })
        .unwrap_or(Cow::Owned(Value::Null))
}

/// Step into a field; lists are flattened.
fn select<'a>(value: &'a Value, name: &str) -> Cow<'a, Value> {
    match value {
        Value::Array(items) => {
            let mut selected = Vec::new();
            for item in items {
                match select(item, name).into_owned() {
                    Value::Null => {}
                    Value::Array(nested) => selected.extend(nested),
                    other => selected.push(other),
                }
            }
            Cow::Owned(Value::Array(selected))
        }
        other => match other.as_content() {
            Some(content) => field(content, name),
            None => Cow::Owned(Value::Null),
        },
    }
}

fn apply_index(value: &Value, index: &Value) -> Result<Value, EvalError> {
    let n = match index {
        Value::Integer(n) => *n,
        Value::Float(n) if n.fract() == 0.0 => *n as i64,
        other => {
            return Err(EvalError::AccessError(format!(
                "Cannot index with {}",
                other.type_name()
            )));
        }
    };
    match value {
        Value::Array(items) => {
            let index = if n < 0 {
                // Negative index: count from end (-1 = last)
                let back = n.unsigned_abs() as usize;
                if back > items.len() {
                    return Ok(Value::Null);
                }
                items.len() - back
            } else {
                n as usize
            };
            Ok(items.get(index).cloned().unwrap_or(Value::Null))
        }
        Value::Null => Ok(Value::Null),
        v => Err(EvalError::TypeError(format!(
            "Cannot use integer index on {}; only arrays support integer indexing",
            v.type_name()
        ))),
    }
}

fn apply_operator(op: Operator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        Operator::Add
        | Operator::Subtract
        | Operator::Multiply
        | Operator::Divide
        | Operator::Mod
        | Operator::Power => arithmetic(op, left, right),
        Operator::Increase | Operator::Decrease => {
            let step = Value::Integer(if op == Operator::Increase { 1 } else { -1 });
            arithmetic(Operator::Add, left, &step)
        }
        Operator::Equals => Ok(Value::Boolean(equals(left, right))),
        Operator::NotEquals => Ok(Value::Boolean(!equals(left, right))),
        Operator::Lesser => compare(op, left, right).map(|o| Value::Boolean(o == Ordering::Less)),
        Operator::LesserOrEquals => {
            compare(op, left, right).map(|o| Value::Boolean(o != Ordering::Greater))
        }
        Operator::Greater => {
            compare(op, left, right).map(|o| Value::Boolean(o == Ordering::Greater))
        }
        Operator::GreaterOrEquals => {
            compare(op, left, right).map(|o| Value::Boolean(o != Ordering::Less))
        }
        Operator::LogicalAnd => Ok(Value::Boolean(left.as_bool() && right.as_bool())),
        Operator::LogicalOr => Ok(Value::Boolean(left.as_bool() || right.as_bool())),
        Operator::BitwiseAnd => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a & b)),
            _ => Ok(Value::Boolean(left.as_bool() & right.as_bool())),
        },
        Operator::BitwiseOr => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a | b)),
            _ => Ok(Value::Boolean(left.as_bool() | right.as_bool())),
        },
        Operator::Xor => Ok(Value::Boolean(left.as_bool() ^ right.as_bool())),
        Operator::NotXor => Ok(Value::Boolean(!(left.as_bool() ^ right.as_bool()))),
        Operator::Not => Ok(Value::Boolean(!right.as_bool())),
        Operator::In => contains(right, left).map(Value::Boolean),
        Operator::NotIn => contains(right, left).map(|found| Value::Boolean(!found)),
        Operator::Matches => matches(left, right).map(Value::Boolean),
        Operator::NotMatches => matches(left, right).map(|m| Value::Boolean(!m)),
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Integer(n) => Some(Decimal::from(*n)),
        Value::Float(n) => Decimal::from_f64(*n),
        _ => None,
    }
}

/// Numeric operators; the left operand decides the type of the result.
fn arithmetic(op: Operator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if op == Operator::Add
        && let Value::String(a) = left
    {
        return Ok(Value::String(format!("{}{}", a, right.as_string())));
    }
    if op == Operator::Power {
        return power(left, right);
    }

    let (Some(a), Some(b)) = (decimal(left), decimal(right)) else {
        return Err(EvalError::TypeError(format!(
            "Cannot apply {} to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        )));
    };
    if matches!(op, Operator::Divide | Operator::Mod) && b.is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    let result = match op {
        Operator::Add => a.checked_add(b),
        Operator::Subtract => a.checked_sub(b),
        Operator::Multiply => a.checked_mul(b),
        Operator::Divide => a.checked_div(b),
        _ => a.checked_rem(b),
    }
    .ok_or_else(|| EvalError::TypeError(format!("Overflow computing {} {} {}", a, op, b)))?;

    let value = match left {
        Value::Integer(_) => result.trunc().to_i64().map(Value::Integer),
        _ => result.to_f64().map(Value::Float),
    };
    value.ok_or_else(|| EvalError::TypeError(format!("{} does not fit the left operand", result)))
}

fn power(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) if *b >= 0 => u32::try_from(*b)
            .ok()
            .and_then(|b| a.checked_pow(b))
            .map(Value::Integer)
            .ok_or_else(|| EvalError::TypeError(format!("Overflow computing {} ** {}", a, b))),
        (Value::Integer(_), _) | (Value::Float(_), _) => {
            match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => {
                    let result = a.powf(b);
                    Ok(match left {
                        Value::Integer(_) => Value::Integer(result.trunc() as i64),
                        _ => Value::Float(result),
                    })
                }
                _ => Err(EvalError::TypeError(format!(
                    "Cannot raise {} to {}",
                    left.type_name(),
                    right.type_name()
                ))),
            }
        }
        (a, b) => Err(EvalError::TypeError(format!(
            "Cannot raise {} to {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(_), Value::Float(_)) | (Value::Float(_), Value::Integer(_)) => {
            left.as_float() == right.as_float()
        }
        _ => left == right,
    }
}

fn compare(op: Operator, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        (a, b) => match (a.as_float(), b.as_float()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };
    ordering.ok_or_else(|| {
        EvalError::TypeError(format!(
            "Cannot compare {} {} {}",
            left.type_name(),
            op,
            right.type_name()
        ))
    })
}

fn contains(collection: &Value, needle: &Value) -> Result<bool, EvalError> {
    match collection {
        Value::Array(items) => Ok(items.iter().any(|item| equals(item, needle))),
        Value::Null => Ok(false),
        other => Err(EvalError::TypeError(format!(
            "Cannot search in {}, a collection is required",
            other.type_name()
        ))),
    }
}

/// The whole string must match the pattern.
fn matches(value: &Value, pattern: &Value) -> Result<bool, EvalError> {
    let Value::String(pattern) = pattern else {
        return Err(EvalError::TypeError(format!(
            "a pattern must be a string, got {}",
            pattern.type_name()
        )));
    };
    let re = Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| EvalError::InvalidPattern(e.to_string()))?;
    match value {
        Value::Null => Ok(false),
        other => Ok(re.is_match(&other.as_string())),
    }
}
