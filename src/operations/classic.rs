use std::fmt;

use crate::{
    ast::{Operator, OperatorClass},
    diagnostics::Diagnostic,
    error::ResolveError,
    schema::ComplexRef,
    types::{NativeClass, Type},
};

use super::{Part, Resolved, Scope, literal_type, unexpected, write_joined};

/// An operation around a single operator.
///
/// The operands sit directly left and right of the operator; nested
/// expressions are nested operations.
#[derive(Debug, Clone)]
pub struct ClassicOperation {
    parts: Vec<Part>,
}

/// Operands on both sides of the operator.
struct Sides<'p> {
    index: usize,
    operator: Operator,
    left: Option<&'p Part>,
    right: Option<&'p Part>,
}

impl ClassicOperation {
    pub fn new(parts: Vec<Part>) -> Self {
        ClassicOperation { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// The governing operator, if any.
    pub fn operator(&self) -> Option<Operator> {
        self.parts.iter().find_map(|part| match part {
            Part::Operator(op) => Some(*op),
            _ => None,
        })
    }

    fn sides(&self) -> Result<Sides<'_>, ResolveError> {
        let (index, operator) = self
            .parts
            .iter()
            .enumerate()
            .find_map(|(i, part)| match part {
                Part::Operator(op) => Some((i, *op)),
                _ => None,
            })
            .ok_or_else(|| ResolveError::NoOperator(self.to_string()))?;

        let (left, right) = (&self.parts[..index], &self.parts[index + 1..]);
        if left.len() > 1 {
            return Err(unexpected(&left[0], self));
        }
        if right.len() > 1 {
            return Err(unexpected(&right[1], self));
        }
        Ok(Sides {
            index,
            operator,
            left: left.first(),
            right: right.first(),
        })
    }

    pub(super) fn resolve(
        &self,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
    ) -> Result<Resolved, ResolveError> {
        let sides = self.sides()?;
        if sides.operator.class() != OperatorClass::Arithmetic {
            return Ok(Resolved::scalar(Type::boolean()));
        }
        // the left operand determines the result
        let ty = match sides.left {
            Some(Part::Operation(operation)) => operation.resolve(scope, context)?.ty,
            Some(Part::Literal(literal)) => literal_type(scope, literal),
            Some(other) => return Err(unexpected(other, self)),
            None => {
                return Err(ResolveError::UnexpectedPart {
                    part: sides.operator.to_string(),
                    operation: self.to_string(),
                });
            }
        };
        Ok(Resolved::scalar(ty))
    }

    /// Type of one operand; `None` for `null` or when the operand itself is invalid.
    fn operand(
        &self,
        part: &Part,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
        messages: &mut Vec<Diagnostic>,
    ) -> Result<Option<Resolved>, ResolveError> {
        match part {
            Part::Null => Ok(None),
            Part::Literal(literal) => Ok(Some(Resolved::scalar(literal_type(scope, literal)))),
            Part::Operation(operation) => {
                let nested = operation.validate(scope, context)?;
                if !nested.is_empty() {
                    messages.extend(nested);
                    return Ok(None);
                }
                operation.resolve(scope, context).map(Some)
            }
            other => Err(unexpected(other, self)),
        }
    }

    pub(super) fn validate(
        &self,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
    ) -> Result<Vec<Diagnostic>, ResolveError> {
        let Sides {
            index,
            operator: op,
            left,
            right,
        } = self.sides()?;
        let mut messages = Vec::new();

        if op.has_left_operand() && index == 0 {
            messages.push(Diagnostic::error(format!(
                "There is no left operand for the operator {}",
                op
            )));
            return Ok(messages);
        }
        if op.has_right_operand() && right.is_none() {
            messages.push(Diagnostic::error(format!(
                "There is no right operand for the operator {}",
                op
            )));
            return Ok(messages);
        }
        if !op.has_left_operand() && left.is_some() {
            messages.push(Diagnostic::error(format!(
                "The operator {} does not support a left operand",
                op
            )));
            return Ok(messages);
        }
        if !op.has_right_operand() && right.is_some() {
            messages.push(Diagnostic::error(format!(
                "The operator {} does not support a right operand",
                op
            )));
            return Ok(messages);
        }

        let left = match left {
            Some(part) => self.operand(part, scope, context, &mut messages)?,
            None => None,
        };
        let right = match right {
            Some(part) => self.operand(part, scope, context, &mut messages)?,
            None => None,
        };
        if !messages.is_empty() {
            return Ok(messages);
        }

        // null checks are the only comparison that works on untyped operands
        if op.class() == OperatorClass::Equality && (left.is_none() || right.is_none()) {
            return Ok(messages);
        }

        match op.class() {
            OperatorClass::Boolean => {}
            OperatorClass::Membership if right.is_none() => {
                messages.push(Diagnostic::error(format!(
                    "The operator {} requires a right operand",
                    op
                )));
                return Ok(messages);
            }
            OperatorClass::Membership => {}
            _ => {
                let side = if op.has_left_operand() && left.is_none() {
                    Some("left")
                } else if op.has_right_operand() && right.is_none() {
                    Some("right")
                } else {
                    None
                };
                if let Some(side) = side {
                    messages.push(Diagnostic::error(format!(
                        "The operator {} does not accept a null {} operand",
                        op, side
                    )));
                    return Ok(messages);
                }
            }
        }

        if !op.accepts_complex_operands() {
            for (side, operand) in [("left", &left), ("right", &right)] {
                if let Some(resolved) = operand
                    && !resolved.ty.is_simple()
                {
                    messages.push(Diagnostic::error(format!(
                        "The {} operand {} is not compatible with the operator {}",
                        side, resolved.ty, op
                    )));
                    return Ok(messages);
                }
            }
        }

        let left_class = left.as_ref().map(|r| r.ty.native_class());
        let right_class = right.as_ref().map(|r| r.ty.native_class());
        if left_class.as_ref().is_some_and(NativeClass::is_unconstrained)
            || right_class.as_ref().is_some_and(NativeClass::is_unconstrained)
        {
            return Ok(messages);
        }

        let rules = Rules { scope: &*scope, op };
        match op {
            Operator::Not => {
                if let Some(right) = &right
                    && !rules.is_boolean_like(&right.ty)
                {
                    messages.push(Diagnostic::error(format!(
                        "The operator {} expects a boolean right operand, not {}",
                        op, right.ty
                    )));
                }
            }
            Operator::Increase | Operator::Decrease => {
                if let Some(left) = &left_class
                    && !left.is_number()
                {
                    messages.push(Diagnostic::error(format!(
                        "The operator {} expects a number left operand, not {}",
                        op, left
                    )));
                }
            }
            Operator::Add => {
                if let (Some(l), Some(r)) = (&left_class, &right_class) {
                    for (side, class) in [("left", l), ("right", r)] {
                        if !rules.is_addable(class) {
                            messages.push(Diagnostic::error(format!(
                                "The operator {} only supports numbers and strings, the {} operand is however of type {}",
                                op, side, class
                            )));
                        }
                    }
                    rules.check_cast(l, r, &mut messages);
                }
            }
            Operator::Subtract
            | Operator::Multiply
            | Operator::Divide
            | Operator::Mod
            | Operator::Power => {
                if let (Some(l), Some(r)) = (&left_class, &right_class) {
                    for (side, class) in [("left", l), ("right", r)] {
                        if !class.is_number() {
                            messages.push(Diagnostic::error(format!(
                                "The operator {} only supports numbers, the {} operand is however of type {}",
                                op, side, class
                            )));
                        }
                    }
                    rules.check_cast(l, r, &mut messages);
                }
            }
            Operator::Equals | Operator::NotEquals => {
                if let (Some(l), Some(r)) = (&left_class, &right_class) {
                    rules.check_cast(l, r, &mut messages);
                }
            }
            Operator::Lesser
            | Operator::LesserOrEquals
            | Operator::Greater
            | Operator::GreaterOrEquals => {
                if let (Some(l), Some(r)) = (&left_class, &right_class) {
                    for (side, class) in [("left", l), ("right", r)] {
                        if !class.is_comparable() {
                            messages.push(Diagnostic::error(format!(
                                "The operator {} only supports comparable types, the {} operand is however of type {}",
                                op, side, class
                            )));
                        }
                    }
                    rules.check_cast(l, r, &mut messages);
                }
            }
            Operator::LogicalAnd
            | Operator::LogicalOr
            | Operator::BitwiseAnd
            | Operator::BitwiseOr
            | Operator::Xor
            | Operator::NotXor => {
                // null and complex operands act as existence tests
                for (side, operand) in [("left", &left), ("right", &right)] {
                    if let Some(resolved) = operand
                        && !rules.is_boolean_like(&resolved.ty)
                    {
                        messages.push(Diagnostic::error(format!(
                            "The operator {} only supports boolean types, the {} operand is however of type {}",
                            op, side, resolved.ty
                        )));
                    }
                }
            }
            Operator::In | Operator::NotIn => {
                if let Some(right) = &right
                    && !right.is_collection()
                    && !right.ty.as_simple().is_some_and(NativeClass::is_iterable)
                {
                    messages.push(Diagnostic::error(format!(
                        "The operator {} only supports a collection as the right operand, it is however of type {}",
                        op, right.ty
                    )));
                }
            }
            Operator::Matches | Operator::NotMatches => {
                if let (Some(l), Some(r)) = (&left_class, &right_class) {
                    for (side, class) in [("left", l), ("right", r)] {
                        if !rules.is_string_like(class) {
                            messages.push(Diagnostic::error(format!(
                                "The operator {} only supports string types, the {} operand is however of type {}",
                                op, side, class
                            )));
                        }
                    }
                }
            }
        }
        Ok(messages)
    }
}

/// Conversion-aware operand checks.
struct Rules<'s, 'a> {
    scope: &'s Scope<'a>,
    op: Operator,
}

impl Rules<'_, '_> {
    fn can_convert(&self, from: &NativeClass, to: &NativeClass) -> bool {
        self.scope.env().converter().can_convert(from, to)
    }

    fn is_boolean_like(&self, ty: &Type) -> bool {
        match ty {
            Type::Complex(_) => true,
            Type::Simple(class) => {
                class.is_boolean() || self.can_convert(class, &NativeClass::Boolean)
            }
        }
    }

    fn is_addable(&self, class: &NativeClass) -> bool {
        class.is_number()
            || class.is_string()
            || self.can_convert(class, &NativeClass::String)
            || self.can_convert(class, &NativeClass::Double)
    }

    fn is_string_like(&self, class: &NativeClass) -> bool {
        class.is_string() || self.can_convert(class, &NativeClass::String)
    }

    /// The right operand is cast to the type of the left one.
    fn check_cast(&self, left: &NativeClass, right: &NativeClass, messages: &mut Vec<Diagnostic>) {
        if !self.can_convert(right, left) {
            messages.push(Diagnostic::error(format!(
                "The right operand of type {} can not be cast to the type of the left operand {} for the operator {}",
                right, left, self.op
            )));
        }
    }
}

impl fmt::Display for ClassicOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.parts, " ")
    }
}
