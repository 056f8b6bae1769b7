use std::fmt;

/// Operators of classic (infix, prefix and postfix) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Arithmetic
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Modulo (`%`)
    Mod,
    /// Exponentiation (`**`)
    Power,

    // Increment / decrement
    /// Postfix increment (`++`)
    Increase,
    /// Postfix decrement (`--`)
    Decrease,

    // Equality
    /// Equal (`==`)
    Equals,
    /// Not equal (`!=`)
    NotEquals,

    // Ordering
    /// Less than (`<`)
    Lesser,
    /// Less than or equal (`<=`)
    LesserOrEquals,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterOrEquals,

    // Boolean
    /// Logical AND (`&&`)
    LogicalAnd,
    /// Logical OR (`||`)
    LogicalOr,
    /// Non short-circuiting AND (`&`)
    BitwiseAnd,
    /// Non short-circuiting OR (`|`)
    BitwiseOr,
    /// Exclusive OR (`^`)
    Xor,
    /// Negated exclusive OR (`!^`)
    NotXor,
    /// Prefix negation (`!`)
    Not,

    // Membership
    /// Left operand is an element of the right collection (`#`)
    In,
    /// Negated membership (`!#`)
    NotIn,

    // Pattern
    /// Left string matches the right regular expression (`~`)
    Matches,
    /// Negated pattern match (`!~`)
    NotMatches,
}

/// Disjoint groups of operators that share one set of typing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    Arithmetic,
    Increment,
    Equality,
    Ordering,
    Boolean,
    Membership,
    Pattern,
}

impl Operator {
    pub const fn class(self) -> OperatorClass {
        use Operator::*;
        match self {
            Add | Subtract | Multiply | Divide | Mod | Power => OperatorClass::Arithmetic,
            Increase | Decrease => OperatorClass::Increment,
            Equals | NotEquals => OperatorClass::Equality,
            Lesser | LesserOrEquals | Greater | GreaterOrEquals => OperatorClass::Ordering,
            LogicalAnd | LogicalOr | BitwiseAnd | BitwiseOr | Xor | NotXor | Not => {
                OperatorClass::Boolean
            }
            In | NotIn => OperatorClass::Membership,
            Matches | NotMatches => OperatorClass::Pattern,
        }
    }

    /// Whether the operator takes an operand on its left.
    pub const fn has_left_operand(self) -> bool {
        !matches!(self, Operator::Not)
    }

    /// Whether the operator takes an operand on its right.
    pub const fn has_right_operand(self) -> bool {
        !matches!(self, Operator::Increase | Operator::Decrease)
    }

    /// Operators that may be applied to complex (record) operands.
    pub const fn accepts_complex_operands(self) -> bool {
        matches!(
            self.class(),
            OperatorClass::Boolean | OperatorClass::Equality | OperatorClass::Membership
        )
    }

    pub const fn symbol(self) -> &'static str {
        use Operator::*;
        match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Mod => "%",
            Power => "**",
            Increase => "++",
            Decrease => "--",
            Equals => "==",
            NotEquals => "!=",
            Lesser => "<",
            LesserOrEquals => "<=",
            Greater => ">",
            GreaterOrEquals => ">=",
            LogicalAnd => "&&",
            LogicalOr => "||",
            BitwiseAnd => "&",
            BitwiseOr => "|",
            Xor => "^",
            NotXor => "!^",
            Not => "!",
            In => "#",
            NotIn => "!#",
            Matches => "~",
            NotMatches => "!~",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
