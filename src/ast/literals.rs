use std::fmt;

/// Literal value carried by a literal node.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Boolean literal (`true`, `false`)
    Boolean(bool),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// 'dude'
    /// ```
    String(String),

    /// Integer literal
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Integer(i64),

    /// Decimal literal
    ///
    /// # Example
    /// ```text
    /// 5.5
    /// ```
    Decimal(f64),
}

/// The native kind of a literal, used to pick its simple type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Boolean,
    String,
    Integer,
    Decimal,
}

impl Literal {
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Boolean(_) => LiteralKind::Boolean,
            Literal::String(_) => LiteralKind::String,
            Literal::Integer(_) => LiteralKind::Integer,
            Literal::Decimal(_) => LiteralKind::Decimal,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Decimal(n) => write!(f, "{}", n),
        }
    }
}
