use std::{fmt, str::FromStr};

use crate::{
    ast::{Literal, Operator},
    error::ResolveError,
};

/// Discriminator the factory uses to pick a typed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// A single literal value
    Literal,
    /// A classic operation around one operator
    Operator,
    /// A variable path
    Variable,
    /// A call to a registered method
    MethodCall,
}

impl FromStr for OperationKind {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "literal" | "native" => Ok(OperationKind::Literal),
            "operator" | "classic" => Ok(OperationKind::Operator),
            "variable" => Ok(OperationKind::Variable),
            "method" | "method_call" | "methodcall" => Ok(OperationKind::MethodCall),
            _ => Err(ResolveError::UnknownOperationKind(s.to_string())),
        }
    }
}

/// A node of the tree produced by the query parser.
///
/// Leaves carry a literal, an operator, a path segment or a method reference.
/// Compound nodes are operations whose ordered children are interpreted
/// according to their [`OperationKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal value
    Literal(Literal),

    /// The `null` literal, which has no type
    Null,

    /// Operator inside a classic operation
    Operator(Operator),

    /// Named path segment
    ///
    /// # Examples
    /// ```text
    /// list        // Segment("list")
    /// /root       // Segment("/root"), absolute reference
    /// @id         // Segment("@id"), attribute reference
    /// $this       // Segment("$this"), the current element
    /// ```
    Segment(String),

    /// Reference to a callable, always the first child of a method call
    Method(String),

    /// Nested operation
    Operation {
        kind: OperationKind,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn segment(name: impl Into<String>) -> Self {
        Node::Segment(name.into())
    }

    pub fn operation(kind: OperationKind, children: Vec<Node>) -> Self {
        Node::Operation { kind, children }
    }

    /// A literal operation wrapping one value.
    pub fn literal(literal: Literal) -> Self {
        Node::operation(OperationKind::Literal, vec![Node::Literal(literal)])
    }

    /// A classic operation; children are operands and the operator in source order.
    pub fn classic(children: Vec<Node>) -> Self {
        Node::operation(OperationKind::Operator, children)
    }

    /// A variable operation; children are segments and bracketed operations.
    pub fn variable(children: Vec<Node>) -> Self {
        Node::operation(OperationKind::Variable, children)
    }

    /// A variable operation made only of plain segments.
    ///
    /// ```
    /// use clove_types::Node;
    ///
    /// let path = Node::path(&["test", "myInteger"]);
    /// assert_eq!(path.to_string(), "test/myInteger");
    /// ```
    pub fn path(segments: &[&str]) -> Self {
        Node::variable(segments.iter().map(|s| Node::segment(*s)).collect())
    }

    /// A method call with its arguments.
    pub fn call(name: impl Into<String>, arguments: Vec<Node>) -> Self {
        let mut children = Vec::with_capacity(arguments.len() + 1);
        children.push(Node::Method(name.into()));
        children.extend(arguments);
        Node::operation(OperationKind::MethodCall, children)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(literal) => write!(f, "{}", literal),
            Node::Null => f.write_str("null"),
            Node::Operator(op) => write!(f, "{}", op),
            Node::Segment(name) => f.write_str(name),
            Node::Method(name) => f.write_str(name),
            Node::Operation { kind, children } => match kind {
                OperationKind::Literal => write_joined(f, children, ""),
                OperationKind::Operator => write_joined(f, children, " "),
                OperationKind::Variable => {
                    for (i, child) in children.iter().enumerate() {
                        match child {
                            Node::Operation { .. } => write!(f, "[{}]", child)?,
                            _ if i == 0 => write!(f, "{}", child)?,
                            _ => write!(f, "/{}", child)?,
                        }
                    }
                    Ok(())
                }
                OperationKind::MethodCall => {
                    let (name, arguments) = match children.split_first() {
                        Some((name, arguments)) => (name.to_string(), arguments),
                        None => (String::new(), &[][..]),
                    };
                    write!(f, "{}(", name)?;
                    write_joined(f, arguments, ", ")?;
                    f.write_str(")")
                }
            },
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[Node], separator: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}
