//! Typed operations.
//!
//! The factory turns every operation node of a parser tree into one of the
//! four [`Operation`] variants. Each variant answers three questions against a
//! schema context: what type does it produce, does it produce a collection,
//! and is it well typed.
//!
//! Per-call state lives in a [`Scope`] created by the [`Expression`] entry
//! point and threaded through the recursion. Operations themselves are
//! immutable, so one tree can be resolved and validated from many threads.
//!
//! [`Expression`]: crate::Expression

pub mod classic;
pub mod literal;
pub mod method;
pub mod variable;

use std::fmt;

pub use classic::ClassicOperation;
pub use literal::LiteralOperation;
pub use method::MethodOperation;
pub use variable::VariableOperation;

use crate::{
    ast::{Literal, OperationKind, Operator, OperatorClass},
    diagnostics::Diagnostic,
    error::ResolveError,
    factory::Environment,
    schema::{CollectionStrategy, ComplexRef},
    types::Type,
};

/// A child of an operation.
#[derive(Debug, Clone)]
pub enum Part {
    Literal(Literal),
    Null,
    Operator(Operator),
    Segment(String),
    Method(String),
    Operation(Box<Operation>),
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Literal(literal) => write!(f, "{}", literal),
            Part::Null => f.write_str("null"),
            Part::Operator(op) => write!(f, "{}", op),
            Part::Segment(name) | Part::Method(name) => f.write_str(name),
            Part::Operation(operation) => write!(f, "{}", operation),
        }
    }
}

/// Result of one type inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub ty: Type,
    /// How the result is materialized when it is a collection
    pub collection: Option<CollectionStrategy>,
}

impl Resolved {
    pub fn scalar(ty: Type) -> Self {
        Resolved {
            ty,
            collection: None,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.collection.is_some()
    }
}

/// The stack of element types entered during one top-level call.
///
/// The bottom is the root of the walk, used by absolute (`/`) references;
/// the top is the current element, used by `$this`. Complex children are
/// entered while walking a path, and so is the element a filter is applied
/// to, simple or not.
#[derive(Debug, Clone, Default)]
pub struct PathState {
    contexts: Vec<Type>,
}

impl PathState {
    pub fn new(root: Option<&ComplexRef>) -> Self {
        PathState {
            contexts: root.into_iter().cloned().map(Type::Complex).collect(),
        }
    }

    pub fn root(&self) -> Option<&ComplexRef> {
        self.contexts.first().and_then(Type::as_complex)
    }

    pub fn current(&self) -> Option<&Type> {
        self.contexts.last()
    }

    pub fn push(&mut self, ty: Type) {
        self.contexts.push(ty);
    }

    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn truncate(&mut self, depth: usize) {
        self.contexts.truncate(depth);
    }
}

/// Per-call state threaded through resolution and validation.
#[derive(Debug)]
pub struct Scope<'a> {
    env: &'a Environment,
    state: PathState,
    depth: usize,
}

impl<'a> Scope<'a> {
    pub fn new(env: &'a Environment, root: Option<&ComplexRef>) -> Self {
        Scope {
            env,
            state: PathState::new(root),
            depth: 0,
        }
    }

    pub fn env(&self) -> &'a Environment {
        self.env
    }

    pub fn state(&self) -> &PathState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PathState {
        &mut self.state
    }

    /// Run `f` one nesting level deeper, enforcing the configured limit.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ResolveError>,
    ) -> Result<T, ResolveError> {
        if let Some(max) = self.env.config().max_depth
            && self.depth >= max
        {
            return Err(ResolveError::DepthExceeded(max));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// A typed operation.
#[derive(Debug, Clone)]
pub enum Operation {
    Literal(LiteralOperation),
    Classic(ClassicOperation),
    Variable(VariableOperation),
    Method(MethodOperation),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Literal(_) => OperationKind::Literal,
            Operation::Classic(_) => OperationKind::Operator,
            Operation::Variable(_) => OperationKind::Variable,
            Operation::Method(_) => OperationKind::MethodCall,
        }
    }

    pub fn parts(&self) -> &[Part] {
        match self {
            Operation::Literal(op) => op.parts(),
            Operation::Classic(op) => op.parts(),
            Operation::Variable(op) => op.parts(),
            Operation::Method(op) => op.parts(),
        }
    }

    /// Infer the result type and collection strategy against `context`.
    ///
    /// Fails on trees that validation would have rejected.
    pub fn resolve(
        &self,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
    ) -> Result<Resolved, ResolveError> {
        scope.nested(|scope| match self {
            Operation::Literal(op) => op.resolve(scope),
            Operation::Classic(op) => op.resolve(scope, context),
            Operation::Variable(op) => op.resolve(scope, context),
            Operation::Method(op) => op.resolve(scope),
        })
    }

    pub fn validate(
        &self,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
    ) -> Result<Vec<Diagnostic>, ResolveError> {
        scope.nested(|scope| match self {
            Operation::Literal(op) => Ok(op.validate()),
            Operation::Classic(op) => op.validate(scope, context),
            Operation::Variable(op) => op.validate(scope, context),
            Operation::Method(op) => op.validate(scope, context),
        })
    }

    /// Whether the operation is a filter rather than an index when used in brackets.
    pub fn is_predicate(&self) -> bool {
        match self {
            Operation::Literal(op) => matches!(op.parts(), [Part::Literal(Literal::Boolean(_))]),
            Operation::Classic(op) => op.operator().is_some_and(|op| {
                !matches!(
                    op.class(),
                    OperatorClass::Arithmetic | OperatorClass::Increment
                )
            }),
            Operation::Variable(_) | Operation::Method(_) => false,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Literal(op) => write!(f, "{}", op),
            Operation::Classic(op) => write!(f, "{}", op),
            Operation::Variable(op) => write!(f, "{}", op),
            Operation::Method(op) => write!(f, "{}", op),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Part], separator: &str) -> fmt::Result {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", part)?;
    }
    Ok(())
}

/// Type of a literal under the active configuration.
fn literal_type(scope: &Scope<'_>, literal: &Literal) -> Type {
    Type::Simple(scope.env().config().literal_class(literal.kind()))
}

fn unexpected(part: &Part, operation: &impl fmt::Display) -> ResolveError {
    ResolveError::UnexpectedPart {
        part: part.to_string(),
        operation: operation.to_string(),
    }
}
