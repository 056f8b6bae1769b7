use thiserror::Error;

use crate::{evaluator::EvalError, methods::MethodError};

/// Fatal failures of the resolver.
///
/// These signal a malformed tree or a caller that skipped validation. They are
/// never used for expressions that are merely ill-typed; those produce
/// [`Diagnostic`](crate::Diagnostic)s.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Discriminator name the factory does not know
    #[error("unknown operation type: {0}")]
    UnknownOperationKind(String),

    /// The root handed to the factory is not an operation
    #[error("can not build an operation from {0}")]
    NotAnOperation(String),

    /// A classic operation without an operator
    #[error("no operator found in {0}")]
    NoOperator(String),

    /// A part that can not appear where it was found
    #[error("not expecting part {part} at this point in {operation}")]
    UnexpectedPart { part: String, operation: String },

    /// A literal operation that does not hold exactly one literal
    #[error("the literal operation {0} must have exactly one literal value")]
    MalformedLiteral(String),

    /// Field lookup failed during type inference
    #[error("can not find '{path}' in {context}")]
    UnknownField { path: String, context: String },

    /// Path continues below a simple field
    #[error("the field '{0}' is not complex, further path access is impossible")]
    NotComplex(String),

    /// A variable path resolved without any schema
    #[error("no schema context available to resolve '{0}'")]
    MissingContext(String),

    #[error("could not find method: {name}")]
    UnresolvedMethod {
        name: String,
        #[source]
        source: MethodError,
    },

    /// Storage path resolution on something that is not a variable path
    #[error("{0} is not a variable path")]
    NotAPath(String),

    /// Filters can not select a write target that may not exist yet
    #[error("the part {0} is a filter, storage paths only support numeric indexes")]
    FilterInStoragePath(String),

    #[error("the part {part} is not numeric, it resolves to: {value}")]
    NonNumericIndex { part: String, value: String },

    #[error("can not have an index below 0: {0}")]
    NegativeIndex(i64),

    #[error("expression nesting exceeds the maximum depth of {0}")]
    DepthExceeded(usize),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
