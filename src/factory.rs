//! Building typed operations from parser trees.

use std::{fmt, str::FromStr, sync::Arc};

use tracing::{debug, trace};

use crate::{
    ast::{Node, OperationKind},
    config::ResolverConfig,
    content::Content,
    conversion::{Converter, DefaultConverter},
    diagnostics::Diagnostic,
    error::ResolveError,
    evaluator::{EvalError, Evaluator},
    methods::MethodRegistry,
    operations::{
        ClassicOperation, LiteralOperation, MethodOperation, Operation, Part, Resolved, Scope,
        VariableOperation,
    },
    schema::{CollectionStrategy, ComplexRef},
    types::Type,
    value::Value,
};

/// Collaborators shared by every operation built by one factory.
#[derive(Debug, Clone)]
pub struct Environment {
    converter: Arc<dyn Converter>,
    methods: MethodRegistry,
    config: ResolverConfig,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            converter: Arc::new(DefaultConverter),
            methods: MethodRegistry::default(),
            config: ResolverConfig::default(),
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converter = Arc::new(converter);
        self
    }

    pub fn with_methods(mut self, methods: MethodRegistry) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn converter(&self) -> &dyn Converter {
        self.converter.as_ref()
    }

    pub fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

/// Maps operation kinds to typed operations.
///
/// # Examples
///
/// ```
/// use clove_types::{Literal, Node, NativeClass, OperationFactory, Operator, Type};
///
/// let factory = OperationFactory::default();
/// let expression = factory
///     .build(&Node::classic(vec![
///         Node::literal(Literal::Integer(1)),
///         Node::Operator(Operator::Equals),
///         Node::literal(Literal::Boolean(true)),
///     ]))
///     .unwrap();
///
/// // a boolean can not be cast to a number
/// assert_eq!(expression.validate(None).unwrap().len(), 1);
/// assert_eq!(expression.infer_type(None).unwrap(), Type::Simple(NativeClass::Boolean));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperationFactory {
    env: Arc<Environment>,
}

impl OperationFactory {
    pub fn new(env: Environment) -> Self {
        OperationFactory { env: Arc::new(env) }
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.env
    }

    /// Create the typed operation for `kind`.
    pub fn create(&self, kind: OperationKind, parts: Vec<Part>) -> Operation {
        match kind {
            OperationKind::Literal => Operation::Literal(LiteralOperation::new(parts)),
            OperationKind::Operator => Operation::Classic(ClassicOperation::new(parts)),
            OperationKind::Variable => Operation::Variable(VariableOperation::new(parts)),
            OperationKind::MethodCall => Operation::Method(MethodOperation::new(parts)),
        }
    }

    /// Create an operation from the name of its kind.
    pub fn create_named(&self, kind: &str, parts: Vec<Part>) -> Result<Operation, ResolveError> {
        Ok(self.create(OperationKind::from_str(kind)?, parts))
    }

    /// Build an expression from a parser tree rooted at an operation.
    pub fn build(&self, node: &Node) -> Result<Expression, ResolveError> {
        match node {
            Node::Operation { kind, children } => {
                trace!(tree = %node, "building expression");
                Ok(Expression {
                    root: self.operation(*kind, children),
                    env: Arc::clone(&self.env),
                })
            }
            other => Err(ResolveError::NotAnOperation(other.to_string())),
        }
    }

    fn operation(&self, kind: OperationKind, children: &[Node]) -> Operation {
        let parts = children
            .iter()
            .map(|child| match (kind, child) {
                // a bare literal inside a path is an index
                (OperationKind::Variable, Node::Literal(_)) => Part::Operation(Box::new(
                    self.create(OperationKind::Literal, vec![self.part(child)]),
                )),
                _ => self.part(child),
            })
            .collect();
        self.create(kind, parts)
    }

    fn part(&self, node: &Node) -> Part {
        match node {
            Node::Literal(literal) => Part::Literal(literal.clone()),
            Node::Null => Part::Null,
            Node::Operator(op) => Part::Operator(*op),
            Node::Segment(name) => Part::Segment(name.clone()),
            Node::Method(name) => Part::Method(name.clone()),
            Node::Operation { kind, children } => {
                Part::Operation(Box::new(self.operation(*kind, children)))
            }
        }
    }
}

/// A typed expression bound to its environment.
///
/// Every call starts from a fresh [`Scope`], so an expression can be shared
/// between threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct Expression {
    root: Operation,
    env: Arc<Environment>,
}

impl Expression {
    pub fn operation(&self) -> &Operation {
        &self.root
    }

    /// Result type and collection strategy against `schema`.
    pub fn resolve(&self, schema: Option<&ComplexRef>) -> Result<Resolved, ResolveError> {
        let mut scope = Scope::new(&self.env, schema);
        self.root.resolve(&mut scope, schema)
    }

    pub fn infer_type(&self, schema: Option<&ComplexRef>) -> Result<Type, ResolveError> {
        Ok(self.resolve(schema)?.ty)
    }

    pub fn collection_strategy(
        &self,
        schema: Option<&ComplexRef>,
    ) -> Result<Option<CollectionStrategy>, ResolveError> {
        Ok(self.resolve(schema)?.collection)
    }

    pub fn is_collection(&self, schema: Option<&ComplexRef>) -> Result<bool, ResolveError> {
        Ok(self.resolve(schema)?.is_collection())
    }

    /// Check that the expression is well typed against `schema`.
    ///
    /// An empty list means the expression is valid.
    pub fn validate(&self, schema: Option<&ComplexRef>) -> Result<Vec<Diagnostic>, ResolveError> {
        let mut scope = Scope::new(&self.env, schema);
        let messages = self.root.validate(&mut scope, schema)?;
        debug!(expression = %self, diagnostics = messages.len(), "validated expression");
        Ok(messages)
    }

    /// The concrete storage path of a variable expression, see
    /// [`VariableOperation::storage_path`].
    pub fn resolve_storage_path(&self, content: &dyn Content) -> Result<String, ResolveError> {
        match &self.root {
            Operation::Variable(variable) => variable.storage_path(&self.env, content),
            other => Err(ResolveError::NotAPath(other.to_string())),
        }
    }

    pub fn evaluate(&self, content: &dyn Content) -> Result<Value, EvalError> {
        Evaluator::new(&self.env).evaluate(&self.root, content)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
