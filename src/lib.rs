//! Static typing for path and query expressions.
//!
//! An external parser produces a [`Node`] tree; [`OperationFactory::build`]
//! turns it into an [`Expression`] that can infer its result type, tell
//! whether it yields a collection and validate itself against a schema of
//! [`ComplexType`]s. Variable paths can also be resolved into concrete
//! storage paths against live [`Content`].
//!
//! ```
//! use clove_types::{Literal, NativeClass, Node, OperationFactory, Operator, Record, Type};
//!
//! let item = Record::new("Item")
//!     .field("myInteger", Type::Simple(NativeClass::Integer))
//!     .shared();
//! let root = Record::new("Root").list_field("list", Type::Complex(item)).shared();
//!
//! // list[myInteger > 3]/myInteger
//! let tree = Node::variable(vec![
//!     Node::segment("list"),
//!     Node::classic(vec![
//!         Node::path(&["myInteger"]),
//!         Node::Operator(Operator::Greater),
//!         Node::literal(Literal::Integer(3)),
//!     ]),
//!     Node::segment("myInteger"),
//! ]);
//!
//! let expression = OperationFactory::default().build(&tree).unwrap();
//! assert!(expression.validate(Some(&root)).unwrap().is_empty());
//! assert!(expression.is_collection(Some(&root)).unwrap());
//! assert_eq!(expression.infer_type(Some(&root)).unwrap(), Type::Simple(NativeClass::Integer));
//! ```

pub mod ast;
pub mod config;
pub mod content;
pub mod conversion;
pub mod diagnostics;
pub mod error;
pub mod evaluator;
pub mod factory;
pub mod methods;
pub mod operations;
pub mod schema;
pub mod types;
pub mod value;

/// Leading marker of an absolute path segment
pub const ROOT_MARKER: char = '/';
/// Leading marker of an attribute segment
pub const ATTRIBUTE_MARKER: char = '@';
/// Segment referring to the current element
pub const SELF_REFERENCE: &str = "$this";

pub use ast::{Literal, LiteralKind, Node, OperationKind, Operator, OperatorClass};
pub use config::ResolverConfig;
pub use content::{ComplexContent, Content, ContentError};
pub use conversion::{Converter, DefaultConverter};
pub use diagnostics::{Diagnostic, Severity};
pub use error::ResolveError;
pub use evaluator::{EvalError, Evaluator};
pub use factory::{Environment, Expression, OperationFactory};
pub use methods::{MethodError, MethodFn, MethodRegistry, Parameter, Returns, Signature};
pub use operations::{Operation, Part, PathState, Resolved, Scope};
pub use schema::{CollectionStrategy, ComplexRef, ComplexType, Element, Record};
pub use types::{NativeClass, Type};
pub use value::Value;
