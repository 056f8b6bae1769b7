//! Callables usable in method call operations.
//!
//! A method is known by name and overloaded by arity. Its [`Signature`] tells
//! the resolver what the parameters accept and what the call returns; an
//! optional implementation lets the evaluator run it.

use std::{collections::HashMap, fmt, sync::Arc};

use thiserror::Error;

use crate::{evaluator::EvalError, schema::ComplexRef, types::NativeClass, value::Value};

pub type MethodFn = Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>;

#[derive(Debug, Error)]
pub enum MethodError {
    #[error("no method named '{0}' is registered")]
    NotFound(String),

    #[error("method '{name}' does not accept {arity} argument(s)")]
    Arity { name: String, arity: usize },
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub class: NativeClass,
    /// Numbers and booleans are converted to the declared class on call
    pub coerced: bool,
}

impl Parameter {
    pub fn exact(class: NativeClass) -> Self {
        Parameter {
            class,
            coerced: false,
        }
    }

    pub fn coerced(class: NativeClass) -> Self {
        Parameter {
            class,
            coerced: true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Returns {
    Native(NativeClass),
    Complex(ComplexRef),
}

#[derive(Clone)]
pub struct Signature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub returns: Returns,
    pub implementation: Option<MethodFn>,
}

impl Signature {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, returns: Returns) -> Self {
        Signature {
            name: name.into(),
            parameters,
            returns,
            implementation: None,
        }
    }

    pub fn implemented_by<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.implementation = Some(Arc::new(f));
        self
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("returns", &self.returns)
            .field("implemented", &self.implementation.is_some())
            .finish()
    }
}

/// Registered methods, keyed by name.
///
/// ```
/// use clove_types::{MethodRegistry, NativeClass, Parameter, Returns, Signature};
///
/// let registry = MethodRegistry::new().with(Signature::new(
///     "upper",
///     vec![Parameter::exact(NativeClass::String)],
///     Returns::Native(NativeClass::String),
/// ));
///
/// assert!(registry.resolve("upper", 1).is_ok());
/// assert!(registry.resolve("upper", 2).is_err());
/// assert!(registry.resolve("lower", 1).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<String, Vec<Signature>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an overload. A later signature with the same arity replaces the earlier one.
    pub fn register(&mut self, signature: Signature) {
        let overloads = self.methods.entry(signature.name.clone()).or_default();
        overloads.retain(|s| s.arity() != signature.arity());
        overloads.push(signature);
    }

    pub fn with(mut self, signature: Signature) -> Self {
        self.register(signature);
        self
    }

    pub fn resolve(&self, name: &str, arity: usize) -> Result<&Signature, MethodError> {
        let overloads = self
            .methods
            .get(name)
            .ok_or_else(|| MethodError::NotFound(name.to_string()))?;
        overloads
            .iter()
            .find(|s| s.arity() == arity)
            .ok_or_else(|| MethodError::Arity {
                name: name.to_string(),
                arity,
            })
    }
}
