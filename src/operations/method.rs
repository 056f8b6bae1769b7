use std::fmt;

use crate::{
    diagnostics::Diagnostic,
    error::ResolveError,
    methods::{Parameter, Returns, Signature},
    schema::{CollectionStrategy, ComplexRef},
    types::{NativeClass, Type},
};

use super::{Part, Resolved, Scope, literal_type, unexpected, write_joined};

/// A call to a registered method: the method reference followed by its arguments.
#[derive(Debug, Clone)]
pub struct MethodOperation {
    parts: Vec<Part>,
}

impl MethodOperation {
    pub fn new(parts: Vec<Part>) -> Self {
        MethodOperation { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn name(&self) -> Result<&str, ResolveError> {
        match self.parts.first() {
            Some(Part::Method(name)) => Ok(name),
            Some(other) => Err(unexpected(other, self)),
            None => Err(ResolveError::UnexpectedPart {
                part: String::new(),
                operation: self.to_string(),
            }),
        }
    }

    pub fn arguments(&self) -> &[Part] {
        self.parts.get(1..).unwrap_or_default()
    }

    fn signature<'e>(&self, scope: &Scope<'e>) -> Result<&'e Signature, ResolveError> {
        let name = self.name()?;
        scope
            .env()
            .methods()
            .resolve(name, self.arguments().len())
            .map_err(|source| ResolveError::UnresolvedMethod {
                name: name.to_string(),
                source,
            })
    }

    pub(super) fn resolve(&self, scope: &mut Scope<'_>) -> Result<Resolved, ResolveError> {
        let signature = self.signature(scope)?;
        let resolved = match &signature.returns {
            Returns::Native(NativeClass::List(component)) => Resolved {
                ty: Type::wrap(component.as_ref().clone()),
                collection: Some(CollectionStrategy::List),
            },
            Returns::Native(NativeClass::Array(component)) => Resolved {
                ty: Type::wrap(component.as_ref().clone()),
                collection: Some(CollectionStrategy::Array),
            },
            Returns::Native(class) => Resolved::scalar(Type::wrap(class.clone())),
            Returns::Complex(ty) => Resolved::scalar(Type::Complex(ty.clone())),
        };
        Ok(resolved)
    }

    pub(super) fn validate(
        &self,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
    ) -> Result<Vec<Diagnostic>, ResolveError> {
        let name = self.name()?;
        let signature = match self.signature(scope) {
            Ok(signature) => signature,
            Err(ResolveError::UnresolvedMethod { source, .. }) => {
                return Ok(vec![Diagnostic::error(format!(
                    "The method {} could not be resolved: {}",
                    name, source
                ))]);
            }
            Err(other) => return Err(other),
        };

        let mut messages = Vec::new();
        for (position, (argument, parameter)) in self
            .arguments()
            .iter()
            .zip(&signature.parameters)
            .enumerate()
        {
            let ty = match argument {
                Part::Null => continue,
                Part::Literal(literal) => literal_type(scope, literal),
                Part::Operation(operation) => {
                    let nested = operation.validate(scope, context)?;
                    if !nested.is_empty() {
                        messages.extend(nested);
                        continue;
                    }
                    operation.resolve(scope, context)?.ty
                }
                other => return Err(unexpected(other, self)),
            };
            if !accepts(parameter, &ty) {
                messages.push(Diagnostic::error(format!(
                    "The argument {} of type {} is not compatible with the parameter {} of method {}, expecting {}",
                    argument, ty, position, name, parameter.class
                )));
            }
        }
        Ok(messages)
    }
}

fn accepts(parameter: &Parameter, ty: &Type) -> bool {
    match ty {
        // structured content is passed as is
        Type::Complex(_) => parameter.class.is_assignable_from(&NativeClass::Content),
        Type::Simple(class) => {
            (parameter.coerced && parameter.class.is_number() && class.is_number())
                || (parameter.coerced && parameter.class.is_boolean() && class.is_boolean())
                || parameter.class.is_assignable_from(class)
        }
    }
}

impl fmt::Display for MethodOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parts.split_first() {
            Some((name, arguments)) => {
                write!(f, "{}(", name)?;
                write_joined(f, arguments, ", ")?;
                f.write_str(")")
            }
            None => f.write_str("()"),
        }
    }
}
