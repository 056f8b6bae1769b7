use std::fmt;

use crate::{diagnostics::Diagnostic, error::ResolveError};

use super::{Part, Resolved, Scope, literal_type, write_joined};

/// A single literal value. Its type comes from the resolver configuration.
#[derive(Debug, Clone)]
pub struct LiteralOperation {
    parts: Vec<Part>,
}

impl LiteralOperation {
    pub fn new(parts: Vec<Part>) -> Self {
        LiteralOperation { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub(super) fn resolve(&self, scope: &mut Scope<'_>) -> Result<Resolved, ResolveError> {
        match self.parts.as_slice() {
            [Part::Literal(literal)] => Ok(Resolved::scalar(literal_type(scope, literal))),
            _ => Err(ResolveError::MalformedLiteral(self.to_string())),
        }
    }

    pub(super) fn validate(&self) -> Vec<Diagnostic> {
        match self.parts.as_slice() {
            [Part::Literal(_)] => Vec::new(),
            _ => vec![Diagnostic::error(format!(
                "The literal operation {} must hold exactly one literal value",
                self
            ))],
        }
    }
}

impl fmt::Display for LiteralOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.parts, "")
    }
}
