use serde::Deserialize;

use crate::{ast::LiteralKind, types::NativeClass};

/// Tunables of the resolver.
///
/// Missing keys fall back to their defaults, so a partial JSON document is a
/// valid configuration:
///
/// ```
/// use clove_types::{NativeClass, ResolverConfig};
///
/// let config = ResolverConfig::from_json(r#"{ "integer_literal": "integer" }"#).unwrap();
/// assert_eq!(config.integer_literal, NativeClass::Integer);
/// assert_eq!(config.decimal_literal, NativeClass::Double);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Class of integer literals
    pub integer_literal: NativeClass,
    /// Class of decimal literals
    pub decimal_literal: NativeClass,
    /// Maximum nesting of operations; `None` disables the limit
    pub max_depth: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            integer_literal: NativeClass::Long,
            decimal_literal: NativeClass::Double,
            max_depth: Some(256),
        }
    }
}

impl ResolverConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The simple type class a literal of the given kind resolves to.
    pub fn literal_class(&self, kind: LiteralKind) -> NativeClass {
        match kind {
            LiteralKind::Boolean => NativeClass::Boolean,
            LiteralKind::String => NativeClass::String,
            LiteralKind::Integer => self.integer_literal.clone(),
            LiteralKind::Decimal => self.decimal_literal.clone(),
        }
    }
}
