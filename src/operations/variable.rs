use std::fmt;

use tracing::debug;

use crate::{
    ATTRIBUTE_MARKER, ROOT_MARKER, SELF_REFERENCE,
    content::Content,
    diagnostics::Diagnostic,
    error::ResolveError,
    evaluator::Evaluator,
    factory::Environment,
    schema::{CollectionStrategy, ComplexRef, ComplexType, Element},
    types::{NativeClass, Type},
    value::Value,
};

use super::{Operation, Part, PathState, Resolved, Scope, unexpected};

/// A path through the schema.
///
/// Segments name fields; each may be followed by one bracketed operation that
/// either indexes into a list (numeric) or filters it (boolean). The result
/// type of a path is always the type of its last field. Whether the result is
/// a collection follows from the list fields and filters along the way.
///
/// A path can also be turned into a concrete storage path for writes, see
/// [`VariableOperation::storage_path`].
#[derive(Debug, Clone)]
pub struct VariableOperation {
    parts: Vec<Part>,
}

/// Outcome of looking up one segment.
enum Lookup {
    Found(Element),
    /// The context is not modeled, nothing can be said about its children
    Opaque,
    Missing(String),
    NoContext,
}

impl VariableOperation {
    pub fn new(parts: Vec<Part>) -> Self {
        VariableOperation { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    fn lookup(
        name: &str,
        offset: usize,
        context: Option<&ComplexRef>,
        state: &PathState,
    ) -> Lookup {
        if let Some(stripped) = name.strip_prefix(ROOT_MARKER) {
            // only the first segment refers to the root of the walk
            let base = if offset == 0 { state.root() } else { context };
            return match base {
                Some(base) => Self::child(base, stripped),
                None => Lookup::NoContext,
            };
        }
        if name == SELF_REFERENCE {
            return match state.current() {
                Some(current) => Lookup::Found(Element::this(current.clone())),
                None => Lookup::NoContext,
            };
        }
        let Some(context) = context else {
            return Lookup::NoContext;
        };
        match Self::child(context, name) {
            Lookup::Missing(ctx) => match name.strip_prefix(ATTRIBUTE_MARKER) {
                Some(stripped) => match Self::child(context, stripped) {
                    found @ Lookup::Found(_) => found,
                    _ => Lookup::Missing(ctx),
                },
                None => Lookup::Missing(ctx),
            },
            other => other,
        }
    }

    fn child(context: &ComplexRef, name: &str) -> Lookup {
        if context.is_opaque() {
            return Lookup::Opaque;
        }
        match context.child(name) {
            Some(element) => Lookup::Found(element),
            None => Lookup::Missing(context.name().to_string()),
        }
    }

    fn segment(&self, offset: usize) -> Result<&str, ResolveError> {
        match &self.parts[offset] {
            Part::Segment(name) => Ok(name),
            other => Err(unexpected(other, self)),
        }
    }

    pub(super) fn resolve(
        &self,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
    ) -> Result<Resolved, ResolveError> {
        let base = scope.state().depth();
        let resolved = self.walk(scope, context);
        scope.state_mut().truncate(base);
        resolved
    }

    fn walk(
        &self,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
    ) -> Result<Resolved, ResolveError> {
        if self.parts.is_empty() {
            return Err(ResolveError::NotAPath(self.to_string()));
        }
        let last = self.parts.len() - 1;
        let mut context = context.cloned();
        let mut collection: Option<CollectionStrategy> = None;
        let mut offset = 0;

        while offset <= last {
            let name = self.segment(offset)?;
            let element = match Self::lookup(name, offset, context.as_ref(), scope.state()) {
                Lookup::Found(element) => element,
                Lookup::Opaque => {
                    return Ok(Resolved {
                        ty: Type::Simple(NativeClass::Object),
                        collection,
                    });
                }
                Lookup::Missing(ctx) => {
                    return Err(ResolveError::UnknownField {
                        path: name.to_string(),
                        context: ctx,
                    });
                }
                Lookup::NoContext => return Err(ResolveError::MissingContext(name.to_string())),
            };

            if offset == last {
                if let Some(strategy) = element.declared_collection() {
                    collection = Some(strategy.clone());
                } else if element.is_list() && collection.is_none() {
                    collection = Some(CollectionStrategy::List);
                }
                return Ok(Resolved {
                    ty: element.ty().clone(),
                    collection,
                });
            }

            let child = element.ty().as_complex().cloned();
            let bracket = bracket_at(&self.parts, offset + 1);
            if child.is_some() || bracket.is_some() {
                scope.state_mut().push(element.ty().clone());
            }

            if let Some(bracket) = bracket {
                let narrowed = child.as_ref().or(context.as_ref());
                let resolved = bracket.resolve(scope, narrowed)?;
                // a filter keeps every match, an index leaves the shape alone
                if is_filter(bracket, &resolved) && collection.is_none() {
                    collection = Some(CollectionStrategy::List);
                }
                offset += 1;
                if offset == last {
                    return Ok(Resolved {
                        ty: element.ty().clone(),
                        collection,
                    });
                }
            } else if element.is_list() {
                if let Some(strategy) = element.declared_collection() {
                    collection = Some(strategy.clone());
                } else if collection.is_none() {
                    collection = Some(CollectionStrategy::List);
                }
            }

            match child {
                Some(child) => context = Some(child),
                None if is_unconstrained(&element) => {
                    return Ok(Resolved {
                        ty: Type::Simple(NativeClass::Object),
                        collection,
                    });
                }
                None => return Err(ResolveError::NotComplex(name.to_string())),
            }
            offset += 1;
        }
        Err(ResolveError::NotAPath(self.to_string()))
    }

    pub(super) fn validate(
        &self,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
    ) -> Result<Vec<Diagnostic>, ResolveError> {
        let base = scope.state().depth();
        let mut messages = Vec::new();
        let checked = self.check(scope, context, &mut messages);
        scope.state_mut().truncate(base);
        checked.map(|_| messages)
    }

    fn check(
        &self,
        scope: &mut Scope<'_>,
        context: Option<&ComplexRef>,
        messages: &mut Vec<Diagnostic>,
    ) -> Result<(), ResolveError> {
        if self.parts.is_empty() {
            messages.push(Diagnostic::error("A path needs at least one segment"));
            return Ok(());
        }
        let last = self.parts.len() - 1;
        let mut context = context.cloned();
        let mut i = 0;

        while i <= last {
            let Part::Segment(name) = &self.parts[i] else {
                messages.push(Diagnostic::error(format!(
                    "The part {} can not be used in a path",
                    self.parts[i]
                )));
                break;
            };
            let element = match Self::lookup(name, i, context.as_ref(), scope.state()) {
                Lookup::Found(element) => element,
                Lookup::Opaque => break,
                Lookup::Missing(ctx) => {
                    messages.push(Diagnostic::error(format!(
                        "The child {} does not exist in {}",
                        name, ctx
                    )));
                    break;
                }
                Lookup::NoContext if name == SELF_REFERENCE => {
                    messages.push(Diagnostic::error(format!(
                        "Can not use the {} reference without a valid context",
                        SELF_REFERENCE
                    )));
                    break;
                }
                Lookup::NoContext => {
                    messages.push(Diagnostic::error(format!(
                        "There is no schema to resolve {} against",
                        name
                    )));
                    break;
                }
            };

            if i < last {
                let complex = element.ty().as_complex().cloned();
                let bracket = bracket_at(&self.parts, i + 1);
                if complex.is_some() || bracket.is_some() {
                    scope.state_mut().push(element.ty().clone());
                }
                if let Some(child) = &complex {
                    context = Some(child.clone());
                }
                if let Some(bracket) = bracket {
                    if !element.is_list() {
                        messages.push(Diagnostic::error(format!(
                            "The element {} is not a collection, the filter can not be applied to it",
                            element.name()
                        )));
                    }
                    messages.extend(bracket.validate(scope, context.as_ref())?);
                    i += 1;
                }
                if complex.is_none() && i < last {
                    // nothing is known below an unconstrained value
                    if is_unconstrained(&element) {
                        break;
                    }
                    messages.push(Diagnostic::error(format!(
                        "The child {} is not complex, further path access is impossible",
                        element.name()
                    )));
                    break;
                }
            }
            i += 1;
        }
        Ok(())
    }

    /// Resolve the path into a concrete storage path against live content.
    ///
    /// Bracketed operations must evaluate to a non-negative integer, which is
    /// substituted into the path: `my/path[1 + 1]` becomes `my/path[2]`.
    /// Filters are rejected since the target of a write may not exist yet.
    ///
    /// Resolution is best effort. When a field does not exist in the content
    /// the remaining segments are resolved against the last content that did,
    /// so an index computed from a relative path may read from an unexpected
    /// context when large parts of the path are missing.
    pub fn storage_path(
        &self,
        env: &Environment,
        content: &dyn Content,
    ) -> Result<String, ResolveError> {
        if self.parts.is_empty() {
            return Err(ResolveError::NotAPath(self.to_string()));
        }
        let evaluator = Evaluator::new(env);
        self.storage_path_from(&evaluator, content, content, 0, true)
    }

    fn storage_path_from(
        &self,
        evaluator: &Evaluator<'_>,
        root: &dyn Content,
        content: &dyn Content,
        offset: usize,
        exists: bool,
    ) -> Result<String, ResolveError> {
        let segment = self.segment(offset)?;
        let mut path = segment
            .strip_prefix(ROOT_MARKER)
            .unwrap_or(segment)
            .to_string();
        let object = if exists { content.get(&path) } else { None };

        if offset == self.parts.len() - 1 {
            return Ok(path);
        }
        match &self.parts[offset + 1] {
            Part::Operation(bracket) => {
                if bracket.is_predicate() {
                    return Err(ResolveError::FilterInStoragePath(bracket.to_string()));
                }
                let value = evaluator.evaluate_in(bracket, root, content)?;
                let index = match value {
                    Value::Integer(n) => n,
                    Value::Float(n) if n.fract() == 0.0 => n as i64,
                    Value::Boolean(_) => {
                        return Err(ResolveError::FilterInStoragePath(bracket.to_string()));
                    }
                    other => {
                        return Err(ResolveError::NonNumericIndex {
                            part: bracket.to_string(),
                            value: other.as_string(),
                        });
                    }
                };
                if index < 0 {
                    return Err(ResolveError::NegativeIndex(index));
                }
                path.push_str(&format!("[{}]", index));

                if offset + 2 < self.parts.len() {
                    let item = match object.as_deref() {
                        Some(Value::Array(items)) => items.get(index as usize),
                        _ => None,
                    };
                    let rest = match item.and_then(Value::as_content) {
                        Some(item) => self.storage_path_from(evaluator, root, item, offset + 2, true)?,
                        None => {
                            debug!(path = %path, "indexed value does not exist, continuing against the enclosing content");
                            self.storage_path_from(evaluator, root, content, offset + 2, false)?
                        }
                    };
                    path.push('/');
                    path.push_str(&rest);
                }
            }
            Part::Segment(_) => {
                let rest = match object.as_deref().and_then(Value::as_content) {
                    Some(child) => self.storage_path_from(evaluator, root, child, offset + 1, true)?,
                    None => {
                        debug!(path = %path, "value does not exist, continuing against the enclosing content");
                        self.storage_path_from(evaluator, root, content, offset + 1, false)?
                    }
                };
                path.push('/');
                path.push_str(&rest);
            }
            other => return Err(unexpected(other, self)),
        }
        Ok(path)
    }
}

fn bracket_at(parts: &[Part], offset: usize) -> Option<&Operation> {
    match parts.get(offset) {
        Some(Part::Operation(bracket)) => Some(bracket.as_ref()),
        _ => None,
    }
}

/// Whether a bracketed operation selects matches rather than one index.
fn is_filter(bracket: &Operation, resolved: &Resolved) -> bool {
    match bracket {
        Operation::Classic(_) => bracket.is_predicate(),
        _ => resolved.ty.is_boolean(),
    }
}

fn is_unconstrained(element: &Element) -> bool {
    element
        .ty()
        .as_simple()
        .is_some_and(NativeClass::is_unconstrained)
}

impl fmt::Display for VariableOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            match part {
                Part::Operation(_) => write!(f, "[{}]", part)?,
                _ if i == 0 => write!(f, "{}", part)?,
                _ => write!(f, "/{}", part)?,
            }
        }
        Ok(())
    }
}
