//! Accessors for live structured data.
//!
//! Storage path resolution and evaluation read fields out of whatever the
//! embedding application stores. Each storage shape implements [`Content`];
//! [`Value::as_content`] picks the accessor from the value's runtime tag.

use std::{borrow::Cow, collections::HashMap, fmt};

use thiserror::Error;

use crate::{
    schema::{ComplexRef, ComplexType},
    value::Value,
};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("the type {ty} has no field '{field}'")]
    UnknownField { field: String, ty: String },
}

/// Named field access on a structured value.
pub trait Content: fmt::Debug {
    /// Whether the field can exist, set or not.
    fn has(&self, name: &str) -> bool;

    /// The current value of a field, `None` when unset.
    ///
    /// Adapters that store [`Value`]s hand out a borrow; others convert.
    fn get(&self, name: &str) -> Option<Cow<'_, Value>>;

    fn set(&mut self, name: &str, value: Value) -> Result<(), ContentError>;

    /// Names of the fields this content exposes.
    fn names(&self) -> Vec<String>;
}

/// An instance of a schema type.
///
/// ```
/// use clove_types::{ComplexContent, Content, NativeClass, Record, Type, Value};
///
/// let schema = Record::new("Item")
///     .field("myInteger", Type::Simple(NativeClass::Integer))
///     .shared();
/// let mut item = ComplexContent::new(schema);
///
/// assert!(item.has("myInteger"));
/// assert_eq!(item.get("myInteger"), None);
/// item.set("myInteger", Value::Integer(3)).unwrap();
/// assert_eq!(item.get("myInteger").as_deref(), Some(&Value::Integer(3)));
/// assert!(item.set("other", Value::Null).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ComplexContent {
    schema: ComplexRef,
    fields: HashMap<String, Value>,
}

impl ComplexContent {
    pub fn new(schema: ComplexRef) -> Self {
        ComplexContent {
            schema,
            fields: HashMap::new(),
        }
    }

    /// Builder form of [`Content::set`].
    pub fn with(mut self, name: &str, value: Value) -> Result<Self, ContentError> {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn schema(&self) -> &ComplexRef {
        &self.schema
    }

    /// The fields that hold a value.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl PartialEq for ComplexContent {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.fields == other.fields
    }
}

impl Content for ComplexContent {
    fn has(&self, name: &str) -> bool {
        if self.schema.is_opaque() {
            return self.fields.contains_key(name);
        }
        self.schema.child(name).is_some()
    }

    fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.fields.get(name).map(Cow::Borrowed)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), ContentError> {
        if !self.schema.is_opaque() && self.schema.child(name).is_none() {
            return Err(ContentError::UnknownField {
                field: name.to_string(),
                ty: self.schema.name().to_string(),
            });
        }
        self.fields.insert(name.to_string(), value);
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        if self.schema.is_opaque() {
            return self.fields.keys().cloned().collect();
        }
        self.schema
            .children()
            .iter()
            .map(|e| e.name().to_string())
            .collect()
    }
}

impl Content for HashMap<String, Value> {
    fn has(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        HashMap::get(self, name).map(Cow::Borrowed)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), ContentError> {
        self.insert(name.to_string(), value);
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

impl Content for serde_json::Map<String, serde_json::Value> {
    fn has(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<Cow<'_, Value>> {
        serde_json::Map::get(self, name)
            .cloned()
            .map(|v| Cow::Owned(Value::from_json(v)))
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), ContentError> {
        self.insert(name.to_string(), value.to_json());
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}
