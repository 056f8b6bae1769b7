//! Read-only view of the complex type schema.
//!
//! The resolver only ever asks a complex type for a child by name and, for the
//! element it gets back, its type, whether it is list valued and which
//! collection strategy it declares. [`Record`] is an in-memory implementation
//! for embedding and tests; other schema models implement [`ComplexType`].

use std::{fmt, sync::Arc};

use crate::types::Type;

/// Shared handle to a complex type.
pub type ComplexRef = Arc<dyn ComplexType>;

/// A schema node with named children.
pub trait ComplexType: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Look up a direct child by its name.
    fn child(&self, name: &str) -> Option<Element>;

    /// All direct children in declaration order.
    fn children(&self) -> Vec<Element>;

    /// An unmodeled type: its children are unknown, not absent.
    fn is_opaque(&self) -> bool {
        false
    }
}

/// How multiple values of an element are materialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectionStrategy {
    /// Growable list, the default
    List,
    /// Fixed-size array
    Array,
    /// Named strategy provided by the schema
    Custom(String),
}

/// A named child of a complex type.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    ty: Type,
    list: bool,
    collection: Option<CollectionStrategy>,
}

impl Element {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Element {
            name: name.into(),
            ty,
            list: false,
            collection: None,
        }
    }

    /// The element standing for the current element itself (`$this`).
    pub fn this(ty: Type) -> Self {
        Element::new(crate::SELF_REFERENCE, ty)
    }

    /// Mark the element as list valued.
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Declare how the element's values are materialized.
    pub fn with_collection(mut self, strategy: CollectionStrategy) -> Self {
        self.collection = Some(strategy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn is_list(&self) -> bool {
        self.list
    }

    pub fn declared_collection(&self) -> Option<&CollectionStrategy> {
        self.collection.as_ref()
    }
}

/// In-memory complex type.
///
/// # Examples
///
/// ```
/// use clove_types::{ComplexType, NativeClass, Record, Type};
///
/// let item = Record::new("Item")
///     .field("myInteger", Type::Simple(NativeClass::Integer))
///     .shared();
/// let root = Record::new("Root")
///     .list_field("list", Type::Complex(item))
///     .shared();
///
/// assert!(root.child("list").unwrap().is_list());
/// assert!(root.child("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
    name: String,
    elements: Vec<Element>,
    opaque: bool,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A record whose children are not modeled.
    pub fn opaque(name: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            opaque: true,
            ..Default::default()
        }
    }

    pub fn with(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn field(self, name: impl Into<String>, ty: Type) -> Self {
        self.with(Element::new(name, ty))
    }

    pub fn list_field(self, name: impl Into<String>, ty: Type) -> Self {
        self.with(Element::new(name, ty).list())
    }

    pub fn shared(self) -> ComplexRef {
        Arc::new(self)
    }
}

impl ComplexType for Record {
    fn name(&self) -> &str {
        &self.name
    }

    fn child(&self, name: &str) -> Option<Element> {
        self.elements.iter().find(|e| e.name == name).cloned()
    }

    fn children(&self) -> Vec<Element> {
        self.elements.clone()
    }

    fn is_opaque(&self) -> bool {
        self.opaque
    }
}
