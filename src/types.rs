//! Resolved types.
//!
//! A resolved type is either a simple type, described by the [`NativeClass`]
//! its instances have at runtime, or a complex type taken from the schema.

use std::{fmt, sync::Arc};

use serde::Deserialize;

use crate::schema::{ComplexRef, ComplexType, Record};

/// Runtime class of a simple value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeClass {
    Boolean,
    String,
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    Long,
    Float,
    Double,
    /// Arbitrary precision decimal
    Decimal,
    /// Any numeric value
    Number,
    Date,
    /// Unconstrained value; nothing can be proven about it
    Object,
    /// Generic structured content
    Content,
    /// Growable sequence of a component class
    List(Box<NativeClass>),
    /// Fixed sequence of a component class
    Array(Box<NativeClass>),
}

impl NativeClass {
    pub fn list_of(component: NativeClass) -> Self {
        NativeClass::List(Box::new(component))
    }

    pub fn array_of(component: NativeClass) -> Self {
        NativeClass::Array(Box::new(component))
    }

    pub fn is_number(&self) -> bool {
        use NativeClass::*;
        matches!(self, Integer | Long | Float | Double | Decimal | Number)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, NativeClass::Boolean)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, NativeClass::String)
    }

    /// Whether instances have a natural ordering.
    ///
    /// The abstract `Number` is not comparable: two numbers of different
    /// concrete classes have no common ordering without conversion.
    pub fn is_comparable(&self) -> bool {
        use NativeClass::*;
        matches!(
            self,
            Boolean | String | Integer | Long | Float | Double | Decimal | Date
        )
    }

    pub fn is_iterable(&self) -> bool {
        matches!(self, NativeClass::List(_) | NativeClass::Array(_))
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, NativeClass::Object)
    }

    /// Element class of a collection-shaped class.
    pub fn component(&self) -> Option<&NativeClass> {
        match self {
            NativeClass::List(component) | NativeClass::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Whether a value of class `other` can be used where `self` is declared.
    pub fn is_assignable_from(&self, other: &NativeClass) -> bool {
        match (self, other) {
            (a, b) if a == b => true,
            (NativeClass::Object, _) => true,
            (NativeClass::Number, b) => b.is_number(),
            (NativeClass::List(a), NativeClass::List(b))
            | (NativeClass::Array(a), NativeClass::Array(b)) => a.is_assignable_from(b),
            _ => false,
        }
    }
}

impl fmt::Display for NativeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeClass::Boolean => f.write_str("Boolean"),
            NativeClass::String => f.write_str("String"),
            NativeClass::Integer => f.write_str("Integer"),
            NativeClass::Long => f.write_str("Long"),
            NativeClass::Float => f.write_str("Float"),
            NativeClass::Double => f.write_str("Double"),
            NativeClass::Decimal => f.write_str("Decimal"),
            NativeClass::Number => f.write_str("Number"),
            NativeClass::Date => f.write_str("Date"),
            NativeClass::Object => f.write_str("Object"),
            NativeClass::Content => f.write_str("Content"),
            NativeClass::List(component) => write!(f, "List<{}>", component),
            NativeClass::Array(component) => write!(f, "Array<{}>", component),
        }
    }
}

/// Static type of an expression or schema element.
#[derive(Debug, Clone)]
pub enum Type {
    /// Scalar value of a native class
    Simple(NativeClass),
    /// Record with named children
    Complex(ComplexRef),
}

impl Type {
    pub fn boolean() -> Self {
        Type::Simple(NativeClass::Boolean)
    }

    pub fn complex(ty: ComplexRef) -> Self {
        Type::Complex(ty)
    }

    /// Wrap a native class, modelling generic content as an unmodeled record.
    pub fn wrap(class: NativeClass) -> Self {
        match class {
            NativeClass::Content => Type::Complex(Arc::new(Record::opaque("content"))),
            other => Type::Simple(other),
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Type::Simple(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Simple(NativeClass::Boolean))
    }

    pub fn as_simple(&self) -> Option<&NativeClass> {
        match self {
            Type::Simple(class) => Some(class),
            Type::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexRef> {
        match self {
            Type::Simple(_) => None,
            Type::Complex(ty) => Some(ty),
        }
    }

    /// The class instances of this type have at runtime.
    pub fn native_class(&self) -> NativeClass {
        match self {
            Type::Simple(class) => class.clone(),
            Type::Complex(_) => NativeClass::Content,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Simple(a), Type::Simple(b)) => a == b,
            (Type::Complex(a), Type::Complex(b)) => Arc::ptr_eq(a, b) || a.name() == b.name(),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Simple(class) => write!(f, "{}", class),
            Type::Complex(ty) => f.write_str(ty.name()),
        }
    }
}
