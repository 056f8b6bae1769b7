//! Conversion oracle.
//!
//! The resolver never converts values itself. It only asks whether values of
//! one native class could be converted to another at runtime, and the answer
//! comes from an injected [`Converter`].

use std::fmt;

use crate::types::NativeClass;

/// Answers whether a value of one class can be converted to another.
pub trait Converter: fmt::Debug + Send + Sync {
    fn can_convert(&self, from: &NativeClass, to: &NativeClass) -> bool;
}

/// Conversion rules of the default runtime.
///
/// - every class converts to itself, to `Object` and to any class it is assignable to
/// - numbers convert between each other
/// - comparable scalars convert to `String`, and `String` parses to numbers,
///   booleans and dates
/// - dates convert to and from `Long` (epoch milliseconds)
/// - collections convert when their components do
///
/// Booleans do not convert to numbers, so `1 == true` is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConverter;

impl Converter for DefaultConverter {
    fn can_convert(&self, from: &NativeClass, to: &NativeClass) -> bool {
        use NativeClass::*;

        if to.is_assignable_from(from) {
            return true;
        }
        match (from, to) {
            (a, b) if a.is_number() && b.is_number() => true,
            (a, String) => a.is_comparable(),
            (String, b) => b.is_number() || b.is_boolean() || *b == Date,
            (Date, Long) | (Long, Date) => true,
            (List(a) | Array(a), List(b) | Array(b)) => self.can_convert(a, b),
            _ => false,
        }
    }
}

