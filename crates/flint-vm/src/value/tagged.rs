//! The tagged-union value encoding.
//!
//! A plain Rust enum: the discriminant is the type tag and the payload is
//! the variant data. Exhaustive `match` replaces the manual tag checks a
//! C-style union would need, so reading the wrong variant is impossible at
//! call sites that pattern match, and a debug-time contract violation at
//! call sites that use the unchecked accessors.

use std::fmt;

use super::ObjHandle;

/// A runtime value. Exactly one variant is active at a time.
#[derive(Debug, Clone, Copy)]
pub enum Value {
    /// A boolean
    Bool(bool),
    /// The absence of a value
    Nil,
    /// An IEEE 754 double
    Number(f64),
    /// A reference to a heap object
    Obj(ObjHandle),
}

impl Value {
    /// Creates the nil value.
    pub fn nil() -> Self {
        Value::Nil
    }

    /// Creates a boolean value.
    pub fn boolean(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Creates a number value.
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Creates an object-reference value.
    pub fn obj(handle: ObjHandle) -> Self {
        Value::Obj(handle)
    }

    /// Returns true if this value is a boolean.
    pub fn is_bool(self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns true if this value is nil.
    pub fn is_nil(self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns true if this value is a number.
    pub fn is_number(self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns true if this value is an object reference.
    pub fn is_obj(self) -> bool {
        matches!(self, Value::Obj(_))
    }

    /// Extracts the boolean payload. Calling this on any other variant is
    /// a caller bug.
    pub fn as_bool(self) -> bool {
        debug_assert!(self.is_bool());
        match self {
            Value::Bool(b) => b,
            _ => false,
        }
    }

    /// Extracts the number payload. Calling this on any other variant is a
    /// caller bug.
    pub fn as_number(self) -> f64 {
        debug_assert!(self.is_number());
        match self {
            Value::Number(n) => n,
            _ => f64::NAN,
        }
    }

    /// Extracts the object handle. Calling this on any other variant is a
    /// caller bug.
    pub fn as_obj(self) -> ObjHandle {
        debug_assert!(self.is_obj());
        match self {
            Value::Obj(handle) => handle,
            _ => ObjHandle::from_addr(0),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            // IEEE equality: NaN is not equal to itself.
            (Value::Number(a), Value::Number(b)) => a == b,
            // Object identity, not deep equality.
            (Value::Obj(a), Value::Obj(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Obj(handle) => write!(f, "<obj @{:#x}>", handle.addr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_produce_their_variant() {
        assert!(matches!(Value::boolean(true), Value::Bool(true)));
        assert!(matches!(Value::nil(), Value::Nil));
        assert!(matches!(Value::number(1.0), Value::Number(_)));
        assert!(matches!(Value::obj(ObjHandle::from_addr(8)), Value::Obj(_)));
    }

    #[test]
    fn test_exhaustive_match_covers_every_variant() {
        // The point of the enum encoding: a match with all four arms needs
        // no fallback and no tag check.
        let description = |value: Value| match value {
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Number(_) => "number",
            Value::Obj(_) => "obj",
        };
        assert_eq!(description(Value::nil()), "nil");
        assert_eq!(description(Value::number(0.5)), "number");
    }
}
