//! The compact NaN-boxed value encoding.
//!
//! A well-formed IEEE 754 double never carries the full quiet-NaN pattern
//! (every exponent bit, the quiet bit, and the Intel QNaN-indefinite bit
//! all set), so those bit patterns are free to hold non-number values. Two
//! low tag bits distinguish nil, false, and true; the sign bit on top of
//! the quiet-NaN pattern marks an object handle whose address sits in the
//! low 48 bits. Every other bit pattern is the number it spells.
//!
//! This encoding needs the platform to keep object addresses within 48
//! bits and bit 63 spare; platforms that cannot guarantee that build with
//! the tagged encoding instead.
//!
//! All bit reinterpretation is confined to this module; nothing outside it
//! may depend on the layout.

use std::fmt;

use super::ObjHandle;

/// The quiet-NaN exponent/mantissa pattern reserved for non-numbers.
const QNAN: u64 = 0x7ffc_0000_0000_0000;
/// Marks an object handle when combined with `QNAN`.
const SIGN_BIT: u64 = 0x8000_0000_0000_0000;
/// Mask covering the 48 address bits of an object word.
const ADDR_MASK: u64 = (1 << 48) - 1;

const TAG_NIL: u64 = 1;
const TAG_FALSE: u64 = 2;
const TAG_TRUE: u64 = 3;

const NIL: u64 = QNAN | TAG_NIL;
const FALSE: u64 = QNAN | TAG_FALSE;
const TRUE: u64 = QNAN | TAG_TRUE;

/// A runtime value packed into a single 64-bit word.
#[derive(Clone, Copy)]
pub struct Value(u64);

impl Value {
    /// Creates the nil value.
    pub fn nil() -> Self {
        Value(NIL)
    }

    /// Creates a boolean value.
    pub fn boolean(b: bool) -> Self {
        Value(if b { TRUE } else { FALSE })
    }

    /// Creates a number value.
    pub fn number(n: f64) -> Self {
        Value(n.to_bits())
    }

    /// Creates an object-reference value.
    pub fn obj(handle: ObjHandle) -> Self {
        let addr = handle.addr() as u64;
        debug_assert_eq!(addr & !ADDR_MASK, 0, "object address exceeds 48 bits");
        Value(SIGN_BIT | QNAN | addr)
    }

    /// Returns true if this value is a boolean.
    pub fn is_bool(self) -> bool {
        // Setting the low bit maps FALSE onto TRUE and nothing else onto
        // either.
        (self.0 | 1) == TRUE
    }

    /// Returns true if this value is nil.
    pub fn is_nil(self) -> bool {
        self.0 == NIL
    }

    /// Returns true if this value is a number: any word that does not
    /// carry the full reserved quiet-NaN pattern.
    pub fn is_number(self) -> bool {
        (self.0 & QNAN) != QNAN
    }

    /// Returns true if this value is an object reference.
    pub fn is_obj(self) -> bool {
        (self.0 & (SIGN_BIT | QNAN)) == (SIGN_BIT | QNAN)
    }

    /// Extracts the boolean payload. Calling this on any other variant is
    /// a caller bug.
    pub fn as_bool(self) -> bool {
        debug_assert!(self.is_bool());
        self.0 == TRUE
    }

    /// Extracts the number payload. Calling this on any other variant is a
    /// caller bug.
    pub fn as_number(self) -> f64 {
        debug_assert!(self.is_number());
        f64::from_bits(self.0)
    }

    /// Extracts the object handle. Calling this on any other variant is a
    /// caller bug.
    pub fn as_obj(self) -> ObjHandle {
        debug_assert!(self.is_obj());
        ObjHandle::from_addr((self.0 & ADDR_MASK) as usize)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        // Two numbers compare as doubles so NaN stays unequal to itself;
        // everything else has a canonical bit pattern.
        if self.is_number() && other.is_number() {
            self.as_number() == other.as_number()
        } else {
            self.0 == other.0
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_number() {
            f.debug_tuple("Number").field(&self.as_number()).finish()
        } else if self.is_bool() {
            f.debug_tuple("Bool").field(&self.as_bool()).finish()
        } else if self.is_obj() {
            f.debug_tuple("Obj").field(&self.as_obj()).finish()
        } else {
            f.write_str("Nil")
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_number() {
            write!(f, "{}", self.as_number())
        } else if self.is_bool() {
            write!(f, "{}", self.as_bool())
        } else if self.is_obj() {
            write!(f, "<obj @{:#x}>", self.as_obj().addr())
        } else {
            write!(f, "nil")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_bit_patterns() {
        assert_eq!(Value::nil().0, 0x7ffc_0000_0000_0001);
        assert_eq!(Value::boolean(false).0, 0x7ffc_0000_0000_0002);
        assert_eq!(Value::boolean(true).0, 0x7ffc_0000_0000_0003);
    }

    #[test]
    fn test_numbers_are_their_own_bits() {
        let value = Value::number(1.5);
        assert_eq!(value.0, 1.5f64.to_bits());
    }

    #[test]
    fn test_object_word_carries_sign_qnan_and_address() {
        let value = Value::obj(ObjHandle::from_addr(0xdead_beef));
        assert_eq!(value.0, SIGN_BIT | QNAN | 0xdead_beef);
        assert_eq!(value.as_obj().addr(), 0xdead_beef);
    }

    #[test]
    fn test_object_word_is_not_a_number_or_bool() {
        let value = Value::obj(ObjHandle::from_addr(0x1));
        assert!(value.is_obj());
        assert!(!value.is_number());
        assert!(!value.is_bool());
        assert!(!value.is_nil());
    }

    #[test]
    fn test_runtime_nan_bits_stay_on_the_number_side() {
        // The hardware NaN (0x7ff8...) does not collide with the reserved
        // pattern (0x7ffc...).
        let nan = Value::number(f64::NAN);
        assert!(nan.is_number());
        assert!(!nan.is_nil());
        assert!(!nan.is_bool());
        assert!(!nan.is_obj());
    }
}
