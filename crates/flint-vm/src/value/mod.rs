//! Runtime value representation.
//!
//! A Flint value is exactly one of four variants: a boolean, nil, an
//! IEEE 754 double, or a reference to a heap object. Two encodings
//! implement the same interface and are selected at build time:
//!
//! - `tagged` (the default) - a Rust enum with an explicit discriminant;
//!   the compiler enforces exhaustive variant handling.
//! - `boxed` (the `nan-boxing` feature) - the whole value packed into a
//!   single 64-bit word, using the quiet-NaN bit patterns a well-formed
//!   double never produces.
//!
//! Call sites depend only on the shared constructors, predicates, and
//! accessors — never on encoding details — so the two strategies are
//! behaviorally identical to every caller.
//!
//! ## Structure
//!
//! - `tagged.rs` - The enum encoding
//! - `boxed.rs` - The NaN-boxed encoding
//! - `array.rs` - `ValueArray`, the growable constant-pool container

mod array;
#[cfg(feature = "nan-boxing")]
mod boxed;
#[cfg(not(feature = "nan-boxing"))]
mod tagged;

pub use array::ValueArray;
#[cfg(feature = "nan-boxing")]
pub use boxed::Value;
#[cfg(not(feature = "nan-boxing"))]
pub use tagged::Value;

/// An opaque handle to a heap object.
///
/// The object system lives outside this crate's scope; the value model
/// only needs an identity it can store and compare. Two handles are equal
/// iff they refer to the same object — never by deep comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjHandle(usize);

impl ObjHandle {
    /// Creates a handle from a heap address.
    pub fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    /// Returns the heap address this handle refers to.
    pub fn addr(self) -> usize {
        self.0
    }
}

// Encoding-independent tests: everything here goes through the shared
// constructors, predicates, and accessors, so the same assertions hold
// under both strategies.
#[cfg(test)]
mod tests {
    use super::*;

    fn variant_flags(value: Value) -> [bool; 4] {
        [
            value.is_bool(),
            value.is_nil(),
            value.is_number(),
            value.is_obj(),
        ]
    }

    #[test]
    fn test_number_round_trip_is_bit_exact() {
        for n in [
            0.0,
            -0.0,
            1.0,
            -1.5,
            6.02e23,
            f64::MIN_POSITIVE,
            f64::MAX,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ] {
            let value = Value::number(n);
            assert_eq!(value.as_number().to_bits(), n.to_bits());
        }
    }

    #[test]
    fn test_runtime_nan_is_still_a_number() {
        let nan = Value::number(0.0 / 0.0);
        assert!(nan.is_number());
        assert!(nan.as_number().is_nan());
    }

    #[test]
    fn test_exactly_one_variant_predicate_holds() {
        let samples = [
            Value::boolean(true),
            Value::boolean(false),
            Value::nil(),
            Value::number(3.25),
            Value::number(f64::NAN),
            Value::obj(ObjHandle::from_addr(0x4000)),
        ];

        for value in samples {
            let hits = variant_flags(value).iter().filter(|&&hit| hit).count();
            assert_eq!(hits, 1, "one variant must be active for {value}");
        }
    }

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        assert_ne!(Value::number(0.0 / 0.0), Value::number(0.0 / 0.0));
    }

    #[test]
    fn test_equality_by_variant() {
        assert_eq!(Value::nil(), Value::nil());
        assert_eq!(Value::boolean(true), Value::boolean(true));
        assert_ne!(Value::boolean(true), Value::boolean(false));
        assert_eq!(Value::number(2.5), Value::number(2.5));
        assert_ne!(Value::number(2.5), Value::number(2.75));

        // Different variants never compare equal, even when a coercion
        // could make them "the same".
        assert_ne!(Value::nil(), Value::boolean(false));
        assert_ne!(Value::number(1.0), Value::boolean(true));
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a = ObjHandle::from_addr(0x1000);
        let b = ObjHandle::from_addr(0x2000);
        assert_eq!(Value::obj(a), Value::obj(a));
        assert_ne!(Value::obj(a), Value::obj(b));
    }

    #[test]
    fn test_accessors_round_trip() {
        assert!(Value::boolean(true).as_bool());
        assert!(!Value::boolean(false).as_bool());
        assert_eq!(Value::number(1.25).as_number(), 1.25);
        assert_eq!(
            Value::obj(ObjHandle::from_addr(0x7f00)).as_obj(),
            ObjHandle::from_addr(0x7f00)
        );
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(Value::boolean(true).to_string(), "true");
        assert_eq!(Value::boolean(false).to_string(), "false");
        assert_eq!(Value::nil().to_string(), "nil");
        assert_eq!(Value::number(42.0).to_string(), "42");
        assert_eq!(Value::number(2.5).to_string(), "2.5");
        assert!(
            Value::obj(ObjHandle::from_addr(0x10))
                .to_string()
                .starts_with("<obj")
        );
    }
}
