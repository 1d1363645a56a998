//! Fixed-width numeric sequences.
//!
//! A [`TypedArray`] stores its elements unboxed, one vector per element
//! kind. Operators read elements out as [`Value`]s and rebuild a new array
//! of the same [`ElementKind`] from their results, coercing numbers with
//! wrapping casts. Non-numeric results become `0` for integer kinds and NaN
//! for float kinds.

use super::{Value, float_key};

/// The element type of a [`TypedArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `u8` elements.
    Uint8,
    /// `i8` elements.
    Int8,
    /// `u16` elements.
    Uint16,
    /// `i16` elements.
    Int16,
    /// `u32` elements.
    Uint32,
    /// `i32` elements.
    Int32,
    /// `f32` elements.
    Float32,
    /// `f64` elements.
    Float64,
    /// `i64` elements.
    BigInt64,
    /// `u64` elements.
    BigUint64,
}

impl ElementKind {
    /// The conventional name of an array of this kind.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Uint8 => "Uint8Array",
            Self::Int8 => "Int8Array",
            Self::Uint16 => "Uint16Array",
            Self::Int16 => "Int16Array",
            Self::Uint32 => "Uint32Array",
            Self::Int32 => "Int32Array",
            Self::Float32 => "Float32Array",
            Self::Float64 => "Float64Array",
            Self::BigInt64 => "BigInt64Array",
            Self::BigUint64 => "BigUint64Array",
        }
    }
}

/// A fixed-width numeric sequence.
///
/// Equality follows SameValueZero for float kinds: NaN equals NaN and `-0.0`
/// equals `0.0`.
#[derive(Debug, Clone)]
pub enum TypedArray {
    /// `u8` elements.
    Uint8(Vec<u8>),
    /// `i8` elements.
    Int8(Vec<i8>),
    /// `u16` elements.
    Uint16(Vec<u16>),
    /// `i16` elements.
    Int16(Vec<i16>),
    /// `u32` elements.
    Uint32(Vec<u32>),
    /// `i32` elements.
    Int32(Vec<i32>),
    /// `f32` elements.
    Float32(Vec<f32>),
    /// `f64` elements.
    Float64(Vec<f64>),
    /// `i64` elements.
    BigInt64(Vec<i64>),
    /// `u64` elements.
    BigUint64(Vec<u64>),
}

impl PartialEq for TypedArray {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Uint8(left), Self::Uint8(right)) => left == right,
            (Self::Int8(left), Self::Int8(right)) => left == right,
            (Self::Uint16(left), Self::Uint16(right)) => left == right,
            (Self::Int16(left), Self::Int16(right)) => left == right,
            (Self::Uint32(left), Self::Uint32(right)) => left == right,
            (Self::Int32(left), Self::Int32(right)) => left == right,
            (Self::Float32(left), Self::Float32(right)) => left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(l, r)| float_key(f64::from(*l)) == float_key(f64::from(*r))),
            (Self::Float64(left), Self::Float64(right)) => left.len() == right.len()
                && left.iter().zip(right).all(|(l, r)| float_key(*l) == float_key(*r)),
            (Self::BigInt64(left), Self::BigInt64(right)) => left == right,
            (Self::BigUint64(left), Self::BigUint64(right)) => left == right,
            _ => false,
        }
    }
}

/// Runs `$body` with `$items` bound to the inner vector, whatever the kind.
macro_rules! with_elements {
    ($array:expr, $items:ident => $body:expr) => {
        match $array {
            TypedArray::Uint8($items) => $body,
            TypedArray::Int8($items) => $body,
            TypedArray::Uint16($items) => $body,
            TypedArray::Int16($items) => $body,
            TypedArray::Uint32($items) => $body,
            TypedArray::Int32($items) => $body,
            TypedArray::Float32($items) => $body,
            TypedArray::Float64($items) => $body,
            TypedArray::BigInt64($items) => $body,
            TypedArray::BigUint64($items) => $body,
        }
    };
}

/// Builds an array of `$kind` from an iterator of value references.
macro_rules! collect_kind {
    ($kind:expr, $values:expr) => {
        match $kind {
            ElementKind::Uint8 => TypedArray::Uint8($values.map(Element::from_value).collect()),
            ElementKind::Int8 => TypedArray::Int8($values.map(Element::from_value).collect()),
            ElementKind::Uint16 => TypedArray::Uint16($values.map(Element::from_value).collect()),
            ElementKind::Int16 => TypedArray::Int16($values.map(Element::from_value).collect()),
            ElementKind::Uint32 => TypedArray::Uint32($values.map(Element::from_value).collect()),
            ElementKind::Int32 => TypedArray::Int32($values.map(Element::from_value).collect()),
            ElementKind::Float32 => TypedArray::Float32($values.map(Element::from_value).collect()),
            ElementKind::Float64 => TypedArray::Float64($values.map(Element::from_value).collect()),
            ElementKind::BigInt64 => TypedArray::BigInt64($values.map(Element::from_value).collect()),
            ElementKind::BigUint64 => {
                TypedArray::BigUint64($values.map(Element::from_value).collect())
            }
        }
    };
}

impl TypedArray {
    /// Creates an empty array of the given kind.
    #[must_use]
    pub fn empty(kind: ElementKind) -> Self {
        Self::from_values(kind, &[])
    }

    /// Rebuilds an array of `kind` from values, coercing each element.
    #[must_use]
    pub fn from_values(kind: ElementKind, values: &[Value]) -> Self {
        collect_kind!(kind, values.iter())
    }

    /// The element kind.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Uint8(_) => ElementKind::Uint8,
            Self::Int8(_) => ElementKind::Int8,
            Self::Uint16(_) => ElementKind::Uint16,
            Self::Int16(_) => ElementKind::Int16,
            Self::Uint32(_) => ElementKind::Uint32,
            Self::Int32(_) => ElementKind::Int32,
            Self::Float32(_) => ElementKind::Float32,
            Self::Float64(_) => ElementKind::Float64,
            Self::BigInt64(_) => ElementKind::BigInt64,
            Self::BigUint64(_) => ElementKind::BigUint64,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        with_elements!(self, items => items.len())
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads one element.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        with_elements!(self, items => items.get(index).copied().map(Element::to_value))
    }

    /// Reads all elements.
    #[must_use]
    pub fn to_values(&self) -> Vec<Value> {
        with_elements!(self, items => items.iter().copied().map(Element::to_value).collect())
    }

    /// Appends one element, coerced to the element kind.
    pub fn push(&mut self, value: &Value) {
        with_elements!(self, items => items.push(Element::from_value(value)));
    }
}

trait Element: Copy {
    fn to_value(self) -> Value;
    fn from_value(value: &Value) -> Self;
}

#[allow(clippy::cast_possible_truncation)]
fn integral(value: &Value) -> i64 {
    match value {
        Value::Int(number) => *number,
        Value::Float(number) if number.is_finite() => *number as i64,
        Value::Bool(flag) => i64::from(*flag),
        _ => 0,
    }
}

fn real(value: &Value) -> f64 {
    match value {
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        other => other.as_f64().unwrap_or(f64::NAN),
    }
}

macro_rules! integral_element {
    ($($element:ty),*) => {
        $(
            impl Element for $element {
                fn to_value(self) -> Value {
                    Value::Int(i64::from(self))
                }

                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                fn from_value(value: &Value) -> Self {
                    integral(value) as Self
                }
            }
        )*
    };
}

integral_element!(u8, i8, u16, i16, u32, i32, i64);

impl Element for u64 {
    #[allow(clippy::cast_precision_loss)]
    fn to_value(self) -> Value {
        i64::try_from(self).map_or(Value::Float(self as f64), Value::Int)
    }

    #[allow(clippy::cast_sign_loss)]
    fn from_value(value: &Value) -> Self {
        integral(value) as Self
    }
}

impl Element for f32 {
    fn to_value(self) -> Value {
        Value::Float(f64::from(self))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Self {
        real(value) as Self
    }
}

impl Element for f64 {
    fn to_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Self {
        real(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion_wraps() {
        let array = TypedArray::from_values(
            ElementKind::Uint8,
            &[Value::from(255), Value::from(256), Value::from(-1), Value::from("x")],
        );
        assert_eq!(array, TypedArray::Uint8(vec![255, 0, 255, 0]));
    }

    #[test]
    fn test_float_coercion() {
        let array = TypedArray::from_values(ElementKind::Float64, &[Value::from(1), Value::Null]);
        match array {
            TypedArray::Float64(items) => {
                assert!((items[0] - 1.0).abs() < f64::EPSILON);
                assert!(items[1].is_nan());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_float_elements_compare_by_same_value_zero() {
        let array = TypedArray::Float64(vec![f64::NAN, -0.0]);
        assert_eq!(array, array.clone());
        assert_eq!(array, TypedArray::Float64(vec![f64::NAN, 0.0]));
        assert_eq!(TypedArray::Float32(vec![f32::NAN]), TypedArray::Float32(vec![f32::NAN]));
        assert_ne!(TypedArray::Float64(vec![1.0]), TypedArray::Float32(vec![1.0]));

        let binary = Value::Binary(array);
        match Value::set([binary.clone(), binary]) {
            Value::Set(items) => assert_eq!(items.len(), 1),
            other => panic!("expected a set, got {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_through_values_keeps_kind() {
        let array = TypedArray::Int16(vec![-3, 4]);
        let rebuilt = TypedArray::from_values(array.kind(), &array.to_values());
        assert_eq!(rebuilt, array);
        assert_eq!(rebuilt.kind().type_name(), "Int16Array");
    }

    #[test]
    fn test_push_and_get() {
        let mut array = TypedArray::empty(ElementKind::Int32);
        array.push(&Value::from(7));
        assert_eq!(array.len(), 1);
        assert_eq!(array.get(0), Some(Value::from(7)));
        assert_eq!(array.get(1), None);
    }
}
