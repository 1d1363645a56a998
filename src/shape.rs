//! Runtime shape classification.
//!
//! Every front-end operator classifies its operand once, at the call
//! boundary, and dispatches to one implementation per shape. When a value
//! could satisfy several capabilities (an array is also iterable), the first
//! shape in this precedence order wins:
//!
//! 1. [`Shape::AsyncIterable`]
//! 2. [`Shape::Array`]
//! 3. [`Shape::String`]
//! 4. [`Shape::Set`]
//! 5. [`Shape::Map`]
//! 6. [`Shape::Binary`]
//! 7. [`Shape::Iterable`]
//! 8. [`Shape::Object`]
//! 9. [`Shape::Reducer`]
//!
//! Scalars (`Null`, `Bool`, `Int`, `Float`) have no shape.
//!
//! # Examples
//!
//! ```rust
//! use tacit::shape::{self, Shape};
//! use tacit::Value;
//!
//! assert_eq!(Shape::of(&Value::from(vec![1, 2])), Some(Shape::Array));
//! assert_eq!(Shape::of(&Value::from(1)), None);
//! assert!(shape::is_string(&Value::from("abc")));
//! ```

use crate::eventual::Eventual;
use crate::value::Value;

/// The container shape of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A pull-based asynchronous sequence.
    AsyncIterable,
    /// An ordered, random-access sequence.
    Array,
    /// A character sequence.
    String,
    /// A set of unique values.
    Set,
    /// A map with value keys.
    Map,
    /// A fixed-width numeric sequence.
    Binary,
    /// A pull-based synchronous sequence.
    Iterable,
    /// A string-keyed mapping.
    Object,
    /// A reducer function.
    Reducer,
}

impl Shape {
    /// All shapes, in dispatch precedence order.
    pub const PRECEDENCE: [Self; 9] = [
        Self::AsyncIterable,
        Self::Array,
        Self::String,
        Self::Set,
        Self::Map,
        Self::Binary,
        Self::Iterable,
        Self::Object,
        Self::Reducer,
    ];

    /// Classifies a value, returning the first matching shape.
    #[must_use]
    pub fn of(value: &Value) -> Option<Self> {
        Self::PRECEDENCE
            .into_iter()
            .find(|shape| shape.matches(value))
    }

    /// Tests a single capability, ignoring precedence.
    #[must_use]
    pub const fn matches(self, value: &Value) -> bool {
        match self {
            Self::AsyncIterable => is_async_iterable(value),
            Self::Array => is_array(value),
            Self::String => is_string(value),
            Self::Set => is_set(value),
            Self::Map => is_map(value),
            Self::Binary => is_binary(value),
            Self::Iterable => is_iterable(value),
            Self::Object => is_object(value),
            Self::Reducer => is_reducer(value),
        }
    }

    /// Returns `true` for shapes with a positional or key order.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        !matches!(self, Self::Set | Self::Reducer)
    }
}

/// Is `value` an array?
#[must_use]
pub const fn is_array(value: &Value) -> bool {
    matches!(value, Value::Array(_))
}

/// Is `value` a string?
#[must_use]
pub const fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

/// Is `value` a set?
#[must_use]
pub const fn is_set(value: &Value) -> bool {
    matches!(value, Value::Set(_))
}

/// Is `value` a key-value map?
#[must_use]
pub const fn is_map(value: &Value) -> bool {
    matches!(value, Value::Map(_))
}

/// Is `value` a typed array?
#[must_use]
pub const fn is_binary(value: &Value) -> bool {
    matches!(value, Value::Binary(_))
}

/// Can `value` be pulled synchronously?
///
/// Arrays, strings, sets, maps and typed arrays are iterable too; only
/// dispatch precedence keeps them on their own shape.
#[must_use]
pub const fn is_iterable(value: &Value) -> bool {
    matches!(
        value,
        Value::Iterator(_)
            | Value::Array(_)
            | Value::String(_)
            | Value::Set(_)
            | Value::Map(_)
            | Value::Binary(_)
    )
}

/// Can `value` be pulled asynchronously?
#[must_use]
pub const fn is_async_iterable(value: &Value) -> bool {
    matches!(value, Value::AsyncIterator(_))
}

/// Is `value` a plain string-keyed object?
#[must_use]
pub const fn is_object(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Is `value` a reducer function?
#[must_use]
pub const fn is_reducer(value: &Value) -> bool {
    matches!(value, Value::Reducer(_))
}

/// Is `result` still pending?
#[must_use]
pub const fn is_pending<A>(result: &Eventual<A>) -> bool {
    result.is_pending()
}
