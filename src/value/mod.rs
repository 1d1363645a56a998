//! Dynamic values operated on by every operator.
//!
//! [`Value`] is a closed tagged union over the container shapes the operators
//! understand, plus the scalars those containers hold. Shapes are discovered
//! by inspecting the variant at application time (see [`crate::shape`]), not
//! declared through generics.
//!
//! # Equality
//!
//! Equality follows SameValueZero: all NaNs are equal to each other and
//! `0.0 == -0.0`. `Int` and `Float` are distinct variants, so `Int(1)` and
//! `Float(1.0)` are different set members. Lazy sequences and reducers
//! compare by identity.
//!
//! # Examples
//!
//! ```rust
//! use tacit::Value;
//!
//! let user = Value::object([("name", Value::from("ada")), ("age", Value::from(36))]);
//! assert_eq!(user.type_name(), "Object");
//! assert!(user.is_truthy());
//! assert!(!Value::from("").is_truthy());
//! assert_eq!(Value::from(vec![1, 2, 3]).to_text(), "1,2,3");
//! ```

mod reducer;
mod sequence;
#[cfg(feature = "serde")]
mod json;
mod typed_array;

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

pub use reducer::Reducer;
pub use sequence::{AsyncSequence, Sequence};
pub(crate) use sequence::Pull;
pub use typed_array::{ElementKind, TypedArray};

/// Insertion-ordered string-keyed mapping.
pub type Object = IndexMap<String, Value, FxBuildHasher>;

/// Insertion-ordered set of unique values.
pub type Set = IndexSet<Value, FxBuildHasher>;

/// Insertion-ordered map with arbitrary value keys.
pub type Map = IndexMap<Value, Value, FxBuildHasher>;

/// A dynamically shaped value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A character sequence.
    String(String),
    /// An ordered, random-access sequence.
    Array(Vec<Value>),
    /// A string-keyed mapping.
    Object(Object),
    /// A set of unique values.
    Set(Set),
    /// A map with value keys.
    Map(Map),
    /// A fixed-width numeric sequence.
    Binary(TypedArray),
    /// A pull-based synchronous sequence.
    Iterator(Sequence),
    /// A pull-based asynchronous sequence.
    AsyncIterator(AsyncSequence),
    /// A two-argument reducer function.
    Reducer(Reducer),
}

static_assertions::assert_impl_all!(Value: Send, Sync, Clone);

impl Value {
    /// Builds an `Object` from key/value pairs.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Builds a `Set`; duplicates are dropped.
    pub fn set<V, I>(items: I) -> Self
    where
        V: Into<Self>,
        I: IntoIterator<Item = V>,
    {
        Self::Set(items.into_iter().map(Into::into).collect())
    }

    /// Builds a `Map` from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Self>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Builds an `Array`.
    pub fn array<V, I>(items: I) -> Self
    where
        V: Into<Self>,
        I: IntoIterator<Item = V>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Returns the name of the variant (for typed arrays, the element kind).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::String(_) => "String",
            Self::Array(_) => "Array",
            Self::Object(_) => "Object",
            Self::Set(_) => "Set",
            Self::Map(_) => "Map",
            Self::Binary(array) => array.kind().type_name(),
            Self::Iterator(_) => "Iterator",
            Self::AsyncIterator(_) => "AsyncIterator",
            Self::Reducer(_) => "Reducer",
        }
    }

    /// Host truthiness: `Null`, `false`, zero, NaN and `""` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(flag) => *flag,
            Self::Int(number) => *number != 0,
            Self::Float(number) => *number != 0.0 && !number.is_nan(),
            Self::String(text) => !text.is_empty(),
            _ => true,
        }
    }

    /// Returns `true` for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer, if this is an `Int`.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the number as a float, for both `Int` and `Float`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(number) => Some(*number as f64),
            Self::Float(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the elements, if this is an `Array`.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries, if this is an `Object`.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Coerces the value to text, the way string concatenation would.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(flag) => flag.to_string(),
            Self::Int(number) => number.to_string(),
            Self::Float(number) => float_text(*number),
            Self::String(text) => text.clone(),
            Self::Array(items) => items
                .iter()
                .map(|item| if item.is_null() { String::new() } else { item.to_text() })
                .collect::<Vec<_>>()
                .join(","),
            other => format!("[object {}]", other.type_name()),
        }
    }

    /// Orders numbers numerically (across `Int` and `Float`), strings and
    /// booleans naturally. Anything else is incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => Some(left.cmp(right)),
            (Self::String(left), Self::String(right)) => Some(left.cmp(right)),
            (Self::Bool(left), Self::Bool(right)) => Some(left.cmp(right)),
            (left, right) => left.as_f64()?.partial_cmp(&right.as_f64()?),
        }
    }

    /// Value equality that also treats numerically equal `Int`/`Float` as equal.
    #[must_use]
    pub fn loosely_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(_), Self::Float(_)) | (Self::Float(_), Self::Int(_)) => {
                self.compare(other) == Some(Ordering::Equal)
            }
            _ => self == other,
        }
    }
}

fn float_text(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number.is_infinite() {
        let text = if number > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if number == 0.0 {
        "0".to_string()
    } else if number.fract() == 0.0 && number.abs() < 1e21 {
        format!("{number:.0}")
    } else {
        number.to_string()
    }
}

/// Canonical bits for SameValueZero comparison and hashing.
pub(super) fn float_key(number: f64) -> u64 {
    if number.is_nan() {
        f64::NAN.to_bits()
    } else if number == 0.0 {
        0
    } else {
        number.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => float_key(*left) == float_key(*right),
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Array(left), Self::Array(right)) => left == right,
            (Self::Object(left), Self::Object(right)) => left == right,
            (Self::Set(left), Self::Set(right)) => left == right,
            (Self::Map(left), Self::Map(right)) => left == right,
            (Self::Binary(left), Self::Binary(right)) => left == right,
            (Self::Iterator(left), Self::Iterator(right)) => left.ptr_eq(right),
            (Self::AsyncIterator(left), Self::AsyncIterator(right)) => left.ptr_eq(right),
            (Self::Reducer(left), Self::Reducer(right)) => left.ptr_eq(right),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(flag) => flag.hash(state),
            Self::Int(number) => number.hash(state),
            Self::Float(number) => float_key(*number).hash(state),
            Self::String(text) => text.hash(state),
            Self::Array(items) => items.hash(state),
            // unordered equality: only the size is stable across orderings
            Self::Object(entries) => entries.len().hash(state),
            Self::Set(items) => items.len().hash(state),
            Self::Map(entries) => entries.len().hash(state),
            Self::Binary(array) => {
                array.kind().hash(state);
                array.len().hash(state);
            }
            Self::Iterator(sequence) => sequence.identity().hash(state),
            Self::AsyncIterator(sequence) => sequence.identity().hash(state),
            Self::Reducer(reducer) => reducer.identity().hash(state),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

macro_rules! impl_from_integer {
    ($($integer:ty),*) => {
        $(
            impl From<$integer> for Value {
                fn from(number: $integer) -> Self {
                    Self::Int(i64::from(number))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(number: usize) -> Self {
        i64::try_from(number).map_or(Self::Float(number as f64), Self::Int)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Float(number)
    }
}

impl From<f32> for Value {
    fn from(number: f32) -> Self {
        Self::Float(f64::from(number))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<char> for Value {
    fn from(character: char) -> Self {
        Self::String(character.to_string())
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::array(items)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Self::Null, Into::into)
    }
}

impl From<Object> for Value {
    fn from(entries: Object) -> Self {
        Self::Object(entries)
    }
}

impl From<Set> for Value {
    fn from(items: Set) -> Self {
        Self::Set(items)
    }
}

impl From<Map> for Value {
    fn from(entries: Map) -> Self {
        Self::Map(entries)
    }
}

impl From<TypedArray> for Value {
    fn from(array: TypedArray) -> Self {
        Self::Binary(array)
    }
}

impl From<Sequence> for Value {
    fn from(sequence: Sequence) -> Self {
        Self::Iterator(sequence)
    }
}

impl From<AsyncSequence> for Value {
    fn from(sequence: AsyncSequence) -> Self {
        Self::AsyncIterator(sequence)
    }
}

impl From<Reducer> for Value {
    fn from(reducer: Reducer) -> Self {
        Self::Reducer(reducer)
    }
}
