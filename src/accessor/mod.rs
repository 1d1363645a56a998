//! Property accessors: [`get`], [`pick`] and [`omit`].
//!
//! Paths are written `a.b[0].c` (see [`Path`]). Keys step into objects and
//! maps, positions step into arrays, strings and typed arrays. A numeric key
//! also works as a position, so `a.0` and `a[0]` resolve the same way.
//!
//! # Examples
//!
//! ```rust
//! use tacit::accessor::{get, omit, pick};
//! use tacit::Value;
//!
//! let user = Value::object([
//!     ("name", Value::from("ada")),
//!     ("address", Value::object([("city", "london"), ("zip", "n1")])),
//! ]);
//!
//! let city = get("address.city", Value::Null).apply(user.clone());
//! assert_eq!(city.try_ready().ok().and_then(Result::ok), Some(Value::from("london")));
//!
//! let picked = pick(["address.city"]).apply(user.clone());
//! assert_eq!(
//!     picked.try_ready().ok().and_then(Result::ok),
//!     Some(Value::object([("address", Value::object([("city", "london")]))]))
//! );
//!
//! let omitted = omit(["address"]).apply(user);
//! assert_eq!(
//!     omitted.try_ready().ok().and_then(Result::ok),
//!     Some(Value::object([("name", "ada")]))
//! );
//! ```

mod path;

use std::sync::Arc;

pub use path::{Path, Segment};

use crate::error::Error;
use crate::eventual::Eventual;
use crate::operator::Operator;
use crate::value::{Object, Value};

/// Reads the value at `path`, or `default` when nothing (or `Null`) is
/// there. Never fails, whatever the operand.
pub fn get<P, D>(path: P, default: D) -> Operator
where
    P: Into<Path>,
    D: Into<Value>,
{
    let (path, default) = (path.into(), default.into());
    Operator::named(
        "get",
        Arc::new(move |value: Value| {
            let found = path
                .resolve(&value)
                .filter(|found| !found.is_null())
                .unwrap_or_else(|| default.clone());
            Eventual::ready(found)
        }),
    )
}

/// Builds a new object holding only the given paths.
///
/// Nested paths rebuild the nesting with objects; missing paths are
/// skipped.
///
/// # Errors
///
/// Applying the operator to anything but an object yields
/// [`Error::InvalidOperand`].
pub fn pick<P, I>(paths: I) -> Operator
where
    P: Into<Path>,
    I: IntoIterator<Item = P>,
{
    let paths = collect_paths(paths);
    Operator::named(
        "pick",
        Arc::new(move |value: Value| {
            if !matches!(value, Value::Object(_)) {
                return Eventual::failed(Error::invalid_operand("pick", value.type_name()));
            }
            let mut picked = Object::default();
            for path in paths.iter() {
                if let Some(found) = path.resolve(&value) {
                    insert_at(&mut picked, path.segments(), found);
                }
            }
            Eventual::ready(Value::Object(picked))
        }),
    )
}

/// Copies the object without the given paths.
///
/// # Errors
///
/// Applying the operator to anything but an object yields
/// [`Error::InvalidOperand`].
pub fn omit<P, I>(paths: I) -> Operator
where
    P: Into<Path>,
    I: IntoIterator<Item = P>,
{
    let paths = collect_paths(paths);
    Operator::named(
        "omit",
        Arc::new(move |value: Value| {
            let mut value = value;
            if !matches!(value, Value::Object(_)) {
                return Eventual::failed(Error::invalid_operand("omit", value.type_name()));
            }
            for path in paths.iter() {
                remove_at(&mut value, path.segments());
            }
            Eventual::ready(value)
        }),
    )
}

fn collect_paths<P, I>(paths: I) -> Arc<[Path]>
where
    P: Into<Path>,
    I: IntoIterator<Item = P>,
{
    paths.into_iter().map(Into::into).collect()
}

fn insert_at(object: &mut Object, segments: &[Segment], found: Value) {
    match segments {
        [] => {}
        [last] => {
            object.insert(last.key(), found);
        }
        [first, rest @ ..] => {
            let slot = object
                .entry(first.key())
                .or_insert_with(|| Value::Object(Object::default()));
            if !matches!(slot, Value::Object(_)) {
                *slot = Value::Object(Object::default());
            }
            if let Value::Object(inner) = slot {
                insert_at(inner, rest, found);
            }
        }
    }
}

fn remove_at(value: &mut Value, segments: &[Segment]) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = value;
    for segment in parents {
        let next = match current {
            Value::Object(entries) => entries.get_mut(segment.key().as_str()),
            Value::Array(items) => segment.position().and_then(|index| items.get_mut(index)),
            Value::Map(entries) => entries.get_mut(&Value::from(segment.key())),
            _ => None,
        };
        match next {
            Some(next) => current = next,
            None => return,
        }
    }
    match current {
        Value::Object(entries) => {
            entries.shift_remove(last.key().as_str());
        }
        Value::Array(items) => {
            if let Some(index) = last.position().filter(|&index| index < items.len()) {
                items.remove(index);
            }
        }
        Value::Map(entries) => {
            entries.shift_remove(&Value::from(last.key()));
        }
        _ => {}
    }
}
