//! Polymorphic operators over dynamically shaped values.
//!
//! Every front-end takes its configuration (a mapper, predicate or reducer)
//! and returns an [`Operator`]: a unary function that, once applied to a
//! value, classifies it and dispatches to one implementation per shape.
//!
//! # Overview
//!
//! - [`map`], [`map_series`], [`map_pool`], [`map_with_index`]
//! - [`filter`], [`filter_with_index`]
//! - [`reduce`] / [`reduce_with`] (with cancellable asynchronous folds)
//! - [`transform`] and [`Transducer`]
//! - [`flat_map`]
//!
//! # Synchronous/Asynchronous Duality
//!
//! Operators only go asynchronous when a user function actually returns a
//! pending result. A purely synchronous mapper over an array yields a ready
//! [`Eventual`]; a single pending element makes the whole result pending.
//!
//! ```rust
//! use tacit::{map, Value};
//!
//! let double = map(|value: Value| Value::from(value.as_i64().unwrap_or(0) * 2));
//! let result = double.apply(Value::from(vec![1, 2, 3]));
//! assert!(!result.is_pending());
//! assert_eq!(
//!     result.try_ready().ok().and_then(Result::ok),
//!     Some(Value::from(vec![2, 4, 6]))
//! );
//! ```
//!
//! # Reducers as Operands
//!
//! Applying [`map`], [`filter`] or [`flat_map`] to a [`Value::Reducer`]
//! returns a new reducer rather than a container, which is how transducer
//! pipelines are composed (see [`Transducer`]).

mod filter;
mod flat_map;
mod map;
mod pool;
mod reduce;
mod transducer;
mod transform;

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::eventual::Eventual;
use crate::value::Value;

pub use filter::{filter, filter_with_index};
pub use flat_map::flat_map;
pub use map::{map, map_series, map_with_index};
pub use pool::map_pool;
pub use reduce::{CancelHandle, Cancellable, Initial, Reduce, reduce, reduce_with};
pub use transducer::Transducer;
pub use transform::transform;

pub(crate) use reduce::{fold_into, reduce_value};

/// Type-erased unary function shared by configured operators.
pub(crate) type UnaryFn = Arc<dyn Fn(Value) -> Eventual<Value> + Send + Sync>;

/// Type-erased `(element, index, collection)` function.
pub(crate) type IndexedFn = Arc<dyn Fn(Value, usize, &Value) -> Eventual<Value> + Send + Sync>;

pub(crate) fn unary<F, R>(function: F) -> UnaryFn
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    Arc::new(move |value: Value| -> Eventual<Value> { function(value).into() })
}

pub(crate) fn indexed<F, R>(function: F) -> IndexedFn
where
    F: Fn(Value, usize, &Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    Arc::new(
        move |value: Value, index: usize, collection: &Value| -> Eventual<Value> {
            function(value, index, collection).into()
        },
    )
}

/// A configured unary operator.
///
/// Cloning an `Operator` is cheap and every application is independent: no
/// state is shared between two calls of the same operator.
#[derive(Clone)]
pub struct Operator {
    name: &'static str,
    function: UnaryFn,
}

impl Operator {
    /// Wraps a unary function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tacit::{Operator, Value};
    ///
    /// let negate = Operator::new(|value: Value| Value::from(!value.is_truthy()));
    /// let result = negate.apply(Value::from(0)).try_ready().ok().and_then(Result::ok);
    /// assert_eq!(result, Some(Value::from(true)));
    /// ```
    pub fn new<F, R>(function: F) -> Self
    where
        F: Fn(Value) -> R + Send + Sync + 'static,
        R: Into<Eventual<Value>>,
    {
        Self::named("operator", unary(function))
    }

    pub(crate) fn named(name: &'static str, function: UnaryFn) -> Self {
        Self { name, function }
    }

    /// Applies the operator.
    pub fn apply(&self, value: Value) -> Eventual<Value> {
        (self.function)(value)
    }

    /// The name of the front-end that built this operator.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Turns the operator into a plain closure, e.g. to use it as a mapper.
    pub fn into_fn(self) -> impl Fn(Value) -> Eventual<Value> + Send + Sync + 'static {
        move |value| self.apply(value)
    }

    pub(crate) fn function(&self) -> UnaryFn {
        Arc::clone(&self.function)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Operator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Calls `function` on every item in order, stopping at the first ready
/// failure. Pending results are collected, not awaited.
pub(crate) fn call_each<I>(function: &UnaryFn, items: I) -> Result<Vec<Eventual<Value>>, Error>
where
    I: IntoIterator<Item = Value>,
{
    let items = items.into_iter();
    let mut results = Vec::with_capacity(items.size_hint().0);
    for item in items {
        match function(item).try_ready() {
            Ok(Ok(value)) => results.push(Eventual::ready(value)),
            Ok(Err(error)) => return Err(error),
            Err(pending) => results.push(pending),
        }
    }
    Ok(results)
}

/// Joins the collected results and finishes them into one value.
pub(crate) fn resolve_all<F>(
    results: Result<Vec<Eventual<Value>>, Error>,
    finish: F,
) -> Eventual<Value>
where
    F: FnOnce(Vec<Value>) -> Value + Send + 'static,
{
    match results {
        Ok(results) => Eventual::join_all(results).fmap(finish),
        Err(error) => Eventual::failed(error),
    }
}

/// Splits characters into one-character string values.
pub(crate) fn characters(text: &str) -> Vec<Value> {
    text.chars().map(Value::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_each_stops_at_first_ready_failure() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let function = unary(move |value: Value| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if value == Value::from(2) {
                Err(Error::message("two"))
            } else {
                Ok(value)
            }
        });
        let result = call_each(&function, vec![Value::from(1), Value::from(2), Value::from(3)]);
        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_operator_into_fn() {
        let identity = Operator::new(|value: Value| value).into_fn();
        let result = identity(Value::from("x")).try_ready().ok().and_then(Result::ok);
        assert_eq!(result, Some(Value::from("x")));
    }

    #[test]
    fn test_characters_splits_by_scalar_value() {
        assert_eq!(
            characters("aé😀"),
            vec![Value::from("a"), Value::from("é"), Value::from("😀")]
        );
    }
}
