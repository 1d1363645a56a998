//! Reducer-to-reducer transformations.
//!
//! A transducer wraps a reducer so that each element is transformed before
//! the wrapped reducer sees it. Composing transducers and then folding once
//! with [`reduce`](super::reduce) fuses several `map`/`filter`/`flat_map`
//! passes into one traversal without intermediate containers.

use std::fmt;
use std::sync::Arc;

use super::{UnaryFn, fold_into, unary};
use crate::eventual::Eventual;
use crate::value::{Reducer, Value};

pub(crate) fn map_reducer(mapper: UnaryFn, reducer: Reducer) -> Reducer {
    Reducer::new(move |accumulator: Value, element: Value| {
        let reducer = reducer.clone();
        mapper(element).flat_map(move |mapped| reducer.call(accumulator, mapped))
    })
}

pub(crate) fn filter_reducer(predicate: UnaryFn, reducer: Reducer) -> Reducer {
    Reducer::new(move |accumulator: Value, element: Value| {
        let reducer = reducer.clone();
        predicate(element.clone()).flat_map(move |verdict| {
            if verdict.is_truthy() {
                reducer.call(accumulator, element)
            } else {
                Eventual::ready(accumulator)
            }
        })
    })
}

/// The inner result is folded into the accumulator, so one element may
/// contribute zero, one or many reducer calls.
pub(crate) fn flat_map_reducer(mapper: UnaryFn, reducer: Reducer) -> Reducer {
    Reducer::new(move |accumulator: Value, element: Value| {
        let reducer = reducer.clone();
        mapper(element).flat_map(move |inner| fold_into(reducer, accumulator, inner))
    })
}

type Wrap = dyn Fn(Reducer) -> Reducer + Send + Sync;

/// A composable reducer transformation.
///
/// `a.then(b)` passes each element through `a` first and then through `b`,
/// the same order as applying `a` and then `b` to a container.
///
/// # Examples
///
/// ```rust
/// use tacit::{reduce_with, Initial, Reducer, Transducer, Value};
///
/// let push = Reducer::new(|accumulator: Value, element: Value| {
///     let mut items = accumulator.as_array().map(<[Value]>::to_vec).unwrap_or_default();
///     items.push(element);
///     Value::Array(items)
/// });
/// let odd_squares = Transducer::filter(|value: Value| Value::from(value.as_i64().unwrap_or(0) % 2 == 1))
///     .then(Transducer::map(|value: Value| {
///         let number = value.as_i64().unwrap_or(0);
///         Value::from(number * number)
///     }));
/// let result = reduce_with(odd_squares.apply(push), Initial::value(Value::array(Vec::<Value>::new())))
///     .apply(Value::from(vec![1, 2, 3, 4, 5]))
///     .try_ready()
///     .ok()
///     .and_then(Result::ok);
/// assert_eq!(result, Some(Value::from(vec![1, 9, 25])));
/// ```
#[derive(Clone)]
pub struct Transducer {
    wrap: Arc<Wrap>,
}

impl Transducer {
    /// Creates a transducer from a reducer transformation.
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(Reducer) -> Reducer + Send + Sync + 'static,
    {
        Self {
            wrap: Arc::new(wrap),
        }
    }

    /// The transducer that leaves reducers untouched.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|reducer| reducer)
    }

    /// Maps every element before it reaches the reducer.
    pub fn map<F, R>(mapper: F) -> Self
    where
        F: Fn(Value) -> R + Send + Sync + 'static,
        R: Into<Eventual<Value>>,
    {
        let mapper = unary(mapper);
        Self::new(move |reducer| map_reducer(Arc::clone(&mapper), reducer))
    }

    /// Drops elements whose predicate result is falsy.
    pub fn filter<F, R>(predicate: F) -> Self
    where
        F: Fn(Value) -> R + Send + Sync + 'static,
        R: Into<Eventual<Value>>,
    {
        let predicate = unary(predicate);
        Self::new(move |reducer| filter_reducer(Arc::clone(&predicate), reducer))
    }

    /// Maps every element to a container and feeds its items one by one.
    pub fn flat_map<F, R>(mapper: F) -> Self
    where
        F: Fn(Value) -> R + Send + Sync + 'static,
        R: Into<Eventual<Value>>,
    {
        let mapper = unary(mapper);
        Self::new(move |reducer| flat_map_reducer(Arc::clone(&mapper), reducer))
    }

    /// Composes left to right: elements pass through `self` first.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self::new(move |reducer| self.apply(next.apply(reducer)))
    }

    /// Composes a list of transducers left to right.
    pub fn compose<I>(transducers: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        transducers
            .into_iter()
            .reduce(Self::then)
            .unwrap_or_else(Self::identity)
    }

    /// Wraps a reducer.
    #[must_use]
    pub fn apply(&self, reducer: Reducer) -> Reducer {
        (self.wrap)(reducer)
    }
}

impl fmt::Debug for Transducer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Transducer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append() -> Reducer {
        Reducer::new(|accumulator: Value, element: Value| {
            Value::from(format!("{}{}", accumulator.to_text(), element.to_text()))
        })
    }

    fn call(reducer: &Reducer, accumulator: &str, element: i64) -> Value {
        match reducer
            .call(Value::from(accumulator), Value::from(element))
            .try_ready()
        {
            Ok(Ok(value)) => value,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_filter_skips_delegation() {
        let reducer = Transducer::filter(|value: Value| Value::from(value.as_i64() == Some(1)))
            .apply(append());
        assert_eq!(call(&reducer, "x", 1), Value::from("x1"));
        assert_eq!(call(&reducer, "x", 2), Value::from("x"));
    }

    #[test]
    fn test_then_applies_self_first() {
        let double = Transducer::map(|value: Value| Value::from(value.as_i64().unwrap_or(0) * 2));
        let keep_two = Transducer::filter(|value: Value| Value::from(value.as_i64() == Some(2)));
        let map_then_filter = double.clone().then(keep_two.clone()).apply(append());
        let filter_then_map = keep_two.then(double).apply(append());
        assert_eq!(call(&map_then_filter, "", 1), Value::from("2"));
        assert_eq!(call(&filter_then_map, "", 1), Value::from(""));
        assert_eq!(call(&filter_then_map, "", 2), Value::from("4"));
    }

    #[test]
    fn test_flat_map_feeds_every_item() {
        let reducer = Transducer::flat_map(|value: Value| Value::Array(vec![value.clone(), value]))
            .apply(append());
        assert_eq!(call(&reducer, "", 7), Value::from("77"));
    }

    #[test]
    fn test_compose_empty_is_identity() {
        let reducer = Transducer::compose(Vec::new()).apply(append());
        assert_eq!(call(&reducer, "a", 1), Value::from("a1"));
    }
}
