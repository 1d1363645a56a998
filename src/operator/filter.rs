//! Shape-preserving `filter`.

use std::sync::Arc;

use futures::TryStreamExt;
use futures::stream::FuturesUnordered;
use rustc_hash::FxBuildHasher;

use super::map::call_indexed;
use super::{Operator, UnaryFn, call_each, characters, indexed, transducer, unary};
use crate::error::Error;
use crate::eventual::Eventual;
use crate::shape::Shape;
use crate::value::{AsyncSequence, Map, Object, Pull, Sequence, Set, TypedArray, Value};

/// Keeps the elements whose predicate result is truthy.
///
/// Arrays, strings, typed arrays, maps and objects evaluate every predicate
/// first and then keep the surviving elements in their original order.
/// Sets insert survivors as their predicates resolve. Sequences are filtered
/// lazily. A reducer operand yields a reducer that skips falsy elements.
///
/// Nothing is committed on failure: the first predicate failure fails the
/// whole result and no partially filtered container is returned.
///
/// # Errors
///
/// - Scalars yield [`Error::InvalidOperand`].
/// - A pending predicate result while pulling from a synchronous sequence
///   yields [`Error::SyncSequenceMisuse`] for that pull.
///
/// # Examples
///
/// ```rust
/// use tacit::{filter, Value};
///
/// let odd = filter(|value: Value| Value::from(value.as_i64().unwrap_or(0) % 2 == 1));
/// let result = odd
///     .apply(Value::object([("a", 1), ("b", 2), ("c", 3)]))
///     .try_ready()
///     .ok()
///     .and_then(Result::ok);
/// assert_eq!(result, Some(Value::object([("a", 1), ("c", 3)])));
/// ```
pub fn filter<F, R>(predicate: F) -> Operator
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    let predicate = unary(predicate);
    Operator::named(
        "filter",
        Arc::new(move |value: Value| filter_value(&predicate, value)),
    )
}

pub(crate) fn filter_value(predicate: &UnaryFn, value: Value) -> Eventual<Value> {
    match (Shape::of(&value), value) {
        (Some(Shape::AsyncIterable), Value::AsyncIterator(sequence)) => Eventual::ready(
            Value::AsyncIterator(filter_async_sequence(Arc::clone(predicate), sequence)),
        ),
        (Some(Shape::Array), Value::Array(items)) => retain(predicate, items, Value::Array),
        (Some(Shape::String), Value::String(text)) => {
            retain(predicate, characters(&text), |kept| {
                Value::String(kept.iter().map(Value::to_text).collect())
            })
        }
        (Some(Shape::Set), Value::Set(items)) => filter_set(predicate, items),
        (Some(Shape::Map), Value::Map(entries)) => filter_map(predicate, entries),
        (Some(Shape::Binary), Value::Binary(array)) => {
            let kind = array.kind();
            retain(predicate, array.to_values(), move |kept| {
                Value::Binary(TypedArray::from_values(kind, &kept))
            })
        }
        (Some(Shape::Iterable), Value::Iterator(sequence)) => {
            Eventual::ready(Value::Iterator(Sequence::from_pull(FilterSequence {
                source: sequence,
                predicate: Arc::clone(predicate),
            })))
        }
        (Some(Shape::Object), Value::Object(entries)) => filter_object(predicate, entries),
        (Some(Shape::Reducer), Value::Reducer(reducer)) => Eventual::ready(Value::Reducer(
            transducer::filter_reducer(Arc::clone(predicate), reducer),
        )),
        (_, other) => Eventual::failed(Error::invalid_operand("filter", other.type_name())),
    }
}

/// Evaluates every predicate, then keeps the items at truthy positions.
fn retain<F>(predicate: &UnaryFn, items: Vec<Value>, finish: F) -> Eventual<Value>
where
    F: FnOnce(Vec<Value>) -> Value + Send + 'static,
{
    let verdicts = call_each(predicate, items.iter().cloned());
    keep_truthy(verdicts, items, finish)
}

fn keep_truthy<T, F>(
    verdicts: Result<Vec<Eventual<Value>>, Error>,
    items: Vec<T>,
    finish: F,
) -> Eventual<Value>
where
    T: Send + 'static,
    F: FnOnce(Vec<T>) -> Value + Send + 'static,
{
    let verdicts = match verdicts {
        Ok(verdicts) => verdicts,
        Err(error) => return Eventual::failed(error),
    };
    Eventual::join_all(verdicts).fmap(move |verdicts| {
        finish(
            items
                .into_iter()
                .zip(verdicts)
                .filter_map(|(item, verdict)| verdict.is_truthy().then_some(item))
                .collect(),
        )
    })
}

fn filter_set(predicate: &UnaryFn, items: Set) -> Eventual<Value> {
    let mut output = Set::with_capacity_and_hasher(items.len(), FxBuildHasher);
    let mut pending = FuturesUnordered::new();
    for item in items {
        match predicate(item.clone()).try_ready() {
            Ok(Ok(verdict)) => {
                if verdict.is_truthy() {
                    output.insert(item);
                }
            }
            Ok(Err(error)) => return Eventual::failed(error),
            Err(verdict) => pending.push(async move { Ok::<_, Error>((item, verdict.await?)) }),
        }
    }
    if pending.is_empty() {
        return Eventual::ready(Value::Set(output));
    }
    Eventual::pending(async move {
        while let Some((item, verdict)) = pending.try_next().await? {
            if verdict.is_truthy() {
                output.insert(item);
            }
        }
        Ok(Value::Set(output))
    })
}

fn filter_map(predicate: &UnaryFn, entries: Map) -> Eventual<Value> {
    let entries: Vec<(Value, Value)> = entries.into_iter().collect();
    let verdicts = call_each(predicate, entries.iter().map(|(_, value)| value.clone()));
    keep_truthy(verdicts, entries, |kept| {
        Value::Map(kept.into_iter().collect::<Map>())
    })
}

fn filter_object(predicate: &UnaryFn, entries: Object) -> Eventual<Value> {
    let entries: Vec<(String, Value)> = entries.into_iter().collect();
    let verdicts = call_each(predicate, entries.iter().map(|(_, value)| value.clone()));
    keep_truthy(verdicts, entries, |kept| {
        Value::Object(kept.into_iter().collect::<Object>())
    })
}

/// Lazy filter over a synchronous sequence.
struct FilterSequence {
    source: Sequence,
    predicate: UnaryFn,
}

impl Pull for FilterSequence {
    fn pull(&self) -> Option<Eventual<Value>> {
        let misuse = || Eventual::failed(Error::SyncSequenceMisuse { operator: "filter" });
        loop {
            let value = match self.source.pull()?.try_ready() {
                Ok(Ok(value)) => value,
                Ok(Err(error)) => return Some(Eventual::failed(error)),
                Err(_) => return Some(misuse()),
            };
            match (self.predicate)(value.clone()).try_ready() {
                Ok(Ok(verdict)) if verdict.is_truthy() => return Some(Eventual::ready(value)),
                Ok(Ok(_)) => {}
                Ok(Err(error)) => return Some(Eventual::failed(error)),
                Err(_) => return Some(misuse()),
            }
        }
    }
}

fn filter_async_sequence(predicate: UnaryFn, sequence: AsyncSequence) -> AsyncSequence {
    AsyncSequence::from_try_stream(sequence.into_stream().try_filter_map(move |value| {
        let verdict = predicate(value.clone());
        async move { Ok(verdict.await?.is_truthy().then_some(value)) }
    }))
}

/// Filters an array or string with `(element, index, collection)`.
///
/// # Errors
///
/// Any other operand yields [`Error::InvalidOperand`].
///
/// # Examples
///
/// ```rust
/// use tacit::{filter_with_index, Value};
///
/// let even_positions = filter_with_index(|_: Value, index: usize, _: &Value| Value::from(index % 2 == 0));
/// let result = even_positions.apply(Value::from("abcde")).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from("ace")));
/// ```
pub fn filter_with_index<F, R>(predicate: F) -> Operator
where
    F: Fn(Value, usize, &Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    let predicate = indexed(predicate);
    Operator::named(
        "filter_with_index",
        Arc::new(move |value: Value| match value {
            Value::Array(items) => {
                let collection = Value::Array(items.clone());
                let verdicts = call_indexed(&predicate, items.clone(), &collection);
                keep_truthy(verdicts, items, Value::Array)
            }
            Value::String(text) => {
                let items = characters(&text);
                let collection = Value::String(text);
                let verdicts = call_indexed(&predicate, items.clone(), &collection);
                keep_truthy(verdicts, items, |kept| {
                    Value::String(kept.iter().map(Value::to_text).collect())
                })
            }
            other => {
                Eventual::failed(Error::invalid_operand("filter_with_index", other.type_name()))
            }
        }),
    )
}
