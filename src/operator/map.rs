//! Shape-preserving `map` and its variants.

use std::sync::Arc;

use futures::TryStreamExt;
use futures::stream::FuturesUnordered;
use rustc_hash::FxBuildHasher;

use super::{
    IndexedFn, Operator, UnaryFn, call_each, characters, indexed, resolve_all, transducer, unary,
};
use crate::error::Error;
use crate::eventual::Eventual;
use crate::shape::Shape;
use crate::value::{AsyncSequence, Map, Object, Pull, Sequence, Set, TypedArray, Value};

/// Maps every element of a container, keeping the container's shape.
///
/// | Operand | Result |
/// |---------|--------|
/// | `Array` | array of results, same positions |
/// | `String` | results concatenated as text |
/// | `Set` | set of results (equal results collapse) |
/// | `Map`, `Object` | same keys, mapped values |
/// | `Binary` | typed array of the same element kind |
/// | `Iterator` | lazy sequence of (possibly pending) results |
/// | `AsyncIterator` | lazy asynchronous sequence of awaited results |
/// | `Reducer` | a reducer that maps each element before delegating |
///
/// Pending mapper results are awaited concurrently. The result stays ready
/// when every mapper call is ready.
///
/// # Errors
///
/// Applying the operator to a scalar yields [`Error::InvalidOperand`]. The
/// first mapper failure fails the whole result.
///
/// # Examples
///
/// ```rust
/// use tacit::{map, Value};
///
/// let shout = map(|value: Value| Value::from(value.to_text().to_uppercase()));
/// let result = shout.apply(Value::from("abc")).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from("ABC")));
/// ```
pub fn map<F, R>(mapper: F) -> Operator
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    let mapper = unary(mapper);
    Operator::named(
        "map",
        Arc::new(move |value: Value| map_value(&mapper, value)),
    )
}

pub(crate) fn map_value(mapper: &UnaryFn, value: Value) -> Eventual<Value> {
    match (Shape::of(&value), value) {
        (Some(Shape::AsyncIterable), Value::AsyncIterator(sequence)) => Eventual::ready(
            Value::AsyncIterator(map_async_sequence(Arc::clone(mapper), sequence)),
        ),
        (Some(Shape::Array), Value::Array(items)) => {
            resolve_all(call_each(mapper, items), Value::Array)
        }
        (Some(Shape::String), Value::String(text)) => {
            resolve_all(call_each(mapper, characters(&text)), concatenate)
        }
        (Some(Shape::Set), Value::Set(items)) => map_set(mapper, items),
        (Some(Shape::Map), Value::Map(entries)) => map_map(mapper, entries),
        (Some(Shape::Binary), Value::Binary(array)) => map_binary(mapper, &array),
        (Some(Shape::Iterable), Value::Iterator(sequence)) => {
            Eventual::ready(Value::Iterator(map_sequence(Arc::clone(mapper), sequence)))
        }
        (Some(Shape::Object), Value::Object(entries)) => map_object(mapper, entries),
        (Some(Shape::Reducer), Value::Reducer(reducer)) => Eventual::ready(Value::Reducer(
            transducer::map_reducer(Arc::clone(mapper), reducer),
        )),
        (_, other) => Eventual::failed(Error::invalid_operand("map", other.type_name())),
    }
}

pub(crate) fn concatenate(values: Vec<Value>) -> Value {
    Value::String(values.iter().map(Value::to_text).collect())
}

fn map_set(mapper: &UnaryFn, items: Set) -> Eventual<Value> {
    let mut output = Set::with_capacity_and_hasher(items.len(), FxBuildHasher);
    let mut pending = FuturesUnordered::new();
    for item in items {
        match mapper(item).try_ready() {
            Ok(Ok(value)) => {
                output.insert(value);
            }
            Ok(Err(error)) => return Eventual::failed(error),
            Err(result) => pending.push(result),
        }
    }
    if pending.is_empty() {
        return Eventual::ready(Value::Set(output));
    }
    Eventual::pending(async move {
        // completion order; the set has no positions to keep
        while let Some(value) = pending.try_next().await? {
            output.insert(value);
        }
        Ok(Value::Set(output))
    })
}

fn map_map(mapper: &UnaryFn, entries: Map) -> Eventual<Value> {
    let (keys, values): (Vec<Value>, Vec<Value>) = entries.into_iter().unzip();
    resolve_all(call_each(mapper, values), move |values| {
        Value::Map(keys.into_iter().zip(values).collect())
    })
}

fn map_object(mapper: &UnaryFn, entries: Object) -> Eventual<Value> {
    let (keys, values): (Vec<String>, Vec<Value>) = entries.into_iter().unzip();
    resolve_all(call_each(mapper, values), move |values| {
        Value::Object(keys.into_iter().zip(values).collect())
    })
}

fn map_binary(mapper: &UnaryFn, array: &TypedArray) -> Eventual<Value> {
    let kind = array.kind();
    resolve_all(call_each(mapper, array.to_values()), move |values| {
        Value::Binary(TypedArray::from_values(kind, &values))
    })
}

/// Lazily maps a synchronous sequence. Pending results are handed out as
/// they are, one per pulled element.
fn map_sequence(mapper: UnaryFn, sequence: Sequence) -> Sequence {
    Sequence::from_pull(MapSequence {
        source: sequence,
        mapper,
    })
}

struct MapSequence {
    source: Sequence,
    mapper: UnaryFn,
}

impl Pull for MapSequence {
    fn pull(&self) -> Option<Eventual<Value>> {
        let item = self.source.pull()?;
        let mapper = Arc::clone(&self.mapper);
        Some(item.flat_map(move |value| mapper(value)))
    }
}

fn map_async_sequence(mapper: UnaryFn, sequence: AsyncSequence) -> AsyncSequence {
    AsyncSequence::from_try_stream(sequence.into_stream().and_then(move |value| mapper(value)))
}

/// Maps an array strictly one element at a time.
///
/// The next mapper call starts only after the previous result has resolved.
/// Stays ready as long as every mapper call is ready.
///
/// # Errors
///
/// Any operand other than an array yields [`Error::InvalidOperand`].
pub fn map_series<F, R>(mapper: F) -> Operator
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    let mapper = unary(mapper);
    Operator::named(
        "map_series",
        Arc::new(move |value: Value| match value {
            Value::Array(items) => map_in_series(Arc::clone(&mapper), items),
            other => Eventual::failed(Error::invalid_operand("map_series", other.type_name())),
        }),
    )
}

fn map_in_series(mapper: UnaryFn, items: Vec<Value>) -> Eventual<Value> {
    let mut results = Vec::with_capacity(items.len());
    let mut remaining = items.into_iter();
    while let Some(item) = remaining.next() {
        match mapper(item).try_ready() {
            Ok(Ok(value)) => results.push(value),
            Ok(Err(error)) => return Eventual::failed(error),
            Err(pending) => {
                tracing::trace!(index = results.len(), "map_series switched to pending path");
                return Eventual::pending(async move {
                    results.push(pending.await?);
                    for item in remaining {
                        results.push(mapper(item).await?);
                    }
                    Ok(Value::Array(results))
                });
            }
        }
    }
    Eventual::ready(Value::Array(results))
}

/// Maps an array or string with `(element, index, collection)`.
///
/// Strings are mapped per character and the results concatenated.
///
/// # Errors
///
/// Any other operand yields [`Error::InvalidOperand`].
///
/// # Examples
///
/// ```rust
/// use tacit::{map_with_index, Value};
///
/// let label = map_with_index(|value: Value, index: usize, _: &Value| {
///     Value::from(format!("{index}:{}", value.to_text()))
/// });
/// let result = label.apply(Value::from(vec!["a", "b"])).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from(vec!["0:a", "1:b"])));
/// ```
pub fn map_with_index<F, R>(mapper: F) -> Operator
where
    F: Fn(Value, usize, &Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    let mapper = indexed(mapper);
    Operator::named(
        "map_with_index",
        Arc::new(move |value: Value| match value {
            Value::Array(items) => {
                let collection = Value::Array(items.clone());
                resolve_all(call_indexed(&mapper, items, &collection), Value::Array)
            }
            Value::String(text) => {
                let items = characters(&text);
                let collection = Value::String(text);
                resolve_all(call_indexed(&mapper, items, &collection), concatenate)
            }
            other => {
                Eventual::failed(Error::invalid_operand("map_with_index", other.type_name()))
            }
        }),
    )
}

pub(crate) fn call_indexed(
    function: &IndexedFn,
    items: Vec<Value>,
    collection: &Value,
) -> Result<Vec<Eventual<Value>>, Error> {
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match function(item, index, collection).try_ready() {
            Ok(Ok(value)) => results.push(Eventual::ready(value)),
            Ok(Err(error)) => return Err(error),
            Err(pending) => results.push(pending),
        }
    }
    Ok(results)
}
