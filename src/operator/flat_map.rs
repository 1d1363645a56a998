//! `flat_map`: map, then spread each result one level.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use super::map::concatenate;
use super::{Operator, UnaryFn, call_each, characters, transducer, unary};
use crate::error::Error;
use crate::eventual::Eventual;
use crate::shape::Shape;
use crate::value::{AsyncSequence, Pull, Sequence, Set, Value};

/// Maps every element and flattens the results one level.
///
/// Arrays, sets, typed arrays and sequences returned by the mapper are
/// spread; asynchronous sequences are drained. Strings and every other value
/// count as a single element. On a string operand the flattened results are
/// concatenated as text; on a reducer operand the result is a reducer that
/// feeds every spread item to the original.
///
/// # Errors
///
/// - Operands other than arrays, strings, sets, sequences and reducers yield
///   [`Error::InvalidOperand`].
/// - On a synchronous sequence, a pending mapper result or an asynchronous
///   inner sequence yields [`Error::SyncSequenceMisuse`] at that pull.
///
/// # Examples
///
/// ```rust
/// use tacit::{flat_map, Value};
///
/// let twice = flat_map(|value: Value| Value::Array(vec![value.clone(), value]));
/// let result = twice.apply(Value::from(vec![1, 2])).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from(vec![1, 1, 2, 2])));
/// ```
pub fn flat_map<F, R>(mapper: F) -> Operator
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    let mapper = unary(mapper);
    Operator::named(
        "flat_map",
        Arc::new(move |value: Value| flat_map_value(&mapper, value)),
    )
}

fn flat_map_value(mapper: &UnaryFn, value: Value) -> Eventual<Value> {
    match (Shape::of(&value), value) {
        (Some(Shape::AsyncIterable), Value::AsyncIterator(sequence)) => Eventual::ready(
            Value::AsyncIterator(flat_map_async_sequence(Arc::clone(mapper), sequence)),
        ),
        (Some(Shape::Array), Value::Array(items)) => {
            flatten(call_each(mapper, items), Value::Array)
        }
        (Some(Shape::String), Value::String(text)) => {
            flatten(call_each(mapper, characters(&text)), concatenate)
        }
        (Some(Shape::Set), Value::Set(items)) => flatten(call_each(mapper, items), |values| {
            let mut output = Set::with_capacity_and_hasher(values.len(), FxBuildHasher);
            output.extend(values);
            Value::Set(output)
        }),
        (Some(Shape::Iterable), Value::Iterator(sequence)) => {
            Eventual::ready(Value::Iterator(Sequence::from_pull(FlatMapSequence {
                source: sequence,
                mapper: Arc::clone(mapper),
                pending: Mutex::default(),
            })))
        }
        (Some(Shape::Reducer), Value::Reducer(reducer)) => Eventual::ready(Value::Reducer(
            transducer::flat_map_reducer(Arc::clone(mapper), reducer),
        )),
        (_, other) => Eventual::failed(Error::invalid_operand("flat_map", other.type_name())),
    }
}

/// Spreads one mapper result into its items.
fn spread(value: Value) -> Eventual<Vec<Value>> {
    match value {
        Value::Array(items) => Eventual::ready(items),
        Value::Set(items) => Eventual::ready(items.into_iter().collect()),
        Value::Binary(array) => Eventual::ready(array.to_values()),
        Value::Iterator(sequence) => sequence.collect_values(),
        Value::AsyncIterator(sequence) => sequence.collect_values(),
        single => Eventual::ready(vec![single]),
    }
}

fn flatten<F>(results: Result<Vec<Eventual<Value>>, Error>, finish: F) -> Eventual<Value>
where
    F: FnOnce(Vec<Value>) -> Value + Send + 'static,
{
    let results = match results {
        Ok(results) => results,
        Err(error) => return Eventual::failed(error),
    };
    Eventual::join_all(results)
        .flat_map(|values| Eventual::join_all(values.into_iter().map(spread)))
        .fmap(|groups| finish(groups.into_iter().flatten().collect()))
}

/// Lazy flattening over a synchronous sequence.
///
/// The lock only guards the spread-out elements; the mapper and the inner
/// sequence are called with it released.
struct FlatMapSequence {
    source: Sequence,
    mapper: UnaryFn,
    pending: Mutex<Spread>,
}

#[derive(Default)]
struct Spread {
    buffer: VecDeque<Value>,
    inner: Option<Sequence>,
}

impl FlatMapSequence {
    fn misuse() -> Eventual<Value> {
        Eventual::failed(Error::SyncSequenceMisuse {
            operator: "flat_map",
        })
    }
}

impl Pull for FlatMapSequence {
    fn pull(&self) -> Option<Eventual<Value>> {
        loop {
            let inner = {
                let mut pending = self.pending.lock();
                if let Some(value) = pending.buffer.pop_front() {
                    return Some(Eventual::ready(value));
                }
                pending.inner.clone()
            };
            if let Some(inner) = inner {
                match inner.pull() {
                    Some(item) => return Some(item),
                    None => {
                        let mut pending = self.pending.lock();
                        if pending.inner.as_ref().is_some_and(|current| current.ptr_eq(&inner)) {
                            pending.inner = None;
                        }
                        continue;
                    }
                }
            }
            let element = match self.source.pull()?.try_ready() {
                Ok(Ok(element)) => element,
                Ok(Err(error)) => return Some(Eventual::failed(error)),
                Err(_) => return Some(Self::misuse()),
            };
            let spread = match (self.mapper)(element).try_ready() {
                Ok(Ok(Value::Array(items))) => items,
                Ok(Ok(Value::Set(items))) => items.into_iter().collect(),
                Ok(Ok(Value::Binary(array))) => array.to_values(),
                Ok(Ok(Value::Iterator(inner))) => {
                    self.pending.lock().inner = Some(inner);
                    continue;
                }
                Ok(Ok(Value::AsyncIterator(_))) | Err(_) => return Some(Self::misuse()),
                Ok(Ok(single)) => return Some(Eventual::ready(single)),
                Ok(Err(error)) => return Some(Eventual::failed(error)),
            };
            self.pending.lock().buffer.extend(spread);
        }
    }
}

fn flat_map_async_sequence(mapper: UnaryFn, sequence: AsyncSequence) -> AsyncSequence {
    AsyncSequence::from_try_stream(
        sequence
            .into_stream()
            .and_then(move |value| mapper(value))
            .map_ok(spread_stream)
            .try_flatten(),
    )
}

fn spread_stream(value: Value) -> BoxStream<'static, Result<Value, Error>> {
    match value {
        Value::Array(items) => stream::iter(items.into_iter().map(Ok)).boxed(),
        Value::Set(items) => stream::iter(items.into_iter().map(Ok)).boxed(),
        Value::Binary(array) => stream::iter(array.to_values().into_iter().map(Ok)).boxed(),
        Value::Iterator(sequence) => stream::iter(sequence).then(|item| item).boxed(),
        Value::AsyncIterator(sequence) => sequence.into_stream(),
        single => stream::once(async move { Ok(single) }).boxed(),
    }
}
