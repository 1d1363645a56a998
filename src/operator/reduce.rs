//! Sequential folds with an optional, possibly computed, initial value.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{self, Either};
use parking_lot::Mutex;

use super::{Operator, UnaryFn, unary};
use crate::error::Error;
use crate::eventual::Eventual;
use crate::shape::Shape;
use crate::value::{AsyncSequence, Reducer, Value};

/// The starting accumulator of a reduction.
#[derive(Clone, Default)]
pub enum Initial {
    /// The first element seeds the accumulator.
    #[default]
    Absent,
    /// A fixed starting value, cloned for every application.
    Value(Value),
    /// Computed from the operand once per application, before folding.
    Computed(UnaryFn),
}

impl Initial {
    /// A fixed starting value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// A starting value computed from the operand.
    pub fn computed<F, R>(initializer: F) -> Self
    where
        F: Fn(Value) -> R + Send + Sync + 'static,
        R: Into<Eventual<Value>>,
    {
        Self::Computed(unary(initializer))
    }

    fn resolve(&self, operand: &Value) -> Eventual<Option<Value>> {
        match self {
            Self::Absent => Eventual::ready(None),
            Self::Value(value) => Eventual::ready(Some(value.clone())),
            Self::Computed(initializer) => initializer(operand.clone()).fmap(Some),
        }
    }
}

impl From<Value> for Initial {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for Initial {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => formatter.write_str("Absent"),
            Self::Value(value) => formatter.debug_tuple("Value").field(value).finish(),
            Self::Computed(_) => formatter.write_str("Computed(..)"),
        }
    }
}

/// A configured reduction.
///
/// Folding is strictly left to right: a reducer call starts only after the
/// previous one resolved. Maps and objects fold their values.
#[derive(Clone, Debug)]
pub struct Reduce {
    reducer: Reducer,
    initial: Initial,
}

/// Configures a reduction from a two-argument function.
///
/// # Examples
///
/// ```rust
/// use tacit::{reduce, Initial, Value};
///
/// let sum = reduce(
///     |total: Value, element: Value| Value::from(total.as_i64().unwrap_or(0) + element.as_i64().unwrap_or(0)),
///     Initial::Absent,
/// );
/// let result = sum.apply(Value::from(vec![1, 2, 3, 4, 5])).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from(15)));
/// ```
pub fn reduce<F, R>(reducer: F, initial: Initial) -> Reduce
where
    F: Fn(Value, Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    reduce_with(Reducer::new(reducer), initial)
}

/// Configures a reduction from an existing [`Reducer`], such as one built by
/// a [`Transducer`](super::Transducer).
#[must_use]
pub fn reduce_with(reducer: Reducer, initial: Initial) -> Reduce {
    Reduce { reducer, initial }
}

impl Reduce {
    /// Folds the operand.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyReduction`] for an empty operand without initial value.
    /// - [`Error::InvalidOperand`] for scalars and reducers.
    pub fn apply(&self, value: Value) -> Eventual<Value> {
        let reducer = self.reducer.clone();
        self.initial
            .resolve(&value)
            .flat_map(move |initial| reduce_value(reducer, initial, value))
    }

    /// Folds the operand and hands back a cancel handle with the result.
    ///
    /// Only asynchronous sequences can be cancelled; for any other operand
    /// the handle is inert.
    pub fn start(&self, value: Value) -> Cancellable {
        let cancellable = matches!(value, Value::AsyncIterator(_));
        let result = self.apply(value);
        if !cancellable {
            return Cancellable {
                result,
                handle: CancelHandle::default(),
            };
        }
        let (handle, signal) = CancelHandle::channel();
        let result = Eventual::pending(async move {
            match future::select(result, signal).await {
                Either::Left((outcome, _)) => outcome,
                Either::Right((Ok(()), _)) => {
                    tracing::debug!("asynchronous reduction cancelled");
                    Err(Error::Cancelled)
                }
                // every handle was dropped without cancelling
                Either::Right((Err(oneshot::Canceled), result)) => result.await,
            }
        });
        Cancellable { result, handle }
    }

    /// Turns the reduction into a plain [`Operator`].
    #[must_use]
    pub fn into_operator(self) -> Operator {
        Operator::named(
            "reduce",
            Arc::new(move |value: Value| self.apply(value)),
        )
    }
}

impl From<Reduce> for Operator {
    fn from(reduce: Reduce) -> Self {
        reduce.into_operator()
    }
}

pub(crate) fn reduce_value(reducer: Reducer, initial: Option<Value>, value: Value) -> Eventual<Value> {
    match (Shape::of(&value), value) {
        (Some(Shape::AsyncIterable), Value::AsyncIterator(sequence)) => {
            reduce_async(reducer, initial, sequence)
        }
        (Some(Shape::Array), Value::Array(items)) => {
            fold(reducer, initial, items.into_iter().map(Eventual::ready))
        }
        (Some(Shape::String), Value::String(text)) => fold(
            reducer,
            initial,
            super::characters(&text).into_iter().map(Eventual::ready),
        ),
        (Some(Shape::Set), Value::Set(items)) => {
            fold(reducer, initial, items.into_iter().map(Eventual::ready))
        }
        (Some(Shape::Map), Value::Map(entries)) => {
            fold(reducer, initial, entries.into_values().map(Eventual::ready))
        }
        (Some(Shape::Binary), Value::Binary(array)) => fold(
            reducer,
            initial,
            array.to_values().into_iter().map(Eventual::ready),
        ),
        (Some(Shape::Iterable), Value::Iterator(sequence)) => fold(reducer, initial, sequence),
        (Some(Shape::Object), Value::Object(entries)) => {
            fold(reducer, initial, entries.into_values().map(Eventual::ready))
        }
        (_, other) => Eventual::failed(Error::invalid_operand("reduce", other.type_name())),
    }
}

/// Folds a container's items into `accumulator`, or hands a single
/// non-container value straight to the reducer.
pub(crate) fn fold_into(reducer: Reducer, accumulator: Value, inner: Value) -> Eventual<Value> {
    match inner {
        Value::Array(_)
        | Value::Set(_)
        | Value::Binary(_)
        | Value::Iterator(_)
        | Value::AsyncIterator(_) => reduce_value(reducer, Some(accumulator), inner),
        scalar => reducer.call(accumulator, scalar),
    }
}

fn fold<I>(reducer: Reducer, initial: Option<Value>, mut items: I) -> Eventual<Value>
where
    I: Iterator<Item = Eventual<Value>> + Send + 'static,
{
    let seed = match initial {
        Some(value) => Eventual::ready(value),
        None => match items.next() {
            Some(first) => first,
            None => return Eventual::failed(Error::EmptyReduction),
        },
    };
    seed.flat_map(move |accumulator| fold_from(reducer, accumulator, items))
}

/// Stays on the calling thread until a step is pending, then finishes the
/// remaining steps asynchronously.
fn fold_from<I>(reducer: Reducer, mut accumulator: Value, mut items: I) -> Eventual<Value>
where
    I: Iterator<Item = Eventual<Value>> + Send + 'static,
{
    while let Some(item) = items.next() {
        let step = {
            let reducer = reducer.clone();
            item.flat_map(move |element| reducer.call(accumulator, element))
        };
        match step.try_ready() {
            Ok(Ok(next)) => accumulator = next,
            Ok(Err(error)) => return Eventual::failed(error),
            Err(pending) => {
                tracing::trace!("reduction switched to pending path");
                return Eventual::pending(async move {
                    let mut accumulator = pending.await?;
                    for item in items {
                        let element = item.await?;
                        accumulator = reducer.call(accumulator, element).await?;
                    }
                    Ok(accumulator)
                });
            }
        }
    }
    Eventual::ready(accumulator)
}

fn reduce_async(reducer: Reducer, initial: Option<Value>, sequence: AsyncSequence) -> Eventual<Value> {
    Eventual::pending(async move {
        let mut accumulator = match initial {
            Some(value) => value,
            None => match sequence.pull().await {
                Some(first) => first?,
                None => return Err(Error::EmptyReduction),
            },
        };
        while let Some(element) = sequence.pull().await {
            accumulator = reducer.call(accumulator, element?).await?;
        }
        Ok(accumulator)
    })
}

/// Cancels an in-progress asynchronous reduction.
///
/// Cloning shares the handle; the first successful [`cancel`](Self::cancel)
/// wins. The default handle is inert.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl CancelHandle {
    fn channel() -> (Self, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        let handle = Self {
            sender: Arc::new(Mutex::new(Some(sender))),
        };
        (handle, receiver)
    }

    /// Requests cancellation.
    ///
    /// The fold rejects with [`Error::Cancelled`] at its next suspension
    /// point; a reducer call already running is not interrupted. Returns
    /// `false` if the handle is inert, was already used, or the fold has
    /// finished.
    pub fn cancel(&self) -> bool {
        self.sender
            .lock()
            .take()
            .is_some_and(|sender| sender.send(()).is_ok())
    }
}

/// The result of [`Reduce::start`]: a future of the fold plus its handle.
#[derive(Debug)]
#[must_use = "a Cancellable carries a result that should be awaited"]
pub struct Cancellable {
    result: Eventual<Value>,
    handle: CancelHandle,
}

impl Cancellable {
    /// A handle that can cancel the fold from elsewhere.
    #[must_use]
    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    /// Requests cancellation; see [`CancelHandle::cancel`].
    pub fn cancel(&self) -> bool {
        self.handle.cancel()
    }

    /// Returns `true` if the fold has not finished synchronously.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.result.is_pending()
    }

    /// Drops the handle and returns the bare result.
    pub fn into_eventual(self) -> Eventual<Value> {
        self.result
    }
}

impl Future for Cancellable {
    type Output = Result<Value, Error>;

    fn poll(mut self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.result).poll(context)
    }
}
