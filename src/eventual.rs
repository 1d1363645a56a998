//! `Eventual` - a result that is either ready now or pending.
//!
//! Every operator in this crate returns an [`Eventual`]. When all the
//! element-level functions an operator calls return ready values, the
//! operator's result is ready too and no future is ever allocated or
//! scheduled. As soon as one call hands back a pending result, the operator
//! switches to a pending result that resolves once everything it depends on
//! has resolved.
//!
//! # Evaluation Semantics
//!
//! [`Eventual::flat_map`] (also exported as [`continue_with`]) runs its
//! continuation immediately on a ready value and defers it behind the
//! pending result otherwise. Failures short-circuit: the continuation is
//! skipped and the error is passed through untouched.
//!
//! [`Eventual::join_all`] (also exported as [`all_pending`]) stays ready when
//! every input is ready, and otherwise awaits all pending inputs
//! concurrently while keeping their positions.
//!
//! # Examples
//!
//! ```rust
//! use tacit::{Eventual, Value};
//!
//! let doubled = Eventual::ready(Value::from(21))
//!     .flat_map(|value| Eventual::ready(Value::from(value.as_i64().unwrap_or(0) * 2)));
//! assert!(!doubled.is_pending());
//! assert_eq!(doubled.try_ready().ok().and_then(Result::ok), Some(Value::from(42)));
//! ```
//!
//! ```rust,ignore
//! let pending = Eventual::pending(async { Ok(Value::from(1)) });
//! assert!(pending.is_pending());
//! assert_eq!(pending.await?, Value::from(1));
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use pin_project_lite::pin_project;

use crate::error::Error;
use crate::value::Value;

pin_project! {
    /// A value that is either available now or will be available later.
    ///
    /// `Eventual<A>` implements `Future<Output = Result<A, Error>>`, so it can
    /// be awaited directly. A ready `Eventual` completes on its first poll.
    ///
    /// # Type Parameters
    ///
    /// - `A`: The type of the successful value.
    #[must_use = "an Eventual carries a result that should be inspected or awaited"]
    pub struct Eventual<A> {
        #[pin]
        state: EventualState<A>,
    }
}

pin_project! {
    /// Internal state of an `Eventual`.
    ///
    /// `Ready` completes on the first poll and is left holding `None`.
    #[project = EventualStateProj]
    enum EventualState<A> {
        Ready {
            result: Option<Result<A, Error>>,
        },
        Pending {
            #[pin]
            future: BoxFuture<'static, Result<A, Error>>,
        },
    }
}

impl<A> Future for Eventual<A> {
    type Output = Result<A, Error>;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().state.project() {
            EventualStateProj::Ready { result } => Poll::Ready(
                result
                    .take()
                    .unwrap_or_else(|| Err(Error::message("Eventual polled after it already completed"))),
            ),
            EventualStateProj::Pending { future } => future.poll(context),
        }
    }
}

impl<A> Eventual<A> {
    /// Creates a ready, successful result.
    pub const fn ready(value: A) -> Self {
        Self::from_result(Ok(value))
    }

    /// Creates a ready failure.
    pub const fn failed(error: Error) -> Self {
        Self::from_result(Err(error))
    }

    /// Creates a ready result from a `Result`.
    pub const fn from_result(result: Result<A, Error>) -> Self {
        Self {
            state: EventualState::Ready {
                result: Some(result),
            },
        }
    }

    /// Returns `true` if the result is not available yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, EventualState::Pending { .. })
    }

    /// Takes the ready result, or hands the pending `Eventual` back.
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` when the result is still pending.
    pub fn try_ready(self) -> Result<Result<A, Error>, Self> {
        match self.state {
            EventualState::Ready {
                result: Some(result),
            } => Ok(result),
            state => Err(Self { state }),
        }
    }

    /// Takes a ready result. A consumed or pending `Eventual` becomes a
    /// failure so that callers joining several results keep positions.
    fn into_ready(self) -> Result<A, Error> {
        match self.state {
            EventualState::Ready { result } => result.unwrap_or_else(consumed),
            EventualState::Pending { .. } => Err(Error::message("Eventual is still pending")),
        }
    }
}

impl<A: Send + 'static> Eventual<A> {
    /// Creates a pending result from a future.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<A, Error>> + Send + 'static,
    {
        Self {
            state: EventualState::Pending {
                future: Box::pin(future),
            },
        }
    }

    /// Converts the `Eventual` into a boxed future.
    ///
    /// A ready result is wrapped in an already-completed future.
    pub fn boxed(self) -> BoxFuture<'static, Result<A, Error>> {
        match self.state {
            EventualState::Ready { result } => Box::pin(futures::future::ready(
                result.unwrap_or_else(consumed),
            )),
            EventualState::Pending { future } => future,
        }
    }

    /// Applies a function to the successful value.
    ///
    /// Runs immediately on a ready value and behind the pending result
    /// otherwise.
    pub fn fmap<B, F>(self, function: F) -> Eventual<B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> B + Send + 'static,
    {
        self.flat_map(move |value| Eventual::ready(function(value)))
    }

    /// Continues with a function that may itself return a pending result.
    ///
    /// This is the `continueWith` primitive: a ready success calls
    /// `function` synchronously and returns its result untouched, a pending
    /// value yields a pending result that resolves to `function`'s result,
    /// and a failure is propagated without calling `function`.
    pub fn flat_map<B, F>(self, function: F) -> Eventual<B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> Eventual<B> + Send + 'static,
    {
        match self.try_ready() {
            Ok(Ok(value)) => function(value),
            Ok(Err(error)) => Eventual::failed(error),
            Err(pending) => Eventual::pending(async move { function(pending.await?).await }),
        }
    }

    /// Handles a failure with a function that may return a pending result.
    pub fn recover<F>(self, handler: F) -> Self
    where
        F: FnOnce(Error) -> Self + Send + 'static,
    {
        match self.try_ready() {
            Ok(Ok(value)) => Self::ready(value),
            Ok(Err(error)) => handler(error),
            Err(pending) => Self::pending(async move {
                match pending.await {
                    Ok(value) => Ok(value),
                    Err(error) => handler(error).await,
                }
            }),
        }
    }

    /// Joins results while keeping their positions.
    ///
    /// When no input is pending the joined result is ready. Otherwise all
    /// inputs are awaited concurrently and the first failure wins.
    pub fn join_all<I>(items: I) -> Eventual<Vec<A>>
    where
        I: IntoIterator<Item = Self>,
    {
        let items: Vec<Self> = items.into_iter().collect();
        if items.iter().any(Self::is_pending) {
            return Eventual::pending(futures::future::try_join_all(items));
        }
        Eventual::from_result(items.into_iter().map(Self::into_ready).collect())
    }
}

fn consumed<A>() -> Result<A, Error> {
    Err(Error::message("Eventual already consumed"))
}

impl<A> fmt::Debug for Eventual<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            EventualState::Ready { .. } => "Ready",
            EventualState::Pending { .. } => "Pending",
        };
        formatter
            .debug_struct("Eventual")
            .field("state", &state)
            .finish_non_exhaustive()
    }
}

impl From<Value> for Eventual<Value> {
    fn from(value: Value) -> Self {
        Self::ready(value)
    }
}

impl From<Result<Value, Error>> for Eventual<Value> {
    fn from(result: Result<Value, Error>) -> Self {
        Self::from_result(result)
    }
}

/// Continues `value` with `continuation`, staying synchronous when possible.
///
/// See [`Eventual::flat_map`].
pub fn continue_with<A, B, F>(value: Eventual<A>, continuation: F) -> Eventual<B>
where
    A: Send + 'static,
    B: Send + 'static,
    F: FnOnce(A) -> Eventual<B> + Send + 'static,
{
    value.flat_map(continuation)
}

/// Resolves an ordered list of possibly-pending values.
///
/// See [`Eventual::join_all`].
pub fn all_pending<A, I>(values: I) -> Eventual<Vec<A>>
where
    A: Send + 'static,
    I: IntoIterator<Item = Eventual<A>>,
{
    Eventual::join_all(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn later(value: i64) -> Eventual<Value> {
        Eventual::pending(async move {
            tokio::task::yield_now().await;
            Ok(Value::from(value))
        })
    }

    #[test]
    fn test_ready_is_not_pending() {
        assert!(!Eventual::ready(Value::Null).is_pending());
        assert!(!Eventual::<Value>::failed(Error::EmptyReduction).is_pending());
    }

    #[test]
    fn test_flat_map_runs_synchronously_on_ready() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        let result = Eventual::ready(Value::from(1)).flat_map(move |value| {
            flag.store(true, Ordering::SeqCst);
            Eventual::ready(value)
        });
        assert!(called.load(Ordering::SeqCst));
        assert!(!result.is_pending());
    }

    #[test]
    fn test_flat_map_skips_continuation_on_failure() {
        let result: Eventual<Value> = Eventual::failed(Error::message("first"))
            .flat_map(|_: Value| -> Eventual<Value> { panic!("continuation must not run") });
        match result.try_ready() {
            Ok(Err(Error::Message(message))) => assert_eq!(message, "first"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_join_all_ready_stays_ready() {
        let joined = Eventual::join_all(vec![Eventual::ready(1), Eventual::ready(2)]);
        assert!(!joined.is_pending());
        assert_eq!(joined.try_ready().ok().and_then(Result::ok), Some(vec![1, 2]));
    }

    #[test]
    fn test_join_all_ready_failure() {
        let joined = Eventual::join_all(vec![
            Eventual::ready(1),
            Eventual::failed(Error::EmptyReduction),
        ]);
        assert!(matches!(joined.try_ready(), Ok(Err(Error::EmptyReduction))));
    }

    #[test]
    fn test_join_all_reports_consumed_input_in_place() {
        let consumed = Eventual {
            state: EventualState::Ready { result: None },
        };
        let joined = Eventual::join_all(vec![Eventual::ready(1), consumed, Eventual::ready(3)]);
        match joined.try_ready() {
            Ok(Err(Error::Message(message))) => assert_eq!(message, "Eventual already consumed"),
            other => panic!("expected a consumed failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_flat_map_defers_on_pending() {
        let result = later(20).fmap(|value| Value::from(value.as_i64().unwrap_or(0) + 1));
        assert!(result.is_pending());
        assert_eq!(result.await.unwrap(), Value::from(21));
    }

    #[tokio::test]
    async fn test_join_all_keeps_positions() {
        let joined = all_pending(vec![later(1), Eventual::ready(Value::from(2)), later(3)]);
        assert!(joined.is_pending());
        assert_eq!(
            joined.await.unwrap(),
            vec![Value::from(1), Value::from(2), Value::from(3)]
        );
    }

    #[tokio::test]
    async fn test_recover_pending_failure() {
        let failing: Eventual<Value> = Eventual::pending(async { Err(Error::message("late")) });
        let recovered = failing.recover(|error| Eventual::ready(Value::from(error.to_string())));
        assert_eq!(recovered.await.unwrap(), Value::from("late"));
    }

    #[tokio::test]
    async fn test_boxed_ready() {
        let future = Eventual::ready(Value::from(7)).boxed();
        assert_eq!(future.await.unwrap(), Value::from(7));
    }

    #[test]
    fn test_continue_with_matches_flat_map() {
        let result = continue_with(Eventual::ready(2), |value| Eventual::ready(value * 3));
        assert_eq!(result.try_ready().ok().and_then(Result::ok), Some(6));
    }
}
