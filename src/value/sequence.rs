//! Pull-based lazy sequences.
//!
//! [`Sequence`] is the synchronous variant: each pull returns an
//! [`Eventual`], so a lazily mapped sequence can hand out one pending result
//! per element without awaiting it. [`AsyncSequence`] is the asynchronous
//! variant: each pull is awaited and yields a `Result`.
//!
//! Both are handles onto a shared cursor. Cloning a sequence does not copy
//! its elements; whichever clone pulls next consumes the next element.

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use parking_lot::Mutex;

use super::Value;
use crate::error::Error;
use crate::eventual::Eventual;

type SyncCursor = Box<dyn Iterator<Item = Eventual<Value>> + Send>;
type AsyncCursor = BoxStream<'static, Result<Value, Error>>;

/// A shared, pull-based synchronous sequence.
///
/// # Examples
///
/// ```rust
/// use tacit::{Sequence, Value};
///
/// let mut counter = 0;
/// let naturals = Sequence::from_fn(move || {
///     counter += 1;
///     Some(Value::from(counter))
/// });
/// let first = naturals.pull().and_then(|item| item.try_ready().ok()).and_then(Result::ok);
/// assert_eq!(first, Some(Value::from(1)));
/// ```
#[derive(Clone)]
pub struct Sequence {
    cursor: Arc<dyn Pull>,
}

/// A source of elements pulled through a shared reference.
///
/// Sequences derived by operators implement this directly so that user
/// functions run with no lock held: a mapper may pull the very sequence it
/// is mapping without deadlocking.
pub(crate) trait Pull: Send + Sync {
    fn pull(&self) -> Option<Eventual<Value>>;
}

struct Cursor(Mutex<SyncCursor>);

impl Pull for Cursor {
    fn pull(&self) -> Option<Eventual<Value>> {
        self.0.lock().next()
    }
}

impl Sequence {
    /// Creates a sequence over ready values.
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self::from_eventuals(items.into_iter().map(Eventual::ready))
    }

    /// Creates a sequence whose elements may be pending.
    pub fn from_eventuals<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Eventual<Value>>,
        I::IntoIter: Send + 'static,
    {
        Self::from_pull(Cursor(Mutex::new(Box::new(items.into_iter()))))
    }

    pub(crate) fn from_pull<P>(source: P) -> Self
    where
        P: Pull + 'static,
    {
        Self {
            cursor: Arc::new(source),
        }
    }

    /// Creates a generator-style sequence; `None` ends it.
    pub fn from_fn<F>(generator: F) -> Self
    where
        F: FnMut() -> Option<Value> + Send + 'static,
    {
        Self::new(std::iter::from_fn(generator))
    }

    /// Pulls the next element.
    pub fn pull(&self) -> Option<Eventual<Value>> {
        self.cursor.pull()
    }

    /// Drains the sequence, resolving pending elements concurrently.
    ///
    /// Never completes for an infinite sequence.
    pub fn collect_values(self) -> Eventual<Vec<Value>> {
        Eventual::join_all(self)
    }

    /// Returns `true` if both handles share a cursor.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }

    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.cursor).cast::<()>() as usize
    }
}

impl Iterator for Sequence {
    type Item = Eventual<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pull()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Sequence").finish_non_exhaustive()
    }
}

/// A shared, pull-based asynchronous sequence.
///
/// # Examples
///
/// ```rust,ignore
/// use tacit::{AsyncSequence, Value};
///
/// let sequence = AsyncSequence::from_values(vec![Value::from(1), Value::from(2)]);
/// assert_eq!(sequence.pull().await.transpose()?, Some(Value::from(1)));
/// ```
#[derive(Clone)]
pub struct AsyncSequence {
    cursor: Arc<tokio::sync::Mutex<AsyncCursor>>,
}

impl AsyncSequence {
    /// Creates a sequence from an infallible stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Value> + Send + 'static,
    {
        Self::from_try_stream(stream.map(Ok))
    }

    /// Creates a sequence from a fallible stream.
    pub fn from_try_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Value, Error>> + Send + 'static,
    {
        Self {
            cursor: Arc::new(tokio::sync::Mutex::new(stream.boxed())),
        }
    }

    /// Creates a sequence that yields the given values.
    pub fn from_values<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self::new(stream::iter(items))
    }

    /// Pulls the next element, waiting for it if needed.
    pub async fn pull(&self) -> Option<Result<Value, Error>> {
        self.cursor.lock().await.next().await
    }

    /// Turns the handle into a stream that pulls from the shared cursor.
    pub fn into_stream(self) -> BoxStream<'static, Result<Value, Error>> {
        stream::unfold(self, |sequence| async move {
            let item = sequence.pull().await?;
            Some((item, sequence))
        })
        .boxed()
    }

    /// Drains the sequence into a pending list of values.
    ///
    /// Never completes for an infinite sequence.
    pub fn collect_values(self) -> Eventual<Vec<Value>> {
        Eventual::pending(self.into_stream().try_collect())
    }

    /// Returns `true` if both handles share a cursor.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cursor, &other.cursor)
    }

    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.cursor).cast::<()>() as usize
    }
}

impl fmt::Debug for AsyncSequence {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("AsyncSequence").finish_non_exhaustive()
    }
}
