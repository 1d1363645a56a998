use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::eventual::Eventual;

type ReducerFn = dyn Fn(Value, Value) -> Eventual<Value> + Send + Sync;

/// A shared `(accumulator, element) -> accumulator` function.
///
/// Reducers are values too: handing one to `map`, `filter` or `flat_map`
/// produces a new reducer instead of a container (see
/// [`Transducer`](crate::Transducer)).
///
/// # Examples
///
/// ```rust
/// use tacit::{Reducer, Value};
///
/// let sum = Reducer::new(|total: Value, element: Value| {
///     Value::from(total.as_i64().unwrap_or(0) + element.as_i64().unwrap_or(0))
/// });
/// let result = sum.call(Value::from(1), Value::from(2)).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from(3)));
/// ```
#[derive(Clone)]
pub struct Reducer {
    function: Arc<ReducerFn>,
}

impl Reducer {
    /// Wraps a two-argument function.
    pub fn new<F, R>(function: F) -> Self
    where
        F: Fn(Value, Value) -> R + Send + Sync + 'static,
        R: Into<Eventual<Value>>,
    {
        Self {
            function: Arc::new(move |accumulator: Value, element: Value| -> Eventual<Value> {
                function(accumulator, element).into()
            }),
        }
    }

    /// Applies the reducer.
    pub fn call(&self, accumulator: Value, element: Value) -> Eventual<Value> {
        (self.function)(accumulator, element)
    }

    /// Returns `true` if both handles wrap the same function.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.function, &other.function)
    }

    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.function).cast::<()>() as usize
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Reducer").finish_non_exhaustive()
    }
}
