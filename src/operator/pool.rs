//! Concurrency-bounded mapping.
//!
//! [`map_pool`] maps a container with at most `limit` mapper calls
//! outstanding at any time.
//!
//! # Admission Model
//!
//! Elements are dispatched one at a time, in order. Before the next mapper
//! call starts, the in-flight set is checked: when it already holds `limit`
//! pending results, the pool waits until *any* of them resolves (first to
//! complete, not first submitted) and only then admits the next element.
//!
//! Ready mapper results never occupy a slot. Every output slot is tied to
//! its input position, so arrays come back in input order no matter which
//! call finished first.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tacit::{map_pool, Eventual, Value};
//!
//! let fetch = map_pool(2, |id: Value| Eventual::pending(async move {
//!     tokio::time::sleep(std::time::Duration::from_millis(10)).await;
//!     Ok(id)
//! }))?;
//! let ids = fetch.apply(Value::from(vec![1, 2, 3, 4, 5])).await?;
//! assert_eq!(ids, Value::from(vec![1, 2, 3, 4, 5]));
//! ```

use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::TryStreamExt;

use super::{Operator, UnaryFn, unary};
use crate::error::Error;
use crate::eventual::Eventual;
use crate::value::{Map, Object, Set, Value};

// =============================================================================
// Front-end
// =============================================================================

/// Maps arrays, sets, maps and objects with at most `limit` mapper calls in
/// flight.
///
/// Nothing runs until the returned result is first polled, so the result
/// for a supported shape is always pending.
///
/// # Errors
///
/// Returns [`Error::InvalidConcurrencyLimit`] if `limit` is 0. Applying the
/// operator to any other shape yields [`Error::InvalidOperand`].
pub fn map_pool<F, R>(limit: usize, mapper: F) -> Result<Operator, Error>
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    if limit < 1 {
        return Err(Error::InvalidConcurrencyLimit {
            operator: "map_pool",
            limit,
        });
    }
    let mapper = unary(mapper);
    Ok(Operator::named(
        "map_pool",
        Arc::new(move |value: Value| pool_value(limit, &mapper, value)),
    ))
}

fn pool_value(limit: usize, mapper: &UnaryFn, value: Value) -> Eventual<Value> {
    let mapper = Arc::clone(mapper);
    match value {
        Value::Array(items) => Eventual::pending(async move {
            run_pool(limit, &mapper, items).await.map(Value::Array)
        }),
        Value::Set(items) => Eventual::pending(async move {
            let results = run_pool(limit, &mapper, items.into_iter().collect()).await?;
            Ok(Value::Set(results.into_iter().collect::<Set>()))
        }),
        Value::Map(entries) => Eventual::pending(async move {
            let (keys, values): (Vec<Value>, Vec<Value>) = entries.into_iter().unzip();
            let results = run_pool(limit, &mapper, values).await?;
            Ok(Value::Map(keys.into_iter().zip(results).collect::<Map>()))
        }),
        Value::Object(entries) => Eventual::pending(async move {
            let (keys, values): (Vec<String>, Vec<Value>) = entries.into_iter().unzip();
            let results = run_pool(limit, &mapper, values).await?;
            Ok(Value::Object(keys.into_iter().zip(results).collect::<Object>()))
        }),
        other => Eventual::failed(Error::invalid_operand("map_pool", other.type_name())),
    }
}

// =============================================================================
// Pool
// =============================================================================

async fn run_pool(limit: usize, mapper: &UnaryFn, items: Vec<Value>) -> Result<Vec<Value>, Error> {
    let mut slots: Vec<Option<Value>> = vec![None; items.len()];
    let mut in_flight: FuturesUnordered<Eventual<(usize, Value)>> = FuturesUnordered::new();

    for (index, item) in items.into_iter().enumerate() {
        while in_flight.len() >= limit {
            let Some((slot, value)) = in_flight.try_next().await? else {
                break;
            };
            slots[slot] = Some(value);
            tracing::trace!(slot, in_flight = in_flight.len(), "pool slot freed");
        }
        match mapper(item).try_ready() {
            Ok(result) => slots[index] = Some(result?),
            Err(pending) => {
                in_flight.push(pending.fmap(move |value| (index, value)));
                tracing::trace!(index, in_flight = in_flight.len(), limit, "pool admitted element");
            }
        }
    }

    while let Some((slot, value)) = in_flight.try_next().await? {
        slots[slot] = Some(value);
    }
    Ok(slots.into_iter().map(Option::unwrap_or_default).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_is_rejected() {
        let error = map_pool(0, |value: Value| value).unwrap_err();
        assert!(matches!(
            error,
            Error::InvalidConcurrencyLimit { operator: "map_pool", limit: 0 }
        ));
    }

    #[test]
    fn test_result_is_always_pending() {
        let operator = map_pool(1, |value: Value| value).unwrap();
        assert!(operator.apply(Value::from(vec![1])).is_pending());
    }

    #[tokio::test]
    async fn test_ready_mapper_keeps_positions() {
        let operator = map_pool(2, |value: Value| Value::from(value.as_i64().unwrap_or(0) * 10)).unwrap();
        let result = operator.apply(Value::from(vec![1, 2, 3])).await.unwrap();
        assert_eq!(result, Value::from(vec![10, 20, 30]));
    }

    #[tokio::test]
    async fn test_object_keeps_keys() {
        let operator = map_pool(1, |value: Value| Eventual::pending(async move { Ok(value) })).unwrap();
        let result = operator.apply(Value::object([("a", 1), ("b", 2)])).await.unwrap();
        assert_eq!(result, Value::object([("a", 1), ("b", 2)]));
    }

    #[tokio::test]
    async fn test_string_is_invalid_operand() {
        let operator = map_pool(1, |value: Value| value).unwrap();
        let error = operator.apply(Value::from("abc")).await.unwrap_err();
        assert!(matches!(error, Error::InvalidOperand { found: "String", .. }));
    }
}
