//! Truthiness combinators.

use std::sync::Arc;

use futures::TryStreamExt;
use futures::stream::FuturesUnordered;

use crate::error::Error;
use crate::eventual::Eventual;
use crate::operator::{Operator, UnaryFn, unary};
use crate::value::{AsyncSequence, Value};

/// Tests whether the predicate is truthy for at least one element.
///
/// Accepts arrays, strings (per character), sets, maps and objects (per
/// value), typed arrays and sequences. Ready predicate results
/// short-circuit; pending ones are raced and the first truthy one wins.
///
/// # Errors
///
/// Scalars and reducers yield [`Error::InvalidOperand`].
///
/// # Examples
///
/// ```rust
/// use tacit::compose::any;
/// use tacit::Value;
///
/// let has_negative = any(|value: Value| Value::from(value.as_i64().unwrap_or(0) < 0));
/// let result = has_negative.apply(Value::from(vec![3, -1, 4])).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from(true)));
/// ```
pub fn any<F, R>(predicate: F) -> Operator
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    let predicate = unary(predicate);
    Operator::named(
        "any",
        Arc::new(move |value: Value| {
            search("any", &predicate, value, true).fmap(Value::Bool)
        }),
    )
}

/// Tests whether the predicate is truthy for every element.
///
/// Accepts the same operands as [`any`]; the first falsy result
/// short-circuits. An empty container passes.
///
/// # Errors
///
/// Scalars and reducers yield [`Error::InvalidOperand`].
pub fn all<F, R>(predicate: F) -> Operator
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    let predicate = unary(predicate);
    Operator::named(
        "all",
        Arc::new(move |value: Value| {
            search("all", &predicate, value, false).fmap(|found| Value::Bool(!found))
        }),
    )
}

/// Searches for an element whose predicate truthiness equals `wanted`.
fn search(
    operator: &'static str,
    predicate: &UnaryFn,
    value: Value,
    wanted: bool,
) -> Eventual<bool> {
    let unbounded = matches!(value, Value::Iterator(_));
    let mut items: Box<dyn Iterator<Item = Eventual<Value>> + Send> = match value {
        Value::AsyncIterator(sequence) => {
            return search_async(Arc::clone(predicate), sequence, wanted);
        }
        Value::Array(items) => Box::new(items.into_iter().map(Eventual::ready)),
        Value::String(text) => Box::new(
            crate::operator::characters(&text)
                .into_iter()
                .map(Eventual::ready),
        ),
        Value::Set(items) => Box::new(items.into_iter().map(Eventual::ready)),
        Value::Map(entries) => Box::new(entries.into_values().map(Eventual::ready)),
        Value::Binary(array) => Box::new(array.to_values().into_iter().map(Eventual::ready)),
        Value::Iterator(sequence) => Box::new(sequence),
        Value::Object(entries) => Box::new(entries.into_values().map(Eventual::ready)),
        other => return Eventual::failed(Error::invalid_operand(operator, other.type_name())),
    };

    let pending = FuturesUnordered::new();
    while let Some(item) = items.next() {
        let verdict = {
            let predicate = Arc::clone(predicate);
            item.flat_map(move |element| predicate(element))
        };
        match verdict.try_ready() {
            Ok(Ok(verdict)) if verdict.is_truthy() == wanted => return Eventual::ready(true),
            Ok(Ok(_)) => {}
            Ok(Err(error)) => return Eventual::failed(error),
            // a sequence may never end, so stop racing and drain it in order
            Err(verdict) if unbounded => {
                return search_rest(Arc::clone(predicate), verdict, items, wanted);
            }
            Err(verdict) => pending.push(verdict),
        }
    }
    if pending.is_empty() {
        return Eventual::ready(false);
    }
    Eventual::pending(async move {
        let mut pending = pending;
        while let Some(verdict) = pending.try_next().await? {
            if verdict.is_truthy() == wanted {
                return Ok(true);
            }
        }
        Ok(false)
    })
}

fn search_rest(
    predicate: UnaryFn,
    first: Eventual<Value>,
    rest: Box<dyn Iterator<Item = Eventual<Value>> + Send>,
    wanted: bool,
) -> Eventual<bool> {
    Eventual::pending(async move {
        if first.await?.is_truthy() == wanted {
            return Ok(true);
        }
        for item in rest {
            if predicate(item.await?).await?.is_truthy() == wanted {
                return Ok(true);
            }
        }
        Ok(false)
    })
}

fn search_async(predicate: UnaryFn, sequence: AsyncSequence, wanted: bool) -> Eventual<bool> {
    Eventual::pending(async move {
        while let Some(element) = sequence.pull().await {
            if predicate(element?).await?.is_truthy() == wanted {
                return Ok(true);
            }
        }
        Ok(false)
    })
}

/// Truthy when every predicate is truthy for the operand.
///
/// Predicates run one at a time, left to right, and stop at the first falsy
/// result. No predicates means `true`.
pub fn and<I>(predicates: I) -> Operator
where
    I: IntoIterator<Item = Operator>,
{
    let predicates: Arc<[Operator]> = predicates.into_iter().collect();
    Operator::named(
        "and",
        Arc::new(move |value: Value| {
            short_circuit(Arc::clone(&predicates), 0, value, false).fmap(|stopped| Value::Bool(!stopped))
        }),
    )
}

/// Truthy when at least one predicate is truthy for the operand.
///
/// Predicates run one at a time, left to right, and stop at the first truthy
/// result. No predicates means `false`.
pub fn or<I>(predicates: I) -> Operator
where
    I: IntoIterator<Item = Operator>,
{
    let predicates: Arc<[Operator]> = predicates.into_iter().collect();
    Operator::named(
        "or",
        Arc::new(move |value: Value| {
            short_circuit(Arc::clone(&predicates), 0, value, true).fmap(Value::Bool)
        }),
    )
}

/// Returns `true` as soon as a predicate's truthiness equals `stop_on`.
fn short_circuit(
    predicates: Arc<[Operator]>,
    index: usize,
    value: Value,
    stop_on: bool,
) -> Eventual<bool> {
    let Some(predicate) = predicates.get(index) else {
        return Eventual::ready(false);
    };
    predicate.apply(value.clone()).flat_map(move |verdict| {
        if verdict.is_truthy() == stop_on {
            Eventual::ready(true)
        } else {
            short_circuit(predicates, index + 1, value, stop_on)
        }
    })
}

/// Negates the truthiness of `predicate`'s result.
pub fn not(predicate: Operator) -> Operator {
    Operator::named(
        "not",
        Arc::new(move |value: Value| {
            predicate
                .apply(value)
                .fmap(|verdict| Value::Bool(!verdict.is_truthy()))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Sequence;
    use rstest::rstest;

    fn is_even(value: Value) -> Value {
        Value::from(value.as_i64().is_some_and(|number| number % 2 == 0))
    }

    fn ready(result: Eventual<Value>) -> Result<Value, Error> {
        result
            .try_ready()
            .unwrap_or_else(|_| panic!("result is pending"))
    }

    #[rstest]
    #[case(Value::from(vec![1, 3, 4]), true, false)]
    #[case(Value::from(vec![2, 4]), true, true)]
    #[case(Value::from(Vec::<Value>::new()), false, true)]
    #[case(Value::object([("a", 1)]), false, false)]
    #[case(Value::set([2]), true, true)]
    fn test_any_and_all(#[case] operand: Value, #[case] some: bool, #[case] every: bool) {
        assert_eq!(ready(any(is_even).apply(operand.clone())).unwrap(), Value::from(some));
        assert_eq!(ready(all(is_even).apply(operand)).unwrap(), Value::from(every));
    }

    #[test]
    fn test_any_short_circuits_infinite_sequence() {
        let mut next = 0;
        let naturals = Sequence::from_fn(move || {
            next += 1;
            Some(Value::from(next))
        });
        let result = any(is_even).apply(Value::Iterator(naturals));
        assert_eq!(ready(result).unwrap(), Value::from(true));
    }

    #[tokio::test]
    async fn test_pending_predicates_over_infinite_sequence_stop_at_decision() {
        let mut next = 0;
        let naturals = Sequence::from_fn(move || {
            next += 1;
            Some(Value::from(next))
        });
        let below_five = all(|value: Value| {
            Eventual::pending(async move {
                tokio::task::yield_now().await;
                Ok(Value::from(value.as_i64().unwrap_or(0) < 5))
            })
        });
        let result = below_five.apply(Value::Iterator(naturals.clone()));
        assert!(result.is_pending());
        assert_eq!(result.await.unwrap(), Value::from(false));
        let after = naturals.pull().and_then(|item| item.try_ready().ok()).and_then(Result::ok);
        assert_eq!(after, Some(Value::from(6)));
    }

    #[test]
    fn test_any_rejects_scalars() {
        assert!(matches!(
            ready(any(is_even).apply(Value::from(2))),
            Err(Error::InvalidOperand { operator: "any", .. })
        ));
    }

    #[rstest]
    #[case(4, true, true)]
    #[case(3, false, true)]
    #[case(-3, false, false)]
    fn test_and_or(#[case] number: i64, #[case] both: bool, #[case] either: bool) {
        let positive = || Operator::new(|value: Value| Value::from(value.as_i64().unwrap_or(0) > 0));
        let even = || Operator::new(is_even);
        let value = Value::from(number);
        assert_eq!(
            ready(and([positive(), even()]).apply(value.clone())).unwrap(),
            Value::from(both)
        );
        assert_eq!(ready(or([positive(), even()]).apply(value)).unwrap(), Value::from(either));
    }

    #[test]
    fn test_not_negates_truthiness() {
        let result = not(Operator::new(|value: Value| value)).apply(Value::from(""));
        assert_eq!(ready(result).unwrap(), Value::from(true));
    }

    #[tokio::test]
    async fn test_any_over_async_sequence() {
        let sequence = AsyncSequence::from_values(vec![Value::from(1), Value::from(2)]);
        let result = any(is_even).apply(Value::AsyncIterator(sequence)).await.unwrap();
        assert_eq!(result, Value::from(true));
    }

    #[tokio::test]
    async fn test_all_with_pending_predicates() {
        let operator = all(|value: Value| {
            Eventual::pending(async move {
                tokio::task::yield_now().await;
                Ok(is_even(value))
            })
        });
        let result = operator.apply(Value::from(vec![2, 4, 5])).await.unwrap();
        assert_eq!(result, Value::from(false));
    }
}
