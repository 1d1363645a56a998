//! Integration tests for `map`, `map_series` and `map_with_index`.
//!
//! Covers shape preservation for every supported operand, the ready/pending
//! duality of results and the sequential guarantee of `map_series`.

use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rstest::rstest;

use tacit::{
    AsyncSequence, ElementKind, Error, Eventual, Reducer, Sequence, TypedArray, Value, map,
    map_series, map_with_index,
};

fn double(value: Value) -> Value {
    Value::from(value.as_i64().unwrap_or(0) * 2)
}

fn later(value: Value, millis: u64) -> Eventual<Value> {
    Eventual::pending(async move {
        tokio::time::sleep(Duration::from_millis(millis)).await;
        Ok(value)
    })
}

fn ready(result: Eventual<Value>) -> Result<Value, Error> {
    result
        .try_ready()
        .unwrap_or_else(|_| panic!("result is pending"))
}

// =============================================================================
// Shape Preservation
// =============================================================================

#[rstest]
#[case::array(Value::from(vec![1, 2, 3]), Value::from(vec![2, 4, 6]))]
#[case::empty_array(Value::from(Vec::<Value>::new()), Value::from(Vec::<Value>::new()))]
#[case::object(
    Value::object([("a", 1), ("b", 2)]),
    Value::object([("a", 2), ("b", 4)])
)]
#[case::set(Value::set([1, 2, 3]), Value::set([2, 4, 6]))]
#[case::map(
    Value::map([(Value::from("x"), 5), (Value::from(1), 6)]),
    Value::map([(Value::from("x"), 10), (Value::from(1), 12)])
)]
fn map_preserves_shape(#[case] operand: Value, #[case] expected: Value) {
    assert_eq!(ready(map(double).apply(operand)).unwrap(), expected);
}

#[rstest]
fn map_string_concatenates_results() {
    let operator = map(|value: Value| Value::from(format!("{}-", value.to_text())));
    assert_eq!(ready(operator.apply(Value::from("ab"))).unwrap(), Value::from("a-b-"));
}

#[rstest]
fn map_string_walks_characters_not_bytes() {
    let operator = map(|value: Value| Value::from(format!("[{}]", value.to_text())));
    assert_eq!(ready(operator.apply(Value::from("é😀"))).unwrap(), Value::from("[é][😀]"));
}

#[rstest]
fn map_set_collapses_equal_results() {
    let parity = map(|value: Value| Value::from(value.as_i64().unwrap_or(0) % 2));
    assert_eq!(ready(parity.apply(Value::set([1, 2, 3, 4]))).unwrap(), Value::set([1, 0]));
}

#[rstest]
fn map_object_keeps_key_order() {
    let result = ready(map(double).apply(Value::object([("z", 1), ("a", 2), ("m", 3)]))).unwrap();
    let keys: Vec<&str> = result
        .as_object()
        .map(|entries| entries.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[rstest]
fn map_binary_keeps_element_kind() {
    let bytes = TypedArray::from_values(ElementKind::Uint8, &[Value::from(100), Value::from(200)]);
    let result = ready(map(double).apply(Value::Binary(bytes))).unwrap();
    assert_eq!(
        result,
        Value::Binary(TypedArray::from_values(ElementKind::Uint8, &[Value::from(200), Value::from(144)]))
    );
}

#[rstest]
#[case::null(Value::Null)]
#[case::int(Value::from(3))]
#[case::bool(Value::from(true))]
fn map_rejects_scalars(#[case] operand: Value) {
    let found = operand.type_name();
    match ready(map(double).apply(operand)) {
        Err(Error::InvalidOperand { operator, found: reported }) => {
            assert_eq!(operator, "map");
            assert_eq!(reported, found);
        }
        other => panic!("expected InvalidOperand, got {other:?}"),
    }
}

#[rstest]
fn map_stops_at_first_ready_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let operator = map(move |value: Value| -> Eventual<Value> {
        counter.fetch_add(1, Ordering::SeqCst);
        if value == Value::from(2) {
            Eventual::failed(Error::message("two"))
        } else {
            Eventual::ready(value)
        }
    });
    assert!(matches!(
        ready(operator.apply(Value::from(vec![1, 2, 3]))),
        Err(Error::Message(message)) if message == "two"
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Lazy Sequences and Reducers
// =============================================================================

#[rstest]
fn map_iterator_is_lazy() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let operator = map(move |value: Value| {
        counter.fetch_add(1, Ordering::SeqCst);
        double(value)
    });
    let Ok(Value::Iterator(mapped)) = ready(operator.apply(Value::Iterator(Sequence::new(vec![
        Value::from(1),
        Value::from(2),
    ])))) else {
        panic!("expected a sequence");
    };
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let first = mapped.pull().map(ready);
    assert!(matches!(first, Some(Ok(value)) if value == Value::from(2)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn map_iterator_hands_out_pending_items() {
    let operator = map(|value: Value| later(value, 5));
    let Ok(Value::Iterator(mapped)) =
        ready(operator.apply(Value::Iterator(Sequence::new(vec![Value::from(1)]))))
    else {
        panic!("expected a sequence");
    };
    assert!(mapped.pull().is_some_and(|item| item.is_pending()));
    assert!(mapped.pull().is_none());
}

#[rstest]
#[tokio::test]
async fn map_async_iterator_awaits_each_result() {
    let operator = map(|value: Value| later(double(value), 1));
    let source = AsyncSequence::from_values(vec![Value::from(1), Value::from(2), Value::from(3)]);
    let Ok(Value::AsyncIterator(mapped)) = ready(operator.apply(Value::AsyncIterator(source))) else {
        panic!("expected an async sequence");
    };
    let values = mapped.collect_values().await.unwrap();
    assert_eq!(values, vec![Value::from(2), Value::from(4), Value::from(6)]);
}

#[rstest]
fn map_iterator_mapper_may_pull_the_mapped_sequence() {
    let slot: Arc<OnceLock<Sequence>> = Arc::new(OnceLock::new());
    let handle = Arc::clone(&slot);
    let operator = map(move |value: Value| {
        let next = handle
            .get()
            .and_then(Sequence::pull)
            .and_then(|item| item.try_ready().ok())
            .and_then(Result::ok);
        Value::from(vec![value, next.unwrap_or_default()])
    });
    let Ok(Value::Iterator(mapped)) = ready(operator.apply(Value::Iterator(Sequence::new(vec![
        Value::from(1),
        Value::from(2),
        Value::from(3),
    ])))) else {
        panic!("expected an iterator");
    };
    slot.set(mapped.clone()).unwrap();

    let first = mapped.pull().map(ready).transpose().unwrap();
    let nested = Value::from(vec![
        Value::from(1),
        Value::from(vec![Value::from(2), Value::from(vec![Value::from(3), Value::Null])]),
    ]);
    assert_eq!(first, Some(nested));
    assert!(mapped.pull().is_none());
}

#[rstest]
fn map_reducer_maps_before_delegating() {
    let push = Reducer::new(|accumulator: Value, element: Value| {
        let mut items = accumulator.as_array().map(<[Value]>::to_vec).unwrap_or_default();
        items.push(element);
        Value::Array(items)
    });
    let Ok(Value::Reducer(mapped)) = ready(map(double).apply(Value::Reducer(push))) else {
        panic!("expected a reducer");
    };
    let result = ready(mapped.call(Value::from(vec![1]), Value::from(5))).unwrap();
    assert_eq!(result, Value::from(vec![1, 10]));
}

// =============================================================================
// Ready/Pending Duality
// =============================================================================

#[rstest]
fn map_stays_ready_when_mapper_is_ready() {
    assert!(!map(double).apply(Value::from(vec![1, 2])).is_pending());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn map_array_keeps_positions_with_out_of_order_completion() {
    let operator = map(|value: Value| {
        let delay = 40 - 10 * u64::try_from(value.as_i64().unwrap_or(0)).unwrap_or(0);
        later(value, delay)
    });
    let result = operator.apply(Value::from(vec![1, 2, 3]));
    assert!(result.is_pending());
    assert_eq!(result.await.unwrap(), Value::from(vec![1, 2, 3]));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn map_mixed_ready_and_pending_results() {
    let operator = map(|value: Value| -> Eventual<Value> {
        if value.as_i64() == Some(2) {
            later(Value::from("late"), 10)
        } else {
            Eventual::ready(value)
        }
    });
    let result = operator.apply(Value::object([("a", 1), ("b", 2), ("c", 3)]));
    assert!(result.is_pending());
    assert_eq!(
        result.await.unwrap(),
        Value::object([("a", Value::from(1)), ("b", Value::from("late")), ("c", Value::from(3))])
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn map_pending_failure_fails_whole_result() {
    let operator = map(|value: Value| -> Eventual<Value> {
        Eventual::pending(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            if value.as_i64() == Some(2) {
                Err(Error::message("boom"))
            } else {
                Ok(value)
            }
        })
    });
    let result = operator.apply(Value::set([1, 2, 3])).await;
    assert!(matches!(result, Err(Error::Message(message)) if message == "boom"));
}

// =============================================================================
// map_series
// =============================================================================

#[rstest]
#[tokio::test(start_paused = true)]
async fn map_series_runs_one_call_at_a_time() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let operator = {
        let (active, peak) = (Arc::clone(&active), Arc::clone(&peak));
        map_series(move |value: Value| {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            let active = Arc::clone(&active);
            Eventual::pending(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(double(value))
            })
        })
    };
    let result = operator.apply(Value::from(vec![1, 2, 3, 4])).await.unwrap();
    assert_eq!(result, Value::from(vec![2, 4, 6, 8]));
    assert_eq!(peak.load(Ordering::SeqCst), 1);
}

#[rstest]
fn map_series_is_ready_for_ready_mapper() {
    let result = map_series(double).apply(Value::from(vec![1, 2]));
    assert_eq!(ready(result).unwrap(), Value::from(vec![2, 4]));
}

#[rstest]
fn map_series_rejects_non_arrays() {
    assert!(matches!(
        ready(map_series(double).apply(Value::set([1]))),
        Err(Error::InvalidOperand { operator: "map_series", .. })
    ));
}

// =============================================================================
// map_with_index
// =============================================================================

#[rstest]
fn map_with_index_passes_position_and_collection() {
    let operator = map_with_index(|value: Value, index: usize, collection: &Value| {
        let length = collection.as_array().map_or(0, <[Value]>::len);
        Value::from(format!("{}{index}/{length}", value.to_text()))
    });
    let result = ready(operator.apply(Value::from(vec!["a", "b"]))).unwrap();
    assert_eq!(result, Value::from(vec!["a0/2", "b1/2"]));
}

#[rstest]
fn map_with_index_over_string() {
    let operator = map_with_index(|value: Value, index: usize, _: &Value| {
        if index % 2 == 0 { Value::from(value.to_text().to_uppercase()) } else { value }
    });
    assert_eq!(ready(operator.apply(Value::from("abcd"))).unwrap(), Value::from("AbCd"));
}

#[rstest]
fn map_with_index_rejects_objects() {
    let operator = map_with_index(|value: Value, _: usize, _: &Value| value);
    assert!(matches!(
        ready(operator.apply(Value::object([("a", 1)]))),
        Err(Error::InvalidOperand { operator: "map_with_index", found: "Object" })
    ));
}
