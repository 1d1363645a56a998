//! `transform`: a transducer driven into a container chosen by the initial
//! value's shape.

use super::{Initial, Reduce, Transducer, reduce_with};
use crate::error::Error;
use crate::eventual::Eventual;
use crate::value::{Reducer, Value};

/// Folds a container through `transducer` into a copy of the initial value.
///
/// The initial value picks the collector:
///
/// | Initial | Each item is |
/// |---------|--------------|
/// | `Array` | pushed |
/// | `String` | appended as text |
/// | `Set` | inserted |
/// | `Binary` | appended, coerced to the element kind |
/// | `Object` | merged if an object, inserted if a `[key, value]` pair |
/// | `Map` | inserted if a `[key, value]` pair, merged if a map |
/// | `Null` | discarded |
///
/// # Errors
///
/// - [`Error::InvalidConfiguration`] when the initial value is absent or a
///   fixed value of any other shape.
/// - Applying the result yields [`Error::InvalidOperand`] when a computed
///   initial value or an item has no collector.
///
/// # Examples
///
/// ```rust
/// use tacit::{transform, Initial, Transducer, Value};
///
/// let upper = Transducer::map(|value: Value| Value::from(value.to_text().to_uppercase()));
/// let result = transform(upper, Initial::value(""))
///     .map(|reduce| reduce.apply(Value::from(vec!["a", "b"])))
///     .ok()
///     .and_then(|result| result.try_ready().ok())
///     .and_then(Result::ok);
/// assert_eq!(result, Some(Value::from("AB")));
/// ```
pub fn transform(transducer: Transducer, initial: Initial) -> Result<Reduce, Error> {
    match &initial {
        Initial::Absent => {
            return Err(Error::InvalidConfiguration {
                operator: "transform",
                reason: "an initial value is required".to_string(),
            });
        }
        Initial::Value(value) if !has_collector(value) => {
            return Err(Error::InvalidConfiguration {
                operator: "transform",
                reason: format!("no collector for an initial value of type {}", value.type_name()),
            });
        }
        Initial::Value(_) | Initial::Computed(_) => {}
    }
    Ok(reduce_with(transducer.apply(collector()), initial))
}

const fn has_collector(value: &Value) -> bool {
    matches!(
        value,
        Value::Null
            | Value::Array(_)
            | Value::String(_)
            | Value::Set(_)
            | Value::Binary(_)
            | Value::Object(_)
            | Value::Map(_)
    )
}

/// A reducer that appends each item to whatever container it accumulates.
fn collector() -> Reducer {
    Reducer::new(|accumulator: Value, item: Value| -> Eventual<Value> {
        Eventual::from_result(collect(accumulator, item))
    })
}

fn collect(accumulator: Value, item: Value) -> Result<Value, Error> {
    match (accumulator, item) {
        (Value::Null, _) => Ok(Value::Null),
        (Value::Array(mut items), item) => {
            items.push(item);
            Ok(Value::Array(items))
        }
        (Value::String(mut text), item) => {
            text.push_str(&item.to_text());
            Ok(Value::String(text))
        }
        (Value::Set(mut items), item) => {
            items.insert(item);
            Ok(Value::Set(items))
        }
        (Value::Binary(mut array), item) => {
            array.push(&item);
            Ok(Value::Binary(array))
        }
        (Value::Object(mut entries), Value::Object(other)) => {
            entries.extend(other);
            Ok(Value::Object(entries))
        }
        (Value::Object(mut entries), Value::Array(pair)) => match <[Value; 2]>::try_from(pair) {
            Ok([Value::String(key), value]) => {
                entries.insert(key, value);
                Ok(Value::Object(entries))
            }
            Ok(_) | Err(_) => Err(Error::invalid_operand("transform", "Array")),
        },
        (Value::Map(mut entries), Value::Array(pair)) => match <[Value; 2]>::try_from(pair) {
            Ok([key, value]) => {
                entries.insert(key, value);
                Ok(Value::Map(entries))
            }
            Err(_) => Err(Error::invalid_operand("transform", "Array")),
        },
        (Value::Map(mut entries), Value::Map(other)) => {
            entries.extend(other);
            Ok(Value::Map(entries))
        }
        (Value::Object(_) | Value::Map(_), item) => {
            Err(Error::invalid_operand("transform", item.type_name()))
        }
        (accumulator, _) => Err(Error::invalid_operand("transform", accumulator.type_name())),
    }
}
