//! The `pipe!` macro for left-to-right operator composition.

/// Composes operators from left to right.
///
/// `pipe!(f, g, h)` builds an [`Operator`](crate::Operator) that applies
/// `f`, then `g` to its result, then `h`. Each argument may be an
/// `Operator`, a [`Reduce`](crate::Reduce) or a unary closure (anything
/// implementing [`IntoOperator`](crate::compose::IntoOperator)).
///
/// The composition stays synchronous while every step returns a ready
/// result and continues asynchronously behind the first pending one.
///
/// # Syntax
///
/// - `pipe!(f)` - `f` as an operator
/// - `pipe!(f, g)` - applies `f`, then `g`
/// - `pipe!(f, g, h, ...)` - applies them left to right
///
/// # Examples
///
/// ```
/// use tacit::{map, pipe, reduce, Initial, Value};
///
/// let sum_of_squares = pipe!(
///     map(|value: Value| {
///         let number = value.as_i64().unwrap_or(0);
///         Value::from(number * number)
///     }),
///     reduce(
///         |total: Value, element: Value| Value::from(total.as_i64().unwrap_or(0) + element.as_i64().unwrap_or(0)),
///         Initial::value(0),
///     ),
///     |total: Value| Value::from(total.to_text()),
/// );
/// let result = sum_of_squares
///     .apply(Value::from(vec![1, 2, 3]))
///     .try_ready()
///     .ok()
///     .and_then(Result::ok);
/// assert_eq!(result, Some(Value::from("14")));
/// ```
#[macro_export]
macro_rules! pipe {
    // Single operator: convert it
    ($operator:expr $(,)?) => {
        $crate::compose::IntoOperator::into_operator($operator)
    };

    // Multiple operators: compose the head with the piped tail
    ($operator:expr, $($remaining_operators:expr),+ $(,)?) => {
        $crate::compose::pipe([
            $crate::compose::IntoOperator::into_operator($operator),
            $crate::pipe!($($remaining_operators),+),
        ])
    };
}

#[cfg(test)]
mod tests {
    use crate::{Eventual, Value};

    fn ready(result: Eventual<Value>) -> Value {
        match result.try_ready() {
            Ok(Ok(value)) => value,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_pipe_single() {
        let double = pipe!(|value: Value| Value::from(value.as_i64().unwrap_or(0) * 2));
        assert_eq!(ready(double.apply(Value::from(5))), Value::from(10));
    }

    #[test]
    fn test_pipe_applies_left_to_right() {
        let add_one = |value: Value| Value::from(value.as_i64().unwrap_or(0) + 1);
        let double = |value: Value| Value::from(value.as_i64().unwrap_or(0) * 2);
        // double(5) = 10, add_one(10) = 11
        let operator = pipe!(double, add_one);
        assert_eq!(ready(operator.apply(Value::from(5))), Value::from(11));
    }

    #[test]
    fn test_pipe_trailing_comma() {
        let square = |value: Value| {
            let number = value.as_i64().unwrap_or(0);
            Value::from(number * number)
        };
        let negate = |value: Value| Value::from(-value.as_i64().unwrap_or(0));
        let operator = pipe!(square, negate, square,);
        assert_eq!(ready(operator.apply(Value::from(3))), Value::from(81));
    }
}
