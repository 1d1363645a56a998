use std::sync::Arc;

use crate::eventual::Eventual;
use crate::operator::Operator;
use crate::value::Value;

/// Chains operators left to right.
///
/// An empty chain returns its operand unchanged.
///
/// # Examples
///
/// ```rust
/// use tacit::compose::pipe;
/// use tacit::{map, Operator, Value};
///
/// let operator = pipe([
///     map(|value: Value| Value::from(value.as_i64().unwrap_or(0) + 1)),
///     Operator::new(|value: Value| Value::from(value.to_text())),
/// ]);
/// let result = operator.apply(Value::from(vec![1, 2])).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from("2,3")));
/// ```
pub fn pipe<I>(operators: I) -> Operator
where
    I: IntoIterator<Item = Operator>,
{
    let operators: Arc<[Operator]> = operators.into_iter().collect();
    Operator::named(
        "pipe",
        Arc::new(move |value: Value| pipe_from(Arc::clone(&operators), 0, value)),
    )
}

fn pipe_from(operators: Arc<[Operator]>, index: usize, value: Value) -> Eventual<Value> {
    match operators.get(index) {
        Some(operator) => operator
            .apply(value)
            .flat_map(move |next| pipe_from(operators, index + 1, next)),
        None => Eventual::ready(value),
    }
}
