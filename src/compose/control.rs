//! Side effects, recovery and branching.

use std::sync::Arc;

use crate::error::Error;
use crate::eventual::Eventual;
use crate::operator::Operator;
use crate::value::Value;

/// Runs `effect` on the operand and returns the operand unchanged.
///
/// A pending effect is awaited before the operand is passed on; a failing
/// effect fails the result.
pub fn tap(effect: Operator) -> Operator {
    Operator::named(
        "tap",
        Arc::new(move |value: Value| effect.apply(value.clone()).fmap(move |_| value)),
    )
}

/// Applies `tryer`, handing any failure to `catcher` together with the
/// original operand.
///
/// # Examples
///
/// ```rust
/// use tacit::compose::try_catch;
/// use tacit::{Error, Operator, Value};
///
/// let parse = try_catch(
///     Operator::new(|value: Value| {
///         value
///             .to_text()
///             .parse::<i64>()
///             .map(Value::from)
///             .map_err(Error::external)
///     }),
///     |_: Error, value: Value| Value::from(format!("not a number: {}", value.to_text())),
/// );
/// let result = parse.apply(Value::from("x")).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from("not a number: x")));
/// ```
pub fn try_catch<F, R>(tryer: Operator, catcher: F) -> Operator
where
    F: Fn(Error, Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    let catcher = Arc::new(catcher);
    Operator::named(
        "try_catch",
        Arc::new(move |value: Value| {
            let catcher = Arc::clone(&catcher);
            let operand = value.clone();
            tryer
                .apply(value)
                .recover(move |error| catcher(error, operand).into())
        }),
    )
}

/// Applies the action of the first case whose condition is truthy, or
/// `otherwise` when none is.
///
/// Conditions are evaluated one at a time, in order, and evaluation stops at
/// the first truthy one.
pub fn switch_case<I>(cases: I, otherwise: Operator) -> Operator
where
    I: IntoIterator<Item = (Operator, Operator)>,
{
    let cases: Arc<[(Operator, Operator)]> = cases.into_iter().collect();
    Operator::named(
        "switch_case",
        Arc::new(move |value: Value| {
            switch_from(Arc::clone(&cases), otherwise.clone(), 0, value)
        }),
    )
}

fn switch_from(
    cases: Arc<[(Operator, Operator)]>,
    otherwise: Operator,
    index: usize,
    value: Value,
) -> Eventual<Value> {
    let Some((condition, _)) = cases.get(index) else {
        return otherwise.apply(value);
    };
    condition.apply(value.clone()).flat_map(move |verdict| {
        if verdict.is_truthy() {
            cases[index].1.apply(value)
        } else {
            switch_from(cases, otherwise, index + 1, value)
        }
    })
}
