//! Fan-out: run several operators on the same operand.

use std::sync::Arc;

use crate::error::Error;
use crate::eventual::Eventual;
use crate::operator::Operator;
use crate::value::{Object, Value};

type Branches = Arc<[(String, Operator)]>;

/// Runs every operator on the operand and collects the results into an
/// object under the matching keys.
///
/// Pending branches are awaited concurrently.
///
/// # Examples
///
/// ```rust
/// use tacit::compose::fork;
/// use tacit::{Operator, Value};
///
/// let describe = fork([
///     ("text", Operator::new(|value: Value| Value::from(value.to_text()))),
///     ("truthy", Operator::new(|value: Value| Value::from(value.is_truthy()))),
/// ]);
/// let result = describe.apply(Value::from(0)).try_ready().ok().and_then(Result::ok);
/// assert_eq!(
///     result,
///     Some(Value::object([("text", Value::from("0")), ("truthy", Value::from(false))]))
/// );
/// ```
pub fn fork<K, I>(branches: I) -> Operator
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Operator)>,
{
    let branches = collect_branches(branches);
    Operator::named(
        "fork",
        Arc::new(move |value: Value| {
            run_branches(&branches, &value).fmap(Value::Object)
        }),
    )
}

/// Runs every operator on the operand and collects the results in order.
pub fn fork_array<I>(operators: I) -> Operator
where
    I: IntoIterator<Item = Operator>,
{
    let operators: Arc<[Operator]> = operators.into_iter().collect();
    Operator::named(
        "fork_array",
        Arc::new(move |value: Value| {
            Eventual::join_all(operators.iter().map(|operator| operator.apply(value.clone())))
                .fmap(Value::Array)
        }),
    )
}

/// Like [`fork`], but merges the results into the operand object.
///
/// Results overwrite existing keys.
///
/// # Errors
///
/// Applying the operator to anything but an object yields
/// [`Error::InvalidOperand`].
pub fn assign<K, I>(branches: I) -> Operator
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Operator)>,
{
    let branches = collect_branches(branches);
    Operator::named(
        "assign",
        Arc::new(move |value: Value| match value {
            Value::Object(original) => {
                let operand = Value::Object(original.clone());
                run_branches(&branches, &operand).fmap(move |entries| {
                    let mut merged = original;
                    merged.extend(entries);
                    Value::Object(merged)
                })
            }
            other => Eventual::failed(Error::invalid_operand("assign", other.type_name())),
        }),
    )
}

fn collect_branches<K, I>(branches: I) -> Branches
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Operator)>,
{
    branches
        .into_iter()
        .map(|(key, operator)| (key.into(), operator))
        .collect()
}

fn run_branches(branches: &Branches, value: &Value) -> Eventual<Object> {
    let keys: Vec<String> = branches.iter().map(|(key, _)| key.clone()).collect();
    let results = branches
        .iter()
        .map(|(_, operator)| operator.apply(value.clone()));
    Eventual::join_all(results).fmap(move |values| keys.into_iter().zip(values).collect())
}
