//! Comparison combinators.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::eventual::Eventual;
use crate::operator::Operator;
use crate::value::Value;

/// One side of a comparison: a constant, or an operator resolved against
/// the operand.
#[derive(Clone, Debug)]
pub enum Operand {
    /// A fixed value.
    Constant(Value),
    /// Computed from the operand (possibly pending).
    Resolve(Operator),
}

impl Operand {
    /// An operand computed from the compared value.
    pub fn resolve<F, R>(function: F) -> Self
    where
        F: Fn(Value) -> R + Send + Sync + 'static,
        R: Into<Eventual<Value>>,
    {
        Self::Resolve(Operator::new(function))
    }

    fn evaluate(&self, value: &Value) -> Eventual<Value> {
        match self {
            Self::Constant(constant) => Eventual::ready(constant.clone()),
            Self::Resolve(operator) => operator.apply(value.clone()),
        }
    }
}

impl From<Operator> for Operand {
    fn from(operator: Operator) -> Self {
        Self::Resolve(operator)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

macro_rules! impl_constant_operand {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Operand {
                fn from(value: $source) -> Self {
                    Self::Constant(Value::from(value))
                }
            }
        )*
    };
}

impl_constant_operand!(bool, i32, i64, f64, &str, String);

fn comparison<L, R>(
    name: &'static str,
    left: L,
    right: R,
    test: fn(&Value, &Value) -> bool,
) -> Operator
where
    L: Into<Operand>,
    R: Into<Operand>,
{
    let (left, right) = (left.into(), right.into());
    Operator::named(
        name,
        Arc::new(move |value: Value| {
            Eventual::join_all([left.evaluate(&value), right.evaluate(&value)]).fmap(
                move |sides| match sides.as_slice() {
                    [left, right] => Value::Bool(test(left, right)),
                    _ => Value::Bool(false),
                },
            )
        }),
    )
}

fn ordered(left: &Value, right: &Value, accept: fn(Ordering) -> bool) -> bool {
    left.compare(right).is_some_and(accept)
}

/// Equal, with `Int` and `Float` compared numerically.
///
/// # Examples
///
/// ```rust
/// use tacit::compose::{eq, Operand};
/// use tacit::Value;
///
/// let is_admin = eq(Operand::resolve(|user: Value| {
///     user.as_object().and_then(|user| user.get("role")).cloned().unwrap_or_default()
/// }), "admin");
/// let user = Value::object([("role", "admin")]);
/// let result = is_admin.apply(user).try_ready().ok().and_then(Result::ok);
/// assert_eq!(result, Some(Value::from(true)));
/// ```
pub fn eq<L, R>(left: L, right: R) -> Operator
where
    L: Into<Operand>,
    R: Into<Operand>,
{
    comparison("eq", left, right, Value::loosely_equals)
}

/// Strictly greater. Incomparable sides compare `false`.
pub fn gt<L, R>(left: L, right: R) -> Operator
where
    L: Into<Operand>,
    R: Into<Operand>,
{
    comparison("gt", left, right, |left, right| ordered(left, right, Ordering::is_gt))
}

/// Strictly less. Incomparable sides compare `false`.
pub fn lt<L, R>(left: L, right: R) -> Operator
where
    L: Into<Operand>,
    R: Into<Operand>,
{
    comparison("lt", left, right, |left, right| ordered(left, right, Ordering::is_lt))
}

/// Greater or equal. Incomparable sides compare `false`.
pub fn gte<L, R>(left: L, right: R) -> Operator
where
    L: Into<Operand>,
    R: Into<Operand>,
{
    comparison("gte", left, right, |left, right| ordered(left, right, Ordering::is_ge))
}

/// Less or equal. Incomparable sides compare `false`.
pub fn lte<L, R>(left: L, right: R) -> Operator
where
    L: Into<Operand>,
    R: Into<Operand>,
{
    comparison("lte", left, right, |left, right| ordered(left, right, Ordering::is_le))
}
