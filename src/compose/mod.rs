//! Composition utilities built on top of the operators.
//!
//! Every combinator here takes [`Operator`]s (or anything implementing
//! [`IntoOperator`]) and returns a new [`Operator`]. They preserve the
//! synchronous/asynchronous duality of their parts: a composition of ready
//! operators is ready, and only goes pending when one of its parts does.
//!
//! # Overview
//!
//! - Flow: [`pipe`] / [`pipe!`](crate::pipe!), [`tap`], [`try_catch`],
//!   [`switch_case`]
//! - Fan-out: [`fork`], [`fork_array`], [`assign`]
//! - Logic: [`any`], [`all`], [`and`], [`or`], [`not`]
//! - Comparison: [`eq`], [`gt`], [`lt`], [`gte`], [`lte`] over [`Operand`]
//!
//! # Examples
//!
//! ```rust
//! use tacit::compose::{fork, pipe, IntoOperator};
//! use tacit::{filter, map, Value};
//!
//! let odd_doubled = pipe([
//!     filter(|value: Value| Value::from(value.as_i64().unwrap_or(0) % 2 == 1)),
//!     map(|value: Value| Value::from(value.as_i64().unwrap_or(0) * 2)),
//! ]);
//! let summary = fork([
//!     ("input", (|value: Value| value).into_operator()),
//!     ("odd_doubled", odd_doubled),
//! ]);
//! let result = summary
//!     .apply(Value::from(vec![1, 2, 3]))
//!     .try_ready()
//!     .ok()
//!     .and_then(Result::ok);
//! assert_eq!(
//!     result,
//!     Some(Value::object([
//!         ("input", Value::from(vec![1, 2, 3])),
//!         ("odd_doubled", Value::from(vec![2, 6])),
//!     ]))
//! );
//! ```

mod compare;
mod control;
mod fork;
mod logic;
mod pipe;
mod pipe_macro;

pub use compare::{Operand, eq, gt, gte, lt, lte};
pub use control::{switch_case, tap, try_catch};
pub use fork::{assign, fork, fork_array};
pub use logic::{all, and, any, not, or};
pub use pipe::pipe;

use crate::eventual::Eventual;
use crate::operator::{Operator, Reduce};
use crate::value::Value;

/// Conversion into an [`Operator`].
///
/// Implemented for operators, reductions and unary closures returning
/// anything convertible into an [`Eventual`].
pub trait IntoOperator {
    /// Performs the conversion.
    fn into_operator(self) -> Operator;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Operator {
        self
    }
}

impl IntoOperator for Reduce {
    fn into_operator(self) -> Operator {
        Operator::from(self)
    }
}

impl<F, R> IntoOperator for F
where
    F: Fn(Value) -> R + Send + Sync + 'static,
    R: Into<Eventual<Value>>,
{
    fn into_operator(self) -> Operator {
        Operator::new(self)
    }
}
