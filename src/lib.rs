//! # tacit
//!
//! Point-free, shape-polymorphic operators over dynamically shaped values.
//!
//! ## Overview
//!
//! Every operator is configured once (with a mapper, predicate or reducer)
//! and returns a unary [`Operator`]. Applying it to a [`Value`] classifies
//! the value's shape and dispatches to a shape-preserving implementation:
//! mapping an object yields an object with the same keys, filtering a
//! string yields a string, mapping a reducer yields a reducer.
//!
//! - **Values**: [`Value`], a closed union of scalars, arrays, objects,
//!   sets, maps, typed arrays, lazy sequences and reducers
//! - **Duality**: [`Eventual`], a result that is either ready or pending;
//!   operators only go asynchronous when a user function does
//! - **Operators**: [`map`], [`filter`], [`reduce`], [`transform`],
//!   [`flat_map`], the bounded [`map_pool`] and [`Transducer`]s
//! - **Composition**: `pipe`, `fork`, `tap`, `try_catch`, `switch_case`,
//!   logic and comparison combinators
//! - **Accessors**: `get`, `pick` and `omit` over property paths
//!
//! ## Feature Flags
//!
//! - `compose`: Composition utilities (default)
//! - `accessor`: Property accessors (default)
//! - `serde`: `Serialize`/`Deserialize` for [`Value`] and `serde_json`
//!   conversions
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use tacit::prelude::*;
//!
//! let odd = filter(|value: Value| Value::from(value.as_i64().unwrap_or(0) % 2 == 1));
//! let result = odd
//!     .apply(Value::from(vec![1, 2, 3, 4, 5]))
//!     .try_ready()
//!     .ok()
//!     .and_then(Result::ok);
//! assert_eq!(result, Some(Value::from(vec![1, 3, 5])));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the value model, the operators and, when enabled, the
/// composition and accessor utilities.
///
/// # Usage
///
/// ```rust
/// use tacit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::eventual::Eventual;
    pub use crate::operator::*;
    pub use crate::value::{AsyncSequence, Reducer, Sequence, TypedArray, Value};

    #[cfg(feature = "compose")]
    pub use crate::compose::*;

    #[cfg(feature = "accessor")]
    pub use crate::accessor::{Path, get, omit, pick};
}

pub mod error;
pub mod eventual;
pub mod operator;
pub mod shape;
pub mod value;

#[cfg(feature = "compose")]
pub mod compose;

#[cfg(feature = "accessor")]
pub mod accessor;

pub use error::Error;
pub use eventual::{Eventual, all_pending, continue_with};
pub use operator::{
    CancelHandle, Cancellable, Initial, Operator, Reduce, Transducer, filter, filter_with_index,
    flat_map, map, map_pool, map_series, map_with_index, reduce, reduce_with, transform,
};
pub use shape::Shape;
pub use value::{AsyncSequence, ElementKind, Reducer, Sequence, TypedArray, Value};
