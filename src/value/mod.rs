//! Value view: the host's read-only window onto program values.
//!
//! The program never calls the host. It hands back a tagged value naming the
//! next effect, and the host reads it through this trait: discriminant,
//! positional fields, scalar coercions, and `apply` to resume a continuation.
//! The constructors build the results the host passes back in.

mod term;

pub use term::Term;

use crate::error::HostResult;

pub trait Value: Clone + Sized {
    /// Index of the variant this value represents.
    fn discriminant(&self) -> HostResult<usize>;

    /// Number of positional fields.
    fn arity(&self) -> HostResult<usize>;

    fn field(&self, index: usize) -> HostResult<Self>;

    /// Invoke a continuation-shaped value with one argument.
    fn apply(&self, arg: Self) -> HostResult<Self>;

    fn as_string(&self) -> HostResult<String>;
    fn as_int(&self) -> HostResult<i64>;
    fn as_float(&self) -> HostResult<f64>;

    fn int(value: i64) -> Self;
    fn float(value: f64) -> Self;
    fn string(value: &str) -> Self;
    fn record(fields: Vec<Self>) -> Self;
    fn list(items: Vec<Self>) -> Self;

    /// A field-less variant, e.g. a key state.
    fn union(tag: usize) -> Self;
}
