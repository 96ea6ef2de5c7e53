//! Capability traits for the symbolic back ends.
//!
//! Strategies only ever talk to `&dyn SymbolicEngine`; the remote service is
//! optional and best-effort, so its single method returns `Option`.

use std::collections::BTreeSet;

use crate::classify::RemoteOperation;
use crate::error::MathResult;
use crate::expr::Expr;

pub trait SymbolicEngine: Send + Sync {
    /// Parse text into an expression. Accepts implicit multiplication (`2x`)
    /// and `^` as an alias of `**`.
    fn parse(&self, text: &str) -> MathResult<Expr>;

    fn simplify(&self, expr: &Expr) -> MathResult<Expr>;

    fn expand(&self, expr: &Expr) -> MathResult<Expr>;

    fn factor(&self, expr: &Expr) -> MathResult<Expr>;

    fn differentiate(&self, expr: &Expr, var: &str) -> MathResult<Expr>;

    fn integrate(&self, expr: &Expr, var: &str) -> MathResult<Expr>;

    /// Real roots of `expr = 0` in `var`, in the order the engine finds them.
    fn solve_for_roots(&self, expr: &Expr, var: &str) -> MathResult<Vec<f64>>;

    fn numeric_evaluate(&self, expr: &Expr) -> MathResult<f64>;

    /// Polynomial degree in `var`; errors when `expr` is not a polynomial.
    fn degree(&self, expr: &Expr, var: &str) -> MathResult<u32>;

    /// Replace `var` by `value` and simplify the result.
    fn substitute(&self, expr: &Expr, var: &str, value: &Expr) -> MathResult<Expr>;

    fn free_variables(&self, expr: &Expr) -> BTreeSet<String> {
        expr.free_symbols()
    }

    fn render(&self, expr: &Expr) -> String {
        expr.to_string()
    }
}

/// Remote simplification/solving service keyed by operation name.
///
/// Any failure (timeout, non-success status, malformed body, missing
/// `result`) is reported as `None`.
pub trait RemoteEngine: Send + Sync {
    fn request(&self, op: RemoteOperation, expression: &str) -> Option<String>;
}
