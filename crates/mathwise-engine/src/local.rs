use mathwise_core::{Expr, MathError, MathResult, SymbolicEngine};
use tracing::debug;

use crate::calculus;
use crate::eval;
use crate::expand;
use crate::parser;
use crate::poly;
use crate::simplify::{canonical, divides_by_zero, pythagorean};
use crate::solve;

/// In-process engine. Stateless, so one instance can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEngine;

impl LocalEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Reject results that still divide by an exact zero.
fn defined(expr: Expr) -> MathResult<Expr> {
    if divides_by_zero(&expr) {
        return Err(MathError::Evaluation(format!("division by zero in {expr}")));
    }
    Ok(expr)
}

impl SymbolicEngine for LocalEngine {
    fn parse(&self, text: &str) -> MathResult<Expr> {
        let raw = parser::parse(text)?;
        defined(canonical(&raw))
    }

    /// The smallest of the canonical, expanded and cancelled forms. Ties keep
    /// the canonical form.
    fn simplify(&self, expr: &Expr) -> MathResult<Expr> {
        let base = pythagorean(&canonical(expr));
        let mut best = base.clone();
        let candidates = [Some(expand::expand(&base)), poly::cancel(&base)];
        for candidate in candidates.into_iter().flatten() {
            if candidate.node_count() < best.node_count() {
                best = candidate;
            }
        }
        debug!(input = %expr, output = %best, "simplified");
        defined(best)
    }

    fn expand(&self, expr: &Expr) -> MathResult<Expr> {
        defined(expand::expand(expr))
    }

    fn factor(&self, expr: &Expr) -> MathResult<Expr> {
        let expr = canonical(expr);
        defined(poly::factor_univariate(&expr).unwrap_or(expr))
    }

    fn differentiate(&self, expr: &Expr, var: &str) -> MathResult<Expr> {
        calculus::differentiate(expr, var)
    }

    fn integrate(&self, expr: &Expr, var: &str) -> MathResult<Expr> {
        calculus::integrate(expr, var)
    }

    fn solve_for_roots(&self, expr: &Expr, var: &str) -> MathResult<Vec<f64>> {
        let roots = solve::solve(expr, var)?;
        debug!(expr = %expr, var, count = roots.len(), "solved");
        Ok(roots)
    }

    fn numeric_evaluate(&self, expr: &Expr) -> MathResult<f64> {
        eval::evaluate(&canonical(expr))
    }

    fn degree(&self, expr: &Expr, var: &str) -> MathResult<u32> {
        poly::degree_in(expr, var)
    }

    fn substitute(&self, expr: &Expr, var: &str, value: &Expr) -> MathResult<Expr> {
        defined(canonical(&expr.replace_symbol(var, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> LocalEngine {
        LocalEngine::new()
    }

    fn show(f: impl Fn(&LocalEngine, &Expr) -> MathResult<Expr>, text: &str) -> String {
        let e = engine();
        let expr = e.parse(text).unwrap();
        f(&e, &expr).unwrap().to_string()
    }

    #[test]
    fn test_parse_implicit_multiplication_and_caret() {
        let e = engine();
        assert_eq!(e.parse("2x").unwrap(), e.parse("2*x").unwrap());
        assert_eq!(e.parse("x^2").unwrap(), e.parse("x**2").unwrap());
        assert!(e.parse("2 +* ").is_err());
    }

    #[test]
    fn test_simplify_forms() {
        assert_eq!(show(|e, x| e.simplify(x), "2x + 3x"), "5*x");
        assert_eq!(show(|e, x| e.simplify(x), "sin(x)^2 + cos(x)^2"), "1");
        assert_eq!(show(|e, x| e.simplify(x), "(x^2 - 1)/(x - 1)"), "x + 1");
        assert_eq!(show(|e, x| e.simplify(x), "(x + 1)^2"), "(x + 1)**2");
    }

    #[test]
    fn test_expand_and_factor() {
        assert_eq!(show(|e, x| e.expand(x), "(x + 1)^2"), "x**2 + 2*x + 1");
        assert_eq!(show(|e, x| e.factor(x), "x^2 - 4"), "(x - 2)*(x + 2)");
        assert_eq!(show(|e, x| e.factor(x), "x^2 + 1"), "x**2 + 1");
    }

    #[test]
    fn test_substitute_and_evaluate() {
        let e = engine();
        let expr = e.parse("x^2 - 4").unwrap();
        let at = e.substitute(&expr, "x", &Expr::number(2.0)).unwrap();
        assert_eq!(e.numeric_evaluate(&at).unwrap(), 0.0);
        assert!(e.numeric_evaluate(&expr).is_err());
    }

    #[test]
    fn test_degree_and_free_variables() {
        let e = engine();
        let expr = e.parse("x^2*y + x").unwrap();
        assert_eq!(e.degree(&expr, "x").unwrap(), 2);
        let vars: Vec<String> = e.free_variables(&expr).into_iter().collect();
        assert_eq!(vars, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_zero_denominators_are_errors() {
        let e = engine();
        for text in ["0/0", "1/0", "(x - x)/(x - x)", "x/(x - x)", "0/0 + 1"] {
            let err = e.parse(text).unwrap_err();
            assert!(matches!(err, MathError::Evaluation(_)), "{text}");
        }
        let expr = e.parse("1/x").unwrap();
        assert!(e.substitute(&expr, "x", &Expr::zero()).is_err());
        assert!(e.parse("0/2").is_ok());
    }

    #[test]
    fn test_solve_for_roots() {
        let e = engine();
        let expr = e.parse("x^2 - 4").unwrap();
        assert_eq!(e.solve_for_roots(&expr, "x").unwrap(), vec![2.0, -2.0]);
    }
}
