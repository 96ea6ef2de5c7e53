use std::f64::consts::{E, PI};

use mathwise_core::{Constant, Expr, Func, MathError, MathResult};

/// Evaluate a symbol-free, real-valued expression.
pub fn evaluate(expr: &Expr) -> MathResult<f64> {
    let value = eval_inner(expr)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::Evaluation(format!("{expr} is not a finite real number")))
    }
}

/// Evaluate with `var` bound to `at`. Used by the numeric root scan.
pub fn evaluate_at(expr: &Expr, var: &str, at: f64) -> MathResult<f64> {
    evaluate(&expr.replace_symbol(var, &Expr::number(at)))
}

fn eval_inner(expr: &Expr) -> MathResult<f64> {
    Ok(match expr {
        Expr::Number(n) => *n,
        Expr::Symbol(s) => {
            return Err(MathError::Evaluation(format!("free symbol '{s}' has no value")));
        }
        Expr::Constant(Constant::Pi) => PI,
        Expr::Constant(Constant::E) => E,
        Expr::Constant(Constant::I) => {
            return Err(MathError::Evaluation("value is complex".into()));
        }
        Expr::Add(terms) => {
            let mut sum = 0.0;
            for t in terms {
                sum += eval_inner(t)?;
            }
            sum
        }
        Expr::Mul(factors) => {
            let mut product = 1.0;
            for f in factors {
                product *= eval_inner(f)?;
            }
            product
        }
        Expr::Pow(b, e) => {
            let base = eval_inner(b)?;
            let exp = eval_inner(e)?;
            if exp.fract() == 0.0 && exp.abs() < i32::MAX as f64 {
                base.powi(exp as i32)
            } else {
                base.powf(exp)
            }
        }
        Expr::Func(f, a) => apply(*f, eval_inner(a)?),
        Expr::Factorial(a) => factorial(eval_inner(a)?)?,
    })
}

pub(crate) fn apply(f: Func, x: f64) -> f64 {
    match f {
        Func::Sin => x.sin(),
        Func::Cos => x.cos(),
        Func::Tan => x.tan(),
        Func::Cot => 1.0 / x.tan(),
        Func::Sec => 1.0 / x.cos(),
        Func::Csc => 1.0 / x.sin(),
        Func::Asin => x.asin(),
        Func::Acos => x.acos(),
        Func::Atan => x.atan(),
        Func::Sinh => x.sinh(),
        Func::Cosh => x.cosh(),
        Func::Tanh => x.tanh(),
        Func::Exp => x.exp(),
        Func::Log => x.ln(),
        Func::Abs => x.abs(),
    }
}

pub(crate) fn factorial(n: f64) -> MathResult<f64> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(MathError::Evaluation(format!(
            "factorial is only defined here for non-negative integers, got {n}"
        )));
    }
    if n > 170.0 {
        return Err(MathError::Evaluation(format!("factorial of {n} overflows")));
    }
    Ok((1..=n as u64).fold(1.0, |acc, k| acc * k as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_arithmetic() {
        let e = Expr::mul(vec![
            Expr::div(Expr::number(25.0), Expr::number(100.0)),
            Expr::number(80.0),
        ]);
        assert_eq!(evaluate(&e).unwrap(), 20.0);
    }

    #[test]
    fn test_evaluate_rejects_symbols_and_complex() {
        assert!(evaluate(&Expr::symbol("x")).is_err());
        assert!(evaluate(&Expr::Constant(Constant::I)).is_err());
        assert!(evaluate(&Expr::div(Expr::one(), Expr::zero())).is_err());
        assert!(evaluate(&Expr::func(Func::Log, Expr::number(-1.0))).is_err());
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(5.0).unwrap(), 120.0);
        assert_eq!(factorial(0.0).unwrap(), 1.0);
        assert!(factorial(2.5).is_err());
    }

    #[test]
    fn test_evaluate_at() {
        let e = Expr::add(vec![
            Expr::pow(Expr::symbol("x"), Expr::number(2.0)),
            Expr::number(-4.0),
        ]);
        assert_eq!(evaluate_at(&e, "x", 2.0).unwrap(), 0.0);
    }
}
