//! Symbolic differentiation and a table-driven integrator.

use mathwise_core::{Constant, Expr, Func, MathError, MathResult};

use crate::expand::expand;
use crate::poly::Poly;
use crate::simplify::{add, canonical, func, mul, pow};

fn neg(e: Expr) -> Expr {
    mul(vec![Expr::number(-1.0), e])
}

fn recip(e: Expr) -> Expr {
    pow(e, Expr::number(-1.0))
}

pub fn differentiate(expr: &Expr, var: &str) -> MathResult<Expr> {
    derive(&canonical(expr), var)
}

fn derive(e: &Expr, var: &str) -> MathResult<Expr> {
    if !e.contains_symbol(var) {
        return Ok(Expr::zero());
    }
    Ok(match e {
        Expr::Number(_) | Expr::Constant(_) => Expr::zero(),
        Expr::Symbol(s) => Expr::number(if s == var { 1.0 } else { 0.0 }),
        Expr::Add(terms) => add(terms
            .iter()
            .map(|t| derive(t, var))
            .collect::<MathResult<_>>()?),
        Expr::Mul(factors) => {
            let mut terms = Vec::with_capacity(factors.len());
            for (i, f) in factors.iter().enumerate() {
                if !f.contains_symbol(var) {
                    continue;
                }
                let mut product: Vec<Expr> = factors
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, g)| g.clone())
                    .collect();
                product.push(derive(f, var)?);
                terms.push(mul(product));
            }
            add(terms)
        }
        Expr::Pow(b, x) => {
            let (b, x) = (&**b, &**x);
            if !x.contains_symbol(var) {
                // power rule
                mul(vec![
                    x.clone(),
                    pow(b.clone(), add(vec![x.clone(), Expr::number(-1.0)])),
                    derive(b, var)?,
                ])
            } else if !b.contains_symbol(var) {
                mul(vec![e.clone(), func(Func::Log, b.clone()), derive(x, var)?])
            } else {
                // b^x = exp(x*log(b))
                let inner = add(vec![
                    mul(vec![derive(x, var)?, func(Func::Log, b.clone())]),
                    mul(vec![x.clone(), derive(b, var)?, recip(b.clone())]),
                ]);
                mul(vec![e.clone(), inner])
            }
        }
        Expr::Func(f, a) => mul(vec![outer_derivative(*f, a), derive(a, var)?]),
        Expr::Factorial(_) => {
            return Err(MathError::Unsupported(format!(
                "cannot differentiate {e}"
            )))
        }
    })
}

/// f'(a) for each supported function.
fn outer_derivative(f: Func, a: &Expr) -> Expr {
    let a = a.clone();
    let sq = |e: Expr| pow(e, Expr::number(2.0));
    match f {
        Func::Sin => func(Func::Cos, a),
        Func::Cos => neg(func(Func::Sin, a)),
        Func::Tan => add(vec![Expr::one(), sq(func(Func::Tan, a))]),
        Func::Cot => neg(add(vec![Expr::one(), sq(func(Func::Cot, a))])),
        Func::Sec => mul(vec![func(Func::Sec, a.clone()), func(Func::Tan, a)]),
        Func::Csc => neg(mul(vec![func(Func::Cot, a.clone()), func(Func::Csc, a)])),
        Func::Asin => pow(
            add(vec![Expr::one(), neg(sq(a))]),
            Expr::number(-0.5),
        ),
        Func::Acos => neg(pow(
            add(vec![Expr::one(), neg(sq(a))]),
            Expr::number(-0.5),
        )),
        Func::Atan => recip(add(vec![sq(a), Expr::one()])),
        Func::Sinh => func(Func::Cosh, a),
        Func::Cosh => func(Func::Sinh, a),
        Func::Tanh => add(vec![Expr::one(), neg(sq(func(Func::Tanh, a)))]),
        Func::Exp => func(Func::Exp, a),
        Func::Log => recip(a),
        Func::Abs => mul(vec![a.clone(), recip(func(Func::Abs, a))]),
    }
}

pub fn integrate(expr: &Expr, var: &str) -> MathResult<Expr> {
    antiderivative(&canonical(expr), var)
}

fn unsupported(e: &Expr) -> MathError {
    MathError::Unsupported(format!("no antiderivative rule for {e}"))
}

/// Slope of `u` when it is linear in `var`.
fn linear_slope(u: &Expr, var: &str) -> Option<f64> {
    let p = Poly::from_expr(u, var)?;
    (p.degree() == 1).then(|| p.coeffs()[1])
}

fn antiderivative(e: &Expr, var: &str) -> MathResult<Expr> {
    let x = Expr::symbol(var);
    if !e.contains_symbol(var) {
        return Ok(mul(vec![e.clone(), x]));
    }
    match e {
        Expr::Symbol(_) => Ok(mul(vec![
            Expr::number(0.5),
            pow(x, Expr::number(2.0)),
        ])),
        Expr::Add(terms) => Ok(add(terms
            .iter()
            .map(|t| antiderivative(t, var))
            .collect::<MathResult<_>>()?)),
        Expr::Mul(factors) => {
            let (constant, varying): (Vec<Expr>, Vec<Expr>) =
                factors.iter().cloned().partition(|f| !f.contains_symbol(var));
            if varying.len() == 1 {
                let mut out = constant;
                out.push(antiderivative(&varying[0], var)?);
                return Ok(mul(out));
            }
            let expanded = expand(e);
            if matches!(expanded, Expr::Add(_)) {
                return antiderivative(&expanded, var);
            }
            Err(unsupported(e))
        }
        Expr::Pow(b, k) => {
            let (b, k) = (&**b, &**k);
            if !k.contains_symbol(var) {
                if let Some(a) = linear_slope(b, var) {
                    if k.is_number(-1.0) {
                        return Ok(mul(vec![
                            Expr::number(1.0 / a),
                            func(Func::Log, b.clone()),
                        ]));
                    }
                    let k1 = add(vec![k.clone(), Expr::one()]);
                    return Ok(mul(vec![
                        pow(b.clone(), k1.clone()),
                        recip(mul(vec![k1, Expr::number(a)])),
                    ]));
                }
                if matches!(b, Expr::Add(_)) && k.as_number().is_some_and(|n| n > 1.0) {
                    return antiderivative(&expand(e), var);
                }
                return Err(unsupported(e));
            }
            if !b.contains_symbol(var) {
                let a = linear_slope(k, var).ok_or_else(|| unsupported(e))?;
                let scale = if matches!(b, Expr::Constant(Constant::E)) {
                    Expr::number(1.0 / a)
                } else {
                    recip(mul(vec![Expr::number(a), func(Func::Log, b.clone())]))
                };
                return Ok(mul(vec![e.clone(), scale]));
            }
            Err(unsupported(e))
        }
        Expr::Func(f, u) => {
            let a = linear_slope(u, var).ok_or_else(|| unsupported(e))?;
            let u = (**u).clone();
            let body = match f {
                Func::Sin => neg(func(Func::Cos, u)),
                Func::Cos => func(Func::Sin, u),
                Func::Tan => neg(func(Func::Log, func(Func::Cos, u))),
                Func::Sinh => func(Func::Cosh, u),
                Func::Cosh => func(Func::Sinh, u),
                Func::Exp => func(Func::Exp, u),
                Func::Log => add(vec![
                    mul(vec![u.clone(), func(Func::Log, u.clone())]),
                    neg(u),
                ]),
                _ => return Err(unsupported(e)),
            };
            Ok(mul(vec![Expr::number(1.0 / a), body]))
        }
        _ => Err(unsupported(e)),
    }
}
