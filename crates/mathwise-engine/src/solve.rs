//! Real roots of `expr = 0`.
//!
//! Polynomials are solved exactly where possible: zero roots first, then
//! closed forms up to degree two, rational roots with deflation above that
//! and an interval scan for whatever is left. Equations where the unknown
//! occurs once under invertible operations (powers, roots, `exp`, `log`,
//! `abs`) are solved by isolating it. Anything else is scanned numerically,
//! starting on [-10, 10] and widening while nothing is found.

use mathwise_core::numfmt::snap;
use mathwise_core::{Constant, Expr, Func, MathError, MathResult};

use crate::eval::{evaluate, evaluate_at};
use crate::poly::{rational_candidates, Poly};
use crate::simplify::canonical;

const SCAN_MIN: f64 = -10.0;
const SCAN_MAX: f64 = 10.0;
const SCAN_STEP: f64 = 0.01;
/// Outer bounds tried in turn when the first window has no root.
const WIDER_BOUNDS: [f64; 5] = [100.0, 1e3, 1e4, 1e5, 1e6];
const SHELL_STEPS: usize = 4000;
const RESIDUAL: f64 = 1e-6;
const BISECT_ITERATIONS: usize = 100;

pub fn solve(expr: &Expr, var: &str) -> MathResult<Vec<f64>> {
    let expr = canonical(expr);
    if expr.contains_constant(Constant::I) {
        return Err(MathError::Unsupported(
            "equations with complex coefficients".into(),
        ));
    }
    let others: Vec<String> = expr
        .free_symbols()
        .into_iter()
        .filter(|s| s != var)
        .collect();
    if !others.is_empty() {
        return Err(MathError::Unsupported(format!(
            "cannot solve for {var} with other unknowns: {}",
            others.join(", ")
        )));
    }
    if !expr.contains_symbol(var) {
        return Ok(Vec::new());
    }
    if let Some(poly) = Poly::from_expr(&expr, var) {
        return Ok(polynomial_roots(&poly));
    }
    if let Some(candidates) = isolate(&expr, var, vec![0.0]) {
        let mut roots: Vec<f64> = Vec::new();
        for r in candidates.into_iter().map(snap) {
            if satisfies(&expr, var, r) && !roots.iter().any(|u| (u - r).abs() < 1e-9) {
                roots.push(r);
            }
        }
        return Ok(roots);
    }
    numeric_roots(&expr, var)
}

/// Scan outward until a window yields roots. Finding none is not a proof
/// that there are none, so that case is an error rather than an empty list.
fn numeric_roots(expr: &Expr, var: &str) -> MathResult<Vec<f64>> {
    let f = |x: f64| evaluate_at(expr, var, x).ok();
    let roots = scan_roots(f, SCAN_MIN, SCAN_MAX);
    if !roots.is_empty() {
        return Ok(roots);
    }
    let mut inner = SCAN_MAX;
    for outer in WIDER_BOUNDS {
        let mut roots = scan_steps(f, -outer, -inner, SHELL_STEPS);
        roots.extend(scan_steps(f, inner, outer, SHELL_STEPS));
        if !roots.is_empty() {
            roots.sort_by(|a, b| a.total_cmp(b));
            return Ok(roots);
        }
        inner = outer;
    }
    Err(MathError::Unsupported(format!(
        "no real root of {expr} = 0 found numerically"
    )))
}

fn constant_value(e: &Expr, var: &str) -> Option<f64> {
    if e.contains_symbol(var) {
        return None;
    }
    evaluate(e).ok()
}

/// Real `n`-th roots of `t`, for a nonzero integer `n`.
fn integer_roots(t: f64, n: i64) -> Vec<f64> {
    if n < 0 && t == 0.0 {
        return Vec::new();
    }
    let t = if n < 0 { 1.0 / t } else { t };
    let k = n.unsigned_abs() as f64;
    if n % 2 == 0 {
        if t < 0.0 {
            Vec::new()
        } else if t == 0.0 {
            vec![0.0]
        } else {
            let r = t.powf(1.0 / k);
            vec![r, -r]
        }
    } else {
        vec![t.signum() * t.abs().powf(1.0 / k)]
    }
}

/// Solve `e = t` for each target `t` by peeling invertible operations off
/// the single occurrence of `var`. `None` when `e` has no such shape;
/// `Some(vec![])` when the shape proves there is no real solution.
fn isolate(e: &Expr, var: &str, targets: Vec<f64>) -> Option<Vec<f64>> {
    if targets.is_empty() {
        return Some(targets);
    }
    match e {
        Expr::Symbol(s) if s == var => Some(targets),
        Expr::Add(terms) => {
            let (inner, rest) = single_occurrence(terms, var)?;
            let shift: f64 = rest
                .iter()
                .map(|t| constant_value(t, var))
                .sum::<Option<f64>>()?;
            isolate(inner, var, targets.into_iter().map(|t| t - shift).collect())
        }
        Expr::Mul(factors) => {
            let (inner, rest) = single_occurrence(factors, var)?;
            let scale: f64 = rest
                .iter()
                .map(|f| constant_value(f, var))
                .product::<Option<f64>>()?;
            if scale == 0.0 {
                return None;
            }
            isolate(inner, var, targets.into_iter().map(|t| t / scale).collect())
        }
        Expr::Pow(base, exp) if base.contains_symbol(var) => {
            let k = constant_value(exp, var)?;
            if k == 0.0 {
                return None;
            }
            let next = if k.fract() == 0.0 && k.abs() < 64.0 {
                targets
                    .into_iter()
                    .flat_map(|t| integer_roots(t, k as i64))
                    .collect()
            } else {
                // principal real power: the base must be non-negative
                targets
                    .into_iter()
                    .filter(|t| *t >= 0.0 && !(*t == 0.0 && k < 0.0))
                    .map(|t| t.powf(1.0 / k))
                    .collect()
            };
            isolate(base, var, next)
        }
        Expr::Pow(base, exp) => {
            let b = constant_value(base, var)?;
            if b <= 0.0 || b == 1.0 {
                return None;
            }
            let next = targets
                .into_iter()
                .filter(|t| *t > 0.0)
                .map(|t| t.ln() / b.ln())
                .collect();
            isolate(exp, var, next)
        }
        Expr::Func(Func::Exp, a) => {
            let next = targets.into_iter().filter(|t| *t > 0.0).map(f64::ln).collect();
            isolate(a, var, next)
        }
        Expr::Func(Func::Log, a) => isolate(a, var, targets.into_iter().map(f64::exp).collect()),
        Expr::Func(Func::Abs, a) => {
            let next = targets
                .into_iter()
                .filter(|t| *t >= 0.0)
                .flat_map(|t| if t == 0.0 { vec![0.0] } else { vec![t, -t] })
                .collect();
            isolate(a, var, next)
        }
        _ => None,
    }
}

/// The one item containing `var`, and the others.
fn single_occurrence<'a>(items: &'a [Expr], var: &str) -> Option<(&'a Expr, Vec<&'a Expr>)> {
    let mut inner = None;
    let mut rest = Vec::with_capacity(items.len());
    for item in items {
        if item.contains_symbol(var) {
            if inner.is_some() {
                return None;
            }
            inner = Some(item);
        } else {
            rest.push(item);
        }
    }
    inner.map(|i| (i, rest))
}

/// Residual check relative to the size of the terms at `x`.
fn satisfies(expr: &Expr, var: &str, x: f64) -> bool {
    let Ok(value) = evaluate_at(expr, var, x) else {
        return false;
    };
    let scale = match expr {
        Expr::Add(terms) => terms
            .iter()
            .filter_map(|t| evaluate_at(t, var, x).ok())
            .map(f64::abs)
            .sum::<f64>(),
        _ => 1.0,
    };
    value.abs() <= RESIDUAL * scale.max(1.0)
}

/// Roots of a polynomial in the order they are found.
pub fn polynomial_roots(poly: &Poly) -> Vec<f64> {
    if poly.degree() == 0 {
        return Vec::new();
    }
    let mut roots = Vec::new();
    let zeros = poly.coeffs().iter().take_while(|c| **c == 0.0).count();
    let mut rest = Poly::new(poly.coeffs()[zeros..].to_vec());
    if zeros > 0 {
        roots.push(0.0);
    }

    if rest.degree() >= 3 && rest.is_integral() {
        let ints: Vec<i128> = rest.coeffs().iter().map(|c| *c as i128).collect();
        for (p, q) in rational_candidates(&ints) {
            let r = p as f64 / q as f64;
            if rest.is_root(r) {
                roots.push(r);
                while rest.degree() > 0 && rest.is_root(r) {
                    rest = rest.deflate(r);
                }
            }
            if rest.degree() <= 2 {
                break;
            }
        }
    }

    match rest.degree() {
        0 => {}
        1 | 2 => roots.extend(low_degree_roots(&rest)),
        _ => {
            let bound = cauchy_bound(&rest);
            let found = scan_roots(|x| Some(rest.eval(x)), -bound, bound);
            roots.extend(found);
        }
    }

    let mut unique: Vec<f64> = Vec::with_capacity(roots.len());
    for r in roots {
        let r = snap(r);
        if !unique.iter().any(|u| (u - r).abs() < 1e-9) {
            unique.push(r);
        }
    }
    unique
}

/// Linear and quadratic closed forms; the `+` branch comes first.
fn low_degree_roots(poly: &Poly) -> Vec<f64> {
    match poly.coeffs() {
        [b, a] => vec![-b / a],
        [c, b, a] => {
            let disc = b * b - 4.0 * a * c;
            if disc < 0.0 {
                Vec::new()
            } else if disc == 0.0 {
                vec![-b / (2.0 * a)]
            } else {
                let s = disc.sqrt();
                vec![(-b + s) / (2.0 * a), (-b - s) / (2.0 * a)]
            }
        }
        _ => Vec::new(),
    }
}

fn cauchy_bound(poly: &Poly) -> f64 {
    let lead = poly.leading().abs();
    let coeffs = poly.coeffs();
    1.0 + coeffs[..coeffs.len() - 1]
        .iter()
        .fold(0.0_f64, |m, c| m.max(c.abs() / lead))
}

/// Sign-change scan with bisection. A bracket is only accepted when the
/// function is actually small at the midpoint, which drops poles.
pub(crate) fn scan_roots(f: impl Fn(f64) -> Option<f64>, lo: f64, hi: f64) -> Vec<f64> {
    let steps = ((hi - lo) / SCAN_STEP).ceil().max(1.0) as usize;
    scan_steps(f, lo, hi, steps)
}

fn scan_steps(f: impl Fn(f64) -> Option<f64>, lo: f64, hi: f64, steps: usize) -> Vec<f64> {
    let mut roots: Vec<f64> = Vec::new();
    let push = |r: f64, roots: &mut Vec<f64>| {
        let r = snap(r);
        if !roots.iter().any(|u| (u - r).abs() < 1e-6) {
            roots.push(r);
        }
    };

    let mut prev: Option<(f64, f64)> = None;
    for i in 0..=steps {
        let x = lo + i as f64 * (hi - lo) / steps as f64;
        let Some(fx) = f(x).filter(|v| v.is_finite()) else {
            prev = None;
            continue;
        };
        if fx == 0.0 {
            push(x, &mut roots);
        } else if let Some((px, pf)) = prev {
            if pf != 0.0 && pf.signum() != fx.signum() {
                if let Some(r) = bisect(&f, px, x, pf) {
                    push(r, &mut roots);
                }
            }
        }
        prev = Some((x, fx));
    }
    roots.sort_by(|a, b| a.total_cmp(b));
    roots
}

fn bisect(f: &impl Fn(f64) -> Option<f64>, mut a: f64, mut b: f64, mut fa: f64) -> Option<f64> {
    for _ in 0..BISECT_ITERATIONS {
        let mid = 0.5 * (a + b);
        let fm = f(mid)?;
        if fm == 0.0 || (b - a).abs() < 1e-14 {
            return (fm.abs() < RESIDUAL).then_some(mid);
        }
        if fa.signum() == fm.signum() {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }
    let mid = 0.5 * (a + b);
    f(mid).filter(|v| v.abs() < RESIDUAL).map(|_| mid)
}
