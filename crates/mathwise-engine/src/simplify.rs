//! Canonical form.
//!
//! Every constructor here assumes its children are already canonical and
//! returns a canonical node: flattened sums and products, numbers folded,
//! like terms and like bases collected, terms ordered by descending degree
//! with the constant last.

use std::cmp::Ordering;

use mathwise_core::{Constant, Expr, Func};

use crate::eval;

/// Coefficients below this are treated as cancelled.
const EPS: f64 = 1e-12;

pub fn canonical(expr: &Expr) -> Expr {
    match expr {
        Expr::Number(n) => Expr::Number(if *n == 0.0 { 0.0 } else { *n }),
        Expr::Symbol(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(terms) => add(terms.iter().map(canonical).collect()),
        Expr::Mul(factors) => mul(factors.iter().map(canonical).collect()),
        Expr::Pow(b, e) => pow(canonical(b), canonical(e)),
        Expr::Func(f, a) => func(*f, canonical(a)),
        Expr::Factorial(a) => factorial(canonical(a)),
    }
}

/// Split a canonical term into its numeric coefficient and the rest.
pub(crate) fn split_coefficient(term: &Expr) -> (f64, Option<Expr>) {
    match term {
        Expr::Number(n) => (*n, None),
        Expr::Mul(factors) => match factors.split_first() {
            Some((Expr::Number(c), rest)) => {
                let rest = if rest.len() == 1 {
                    rest[0].clone()
                } else {
                    Expr::Mul(rest.to_vec())
                };
                (*c, Some(rest))
            }
            _ => (1.0, Some(term.clone())),
        },
        _ => (1.0, Some(term.clone())),
    }
}

fn with_coefficient(c: f64, key: Expr) -> Expr {
    if c == 1.0 {
        return key;
    }
    match key {
        Expr::Mul(mut factors) => {
            factors.insert(0, Expr::Number(c));
            Expr::Mul(factors)
        }
        other => Expr::Mul(vec![Expr::Number(c), other]),
    }
}

pub(crate) fn add(terms: Vec<Expr>) -> Expr {
    let mut flat = Vec::with_capacity(terms.len());
    for t in terms {
        match t {
            Expr::Add(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut constant = 0.0;
    let mut groups: Vec<(Expr, f64)> = Vec::new();
    for t in &flat {
        match split_coefficient(t) {
            (c, None) => constant += c,
            (c, Some(key)) => match groups.iter_mut().find(|(k, _)| *k == key) {
                Some(group) => group.1 += c,
                None => groups.push((key, c)),
            },
        }
    }

    let mut out: Vec<Expr> = groups
        .into_iter()
        .filter(|(key, c)| c.abs() > EPS || divides_by_zero(key))
        .map(|(key, c)| with_coefficient(c, key))
        .collect();
    out.sort_by(compare_terms);
    if constant.abs() > EPS {
        // symbol-free sums read real part first: 5 - I, 1 + pi
        if out.iter().all(|t| t.free_symbols().is_empty()) {
            out.insert(0, Expr::Number(constant));
        } else {
            out.push(Expr::Number(constant));
        }
    }

    match out.len() {
        0 => Expr::zero(),
        1 => out.remove(0),
        _ => Expr::Add(out),
    }
}

fn push_base(bases: &mut Vec<(Expr, Vec<Expr>)>, base: Expr, exp: Expr) {
    match bases.iter_mut().find(|(b, _)| *b == base) {
        Some((_, exps)) => exps.push(exp),
        None => bases.push((base, vec![exp])),
    }
}

fn integer(e: &Expr) -> Option<i64> {
    match e {
        Expr::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(*n as i64),
        _ => None,
    }
}

pub(crate) fn mul(factors: Vec<Expr>) -> Expr {
    let mut flat = Vec::with_capacity(factors.len());
    for f in factors {
        match f {
            Expr::Mul(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut coef = 1.0;
    let mut i_power: i64 = 0;
    let mut bases: Vec<(Expr, Vec<Expr>)> = Vec::new();
    for f in flat {
        match f {
            Expr::Number(n) => coef *= n,
            Expr::Constant(Constant::I) => i_power += 1,
            Expr::Pow(b, e) => {
                if let (Expr::Constant(Constant::I), Some(k)) = (&*b, integer(&e)) {
                    i_power += k;
                    continue;
                }
                push_base(&mut bases, *b, *e);
            }
            other => push_base(&mut bases, other, Expr::one()),
        }
    }
    match i_power.rem_euclid(4) {
        1 => push_base(&mut bases, Expr::Constant(Constant::I), Expr::one()),
        2 => coef = -coef,
        3 => {
            coef = -coef;
            push_base(&mut bases, Expr::Constant(Constant::I), Expr::one());
        }
        _ => {}
    }

    let mut out = Vec::with_capacity(bases.len());
    for (base, exps) in bases {
        match pow(base, add(exps)) {
            Expr::Number(n) => coef *= n,
            Expr::Mul(inner) => {
                for g in inner {
                    match g {
                        Expr::Number(n) => coef *= n,
                        other => out.push(other),
                    }
                }
            }
            other => out.push(other),
        }
    }
    // 0 * x**-1 with x = 0 is undefined, not zero
    if coef == 0.0 && !out.iter().any(divides_by_zero) {
        return Expr::zero();
    }
    out.sort_by(compare_factors);

    if out.is_empty() {
        return Expr::Number(coef);
    }
    // 2*(x + 1) → 2*x + 2
    if coef != 1.0 && out.len() == 1 {
        if let Expr::Add(terms) = &out[0] {
            return add(
                terms
                    .iter()
                    .map(|t| mul(vec![Expr::Number(coef), t.clone()]))
                    .collect(),
            );
        }
    }
    if coef == 1.0 {
        if out.len() == 1 {
            return out.remove(0);
        }
        return Expr::Mul(out);
    }
    out.insert(0, Expr::Number(coef));
    Expr::Mul(out)
}

/// True when `expr` contains a zero raised to a negative power.
pub fn divides_by_zero(expr: &Expr) -> bool {
    match expr {
        Expr::Pow(b, e) => {
            (b.is_number(0.0) && e.as_number().is_some_and(|k| k < 0.0))
                || divides_by_zero(b)
                || divides_by_zero(e)
        }
        Expr::Add(items) | Expr::Mul(items) => items.iter().any(divides_by_zero),
        Expr::Func(_, a) | Expr::Factorial(a) => divides_by_zero(a),
        _ => false,
    }
}

fn near_integer(v: f64) -> Option<f64> {
    let r = v.round();
    ((v - r).abs() < 1e-9 * v.abs().max(1.0)).then_some(r)
}

pub(crate) fn pow(base: Expr, exp: Expr) -> Expr {
    if exp.is_number(0.0) || base.is_number(1.0) {
        return Expr::one();
    }
    if exp.is_number(1.0) {
        return base;
    }
    match (&base, &exp) {
        (Expr::Number(b), Expr::Number(e)) => {
            let r = if e.fract() == 0.0 {
                b.powi(*e as i32)
            } else if *b < 0.0 {
                f64::NAN
            } else {
                b.powf(*e)
            };
            if !r.is_finite() {
                return Expr::Pow(Box::new(base), Box::new(exp));
            }
            if e.fract() == 0.0 {
                return Expr::Number(r);
            }
            match near_integer(r) {
                Some(n) => Expr::Number(n),
                None => Expr::Pow(Box::new(base), Box::new(exp)),
            }
        }
        (Expr::Constant(Constant::I), _) if integer(&exp).is_some() => {
            mul(vec![Expr::Pow(Box::new(base), Box::new(exp))])
        }
        (Expr::Constant(Constant::E), Expr::Func(Func::Log, a)) => (**a).clone(),
        (Expr::Pow(inner, e1), _) if integer(&exp).is_some() => {
            pow((**inner).clone(), mul(vec![(**e1).clone(), exp.clone()]))
        }
        (Expr::Mul(factors), _) if integer(&exp).is_some() => mul(
            factors
                .iter()
                .map(|f| pow(f.clone(), exp.clone()))
                .collect(),
        ),
        _ => Expr::Pow(Box::new(base), Box::new(exp)),
    }
}

pub(crate) fn func(f: Func, arg: Expr) -> Expr {
    match (f, &arg) {
        (Func::Exp, _) => return pow(Expr::Constant(Constant::E), arg),
        (Func::Log, Expr::Constant(Constant::E)) => return Expr::one(),
        (Func::Log, Expr::Pow(b, e)) if **b == Expr::Constant(Constant::E) => return (**e).clone(),
        (Func::Abs, Expr::Number(n)) => return Expr::Number(n.abs()),
        _ => {}
    }
    let node = Expr::Func(f, Box::new(arg));
    if let Expr::Func(_, a) = &node {
        if a.free_symbols().is_empty() && !a.contains_constant(Constant::I) {
            if let Ok(v) = eval::evaluate(&node) {
                let r = v.round();
                if (v - r).abs() < EPS {
                    return Expr::Number(r + 0.0);
                }
            }
        }
    }
    node
}

fn factorial(arg: Expr) -> Expr {
    if let Expr::Number(n) = arg {
        if let Ok(v) = eval::factorial(n) {
            return Expr::Number(v);
        }
    }
    Expr::Factorial(Box::new(arg))
}

/// Polynomial-style degree used for ordering terms.
fn term_degree(e: &Expr) -> f64 {
    match e {
        Expr::Symbol(_) => 1.0,
        Expr::Pow(b, x) => match x.as_number() {
            Some(k) => k * term_degree(b),
            None => 0.0,
        },
        Expr::Mul(fs) => fs.iter().map(term_degree).sum(),
        _ => 0.0,
    }
}

fn compare_terms(a: &Expr, b: &Expr) -> Ordering {
    let class = |e: &Expr| u8::from(e.free_symbols().is_empty());
    class(a)
        .cmp(&class(b))
        .then_with(|| {
            term_degree(b)
                .partial_cmp(&term_degree(a))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| strip_coefficient(a).cmp(&strip_coefficient(b)))
}

fn strip_coefficient(e: &Expr) -> String {
    match split_coefficient(e) {
        (_, Some(rest)) => rest.to_string(),
        (c, None) => c.to_string(),
    }
}

fn factor_rank(e: &Expr) -> (u8, String) {
    match e {
        Expr::Number(_) => (0, String::new()),
        Expr::Constant(c) => (1, c.name().to_string()),
        Expr::Symbol(s) => (2, s.clone()),
        Expr::Pow(b, _) => match &**b {
            Expr::Symbol(s) => (2, s.clone()),
            Expr::Constant(Constant::E) => (4, e.to_string()),
            other => (3, other.to_string()),
        },
        Expr::Func(..) | Expr::Factorial(_) => (4, e.to_string()),
        Expr::Add(_) => (5, e.to_string()),
        Expr::Mul(_) => (6, e.to_string()),
    }
}

fn compare_factors(a: &Expr, b: &Expr) -> Ordering {
    factor_rank(a).cmp(&factor_rank(b))
}

/// sin(u)^2 + cos(u)^2 with equal coefficients collapses to the coefficient.
pub(crate) fn pythagorean(expr: &Expr) -> Expr {
    match expr {
        Expr::Add(terms) => {
            let mut terms: Vec<Expr> = terms.iter().map(pythagorean).collect();
            while let Some((i, j, c)) = find_pythagorean_pair(&terms) {
                terms.remove(j);
                terms.remove(i);
                terms.push(Expr::Number(c));
            }
            add(terms)
        }
        Expr::Mul(fs) => mul(fs.iter().map(pythagorean).collect()),
        Expr::Pow(b, e) => pow(pythagorean(b), pythagorean(e)),
        Expr::Func(f, a) => func(*f, pythagorean(a)),
        other => other.clone(),
    }
}

fn squared_trig(term: &Expr) -> Option<(f64, Func, Expr)> {
    let (c, rest) = split_coefficient(term);
    match rest? {
        Expr::Pow(b, e) if e.is_number(2.0) => match *b {
            Expr::Func(f @ (Func::Sin | Func::Cos), a) => Some((c, f, *a)),
            _ => None,
        },
        _ => None,
    }
}

fn find_pythagorean_pair(terms: &[Expr]) -> Option<(usize, usize, f64)> {
    for (i, ti) in terms.iter().enumerate() {
        let Some((ci, Func::Sin, ai)) = squared_trig(ti) else {
            continue;
        };
        for (j, tj) in terms.iter().enumerate() {
            if let Some((cj, Func::Cos, aj)) = squared_trig(tj) {
                if aj == ai && (ci - cj).abs() < EPS {
                    return Some((i.min(j), i.max(j), ci));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn c(text: &str) -> String {
        canonical(&parse(text).unwrap()).to_string()
    }

    #[test]
    fn test_collects_like_terms() {
        assert_eq!(c("2x + 3x"), "5*x");
        assert_eq!(c("x + 1 + x - 1"), "2*x");
        assert_eq!(c("x - x"), "0");
    }

    #[test]
    fn test_orders_by_degree() {
        assert_eq!(c("1 + 2x + x^2"), "x**2 + 2*x + 1");
        assert_eq!(c("x^2 - 4"), "x**2 - 4");
    }

    #[test]
    fn test_collects_like_bases() {
        assert_eq!(c("x*x"), "x**2");
        assert_eq!(c("x^2 * x^3"), "x**5");
        assert_eq!(c("x / x"), "1");
    }

    #[test]
    fn test_folds_numbers() {
        assert_eq!(c("(25/100) * 80"), "20");
        assert_eq!(c("sqrt(16)"), "4");
        assert_eq!(c("sqrt(2)"), "sqrt(2)");
        assert_eq!(c("root(3, 27"), "3");
        assert_eq!(c("5!"), "120");
    }

    #[test]
    fn test_distributes_numeric_coefficient() {
        assert_eq!(c("2(x + 1)"), "2*x + 2");
        assert_eq!(c("-(x - 3)"), "-x + 3");
    }

    #[test]
    fn test_imaginary_unit_powers() {
        assert_eq!(c("I*I"), "-1");
        assert_eq!(c("I^3"), "-I");
        assert_eq!(c("I^4"), "1");
    }

    #[test]
    fn test_known_function_values() {
        assert_eq!(c("sin(pi)"), "0");
        assert_eq!(c("cos(0)"), "1");
        assert_eq!(c("sin(1)"), "sin(1)");
        assert_eq!(c("log(exp(x))"), "x");
        assert_eq!(c("exp(x)"), "exp(x)");
    }

    #[test]
    fn test_zero_denominator_is_kept() {
        let e = canonical(&parse("0/0").unwrap());
        assert!(divides_by_zero(&e));
        assert!(divides_by_zero(&canonical(&parse("(x - x)/(x - x)").unwrap())));
        assert!(divides_by_zero(&canonical(&parse("x/(x - x)").unwrap())));
        assert!(divides_by_zero(&canonical(&parse("0/0 + 1").unwrap())));
        assert!(!divides_by_zero(&canonical(&parse("0 * x/2").unwrap())));
        assert_eq!(c("0 * x"), "0");
    }

    #[test]
    fn test_pythagorean_identity() {
        let e = canonical(&parse("sin(x)^2 + cos(x)^2").unwrap());
        assert_eq!(pythagorean(&e).to_string(), "1");
        let e = canonical(&parse("3sin(x)^2 + 3cos(x)^2 + x").unwrap());
        assert_eq!(pythagorean(&e).to_string(), "x + 3");
    }
}
