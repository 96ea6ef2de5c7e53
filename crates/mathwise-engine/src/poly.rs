//! Univariate polynomials with `f64` coefficients: extraction from an
//! expression, degree, rational-root factoring and rational cancellation.

use mathwise_core::{Expr, MathError, MathResult};

use crate::expand::expand;
use crate::simplify::{self, canonical, split_coefficient};

/// Candidate roots tried before giving up on rational factoring.
const MAX_CANDIDATES: usize = 200;
const MAX_DEGREE: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    /// Ascending: `coeffs[i]` multiplies `x^i`. No trailing zeros.
    coeffs: Vec<f64>,
}

impl Poly {
    pub fn new(mut coeffs: Vec<f64>) -> Self {
        while coeffs.last().is_some_and(|c| *c == 0.0) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// Coefficients of `expr` in `var`, or `None` when some term is not a
    /// numeric multiple of a non-negative integer power of `var`.
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        let expanded = expand(expr);
        let terms = match &expanded {
            Expr::Add(ts) => ts.clone(),
            other => vec![other.clone()],
        };
        let mut coeffs = vec![0.0; 1];
        for term in &terms {
            let (c, rest) = split_coefficient(term);
            let power = match rest {
                None => 0,
                Some(Expr::Symbol(s)) if s == var => 1,
                Some(Expr::Pow(b, e)) => match (&*b, e.as_number()) {
                    (Expr::Symbol(s), Some(k))
                        if s == var && k >= 0.0 && k.fract() == 0.0 && (k as usize) <= MAX_DEGREE =>
                    {
                        k as usize
                    }
                    _ => return None,
                },
                Some(_) => return None,
            };
            if coeffs.len() <= power {
                coeffs.resize(power + 1, 0.0);
            }
            coeffs[power] += c;
        }
        Some(Self::new(coeffs))
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn leading(&self) -> f64 {
        self.coeffs.last().copied().unwrap_or(0.0)
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// Scale used to judge whether `eval` is zero at `x`.
    pub fn magnitude_at(&self, x: f64) -> f64 {
        let m = x.abs().max(1.0);
        self.coeffs
            .iter()
            .enumerate()
            .map(|(i, c)| c.abs() * m.powi(i as i32))
            .sum::<f64>()
            .max(1.0)
    }

    pub fn is_root(&self, x: f64) -> bool {
        self.eval(x).abs() <= 1e-9 * self.magnitude_at(x)
    }

    pub fn derivative(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c * i as f64)
                .collect(),
        )
    }

    pub fn is_integral(&self) -> bool {
        self.coeffs
            .iter()
            .all(|c| c.fract() == 0.0 && c.abs() < 1e12)
    }

    /// Divide by `x - root`, dropping the remainder.
    pub fn deflate(&self, root: f64) -> Self {
        let n = self.coeffs.len();
        if n <= 1 {
            return Self::new(Vec::new());
        }
        let mut out = vec![0.0; n - 1];
        let mut carry = 0.0;
        for i in (1..n).rev() {
            carry = self.coeffs[i] + carry * root;
            out[i - 1] = carry;
        }
        Self::new(out)
    }

    pub fn div_rem(&self, divisor: &Poly) -> (Poly, Poly) {
        if divisor.is_zero() || self.degree() < divisor.degree() || self.is_zero() {
            return (Poly::new(Vec::new()), self.clone());
        }
        let mut rem = self.coeffs.clone();
        let d = divisor.degree();
        let lead = divisor.leading();
        let mut quot = vec![0.0; self.degree() - d + 1];
        for i in (0..quot.len()).rev() {
            let q = rem[i + d] / lead;
            quot[i] = q;
            for (j, dc) in divisor.coeffs.iter().enumerate() {
                rem[i + j] -= q * dc;
            }
        }
        rem.truncate(d);
        (Poly::new(quot), Poly::new(rem).chop(self.scale()))
    }

    fn scale(&self) -> f64 {
        self.coeffs.iter().fold(1.0_f64, |m, c| m.max(c.abs()))
    }

    fn chop(self, scale: f64) -> Self {
        Self::new(
            self.coeffs
                .into_iter()
                .map(|c| if c.abs() < 1e-9 * scale { 0.0 } else { c })
                .collect(),
        )
    }

    fn monic(self) -> Self {
        let lead = self.leading();
        if lead == 0.0 {
            return self;
        }
        Self::new(self.coeffs.iter().map(|c| c / lead).collect())
    }

    pub fn gcd(a: &Poly, b: &Poly) -> Poly {
        let (mut a, mut b) = (a.clone(), b.clone());
        while !b.is_zero() {
            let (_, r) = a.div_rem(&b);
            a = b;
            b = r;
        }
        a.monic()
    }

    pub fn to_expr(&self, var: &str) -> Expr {
        let x = Expr::symbol(var);
        let terms = self
            .coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| **c != 0.0)
            .map(|(i, c)| {
                simplify::mul(vec![
                    Expr::number(*c),
                    simplify::pow(x.clone(), Expr::number(i as f64)),
                ])
            })
            .collect();
        simplify::add(terms)
    }
}

/// Degree of `expr` in `var`; terms without `var` count as degree 0.
pub fn degree_in(expr: &Expr, var: &str) -> MathResult<u32> {
    let not_poly = || MathError::Unsupported(format!("{expr} is not a polynomial in {var}"));
    let expanded = expand(expr);
    let terms = match &expanded {
        Expr::Add(ts) => ts.clone(),
        other => vec![other.clone()],
    };
    let mut degree = 0u32;
    for term in &terms {
        let factors = match term {
            Expr::Mul(fs) => fs.clone(),
            other => vec![other.clone()],
        };
        let mut d = 0u32;
        for f in &factors {
            if !f.contains_symbol(var) {
                continue;
            }
            d += match f {
                Expr::Symbol(_) => 1,
                Expr::Pow(b, e) => match (&**b, e.as_number()) {
                    (Expr::Symbol(s), Some(k)) if s == var && k >= 0.0 && k.fract() == 0.0 => {
                        k as u32
                    }
                    _ => return Err(not_poly()),
                },
                _ => return Err(not_poly()),
            };
        }
        degree = degree.max(d);
    }
    Ok(degree)
}

fn gcd_i128(a: i128, b: i128) -> i128 {
    if b == 0 {
        a.abs()
    } else {
        gcd_i128(b, a % b)
    }
}

fn divisors(n: i128) -> Vec<i128> {
    let n = n.abs();
    let mut out = Vec::new();
    let mut d = 1;
    while d * d <= n && out.len() < MAX_CANDIDATES {
        if n % d == 0 {
            out.push(d);
            if d != n / d {
                out.push(n / d);
            }
        }
        d += 1;
    }
    out
}

/// Rational root candidates `p/q` (reduced, `q > 0`) in ascending order.
pub(crate) fn rational_candidates(coeffs: &[i128]) -> Vec<(i128, i128)> {
    let (Some(&a0), Some(&an)) = (coeffs.first(), coeffs.last()) else {
        return Vec::new();
    };
    if a0 == 0 || an == 0 || a0.abs() > 1_000_000_000_000 || an.abs() > 1_000_000_000_000 {
        return Vec::new();
    }
    let mut out: Vec<(i128, i128)> = Vec::new();
    for p in divisors(a0) {
        for q in divisors(an) {
            let g = gcd_i128(p, q);
            for sign in [1, -1] {
                let cand = (sign * p / g, q / g);
                if !out.contains(&cand) {
                    out.push(cand);
                }
            }
        }
    }
    out.truncate(MAX_CANDIDATES);
    out.sort_by(|a, b| (a.0 * b.1).cmp(&(b.0 * a.1)));
    out
}

/// Exact division of an integer polynomial by `q*x - p`.
fn divide_linear(coeffs: &[i128], p: i128, q: i128) -> Option<Vec<i128>> {
    let n = coeffs.len().checked_sub(1)?;
    if n == 0 {
        return None;
    }
    let mut b = vec![0i128; n];
    if coeffs[n] % q != 0 {
        return None;
    }
    b[n - 1] = coeffs[n] / q;
    for k in (1..n).rev() {
        let top = coeffs[k].checked_add(p.checked_mul(b[k])?)?;
        if top % q != 0 {
            return None;
        }
        b[k - 1] = top / q;
    }
    (-p.checked_mul(b[0])? == coeffs[0]).then_some(b)
}

fn int_poly_expr(coeffs: &[i128], var: &str) -> Expr {
    Poly::new(coeffs.iter().map(|c| *c as f64).collect()).to_expr(var)
}

/// Factor a univariate integer polynomial into content, `x^k` and linear
/// factors from its rational roots, times whatever does not split further.
/// `None` when the expression is not such a polynomial or does not split.
pub fn factor_univariate(expr: &Expr) -> Option<Expr> {
    let vars = expr.free_symbols();
    if vars.len() != 1 {
        return None;
    }
    let var = vars.into_iter().next()?;
    let poly = Poly::from_expr(expr, &var)?;
    if poly.degree() < 1 || !poly.is_integral() {
        return None;
    }

    let mut coeffs: Vec<i128> = poly.coeffs().iter().map(|c| *c as i128).collect();
    let mut content = coeffs.iter().fold(0, |g, c| gcd_i128(g, *c));
    if coeffs.last().is_some_and(|c| *c < 0) {
        content = -content;
    }
    if content == 0 {
        return None;
    }
    for c in coeffs.iter_mut() {
        *c /= content;
    }

    let zeros = coeffs.iter().take_while(|c| **c == 0).count();
    coeffs.drain(..zeros);

    let x = Expr::symbol(var.clone());
    let mut linear: Vec<(f64, Expr, u32)> = Vec::new();
    for (p, q) in rational_candidates(&coeffs) {
        let mut mult = 0;
        while let Some(next) = divide_linear(&coeffs, p, q) {
            coeffs = next;
            mult += 1;
        }
        if mult > 0 {
            let lead = if q == 1 {
                x.clone()
            } else {
                Expr::mul(vec![Expr::number(q as f64), x.clone()])
            };
            let factor = Expr::add(vec![lead, Expr::number(-p as f64)]);
            linear.push((p as f64 / q as f64, factor, mult));
        }
        if coeffs.len() <= 1 {
            break;
        }
    }

    // leftover constant after removing the content
    if coeffs.len() == 1 {
        content *= coeffs[0];
        coeffs.clear();
    }

    let split = zeros + linear.iter().map(|(_, _, m)| *m as usize).sum::<usize>();
    if split == 0 || (split == 1 && coeffs.is_empty() && content == 1) {
        return None;
    }

    linear.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let mut factors = Vec::new();
    if content != 1 {
        factors.push(Expr::number(content as f64));
    }
    match zeros {
        0 => {}
        1 => factors.push(x.clone()),
        k => factors.push(Expr::pow(x.clone(), Expr::number(k as f64))),
    }
    for (_, factor, mult) in linear {
        factors.push(if mult == 1 {
            factor
        } else {
            Expr::pow(factor, Expr::number(mult as f64))
        });
    }
    if !coeffs.is_empty() {
        factors.push(int_poly_expr(&coeffs, &var));
    }

    Some(if factors.len() == 1 {
        factors.remove(0)
    } else {
        Expr::Mul(factors)
    })
}

/// Split a canonical product into numerator and denominator factors.
fn split_fraction(expr: &Expr) -> (Vec<Expr>, Vec<Expr>) {
    let factors = match expr {
        Expr::Mul(fs) => fs.clone(),
        other => vec![other.clone()],
    };
    let mut num = Vec::new();
    let mut den = Vec::new();
    for f in factors {
        match &f {
            Expr::Pow(b, e) if e.as_number().is_some_and(|k| k < 0.0) => {
                let k = simplify::mul(vec![Expr::number(-1.0), (**e).clone()]);
                den.push(simplify::pow((**b).clone(), k));
            }
            _ => num.push(f),
        }
    }
    (num, den)
}

/// Cancel common polynomial factors of a univariate rational function,
/// e.g. `(x^2 - 1)/(x - 1)` → `x + 1`.
pub fn cancel(expr: &Expr) -> Option<Expr> {
    let expr = canonical(expr);
    let vars = expr.free_symbols();
    if vars.len() != 1 {
        return None;
    }
    let var = vars.into_iter().next()?;
    let (num, den) = split_fraction(&expr);
    if den.is_empty() {
        return None;
    }
    let num_p = Poly::from_expr(&simplify::mul(num), &var)?;
    let den_p = Poly::from_expr(&simplify::mul(den), &var)?;
    let g = Poly::gcd(&num_p, &den_p);
    if g.degree() == 0 {
        return None;
    }
    let (qn, _) = num_p.div_rem(&g);
    let (qd, _) = den_p.div_rem(&g);
    let lead = qd.leading();
    if lead == 0.0 {
        return None;
    }
    let qn = Poly::new(qn.coeffs().iter().map(|c| c / lead).collect());
    let qd = Poly::new(qd.coeffs().iter().map(|c| c / lead).collect());
    if qd.degree() == 0 {
        return Some(qn.to_expr(&var));
    }
    Some(simplify::mul(vec![
        qn.to_expr(&var),
        simplify::pow(qd.to_expr(&var), Expr::number(-1.0)),
    ]))
}
