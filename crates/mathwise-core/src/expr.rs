//! Expression AST shared by the engine and the solving strategies.
//!
//! `Display` prints in the usual CAS notation: `**` for powers, `*` for
//! products, `x - 1` rather than `x + (-1)`, `sqrt(x)` for `x**0.5` and
//! `exp(x)` for `E**x`. The printer never reorders terms; ordering is the
//! simplifier's job.

use std::collections::BTreeSet;
use std::fmt;

use crate::numfmt::{format_number, small_fraction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    Pi,
    E,
    /// The imaginary unit.
    I,
}

impl Constant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "E",
            Self::I => "I",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Log,
    Abs,
}

impl Func {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Cot => "cot",
            Self::Sec => "sec",
            Self::Csc => "csc",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Abs => "abs",
        }
    }

    /// `ln` is accepted as an alias of `log`.
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "cot" => Self::Cot,
            "sec" => Self::Sec,
            "csc" => Self::Csc,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "log" | "ln" => Self::Log,
            "abs" => Self::Abs,
            _ => return None,
        };
        Some(f)
    }

    pub fn is_trig(&self) -> bool {
        matches!(
            self,
            Self::Sin | Self::Cos | Self::Tan | Self::Cot | Self::Sec | Self::Csc
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    Constant(Constant),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Func(Func, Box<Expr>),
    Factorial(Box<Expr>),
}

impl Expr {
    pub fn number(n: f64) -> Self {
        Self::Number(n)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn zero() -> Self {
        Self::Number(0.0)
    }

    pub fn one() -> Self {
        Self::Number(1.0)
    }

    pub fn add(terms: Vec<Expr>) -> Self {
        Self::Add(terms)
    }

    pub fn mul(factors: Vec<Expr>) -> Self {
        Self::Mul(factors)
    }

    pub fn pow(base: Expr, exp: Expr) -> Self {
        Self::Pow(Box::new(base), Box::new(exp))
    }

    pub fn func(f: Func, arg: Expr) -> Self {
        Self::Func(f, Box::new(arg))
    }

    pub fn neg(e: Expr) -> Self {
        Self::Mul(vec![Self::Number(-1.0), e])
    }

    pub fn sub(a: Expr, b: Expr) -> Self {
        Self::Add(vec![a, Self::neg(b)])
    }

    pub fn div(a: Expr, b: Expr) -> Self {
        Self::Mul(vec![a, Self::pow(b, Self::Number(-1.0))])
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_number(&self, value: f64) -> bool {
        matches!(self, Self::Number(n) if *n == value)
    }

    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Symbol(s) => {
                out.insert(s.clone());
            }
            Self::Number(_) | Self::Constant(_) => {}
            Self::Add(items) | Self::Mul(items) => {
                for item in items {
                    item.collect_symbols(out);
                }
            }
            Self::Pow(b, e) => {
                b.collect_symbols(out);
                e.collect_symbols(out);
            }
            Self::Func(_, a) | Self::Factorial(a) => a.collect_symbols(out),
        }
    }

    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Self::Symbol(s) => s == name,
            Self::Number(_) | Self::Constant(_) => false,
            Self::Add(items) | Self::Mul(items) => items.iter().any(|i| i.contains_symbol(name)),
            Self::Pow(b, e) => b.contains_symbol(name) || e.contains_symbol(name),
            Self::Func(_, a) | Self::Factorial(a) => a.contains_symbol(name),
        }
    }

    pub fn contains_constant(&self, c: Constant) -> bool {
        match self {
            Self::Constant(k) => *k == c,
            Self::Number(_) | Self::Symbol(_) => false,
            Self::Add(items) | Self::Mul(items) => items.iter().any(|i| i.contains_constant(c)),
            Self::Pow(b, e) => b.contains_constant(c) || e.contains_constant(c),
            Self::Func(_, a) | Self::Factorial(a) => a.contains_constant(c),
        }
    }

    pub fn contains_func(&self, pred: &dyn Fn(Func) -> bool) -> bool {
        match self {
            Self::Func(f, a) => pred(*f) || a.contains_func(pred),
            Self::Number(_) | Self::Symbol(_) | Self::Constant(_) => false,
            Self::Add(items) | Self::Mul(items) => items.iter().any(|i| i.contains_func(pred)),
            Self::Pow(b, e) => b.contains_func(pred) || e.contains_func(pred),
            Self::Factorial(a) => a.contains_func(pred),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Self::Number(_) | Self::Symbol(_) | Self::Constant(_) => 1,
            Self::Add(items) | Self::Mul(items) => {
                1 + items.iter().map(Expr::node_count).sum::<usize>()
            }
            Self::Pow(b, e) => 1 + b.node_count() + e.node_count(),
            Self::Func(_, a) | Self::Factorial(a) => 1 + a.node_count(),
        }
    }

    /// Structural replacement of every occurrence of symbol `name`.
    pub fn replace_symbol(&self, name: &str, value: &Expr) -> Expr {
        match self {
            Self::Symbol(s) if s == name => value.clone(),
            Self::Number(_) | Self::Symbol(_) | Self::Constant(_) => self.clone(),
            Self::Add(items) => {
                Self::Add(items.iter().map(|i| i.replace_symbol(name, value)).collect())
            }
            Self::Mul(items) => {
                Self::Mul(items.iter().map(|i| i.replace_symbol(name, value)).collect())
            }
            Self::Pow(b, e) => {
                Self::pow(b.replace_symbol(name, value), e.replace_symbol(name, value))
            }
            Self::Func(f, a) => Self::func(*f, a.replace_symbol(name, value)),
            Self::Factorial(a) => Self::Factorial(Box::new(a.replace_symbol(name, value))),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

fn render(e: &Expr) -> String {
    match e {
        Expr::Number(n) => format_number(*n),
        Expr::Symbol(s) => s.clone(),
        Expr::Constant(c) => c.name().into(),
        Expr::Add(terms) => render_add(terms),
        Expr::Mul(factors) => render_mul(factors),
        Expr::Pow(b, x) => render_pow(b, x),
        Expr::Func(func, arg) => format!("{}({})", func.name(), render(arg)),
        Expr::Factorial(a) => format!("factorial({})", render(a)),
    }
}

/// If `term` prints with a leading minus, return its positive counterpart.
fn negated(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Number(n) if *n < 0.0 => Some(Expr::Number(-n)),
        Expr::Mul(factors) => {
            let (first, rest) = factors.split_first()?;
            let c = first.as_number().filter(|c| *c < 0.0)?;
            let mut out: Vec<Expr> = Vec::with_capacity(factors.len());
            if c != -1.0 {
                out.push(Expr::Number(-c));
            }
            out.extend(rest.iter().cloned());
            match out.len() {
                0 => Some(Expr::one()),
                1 => out.pop(),
                _ => Some(Expr::Mul(out)),
            }
        }
        _ => None,
    }
}

fn render_add(terms: &[Expr]) -> String {
    if terms.is_empty() {
        return "0".into();
    }
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        match negated(term) {
            Some(pos) => {
                out.push_str(if i == 0 { "-" } else { " - " });
                if matches!(pos, Expr::Add(_)) {
                    out.push_str(&format!("({})", render(&pos)));
                } else {
                    out.push_str(&render(&pos));
                }
            }
            None => {
                if i > 0 {
                    out.push_str(" + ");
                }
                out.push_str(&render(term));
            }
        }
    }
    out
}

fn render_factor(e: &Expr) -> String {
    match e {
        Expr::Add(_) => format!("({})", render(e)),
        Expr::Number(n) if *n < 0.0 => format!("({})", render(e)),
        _ => render(e),
    }
}

fn render_mul(factors: &[Expr]) -> String {
    if factors.is_empty() {
        return "1".into();
    }
    let mut coef = 1.0;
    let mut num: Vec<&Expr> = Vec::new();
    let mut den: Vec<Expr> = Vec::new();
    for f in factors {
        match f {
            Expr::Number(n) => coef *= n,
            Expr::Pow(b, x) => match x.as_number() {
                Some(k) if k == -1.0 => den.push((**b).clone()),
                Some(k) if k < 0.0 && k != -0.5 => {
                    den.push(Expr::pow((**b).clone(), Expr::Number(-k)))
                }
                _ => num.push(f),
            },
            _ => num.push(f),
        }
    }
    if coef == 0.0 {
        return "0".into();
    }

    // 2*x**3/3 rather than 0.666666666666667*x**3
    let mut magnitude = coef.abs();
    if let Some((p, q)) = small_fraction(magnitude) {
        magnitude = p as f64;
        den.insert(0, Expr::Number(q as f64));
    }

    let mut parts: Vec<String> = Vec::new();
    if magnitude != 1.0 || num.is_empty() {
        parts.push(format_number(magnitude));
    }
    parts.extend(num.iter().map(|f| render_factor(f)));
    let numerator = parts.join("*");

    let body = if den.is_empty() {
        numerator
    } else if den.len() == 1 && !matches!(den[0], Expr::Add(_) | Expr::Mul(_)) {
        format!("{numerator}/{}", render(&den[0]))
    } else {
        let d: Vec<String> = den.iter().map(render_factor).collect();
        format!("{numerator}/({})", d.join("*"))
    };

    if coef < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

fn render_pow(base: &Expr, exp: &Expr) -> String {
    if matches!(base, Expr::Constant(Constant::E)) {
        return format!("exp({})", render(exp));
    }
    match exp.as_number() {
        Some(k) if k == 0.5 => return format!("sqrt({})", render(base)),
        Some(k) if k == -0.5 => return format!("1/sqrt({})", render(base)),
        Some(k) if k == -1.0 => return format!("1/{}", wrap_base(base)),
        _ => {}
    }
    let exp_str = match exp {
        Expr::Number(n) if *n < 0.0 => format!("({})", render(exp)),
        Expr::Number(_) | Expr::Symbol(_) | Expr::Constant(_) | Expr::Func(..) => render(exp),
        _ => format!("({})", render(exp)),
    };
    format!("{}**{exp_str}", wrap_base(base))
}

fn wrap_base(base: &Expr) -> String {
    match base {
        Expr::Add(_) | Expr::Mul(_) | Expr::Pow(..) => format!("({})", render(base)),
        Expr::Number(n) if *n < 0.0 => format!("({})", render(base)),
        _ => render(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_render_polynomial() {
        let e = Expr::add(vec![
            Expr::pow(x(), Expr::number(2.0)),
            Expr::mul(vec![Expr::number(2.0), x()]),
            Expr::number(1.0),
        ]);
        assert_eq!(e.to_string(), "x**2 + 2*x + 1");
    }

    #[test]
    fn test_render_subtraction() {
        let e = Expr::add(vec![x(), Expr::number(-4.0)]);
        assert_eq!(e.to_string(), "x - 4");
        let e = Expr::add(vec![Expr::neg(x()), Expr::number(3.0)]);
        assert_eq!(e.to_string(), "-x + 3");
        let e = Expr::add(vec![
            Expr::pow(x(), Expr::number(2.0)),
            Expr::mul(vec![Expr::number(-3.0), x()]),
        ]);
        assert_eq!(e.to_string(), "x**2 - 3*x");
    }

    #[test]
    fn test_render_division_and_roots() {
        assert_eq!(Expr::div(x(), Expr::symbol("y")).to_string(), "x/y");
        assert_eq!(
            Expr::pow(x(), Expr::number(0.5)).to_string(),
            "sqrt(x)"
        );
        assert_eq!(
            Expr::pow(Expr::Constant(Constant::E), x()).to_string(),
            "exp(x)"
        );
        assert_eq!(Expr::pow(x(), Expr::number(-1.0)).to_string(), "1/x");
    }

    #[test]
    fn test_render_rational_coefficient() {
        let e = Expr::mul(vec![Expr::number(2.0 / 3.0), Expr::pow(x(), Expr::number(3.0))]);
        assert_eq!(e.to_string(), "2*x**3/3");
        let e = Expr::mul(vec![Expr::number(-0.5), x()]);
        assert_eq!(e.to_string(), "-x/2");
    }

    #[test]
    fn test_render_factored_product() {
        let e = Expr::mul(vec![
            Expr::add(vec![x(), Expr::number(-2.0)]),
            Expr::add(vec![x(), Expr::number(2.0)]),
        ]);
        assert_eq!(e.to_string(), "(x - 2)*(x + 2)");
    }

    #[test]
    fn test_render_complex() {
        let e = Expr::add(vec![Expr::number(5.0), Expr::Constant(Constant::I)]);
        assert_eq!(e.to_string(), "5 + I");
        let e = Expr::mul(vec![Expr::number(-3.0), Expr::Constant(Constant::I)]);
        assert_eq!(e.to_string(), "-3*I");
    }

    #[test]
    fn test_free_symbols_and_replace() {
        let e = Expr::add(vec![x(), Expr::func(Func::Sin, Expr::symbol("y"))]);
        let syms: Vec<_> = e.free_symbols().into_iter().collect();
        assert_eq!(syms, vec!["x".to_string(), "y".to_string()]);
        let r = e.replace_symbol("x", &Expr::number(2.0));
        assert!(!r.contains_symbol("x"));
        assert_eq!(r.to_string(), "2 + sin(y)");
    }
}
