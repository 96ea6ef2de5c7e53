use mathwise_core::Expr;

use crate::simplify::{self, canonical};

/// Products with more terms than this are left unexpanded.
const MAX_TERMS: usize = 2000;
const MAX_POWER: f64 = 20.0;

/// Multiply out products and integer powers of sums.
pub fn expand(expr: &Expr) -> Expr {
    expand_canonical(&canonical(expr))
}

fn expand_canonical(e: &Expr) -> Expr {
    match e {
        Expr::Add(terms) => simplify::add(terms.iter().map(expand_canonical).collect()),
        Expr::Mul(factors) => distribute(factors.iter().map(expand_canonical).collect()),
        Expr::Pow(b, x) => {
            let base = expand_canonical(b);
            match (&base, x.as_number()) {
                (Expr::Add(_), Some(k)) if k.fract() == 0.0 && k > 1.0 && k <= MAX_POWER => {
                    distribute(vec![base; k as usize])
                }
                (Expr::Add(_), Some(k)) if k.fract() == 0.0 && k < -1.0 && -k <= MAX_POWER => {
                    let positive = distribute(vec![base; (-k) as usize]);
                    simplify::pow(positive, Expr::number(-1.0))
                }
                _ => simplify::pow(base, expand_canonical(x)),
            }
        }
        Expr::Func(f, a) => simplify::func(*f, expand_canonical(a)),
        other => other.clone(),
    }
}

fn distribute(factors: Vec<Expr>) -> Expr {
    let mut acc: Vec<Expr> = vec![Expr::one()];
    for f in &factors {
        let terms: &[Expr] = match f {
            Expr::Add(ts) => ts,
            other => std::slice::from_ref(other),
        };
        if acc.len() * terms.len() > MAX_TERMS {
            return simplify::mul(factors);
        }
        let products: Vec<Expr> = acc
            .iter()
            .flat_map(|a| {
                terms
                    .iter()
                    .map(move |t| simplify::mul(vec![a.clone(), t.clone()]))
            })
            .collect();
        // collect like terms per factor so (x + 1)**n stays at n + 1 terms
        acc = match simplify::add(products) {
            Expr::Add(ts) => ts,
            other => vec![other],
        };
    }
    simplify::add(acc)
}
