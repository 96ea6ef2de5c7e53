use mathwise_core::{Constant, Expr, Func, MathResult, ProblemType, ResultEnvelope, StepTrace};

use super::{math_error, pick_variable, strip_operation_words, Request};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Derivative,
    Integral,
}

pub fn solve(req: &Request<'_>, op: Operation) -> ResultEnvelope {
    let mut trace = req.opening_trace();
    match run(req, op, &mut trace) {
        Ok(solution) => req.builder(req.tag).solution(solution).trace(trace).build(),
        Err(e) => math_error(req, trace, &e),
    }
}

fn has_trig(expr: &Expr) -> bool {
    expr.contains_func(&|f| matches!(f, Func::Sin | Func::Cos))
}

fn has_exp(expr: &Expr) -> bool {
    match expr {
        Expr::Pow(b, _) if **b == Expr::Constant(Constant::E) => true,
        Expr::Func(Func::Exp, _) => true,
        Expr::Add(items) | Expr::Mul(items) => items.iter().any(has_exp),
        Expr::Pow(b, e) => has_exp(b) || has_exp(e),
        Expr::Func(_, a) | Expr::Factorial(a) => has_exp(a),
        _ => false,
    }
}

fn run(req: &Request<'_>, op: Operation, trace: &mut StepTrace) -> MathResult<String> {
    let engine = req.engine;
    let text = strip_operation_words(req.normalized);
    trace.push(
        format!("Original expression: {text}"),
        "Starting with the given expression",
    );
    let expr = engine.parse(&text)?;
    let shown = engine.render(&expr);
    trace.push(
        format!("Parsed expression: {shown}"),
        "Converting to mathematical notation",
    );

    let vars = engine.free_variables(&expr);
    let var = pick_variable(&vars).unwrap_or("x");
    let polynomial = engine.degree(&expr, var).is_ok();

    let result = match op {
        Operation::Derivative => {
            trace.push(
                format!("Finding d/d{var}({shown})"),
                format!("Computing the derivative with respect to {var}"),
            );
            let result = engine.differentiate(&expr, var)?;
            if polynomial {
                trace.push(
                    "Using power rule: d/dx(x^n) = n*x^(n-1)",
                    "Applying the power rule for polynomial terms",
                );
            }
            if has_trig(&expr) {
                trace.push(
                    "Using trigonometric derivatives:",
                    "Applying derivative rules for trigonometric functions",
                );
                trace.push("  d/dx(sin(x)) = cos(x)", "");
                trace.push("  d/dx(cos(x)) = -sin(x)", "");
            }
            if has_exp(&expr) {
                trace.push(
                    "Using exponential rule: d/dx(e^x) = e^x",
                    "Applying the exponential derivative rule",
                );
            }
            trace.push(
                format!("Result: {}", engine.render(&result)),
                "Final derivative after applying all rules",
            );
            result
        }
        Operation::Integral => {
            trace.push(
                format!("Finding ∫({shown}) d{var}"),
                format!("Computing the indefinite integral with respect to {var}"),
            );
            let result = engine.integrate(&expr, var)?;
            if polynomial {
                trace.push(
                    "Using power rule for integration: ∫x^n dx = x^(n+1)/(n+1) + C",
                    "Applying the power rule for integration",
                );
            }
            trace.push(
                format!("Result: {} + C", engine.render(&result)),
                "Adding constant of integration C (for indefinite integrals)",
            );
            result
        }
    };

    let simplified = engine.simplify(&result)?;
    let simplified_text = engine.render(&simplified);
    if simplified_text != engine.render(&result) {
        trace.push(
            format!("Simplified: {simplified_text}"),
            "Simplifying the final result",
        );
    }
    Ok(simplified_text)
}

impl Operation {
    pub fn for_tag(tag: ProblemType) -> Option<Self> {
        match tag {
            ProblemType::Derivative => Some(Self::Derivative),
            ProblemType::Integral => Some(Self::Integral),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::{normalize, Solution};
    use mathwise_engine::LocalEngine;

    fn run_calc(raw: &str, tag: ProblemType, want_steps: bool) -> ResultEnvelope {
        let engine = LocalEngine::new();
        let normalized = normalize(raw);
        let req = Request {
            engine: &engine,
            raw,
            normalized: &normalized,
            tag,
            want_steps,
        };
        let op = Operation::for_tag(tag).unwrap();
        solve(&req, op)
    }

    #[test]
    fn test_derivative_with_power_rule_hint() {
        let env = run_calc("derivative of x^3", ProblemType::Derivative, true);
        assert_eq!(env.solution, Solution::Text("3*x**2".into()));
        assert!(env.steps.iter().any(|s| s.starts_with("Using power rule")));
        assert!(env.steps.iter().any(|s| s == "Finding d/dx(x**3)"));
    }

    #[test]
    fn test_derivative_trig_hint_keeps_alignment() {
        let env = run_calc("differentiate sin(x)", ProblemType::Derivative, true);
        assert_eq!(env.solution, Solution::Text("cos(x)".into()));
        assert_eq!(env.steps.len(), env.explanations.len());
        assert!(env.steps.iter().any(|s| s == "  d/dx(sin(x)) = cos(x)"));
    }

    #[test]
    fn test_integral_adds_constant_in_steps() {
        let env = run_calc("integrate 2*x", ProblemType::Integral, true);
        assert_eq!(env.solution, Solution::Text("x**2".into()));
        assert!(env.steps.iter().any(|s| s == "Result: x**2 + C"));
    }

    #[test]
    fn test_unsupported_integral_is_math_error() {
        let env = run_calc("integrate sin(x^2)", ProblemType::Integral, false);
        assert_eq!(env.problem_type, ProblemType::MathError);
        assert!(env.steps.is_empty());
        assert!(env.error.is_some());
    }
}
