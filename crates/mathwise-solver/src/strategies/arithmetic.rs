use mathwise_core::numfmt::format_significant;
use mathwise_core::{Constant, Expr, ResultEnvelope, StepTrace};

use super::{math_error, Request};

/// Digits shown for evaluated arithmetic, `20.0000000000000` style.
const DIGITS: usize = 15;

pub fn solve(req: &Request<'_>, mut trace: StepTrace, expr: &Expr) -> ResultEnvelope {
    let engine = req.engine;
    trace.push("Detected: Arithmetic", "Simple calculation");
    trace.push(
        format!("Calculation: {}", engine.render(expr)),
        "Evaluating the expression",
    );

    // no real value to print for complex results, show the simplified form
    let result = if expr.contains_constant(Constant::I) {
        engine.simplify(expr).map(|e| engine.render(&e))
    } else {
        engine
            .numeric_evaluate(expr)
            .map(|v| format_significant(v, DIGITS))
    };

    match result {
        Ok(result) => {
            trace.push(format!("Result: {result}"), "Final answer");
            req.builder(req.tag).solution(result).trace(trace).build()
        }
        Err(e) => math_error(req, trace, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::{normalize, ProblemType, Solution, SymbolicEngine};
    use mathwise_engine::LocalEngine;

    fn eval(raw: &str, want_steps: bool) -> ResultEnvelope {
        let engine = LocalEngine::new();
        let normalized = normalize(raw);
        let req = Request {
            engine: &engine,
            raw,
            normalized: &normalized,
            tag: ProblemType::ArithmeticExpression,
            want_steps,
        };
        let expr = engine.parse(&normalized).unwrap();
        solve(&req, req.opening_trace(), &expr)
    }

    #[test]
    fn test_percentage() {
        let env = eval("25% of 80", false);
        assert_eq!(env.solution, Solution::Text("20.0000000000000".into()));
        assert_eq!(env.problem_type, ProblemType::ArithmeticExpression);
        assert!(env.steps.is_empty());
    }

    #[test]
    fn test_steps() {
        let env = eval("what is five plus three", true);
        assert_eq!(env.solution, Solution::Text("8.00000000000000".into()));
        assert_eq!(env.steps.last().map(String::as_str), Some("Result: 8.00000000000000"));
        assert_eq!(env.detailed_steps.last().unwrap().explanation, "Final answer");
    }

    #[test]
    fn test_complex_value_is_rendered() {
        let env = eval("(3 + 2I)(1 - I)", false);
        assert_eq!(env.solution, Solution::Text("5 - I".into()));
    }

    #[test]
    fn test_domain_error() {
        let env = eval("log(0)", true);
        assert_eq!(env.problem_type, ProblemType::MathError);
    }
}
