use mathwise_core::{Expr, Forms, MathResult, ProblemType, ResultEnvelope, StepTrace};

use super::{math_error, pick_variable, strip_operation_words, Request};

/// Simplified, expanded and factored forms of an expression with variables.
/// A form is only reported as a step when it differs from the ones before it.
pub fn solve(req: &Request<'_>, mut trace: StepTrace, expr: &Expr) -> ResultEnvelope {
    trace.push(
        "Detected: Algebraic Expression",
        "This contains variables - I'll simplify and analyze it",
    );
    match forms(req, &mut trace, expr) {
        Ok(forms) => req
            .builder(req.tag)
            .solution(forms.simplified.clone())
            .forms(forms)
            .trace(trace)
            .build(),
        Err(e) => math_error(req, trace, &e),
    }
}

fn forms(req: &Request<'_>, trace: &mut StepTrace, expr: &Expr) -> MathResult<Forms> {
    let engine = req.engine;
    let original = engine.render(expr);
    let simplified = engine.render(&engine.simplify(expr)?);
    let expanded = engine.render(&engine.expand(expr)?);
    let factored = engine.render(&engine.factor(expr)?);

    trace.push(format!("Original: {original}"), "Your expression as entered");
    if simplified != original {
        trace.push(
            format!("Simplified: {simplified}"),
            "Simplified by combining like terms and reducing",
        );
    }
    if expanded != original && expanded != simplified {
        trace.push(
            format!("Expanded: {expanded}"),
            "All brackets multiplied out",
        );
    }
    if factored != original && factored != expanded {
        trace.push(
            format!("Factored: {factored}"),
            "Expressed as a product of factors",
        );
    }

    let vars = engine.free_variables(expr);
    if let Some(var) = pick_variable(&vars) {
        if let Ok(d) = engine.differentiate(expr, var) {
            trace.push(
                format!("Derivative: {}", engine.render(&d)),
                "Rate of change of the expression",
            );
        }
    }

    Ok(Forms {
        simplified,
        expanded,
        factored,
    })
}

/// `factor ...` requests: factor over the rationals and nothing else.
pub fn factor_only(req: &Request<'_>) -> ResultEnvelope {
    let mut trace = req.opening_trace();
    let text = strip_operation_words(req.normalized);
    trace.push(
        format!("Original expression: {text}"),
        "Starting with the given expression",
    );
    let result = req.engine.parse(&text).and_then(|expr| {
        let factored = req.engine.factor(&expr)?;
        Ok((expr, factored))
    });
    match result {
        Ok((expr, factored)) => {
            let shown = req.engine.render(&factored);
            let explanation = if factored == expr {
                "No further factorization over the rationals"
            } else {
                "Expressed as a product of factors"
            };
            trace.push(format!("Factored: {shown}"), explanation);
            req.builder(ProblemType::Factoring)
                .solution(shown)
                .trace(trace)
                .build()
        }
        Err(e) => math_error(req, trace, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::{normalize, Solution, SymbolicEngine};
    use mathwise_engine::LocalEngine;

    fn request<'a>(
        engine: &'a LocalEngine,
        raw: &'a str,
        normalized: &'a str,
        want_steps: bool,
    ) -> Request<'a> {
        Request {
            engine,
            raw,
            normalized,
            tag: ProblemType::AlgebraicExpression,
            want_steps,
        }
    }

    #[test]
    fn test_forms_and_solution() {
        let engine = LocalEngine::new();
        let raw = "(x + 1)*(x - 1)";
        let normalized = normalize(raw);
        let req = request(&engine, raw, &normalized, true);
        let expr = engine.parse(&normalized).unwrap();
        let env = solve(&req, req.opening_trace(), &expr);
        let forms = env.forms.clone().unwrap();
        assert_eq!(forms.expanded, "x**2 - 1");
        assert_eq!(forms.factored, "(x - 1)*(x + 1)");
        assert_eq!(env.solution, Solution::Text(forms.simplified.clone()));
        assert!(env.steps.iter().any(|s| s == "Derivative: 2*x"));
    }

    #[test]
    fn test_redundant_forms_are_not_repeated() {
        let engine = LocalEngine::new();
        let normalized = "2x + 3x";
        let req = request(&engine, normalized, normalized, true);
        let expr = engine.parse(normalized).unwrap();
        let env = solve(&req, StepTrace::new(), &expr);
        assert_eq!(env.solution, Solution::Text("5*x".into()));
        // parse already collects like terms, so no form differs from the original
        assert!(!env.steps.iter().any(|s| s.starts_with("Simplified:")));
        assert!(!env.steps.iter().any(|s| s.starts_with("Expanded:")));
        assert!(!env.steps.iter().any(|s| s.starts_with("Factored:")));
    }

    #[test]
    fn test_forms_present_without_steps() {
        let engine = LocalEngine::new();
        let normalized = "x^2 - 9";
        let req = request(&engine, normalized, normalized, false);
        let expr = engine.parse(normalized).unwrap();
        let env = solve(&req, req.opening_trace(), &expr);
        assert!(env.steps.is_empty());
        assert_eq!(env.forms.unwrap().factored, "(x - 3)*(x + 3)");
    }

    #[test]
    fn test_factor_only() {
        let engine = LocalEngine::new();
        let normalized = "factor x^2 - 9";
        let req = request(&engine, normalized, normalized, true);
        let env = factor_only(&req);
        assert_eq!(env.problem_type, ProblemType::Factoring);
        assert_eq!(env.solution, Solution::Text("(x - 3)*(x + 3)".into()));
        assert!(env.steps.iter().any(|s| s == "Original expression: x^2 - 9"));
    }
}
