use mathwise_core::numfmt::{format_number, format_significant, snap};
use mathwise_core::{Expr, MathResult, ResultEnvelope, Solution, StepTrace};

use super::{math_error, pick_variable, Request};

/// Significant digits used for reported roots.
const ROOT_DIGITS: usize = 5;

pub fn solve(req: &Request<'_>) -> ResultEnvelope {
    let mut trace = req.opening_trace();
    trace.push(
        "Detected: Equation",
        "This is an equation - finding values that make it true",
    );
    match run(req, &mut trace) {
        Ok(solution) => req.builder(req.tag).solution(solution).trace(trace).build(),
        Err(e) => math_error(req, trace, &e),
    }
}

fn run(req: &Request<'_>, trace: &mut StepTrace) -> MathResult<Solution> {
    let engine = req.engine;
    let text = req.normalized;
    trace.push(
        format!("Original equation: {text}"),
        "Starting with the given equation",
    );

    let (lhs, rhs) = text.split_once('=').unwrap_or((text, "0"));
    let lhs = engine.parse(lhs.trim())?;
    let rhs = engine.parse(rhs.trim())?;
    trace.push(
        format!("Parsed equation: {} = {}", engine.render(&lhs), engine.render(&rhs)),
        "Converting to standard mathematical form",
    );

    let difference = Expr::sub(lhs.clone(), rhs.clone());
    let simplified = engine.simplify(&difference)?;
    if engine.render(&simplified) != engine.render(&difference) {
        trace.push(
            format!("Simplified form: {} = 0", engine.render(&simplified)),
            "Simplifying the equation by combining like terms",
        );
    }

    let vars = engine.free_variables(&simplified);
    let Some(var) = pick_variable(&vars) else {
        // nothing to solve for: report whether the identity holds
        let holds = engine
            .numeric_evaluate(&simplified)
            .map(|v| snap(v) == 0.0)
            .unwrap_or(false);
        trace.push(
            format!("{} = {}: {holds}", engine.render(&lhs), engine.render(&rhs)),
            "The equation has no unknowns, so it is checked directly",
        );
        return Ok(Solution::from(if holds { "True" } else { "False" }));
    };

    describe_degree(req, trace, &simplified, var);

    let roots = engine.solve_for_roots(&simplified, var)?;
    trace.push(
        format!("Solving for {var}..."),
        format!("Finding all values of {var} that satisfy the equation"),
    );

    if roots.is_empty() {
        trace.push(
            "No real solutions found",
            "This equation has no real number solutions",
        );
        return Ok(Solution::from("No real solutions"));
    }

    let shown: Vec<String> = roots.iter().map(|r| format_number(snap(*r))).collect();
    if let [only] = shown.as_slice() {
        trace.push(
            format!("Solution: {var} = {only}"),
            "There is one unique solution",
        );
    } else {
        let listed: Vec<String> = shown.iter().map(|s| format!("{var} = {s}")).collect();
        trace.push(
            format!("Solutions: {}", listed.join(", ")),
            format!("There are {} solutions to this equation", roots.len()),
        );
    }

    trace.push(
        "Verification:",
        "Checking each solution by substituting back into the original equation",
    );
    for (root, label) in roots.iter().zip(&shown) {
        let check = engine.substitute(&simplified, var, &Expr::number(*root))?;
        let value = match engine.numeric_evaluate(&check) {
            Ok(v) => format_number(snap(v)),
            Err(_) => engine.render(&check),
        };
        trace.push(
            format!("  For {var} = {label}: {value} ✓"),
            format!("Substituting {var} = {label} confirms it's a valid solution"),
        );
    }

    Ok(Solution::List(
        roots
            .iter()
            .map(|r| format_significant(*r, ROOT_DIGITS))
            .collect(),
    ))
}

fn describe_degree(req: &Request<'_>, trace: &mut StepTrace, expr: &Expr, var: &str) {
    match req.engine.degree(expr, var) {
        Ok(degree) => {
            trace.push_step(format!("Equation degree: {degree}"));
            match degree {
                1 => trace.push_explanation("This is a linear equation (degree 1)"),
                2 => {
                    trace.push_explanation("This is a quadratic equation (degree 2)");
                    trace.push(
                        format!("Using quadratic formula: {var} = (-b ± √(b² - 4ac)) / 2a"),
                        "Applying the quadratic formula to find solutions",
                    );
                }
                d => trace.push_explanation(format!("This is a polynomial equation of degree {d}")),
            }
        }
        Err(_) => trace.push(
            "Equation degree: not a polynomial",
            format!(
                "The equation is not polynomial in {var}, so its roots are searched numerically"
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::{normalize, ProblemType};
    use mathwise_engine::LocalEngine;

    fn run_eq(raw: &str, want_steps: bool) -> ResultEnvelope {
        let engine = LocalEngine::new();
        let normalized = normalize(raw);
        let req = Request {
            engine: &engine,
            raw,
            normalized: &normalized,
            tag: ProblemType::AlgebraicEquation,
            want_steps,
        };
        solve(&req)
    }

    #[test]
    fn test_quadratic_roots_and_verification() {
        let env = run_eq("x^2 - 4 = 0", true);
        assert_eq!(
            env.solution,
            Solution::List(vec!["2.0000".into(), "-2.0000".into()])
        );
        assert_eq!(env.problem_type, ProblemType::AlgebraicEquation);
        assert!(env.steps.iter().any(|s| s == "Equation degree: 2"));
        assert!(env.steps.iter().any(|s| s.starts_with("Using quadratic formula")));
        let checks: Vec<&String> = env
            .steps
            .iter()
            .filter(|s| s.starts_with("  For x = "))
            .collect();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0], "  For x = 2: 0 ✓");
        assert_eq!(env.steps.len(), env.detailed_steps.len());
    }

    #[test]
    fn test_linear_equation() {
        let env = run_eq("2x + 3 = 7", true);
        assert_eq!(env.solution, Solution::List(vec!["2.0000".into()]));
        assert!(env.steps.iter().any(|s| s == "Solution: x = 2"));
        assert!(env
            .explanations
            .iter()
            .any(|e| e == "This is a linear equation (degree 1)"));
    }

    #[test]
    fn test_no_real_solutions() {
        let env = run_eq("x^2 + 1 = 0", false);
        assert_eq!(env.solution, Solution::Text("No real solutions".into()));
        assert!(env.steps.is_empty());
        assert!(env.error.is_none());
    }

    #[test]
    fn test_parse_failure_is_math_error() {
        let env = run_eq("x + = 2", true);
        assert_eq!(env.problem_type, ProblemType::MathError);
        assert!(env.error.is_some());
        assert!(!env.steps.is_empty());
        assert!(matches!(
            &env.solution,
            Solution::Text(s) if s.starts_with("I couldn't solve this mathematically")
        ));
    }

    #[test]
    fn test_equation_without_unknowns() {
        let env = run_eq("2 + 2 = 4", false);
        assert_eq!(env.solution, Solution::Text("True".into()));
    }
}
