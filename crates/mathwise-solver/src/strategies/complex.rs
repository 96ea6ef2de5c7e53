use std::sync::LazyLock;

use mathwise_core::{MathResult, ProblemType, ResultEnvelope, StepTrace};
use regex::Regex;
use tracing::warn;

use super::Request;

struct Patterns {
    words: Regex,
    unit: Regex,
}

static PATTERNS: LazyLock<Option<Patterns>> = LazyLock::new(|| {
    Some(Patterns {
        words: Regex::new(
            r"(?i)\b(simplify|the|complex|imaginary|numbers?|of|compute|calculate|evaluate)\b",
        )
        .ok()?,
        // a lone i, including 2i and (3+i), but not the i inside sin
        unit: Regex::new(r"(^|[^A-Za-z])i($|[^A-Za-z])").ok()?,
    })
});

/// Replace the imaginary unit `i` with the engine's `I`.
pub fn to_engine_syntax(text: &str) -> String {
    let Some(p) = PATTERNS.as_ref() else {
        return text.to_string();
    };
    let stripped = p.words.replace_all(text, " ");
    // matches can share a boundary character (i*i), so run to a fixed point
    let mut out = stripped.trim().to_string();
    loop {
        let next = p.unit.replace_all(&out, "${1}I${2}").into_owned();
        if next == out {
            return out;
        }
        out = next;
    }
}

pub fn solve(req: &Request<'_>) -> ResultEnvelope {
    let text = req.normalized;
    let mut trace = StepTrace::new();
    trace.push(
        format!("Complex number operation: {text}"),
        "Processing complex number operation",
    );

    let result: MathResult<String> = req
        .engine
        .parse(&to_engine_syntax(text))
        .and_then(|expr| req.engine.simplify(&expr))
        .map(|e| req.engine.render(&e));

    match result {
        Ok(result) => {
            trace.push(format!("Simplified: {result}"), "Simplified complex expression");
            req.builder(req.tag).solution(result).trace(trace).build()
        }
        Err(e) => {
            warn!(error = %e, "complex strategy failed");
            trace.push(format!("Error: {e}"), "Complex operation failed");
            req.builder(ProblemType::ComplexNumberError)
                .solution(format!("Error in complex calculation: {e}"))
                .error(e.to_string())
                .trace(trace)
                .build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::Solution;
    use mathwise_engine::LocalEngine;

    fn complex(text: &str) -> ResultEnvelope {
        let engine = LocalEngine::new();
        let req = Request {
            engine: &engine,
            raw: text,
            normalized: text,
            tag: ProblemType::ComplexNumberOperation,
            want_steps: true,
        };
        solve(&req)
    }

    #[test]
    fn test_unit_substitution() {
        assert_eq!(to_engine_syntax("(3 + 2i)*(1 - i)"), "(3 + 2I)*(1 - I)");
        assert_eq!(to_engine_syntax("i*i"), "I*I");
        assert_eq!(to_engine_syntax("sin(i)"), "sin(I)");
        assert_eq!(to_engine_syntax("simplify the complex number 2i"), "2I");
    }

    #[test]
    fn test_simplify_product() {
        let env = complex("simplify the complex number (3 + 2i)*(1 - i)");
        assert_eq!(env.solution, Solution::Text("5 - I".into()));
        assert_eq!(env.problem_type, ProblemType::ComplexNumberOperation);
    }

    #[test]
    fn test_unit_inside_words_is_kept() {
        assert_eq!(to_engine_syntax("(2+3i)*(1-i)"), "(2+3I)*(1-I)");
        assert_eq!(to_engine_syntax("pi*i"), "pi*I");
        assert_eq!(to_engine_syntax("sinh(i) + xi"), "sinh(I) + xi");
        let env = complex("(2+3i)*(1-i)");
        assert_eq!(env.solution, Solution::Text("5 + I".into()));
    }

    #[test]
    fn test_failure_envelope() {
        let env = complex("complex i +");
        assert_eq!(env.problem_type, ProblemType::ComplexNumberError);
        assert!(matches!(
            &env.solution,
            Solution::Text(s) if s.starts_with("Error in complex calculation")
        ));
        assert!(env.error.is_some());
    }
}
