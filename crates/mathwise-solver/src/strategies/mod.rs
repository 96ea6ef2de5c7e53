//! Per-problem-type strategies.
//!
//! Every strategy takes a [`Request`] and returns a finished
//! [`ResultEnvelope`]. Failures are turned into an error envelope at the
//! strategy boundary; nothing here returns `Result` to the router.

pub mod algebraic;
pub mod arithmetic;
pub mod calculus;
pub mod complex;
pub mod equation;
pub mod general;
pub mod matrix;
pub mod statistics;
pub mod story;

use std::collections::BTreeSet;
use std::sync::LazyLock;

use mathwise_core::{
    EnvelopeBuilder, MathError, ProblemType, ResultEnvelope, Source, StepTrace, SymbolicEngine,
};
use regex::Regex;
use tracing::warn;

/// Everything a strategy needs for one request.
pub struct Request<'a> {
    pub engine: &'a dyn SymbolicEngine,
    pub raw: &'a str,
    pub normalized: &'a str,
    pub tag: ProblemType,
    pub want_steps: bool,
}

impl Request<'_> {
    pub fn builder(&self, tag: ProblemType) -> EnvelopeBuilder {
        EnvelopeBuilder::new(tag, self.want_steps).source(Source::Local)
    }

    /// The opening steps shared by the symbolic strategies.
    pub fn opening_trace(&self) -> StepTrace {
        let mut trace = StepTrace::new();
        trace.push(
            format!("Problem: {}", self.raw),
            "Analyzing your math problem...",
        );
        trace
    }
}

/// Convert an engine failure into the `Math Error` envelope.
pub fn math_error(req: &Request<'_>, mut trace: StepTrace, err: &MathError) -> ResultEnvelope {
    warn!(tag = %req.tag, error = %err, "strategy failed");
    trace.push(
        format!("Error: {err}"),
        "Please check your math input format",
    );
    req.builder(ProblemType::MathError)
        .solution(format!("I couldn't solve this mathematically: {err}"))
        .trace(trace)
        .error(err.to_string())
        .build()
}

/// `x` when present, otherwise the first free variable in sorted order.
pub fn pick_variable(vars: &BTreeSet<String>) -> Option<&str> {
    if vars.contains("x") {
        return Some("x");
    }
    vars.iter().next().map(String::as_str)
}

static OPERATION_WORDS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(derivative\s+of|derivative|derive|differentiate|d/dx|integral\s+of|integral|integrate|antiderivative\s+of|antiderivative|factoring|factor|with\s+respect\s+to\s+[a-z])",
    )
    .ok()
});

static LEADING_OF: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*of\s+").ok());

/// Remove calculus and factoring verbs, leaving the expression they act on.
pub fn strip_operation_words(text: &str) -> String {
    let stripped = match OPERATION_WORDS.as_ref() {
        Some(re) => re.replace_all(text, " ").into_owned(),
        None => text.to_string(),
    };
    let stripped = match LEADING_OF.as_ref() {
        Some(re) => re.replace(&stripped, "").into_owned(),
        None => stripped,
    };
    stripped.trim().to_string()
}

/// `[2, 4, 6]` with integral values printed without a fraction.
pub fn format_list(values: &[f64]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| mathwise_core::numfmt::format_number(*v))
        .collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_operation_words() {
        assert_eq!(strip_operation_words("derivative of x^3"), "x^3");
        assert_eq!(strip_operation_words("integrate 2*x"), "2*x");
        assert_eq!(strip_operation_words("factor x^2 - 9"), "x^2 - 9");
        assert_eq!(strip_operation_words("d/dx sin(x)"), "sin(x)");
        assert_eq!(
            strip_operation_words("differentiate x^2 with respect to x"),
            "x^2"
        );
    }

    #[test]
    fn test_pick_variable_prefers_x() {
        let vars: BTreeSet<String> = ["a", "x"].iter().map(|s| s.to_string()).collect();
        assert_eq!(pick_variable(&vars), Some("x"));
        let vars: BTreeSet<String> = ["t", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(pick_variable(&vars), Some("b"));
        assert_eq!(pick_variable(&BTreeSet::new()), None);
    }

    #[test]
    fn test_format_list() {
        assert_eq!(format_list(&[2.0, 4.5, -1.0]), "[2, 4.5, -1]");
        assert_eq!(format_list(&[]), "[]");
    }
}
