//! The uniform response shape returned for every request.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::problem::ProblemType;
use crate::trace::{combine, DetailedStep, StepTrace};

/// A single answer or, for equations with several roots, one per root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Solution {
    Text(String),
    List(Vec<String>),
}

impl Default for Solution {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for Solution {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Solution {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<String>> for Solution {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forms {
    pub simplified: String,
    pub expanded: String,
    pub factored: String,
}

/// Which engine produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub solution: Solution,
    pub problem_type: ProblemType,
    pub steps: Vec<String>,
    pub explanations: Vec<String>,
    pub detailed_steps: Vec<DetailedStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forms: Option<Forms>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl ResultEnvelope {
    pub fn is_error(&self) -> bool {
        self.problem_type.is_error()
    }
}

/// Builds a [`ResultEnvelope`]. When the caller did not ask for steps, the
/// three trace fields come out empty whatever the strategy recorded, and
/// `detailed_steps` is always derived from the other two.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    problem_type: ProblemType,
    want_steps: bool,
    solution: Solution,
    trace: StepTrace,
    forms: Option<Forms>,
    error: Option<String>,
    source: Option<Source>,
}

impl EnvelopeBuilder {
    pub fn new(problem_type: ProblemType, want_steps: bool) -> Self {
        Self {
            problem_type,
            want_steps,
            solution: Solution::default(),
            trace: StepTrace::new(),
            forms: None,
            error: None,
            source: None,
        }
    }

    pub fn solution(mut self, solution: impl Into<Solution>) -> Self {
        self.solution = solution.into();
        self
    }

    pub fn trace(mut self, trace: StepTrace) -> Self {
        self.trace = trace;
        self
    }

    pub fn forms(mut self, forms: Forms) -> Self {
        self.forms = Some(forms);
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> ResultEnvelope {
        let (steps, explanations) = if self.want_steps {
            self.trace.into_parts()
        } else {
            (Vec::new(), Vec::new())
        };
        let detailed_steps = combine(&steps, &explanations);
        ResultEnvelope {
            solution: self.solution,
            problem_type: self.problem_type,
            steps,
            explanations,
            detailed_steps,
            forms: self.forms,
            error: self.error,
            source: self.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trace() -> StepTrace {
        let mut t = StepTrace::new();
        t.push("Original: x + x", "Your expression as entered");
        t.push_step("Simplified: 2*x");
        t
    }

    #[test]
    fn test_steps_suppressed_when_not_requested() {
        let env = EnvelopeBuilder::new(ProblemType::AlgebraicExpression, false)
            .solution("2*x")
            .trace(sample_trace())
            .build();
        assert!(env.steps.is_empty());
        assert!(env.explanations.is_empty());
        assert!(env.detailed_steps.is_empty());
        assert_eq!(env.solution, Solution::Text("2*x".into()));
    }

    #[test]
    fn test_detailed_steps_follow_trace() {
        let env = EnvelopeBuilder::new(ProblemType::AlgebraicExpression, true)
            .trace(sample_trace())
            .build();
        assert_eq!(env.steps.len(), 2);
        assert_eq!(env.detailed_steps.len(), 2);
        assert_eq!(env.detailed_steps[1].explanation, "");
    }

    #[test]
    fn test_json_shape() {
        let env = EnvelopeBuilder::new(ProblemType::AlgebraicEquation, false)
            .solution(vec!["2.0000".to_string(), "-2.0000".to_string()])
            .build();
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["problem_type"], "Algebraic Equation");
        assert_eq!(json["solution"][1], "-2.0000");
        assert!(json.get("forms").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["detailed_steps"], serde_json::json!([]));
    }

    #[test]
    fn test_error_field_round_trips() {
        let env = EnvelopeBuilder::new(ProblemType::MathError, true)
            .solution("I couldn't solve this mathematically: bad input")
            .error("bad input")
            .source(Source::Local)
            .build();
        let text = serde_json::to_string(&env).unwrap();
        let back: ResultEnvelope = serde_json::from_str(&text).unwrap();
        assert_eq!(back.error.as_deref(), Some("bad input"));
        assert_eq!(back.source, Some(Source::Local));
        assert!(back.is_error());
    }
}
