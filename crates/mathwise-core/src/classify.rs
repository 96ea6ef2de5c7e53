//! Problem classification.
//!
//! One keyword cascade shared by the local router and the remote operation
//! selector. The rules are substring tests and the first match wins, so the
//! order of the checks in [`classify`] is significant.

use std::fmt;

use crate::problem::ProblemType;

const MATRIX_WORDS: &[&str] = &["matrix", "vector", "determinant", "det", "transpose"];
const COMPLEX_WORDS: &[&str] = &["complex", "imaginary"];
const STAT_WORDS: &[&str] = &[
    "mean",
    "median",
    "mode",
    "average",
    "std",
    "variance",
    "probability",
    "statistic",
];
const TRIG_WORDS: &[&str] = &["sin", "cos", "tan", "cot", "sec", "csc"];
const CALCULUS_WORDS: &[&str] = &["int", "derivative", "limit"];
const DERIVATIVE_WORDS: &[&str] = &["derive", "derivative", "d/dx", "differentiat"];
const INTEGRAL_WORDS: &[&str] = &["integrate", "integral", "antideriv"];
const FACTOR_WORDS: &[&str] = &["factor", "factoring"];
const VARIABLES: &[&str] = &["x", "y", "z"];

const STORY_VOCABULARY: &[&str] = &[
    "person", "people", "student", "students", "teacher", "teachers", "apple", "apples", "book",
    "books", "car", "cars", "money", "dollars", "cents", "hour", "hours", "day", "days", "year",
    "years", "time", "cost", "price", "buy", "bought", "sell", "sold", "give", "gives", "gave",
    "get", "gets", "got", "has", "have", "had", "total", "remaining", "left", "more", "less",
    "each", "per", "between", "among", "share", "shares",
];

const MATH_INDICATORS: &[&str] = &[
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "+", "-", "*", "/", "^", "=", "x", "y", "z",
    "sin", "cos", "tan", "integrate", "derivative", "factor", "solve", "calculate", "plus",
    "minus", "times", "divided by", "over", "squared", "cubed",
];

const WH_WORDS: &[&str] = &[
    "who", "what", "where", "when", "why", "how", "tell me", "explain", "describe",
];

const STEP_WORDS: &[&str] = &[
    "step",
    "steps",
    "show work",
    "working",
    "process",
    "explanation",
    "how to",
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Classify a request. `raw` is the caller's text, `normalized` its
/// [`normalize`](crate::normalize) output.
pub fn classify(raw: &str, normalized: &str) -> ProblemType {
    let lower = normalized.to_lowercase();

    if contains_any(&lower, MATRIX_WORDS) {
        return ProblemType::MatrixOperation;
    }
    if lower.contains('i') && contains_any(&lower, COMPLEX_WORDS) {
        return ProblemType::ComplexNumberOperation;
    }
    if looks_like_story(raw) {
        return ProblemType::StoryProblem;
    }
    if contains_any(&lower, STAT_WORDS) {
        return ProblemType::StatisticalCalculation;
    }
    if !is_likely_math(raw) {
        return ProblemType::GeneralQuestion;
    }
    if normalized.contains('=') {
        return equation_kind(normalized);
    }
    if contains_any(&lower, DERIVATIVE_WORDS) {
        return ProblemType::Derivative;
    }
    if contains_any(&lower, INTEGRAL_WORDS) {
        return ProblemType::Integral;
    }
    if contains_any(&lower, FACTOR_WORDS) {
        return ProblemType::Factoring;
    }
    if contains_any(&lower, TRIG_WORDS) {
        return ProblemType::TrigonometricExpression;
    }
    if contains_any(&lower, VARIABLES) {
        return ProblemType::AlgebraicExpression;
    }
    ProblemType::ArithmeticExpression
}

/// More than eight whitespace-separated words and at least two of them
/// (compared whole and lower-cased) from the story vocabulary.
pub fn looks_like_story(raw: &str) -> bool {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let hits = words
        .iter()
        .filter(|w| STORY_VOCABULARY.contains(&w.to_lowercase().as_str()))
        .count();
    words.len() > 8 && hits >= 2
}

pub fn is_likely_math(raw: &str) -> bool {
    contains_any(&raw.to_lowercase(), MATH_INDICATORS)
}

pub fn is_wh_question(raw: &str) -> bool {
    contains_any(&raw.to_lowercase(), WH_WORDS)
}

/// Finer tag for text containing `=`.
pub fn equation_kind(text: &str) -> ProblemType {
    let lower = text.to_lowercase();
    if contains_any(&lower, TRIG_WORDS) {
        ProblemType::TrigonometricEquation
    } else if contains_any(&lower, CALCULUS_WORDS) {
        ProblemType::CalculusEquation
    } else if contains_any(&lower, VARIABLES) {
        ProblemType::AlgebraicEquation
    } else {
        ProblemType::NumericalEquation
    }
}

/// True when the raw text asks for the working to be shown.
pub fn wants_steps(raw: &str) -> bool {
    contains_any(&raw.to_lowercase(), STEP_WORDS)
}

/// Operations understood by the remote simplification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    Solve,
    Derive,
    Integrate,
    Factor,
    Simplify,
    Expand,
    Cos,
    Sin,
    Tan,
    Log,
    Abs,
    Sqrt,
    Exp,
}

impl RemoteOperation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Solve => "solve",
            Self::Derive => "derive",
            Self::Integrate => "integrate",
            Self::Factor => "factor",
            Self::Simplify => "simplify",
            Self::Expand => "expand",
            Self::Cos => "cos",
            Self::Sin => "sin",
            Self::Tan => "tan",
            Self::Log => "log",
            Self::Abs => "abs",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
        }
    }

    /// URL path segment on the service. Solving is served as root finding.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Solve => "zeroes",
            other => other.name(),
        }
    }

    /// Pick the operation a request is asking for. Falls back to `Solve` for
    /// equations and `Simplify` for everything else.
    pub fn from_input(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        let table: &[(&[&str], RemoteOperation)] = &[
            (DERIVATIVE_WORDS, Self::Derive),
            (INTEGRAL_WORDS, Self::Integrate),
            (FACTOR_WORDS, Self::Factor),
            (&["simplify", "simplified"], Self::Simplify),
            (&["expand", "expanded"], Self::Expand),
            (&["solve", "find x", "x ="], Self::Solve),
            (&["cos", "cosine"], Self::Cos),
            (&["sin", "sine"], Self::Sin),
            (&["tan", "tangent"], Self::Tan),
            (&["log", "logarithm"], Self::Log),
            (&["abs", "absolute value"], Self::Abs),
            (&["sqrt", "square root"], Self::Sqrt),
            (&["exp", "exponent"], Self::Exp),
        ];
        for (words, op) in table {
            if contains_any(&lower, words) {
                return *op;
            }
        }
        if text.contains('=') {
            Self::Solve
        } else {
            Self::Simplify
        }
    }

    /// Shape the expression the way the service expects it. Equations are
    /// sent as `(lhs)-(rhs)` for root finding.
    pub fn prepare(&self, expression: &str) -> String {
        match (self, expression.split_once('=')) {
            (Self::Solve, Some((lhs, rhs))) => format!("({})-({})", lhs.trim(), rhs.trim()),
            _ => expression.to_string(),
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
