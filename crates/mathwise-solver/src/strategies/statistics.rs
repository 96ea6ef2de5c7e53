//! Descriptive statistics over the numbers found in the request text.

use std::sync::LazyLock;

use mathwise_core::numfmt::format_number;
use mathwise_core::{ProblemType, ResultEnvelope, StepTrace};
use regex::Regex;
use tracing::warn;

use super::{format_list, Request};

struct Patterns {
    number: Regex,
    bracket: Regex,
    paren: Regex,
}

static PATTERNS: LazyLock<Option<Patterns>> = LazyLock::new(|| {
    Some(Patterns {
        number: Regex::new(r"-?\d+\.?\d*").ok()?,
        bracket: Regex::new(r"\[(.*?)\]").ok()?,
        paren: Regex::new(r"\((.*?)\)").ok()?,
    })
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Mean,
    Median,
    Mode,
    StdDev,
    Variance,
    DefaultMean,
}

impl Measure {
    /// Keyword dispatch, first match wins.
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("mean") || lower.contains("average") {
            Self::Mean
        } else if lower.contains("median") {
            Self::Median
        } else if lower.contains("mode") {
            Self::Mode
        } else if lower.contains("std") || lower.contains("standard deviation") {
            Self::StdDev
        } else if lower.contains("variance") {
            Self::Variance
        } else {
            Self::DefaultMean
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mean => "Mean",
            Self::Median => "Median",
            Self::Mode => "Mode",
            Self::StdDev => "Standard Deviation",
            Self::Variance => "Variance",
            Self::DefaultMean => "Mean (default)",
        }
    }

    pub fn compute(&self, values: &[f64]) -> f64 {
        match self {
            Self::Mean | Self::DefaultMean => mean(values),
            Self::Median => median(values),
            Self::Mode => mode(values),
            Self::StdDev => sample_variance(values).sqrt(),
            Self::Variance => sample_variance(values),
        }
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Most frequent value; ties go to the one seen first.
pub fn mode(values: &[f64]) -> f64 {
    let mut best = (0usize, 0.0);
    for (i, v) in values.iter().enumerate() {
        let count = values.iter().filter(|w| *w == v).count();
        let seen_before = values[..i].contains(v);
        if count > best.0 && !seen_before {
            best = (count, *v);
        }
    }
    best.1
}

/// `n - 1` denominator; fewer than two samples give 0.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Bare numbers first; a bracketed or parenthesized list only when the text
/// has none.
fn extract(p: &Patterns, text: &str) -> Result<Vec<f64>, String> {
    let bare: Vec<f64> = p
        .number
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    if !bare.is_empty() {
        return Ok(bare);
    }
    let list = if text.contains('[') || text.contains(']') {
        p.bracket.captures(text)
    } else if text.contains('(') || text.contains(')') {
        p.paren.captures(text)
    } else {
        None
    };
    match list.and_then(|c| c.get(1)) {
        Some(inner) => inner
            .as_str()
            .split(',')
            .map(|item| {
                let item = item.trim();
                item.parse::<f64>()
                    .map_err(|_| format!("could not convert '{item}' to a number"))
            })
            .collect(),
        None => Ok(Vec::new()),
    }
}

pub fn solve(req: &Request<'_>) -> ResultEnvelope {
    let text = req.normalized;
    let mut trace = StepTrace::new();
    trace.push(
        format!("Statistical operation: {text}"),
        "Processing statistical calculation",
    );

    let extracted = match PATTERNS.as_ref() {
        Some(p) => extract(p, text),
        None => Err("number patterns unavailable".to_string()),
    };
    let numbers = match extracted {
        Ok(n) => n,
        Err(e) => return failure(req, trace, &e),
    };
    if numbers.is_empty() {
        let mut trace = trace;
        trace.push("No numbers found", "Could not extract numbers from input");
        return req
            .builder(ProblemType::StatisticsError)
            .solution("No valid numbers found for statistical calculation")
            .error("no numbers found")
            .trace(trace)
            .build();
    }

    let measure = Measure::from_text(text);
    let result = measure.compute(&numbers);
    let shown = format_number(result);
    let listed = format_list(&numbers);
    match measure {
        Measure::Mean => {
            trace.push(format!("Numbers: {listed}"), "List of numbers to calculate mean");
            trace.push(
                format!(
                    "Mean = sum / count = {} / {} = {shown}",
                    format_number(numbers.iter().sum()),
                    numbers.len()
                ),
                "Mean is the average value",
            );
        }
        Measure::Median => {
            let mut sorted = numbers.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));
            trace.push(
                format!("Sorted numbers: {}", format_list(&sorted)),
                "Numbers sorted in ascending order",
            );
            trace.push(format!("Median = {shown}"), "Median is the middle value");
        }
        Measure::Mode => {
            trace.push(format!("Numbers: {listed}"), "List of numbers to find mode");
            trace.push(
                format!("Mode = {shown}"),
                "Mode is the most frequently occurring value",
            );
        }
        Measure::StdDev => {
            trace.push(
                format!("Numbers: {listed}"),
                "List of numbers to calculate standard deviation",
            );
            trace.push(
                format!("Standard Deviation = {shown}"),
                "Standard deviation measures spread of values",
            );
        }
        Measure::Variance => {
            trace.push(
                format!("Numbers: {listed}"),
                "List of numbers to calculate variance",
            );
            trace.push(
                format!("Variance = {shown}"),
                "Variance measures squared spread of values",
            );
        }
        Measure::DefaultMean => {
            trace.push(
                "Default operation: Mean",
                "No specific statistical operation specified, calculating mean",
            );
            trace.push(format!("Result = {shown}"), "Calculated mean value");
        }
    }

    req.builder(req.tag)
        .solution(shown)
        .trace(trace)
        .build()
}

fn failure(req: &Request<'_>, mut trace: StepTrace, message: &str) -> ResultEnvelope {
    warn!(error = message, "statistics failed");
    trace.push(format!("Error: {message}"), "Statistical operation failed");
    req.builder(ProblemType::StatisticsError)
        .solution(format!("Error in statistical calculation: {message}"))
        .error(message)
        .trace(trace)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::{normalize, Solution};
    use mathwise_engine::LocalEngine;

    fn stats(raw: &str, want_steps: bool) -> ResultEnvelope {
        let engine = LocalEngine::new();
        let normalized = normalize(raw);
        let req = Request {
            engine: &engine,
            raw,
            normalized: &normalized,
            tag: ProblemType::StatisticalCalculation,
            want_steps,
        };
        solve(&req)
    }

    #[test]
    fn test_mean_of_list() {
        let env = stats("mean of [2, 4, 6]", true);
        assert_eq!(env.solution, Solution::Text("4".into()));
        assert_eq!(env.problem_type, ProblemType::StatisticalCalculation);
        assert!(env.steps.iter().any(|s| s == "Numbers: [2, 4, 6]"));
        assert!(env.steps.iter().any(|s| s == "Mean = sum / count = 12 / 3 = 4"));
    }

    #[test]
    fn test_measures() {
        let v = [1.0, 2.0, 2.0, 3.0, 7.0];
        assert_eq!(Measure::Median.compute(&v), 2.0);
        assert_eq!(Measure::Mode.compute(&v), 2.0);
        assert_eq!(Measure::Variance.compute(&[2.0, 4.0, 6.0]), 4.0);
        assert_eq!(Measure::StdDev.compute(&[2.0, 4.0, 6.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_single_sample_spread_is_zero() {
        assert_eq!(Measure::StdDev.compute(&[5.0]), 0.0);
        let env = stats("variance of 5", false);
        assert_eq!(env.solution, Solution::Text("0".into()));
    }

    #[test]
    fn test_keyword_dispatch() {
        assert_eq!(Measure::from_text("average 1 2"), Measure::Mean);
        assert_eq!(Measure::from_text("std 1 2"), Measure::StdDev);
        assert_eq!(Measure::from_text("statistic 1 2"), Measure::DefaultMean);
        // "mode" is matched before "standard deviation"
        assert_eq!(
            Measure::from_text("standard deviation mode 1 2"),
            Measure::Mode
        );
    }

    #[test]
    fn test_no_numbers() {
        let env = stats("median of nothing", true);
        assert_eq!(env.problem_type, ProblemType::StatisticsError);
        assert_eq!(
            env.solution,
            Solution::Text("No valid numbers found for statistical calculation".into())
        );
        assert_eq!(env.steps.last().map(String::as_str), Some("No numbers found"));
    }

    #[test]
    fn test_bad_bracket_list() {
        let env = stats("mean of [a, b]", false);
        assert_eq!(env.problem_type, ProblemType::StatisticsError);
        assert!(env.error.is_some());
    }
}
