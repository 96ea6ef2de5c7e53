//! Word problems. The arithmetic is a narrow heuristic keyed on the order of
//! the numbers in the text: the first is the starting amount, the second the
//! amount given away and the third an adjustment.

use std::sync::LazyLock;

use mathwise_core::numfmt::format_number;
use mathwise_core::{ResultEnvelope, StepTrace};
use regex::Regex;

use super::{format_list, Request};

static NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").ok());

pub fn numbers(text: &str) -> Vec<f64> {
    match NUMBER.as_ref() {
        Some(re) => re
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect(),
        None => Vec::new(),
    }
}

/// Hints shown in the explanation only; they never change the result.
pub fn operation_hints(lower: &str) -> Vec<&'static str> {
    let mut ops = Vec::new();
    if lower.contains("gives") || lower.contains("gave") {
        ops.push("subtraction");
    }
    if lower.contains("gets") || lower.contains("got") || lower.contains("receives") {
        ops.push("addition");
    }
    if lower.contains("times") || lower.contains("twice") || lower.contains("double") {
        ops.push("multiplication");
    }
    if lower.contains("per") || lower.contains("each") {
        ops.push("multiplication or division");
    }
    ops
}

/// The computed answer and the step line describing it.
fn calculate(lower: &str, nums: &[f64]) -> (f64, String, &'static str) {
    let n = format_number;
    let gives = lower.contains("gives") || lower.contains("gave");
    if nums.len() >= 3 && gives {
        let (initial, given, third) = (nums[0], nums[1], nums[2]);
        if lower.contains("twice") {
            let result = initial - given + 2.0 * given;
            let line = format!(
                "Calculation: {} - {} + (2 × {}) = {} + {} = {}",
                n(initial),
                n(given),
                n(given),
                n(initial - given),
                n(2.0 * given),
                n(result)
            );
            (
                result,
                line,
                "Started with initial amount, subtracted given amount, then added twice the given amount",
            )
        } else if lower.contains("times") && lower.contains("as") {
            let result = initial - given + third * given;
            let line = format!(
                "Calculation: {} - {} + ({} × {}) = {}",
                n(initial),
                n(given),
                n(third),
                n(given),
                n(result)
            );
            (
                result,
                line,
                "Started with initial amount, subtracted given amount, then added a multiple of the given amount",
            )
        } else {
            let result = initial - given + third;
            let line = format!(
                "Calculation: {} - {} + {} = {}",
                n(initial),
                n(given),
                n(third),
                n(result)
            );
            (result, line, "Basic calculation based on story elements")
        }
    } else if nums.len() >= 3 {
        let result: f64 = nums.iter().sum();
        (
            result,
            format!("Sum of identified numbers: {}", n(result)),
            "Calculated sum of all identified numbers",
        )
    } else {
        let result: f64 = nums.iter().sum();
        (
            result,
            format!("Calculated result: {}", n(result)),
            "Used available numbers to calculate result",
        )
    }
}

/// Runs on the raw text; the normalizer mangles story phrasing.
pub fn solve(req: &Request<'_>) -> ResultEnvelope {
    let raw = req.raw;
    let lower = raw.to_lowercase();
    let nums = numbers(raw);
    let ops = operation_hints(&lower);

    let mut trace = StepTrace::new();
    trace.push(
        format!("Story Problem: {raw}"),
        "Understanding the problem with 3-layer reasoning process.",
    );
    trace.push(
        "Layer 1: Natural Language Understanding",
        "Carefully reading the entire question and identifying key elements.",
    );
    let listed = format_list(&nums);
    trace.push(
        format!("  Numbers identified: {listed}"),
        format!("Identified numbers in the problem: {listed}"),
    );
    let hinted = format!("[{}]", ops.join(", "));
    trace.push(
        format!("  Operations identified: {hinted}"),
        format!("Detected mathematical operations: {hinted}"),
    );
    trace.push(
        "Layer 2: Mathematical Interpretation",
        "Converting the understood text into structured mathematical logic.",
    );
    trace.push(
        "Layer 3: Step-by-step Reasoning & Solution",
        "Solving the problem step by step with clear explanations.",
    );
    let verb = if lower.contains("how many") { "find" } else { "calculate" };
    trace.push(
        format!("Solving: {verb} the final quantity"),
        "Based on the story, solving for the requested quantity",
    );

    let (result, line, explanation) = calculate(&lower, &nums);
    trace.push(line, explanation);

    req.builder(req.tag)
        .solution(format_number(result))
        .trace(trace)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::{ProblemType, Solution};
    use mathwise_engine::LocalEngine;

    fn story(raw: &str, want_steps: bool) -> ResultEnvelope {
        let engine = LocalEngine::new();
        let req = Request {
            engine: &engine,
            raw,
            normalized: raw,
            tag: ProblemType::StoryProblem,
            want_steps,
        };
        solve(&req)
    }

    #[test]
    fn test_twice_story() {
        let raw = "John has 50 apples, gives 15 away, then gets twice that amount";
        // "twice" is a word, not a digit, so only two numbers are extracted
        assert_eq!(numbers(raw), vec![50.0, 15.0]);
        let env = story(raw, true);
        assert_eq!(env.solution, Solution::Text("65".into()));
        assert_eq!(env.problem_type, ProblemType::StoryProblem);
        assert!(env.steps.iter().any(|s| s == "  Numbers identified: [50, 15]"));
        assert!(env
            .steps
            .iter()
            .any(|s| s == "  Operations identified: [subtraction, addition, multiplication]"));
    }

    #[test]
    fn test_three_numbers_with_twice() {
        let lower = "amy has 50 books, gives 15 to 2 friends, then gets twice that";
        let (result, line, _) = calculate(lower, &numbers(lower));
        assert_eq!(result, 65.0);
        assert_eq!(line, "Calculation: 50 - 15 + (2 × 15) = 35 + 30 = 65");
    }

    #[test]
    fn test_times_as_uses_third_number() {
        let lower = "sam has 40 cars, gives 10 away, then gets 3 times as many";
        let (result, _, _) = calculate(lower, &numbers(lower));
        assert_eq!(result, 40.0 - 10.0 + 30.0);
    }

    #[test]
    fn test_bare_third_number() {
        let lower = "kim had 20 dollars, gave 5 to a friend and found 7 more";
        let (result, _, _) = calculate(lower, &numbers(lower));
        assert_eq!(result, 22.0);
    }

    #[test]
    fn test_sums_without_give() {
        let lower = "each student bought 3 books and 4 pens and 5 pencils";
        assert_eq!(calculate(lower, &numbers(lower)).0, 12.0);
        assert_eq!(calculate("no numbers at all", &[]).0, 0.0);
    }

    #[test]
    fn test_steps_hidden_when_not_requested() {
        let env = story("John has 50 apples, gives 15 away, then gets twice that amount", false);
        assert!(env.steps.is_empty());
        assert!(env.detailed_steps.is_empty());
    }
}
