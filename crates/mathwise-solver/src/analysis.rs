//! Function analysis for graphing front ends.

use mathwise_core::numfmt::{format_number, format_significant};
use mathwise_core::{combine, normalize, DetailedStep, Expr, MathResult, StepTrace};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::router::Router;
use crate::strategies::pick_variable;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionAnalysis {
    pub expression: String,
    pub derivative: String,
    pub critical_points: Vec<String>,
    pub y_intercept: String,
    pub x_intercepts: Vec<String>,
    pub steps: Vec<String>,
    pub explanations: Vec<String>,
    pub detailed_steps: Vec<DetailedStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn format_point(value: f64) -> String {
    if value.fract() == 0.0 {
        format_number(value)
    } else {
        format_significant(value, 5)
    }
}

fn format_points(values: &[f64]) -> Vec<String> {
    values.iter().copied().map(format_point).collect()
}

impl Router {
    /// Derivative, critical points and intercepts of a single-variable
    /// function. Failures are reported in the `error` field.
    pub fn analyze(&self, input: &str) -> FunctionAnalysis {
        let mut trace = StepTrace::new();
        match self.run_analysis(input, &mut trace) {
            Ok(mut analysis) => {
                let (steps, explanations) = trace.into_parts();
                analysis.detailed_steps = combine(&steps, &explanations);
                analysis.steps = steps;
                analysis.explanations = explanations;
                analysis
            }
            Err(e) => {
                warn!(error = %e, "function analysis failed");
                let steps = vec![format!("Error: {e}")];
                FunctionAnalysis {
                    expression: input.to_string(),
                    detailed_steps: combine(&steps, &[]),
                    steps,
                    error: Some(e.to_string()),
                    ..FunctionAnalysis::default()
                }
            }
        }
    }

    fn run_analysis(&self, input: &str, trace: &mut StepTrace) -> MathResult<FunctionAnalysis> {
        let engine = self.engine();
        let expr = engine.parse(&normalize(input))?;
        let vars = engine.free_variables(&expr);
        let var = pick_variable(&vars).unwrap_or("x").to_string();
        let shown = engine.render(&expr);

        trace.push(
            format!("Analyzing function: f({var}) = {shown}"),
            "Starting function analysis",
        );
        trace.push(
            "Determining domain...",
            format!("Finding all valid {var} values where the function is defined"),
        );

        let derivative = engine.differentiate(&expr, &var)?;
        let derivative = engine.simplify(&derivative).unwrap_or(derivative);
        let critical = engine.solve_for_roots(&derivative, &var).unwrap_or_default();
        let critical_points = format_points(&critical);
        if !critical_points.is_empty() {
            trace.push(
                format!(
                    "Critical points (f'({var}) = 0): [{}]",
                    critical_points.join(", ")
                ),
                "Finding points where the slope is zero (potential max/min)",
            );
        }

        let y_intercept = self.value_at_zero(&expr, &var);
        trace.push(
            format!("Y-intercept: (0, {y_intercept})"),
            format!("Finding where the function crosses the y-axis (when {var}=0)"),
        );

        let x_intercepts = match engine.solve_for_roots(&expr, &var) {
            Ok(roots) => {
                let roots = format_points(&roots);
                if !roots.is_empty() {
                    trace.push(
                        format!("X-intercepts (roots): [{}]", roots.join(", ")),
                        "Finding where the function crosses the x-axis (when f(x)=0)",
                    );
                }
                roots
            }
            Err(_) => {
                trace.push_step("X-intercepts: Could not determine analytically");
                Vec::new()
            }
        };

        Ok(FunctionAnalysis {
            expression: shown,
            derivative: engine.render(&derivative),
            critical_points,
            y_intercept,
            x_intercepts,
            ..FunctionAnalysis::default()
        })
    }

    fn value_at_zero(&self, expr: &Expr, var: &str) -> String {
        let engine = self.engine();
        let at_zero = match engine.substitute(expr, var, &Expr::zero()) {
            Ok(e) => e,
            Err(_) => return "undefined".into(),
        };
        if !engine.free_variables(&at_zero).is_empty() {
            return engine.render(&at_zero);
        }
        match engine.numeric_evaluate(&at_zero) {
            Ok(v) if v.is_finite() => format_point(v),
            _ => "undefined".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_quadratic() {
        let a = Router::default().analyze("x^2 - 4");
        assert_eq!(a.derivative, "2*x");
        assert_eq!(a.critical_points, vec!["0"]);
        assert_eq!(a.y_intercept, "-4");
        assert_eq!(a.x_intercepts, vec!["2", "-2"]);
        assert_eq!(a.steps[0], "Analyzing function: f(x) = x**2 - 4");
        assert_eq!(a.steps.len(), a.detailed_steps.len());
        assert!(a.error.is_none());
    }

    #[test]
    fn test_analyze_line_has_no_critical_points() {
        let a = Router::default().analyze("2x + 1");
        assert!(a.critical_points.is_empty());
        assert_eq!(a.y_intercept, "1");
        assert_eq!(a.x_intercepts, vec!["-0.50000"]);
        assert!(!a.steps.iter().any(|s| s.starts_with("Critical points")));
    }

    #[test]
    fn test_analyze_parse_error() {
        let a = Router::default().analyze("x + * 2");
        assert!(a.error.is_some());
        assert_eq!(a.expression, "x + * 2");
        assert_eq!(a.detailed_steps.len(), 1);
        assert_eq!(a.detailed_steps[0].explanation, "");
    }

    #[test]
    fn test_analysis_json_omits_missing_error() {
        let a = Router::default().analyze("x^2 - 4");
        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["x_intercepts"][0], "2");
    }
}
