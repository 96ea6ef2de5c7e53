use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of problem categories. Assigned once per request and never
/// changed afterwards; it decides which result shape and wording are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemType {
    #[serde(rename = "Equation")]
    Equation,
    #[serde(rename = "Algebraic Equation")]
    AlgebraicEquation,
    #[serde(rename = "Trigonometric Equation")]
    TrigonometricEquation,
    #[serde(rename = "Calculus Equation")]
    CalculusEquation,
    #[serde(rename = "Numerical Equation")]
    NumericalEquation,
    #[serde(rename = "Algebraic Expression")]
    AlgebraicExpression,
    #[serde(rename = "Arithmetic")]
    Arithmetic,
    #[serde(rename = "Arithmetic Expression")]
    ArithmeticExpression,
    #[serde(rename = "Derivative")]
    Derivative,
    #[serde(rename = "Integral")]
    Integral,
    #[serde(rename = "Factoring")]
    Factoring,
    #[serde(rename = "Trigonometric Expression")]
    TrigonometricExpression,
    #[serde(rename = "Statistical Calculation")]
    StatisticalCalculation,
    #[serde(rename = "Matrix Operation")]
    MatrixOperation,
    #[serde(rename = "Complex Number Operation")]
    ComplexNumberOperation,
    #[serde(rename = "Story Problem")]
    StoryProblem,
    #[serde(rename = "General Question")]
    GeneralQuestion,
    #[serde(rename = "Math Error")]
    MathError,
    #[serde(rename = "Statistics Error")]
    StatisticsError,
    #[serde(rename = "Matrix Error")]
    MatrixError,
    #[serde(rename = "Complex Number Error")]
    ComplexNumberError,
}

impl ProblemType {
    pub const ALL: [ProblemType; 21] = [
        Self::Equation,
        Self::AlgebraicEquation,
        Self::TrigonometricEquation,
        Self::CalculusEquation,
        Self::NumericalEquation,
        Self::AlgebraicExpression,
        Self::Arithmetic,
        Self::ArithmeticExpression,
        Self::Derivative,
        Self::Integral,
        Self::Factoring,
        Self::TrigonometricExpression,
        Self::StatisticalCalculation,
        Self::MatrixOperation,
        Self::ComplexNumberOperation,
        Self::StoryProblem,
        Self::GeneralQuestion,
        Self::MathError,
        Self::StatisticsError,
        Self::MatrixError,
        Self::ComplexNumberError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equation => "Equation",
            Self::AlgebraicEquation => "Algebraic Equation",
            Self::TrigonometricEquation => "Trigonometric Equation",
            Self::CalculusEquation => "Calculus Equation",
            Self::NumericalEquation => "Numerical Equation",
            Self::AlgebraicExpression => "Algebraic Expression",
            Self::Arithmetic => "Arithmetic",
            Self::ArithmeticExpression => "Arithmetic Expression",
            Self::Derivative => "Derivative",
            Self::Integral => "Integral",
            Self::Factoring => "Factoring",
            Self::TrigonometricExpression => "Trigonometric Expression",
            Self::StatisticalCalculation => "Statistical Calculation",
            Self::MatrixOperation => "Matrix Operation",
            Self::ComplexNumberOperation => "Complex Number Operation",
            Self::StoryProblem => "Story Problem",
            Self::GeneralQuestion => "General Question",
            Self::MathError => "Math Error",
            Self::StatisticsError => "Statistics Error",
            Self::MatrixError => "Matrix Error",
            Self::ComplexNumberError => "Complex Number Error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::MathError | Self::StatisticsError | Self::MatrixError | Self::ComplexNumberError
        )
    }

    pub fn is_equation(&self) -> bool {
        matches!(
            self,
            Self::Equation
                | Self::AlgebraicEquation
                | Self::TrigonometricEquation
                | Self::CalculusEquation
                | Self::NumericalEquation
        )
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProblemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid problem type: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_display_string() {
        for t in ProblemType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "story problem".parse::<ProblemType>().unwrap(),
            ProblemType::StoryProblem
        );
        assert!("Quantum Question".parse::<ProblemType>().is_err());
    }

    #[test]
    fn test_error_variants() {
        assert!(ProblemType::StatisticsError.is_error());
        assert!(!ProblemType::StatisticalCalculation.is_error());
        assert!(ProblemType::NumericalEquation.is_equation());
    }
}
