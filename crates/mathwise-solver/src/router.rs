use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use mathwise_core::{
    classify, normalize, ProblemType, RemoteEngine, ResultEnvelope, SymbolicEngine,
};
use mathwise_engine::LocalEngine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hybrid;
use crate::strategies::calculus::Operation;
use crate::strategies::{
    algebraic, arithmetic, calculus, complex, equation, general, math_error, matrix, statistics,
    story, Request,
};

/// Which engines a router may use. Chosen once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverMode {
    #[default]
    Local,
    /// Offer symbolic requests to the remote service first.
    Hybrid,
}

impl fmt::Display for SolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Hybrid => f.write_str("hybrid"),
        }
    }
}

impl FromStr for SolverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(format!("invalid solver mode: {s} (expected local or hybrid)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Matrix,
    Complex,
    Story,
    Statistics,
    General,
    Equation,
    Calculus(Operation),
    Factoring,
    Expression,
}

impl Strategy {
    pub fn for_tag(tag: ProblemType) -> Self {
        match tag {
            ProblemType::MatrixOperation | ProblemType::MatrixError => Self::Matrix,
            ProblemType::ComplexNumberOperation | ProblemType::ComplexNumberError => Self::Complex,
            ProblemType::StoryProblem => Self::Story,
            ProblemType::StatisticalCalculation | ProblemType::StatisticsError => Self::Statistics,
            ProblemType::GeneralQuestion => Self::General,
            ProblemType::Equation
            | ProblemType::AlgebraicEquation
            | ProblemType::TrigonometricEquation
            | ProblemType::CalculusEquation
            | ProblemType::NumericalEquation => Self::Equation,
            ProblemType::Derivative => Self::Calculus(Operation::Derivative),
            ProblemType::Integral => Self::Calculus(Operation::Integral),
            ProblemType::Factoring => Self::Factoring,
            ProblemType::TrigonometricExpression
            | ProblemType::AlgebraicExpression
            | ProblemType::Arithmetic
            | ProblemType::ArithmeticExpression
            | ProblemType::MathError => Self::Expression,
        }
    }

    /// Strategies whose work the remote service can do in hybrid mode.
    pub fn offered_to_remote(&self) -> bool {
        matches!(
            self,
            Self::Equation | Self::Calculus(_) | Self::Factoring | Self::Expression
        )
    }

    fn run(&self, req: &Request<'_>) -> ResultEnvelope {
        match self {
            Self::Matrix => matrix::solve(req),
            Self::Complex => complex::solve(req),
            Self::Story => story::solve(req),
            Self::Statistics => statistics::solve(req),
            Self::General => general::respond(req.raw),
            Self::Equation => equation::solve(req),
            Self::Calculus(op) => calculus::solve(req, *op),
            Self::Factoring => algebraic::factor_only(req),
            Self::Expression => solve_expression(req),
        }
    }
}

/// Parse, then hand off by whether the expression has free variables.
fn solve_expression(req: &Request<'_>) -> ResultEnvelope {
    let trace = req.opening_trace();
    match req.engine.parse(req.normalized) {
        Ok(expr) if req.engine.free_variables(&expr).is_empty() => {
            arithmetic::solve(req, trace, &expr)
        }
        Ok(expr) => algebraic::solve(req, trace, &expr),
        Err(e) => math_error(req, trace, &e),
    }
}

/// Entry point for one request: normalize, classify, dispatch.
pub struct Router {
    engine: Arc<dyn SymbolicEngine>,
    remote: Option<Arc<dyn RemoteEngine>>,
    mode: SolverMode,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Arc::new(LocalEngine::new()))
    }
}

impl Router {
    pub fn new(engine: Arc<dyn SymbolicEngine>) -> Self {
        Self {
            engine,
            remote: None,
            mode: SolverMode::Local,
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteEngine>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_mode(mut self, mode: SolverMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> SolverMode {
        self.mode
    }

    pub fn engine(&self) -> &dyn SymbolicEngine {
        self.engine.as_ref()
    }

    /// Never fails: every outcome, errors included, is an envelope.
    pub fn solve(&self, raw: &str, want_steps: bool) -> ResultEnvelope {
        let normalized = normalize(raw);
        let tag = classify(raw, &normalized);
        let strategy = Strategy::for_tag(tag);
        debug!(%tag, ?strategy, normalized = %normalized, "routed request");

        if self.mode == SolverMode::Hybrid && strategy.offered_to_remote() {
            if let Some(remote) = &self.remote {
                if let Some(env) = hybrid::solve(remote.as_ref(), &normalized, tag, want_steps) {
                    return env;
                }
                debug!("remote service gave no result, solving locally");
            }
        }

        let req = Request {
            engine: self.engine.as_ref(),
            raw,
            normalized: &normalized,
            tag,
            want_steps,
        };
        strategy.run(&req)
    }
}
