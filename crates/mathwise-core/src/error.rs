use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("could not parse expression: {0}")]
    Parse(String),

    #[error("symbolic engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),
}

pub type MathResult<T> = Result<T, MathError>;
