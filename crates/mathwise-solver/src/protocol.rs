use mathwise_core::ResultEnvelope;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request line
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    #[serde(default)]
    pub input: Option<String>,
    /// Explicit step request. When absent the server may fall back to
    /// keyword detection on the input.
    #[serde(default)]
    pub steps: Option<bool>,
}

// ---------------------------------------------------------------------------
// Response line
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SolveResponse {
    Solved(Box<ResultEnvelope>),
    Rejected { error: String },
}

impl SolveResponse {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            error: message.into(),
        }
    }
}

impl From<ResultEnvelope> for SolveResponse {
    fn from(env: ResultEnvelope) -> Self {
        Self::Solved(Box::new(env))
    }
}
