//! Remote-first solving for hybrid mode.

use mathwise_core::{
    EnvelopeBuilder, ProblemType, RemoteEngine, RemoteOperation, ResultEnvelope, Source,
    StepTrace,
};
use tracing::debug;

use crate::strategies::strip_operation_words;

/// Offer `normalized` to the remote service. `None` means the caller should
/// solve locally: the service failed, or a simplification came back unchanged.
pub fn solve(
    remote: &dyn RemoteEngine,
    normalized: &str,
    tag: ProblemType,
    want_steps: bool,
) -> Option<ResultEnvelope> {
    let op = RemoteOperation::from_input(normalized);
    let expression = match op {
        RemoteOperation::Derive | RemoteOperation::Integrate | RemoteOperation::Factor => {
            strip_operation_words(normalized)
        }
        _ => normalized.to_string(),
    };
    let prepared = op.prepare(&expression);
    debug!(%op, expression = %prepared, "offering request to remote service");

    let result = remote.request(op, &prepared)?;

    let mut trace = StepTrace::new();
    trace.push(
        format!("Original: {normalized}"),
        "Starting with the given expression",
    );
    match op {
        RemoteOperation::Derive => trace.push(
            format!("Derivative: {result}"),
            "Found the derivative using differentiation rules",
        ),
        RemoteOperation::Integrate => trace.push(
            format!("Integral: {result}"),
            "Found the integral using integration rules",
        ),
        RemoteOperation::Factor => trace.push(
            format!("Factored: {result}"),
            "Factored the expression into simpler components",
        ),
        RemoteOperation::Solve => trace.push(
            format!("Solution: {result}"),
            "Solved the equation by finding values that satisfy it",
        ),
        RemoteOperation::Simplify => {
            if result == expression {
                return None;
            }
            trace.push(
                format!("Simplified: {result}"),
                "Simplified by combining like terms and reducing",
            )
        }
        other => trace.push(
            format!("Result: {result}"),
            format!("Evaluated with the {other} operation"),
        ),
    }

    Some(
        EnvelopeBuilder::new(tag, want_steps)
            .solution(result)
            .trace(trace)
            .source(Source::Remote)
            .build(),
    )
}
