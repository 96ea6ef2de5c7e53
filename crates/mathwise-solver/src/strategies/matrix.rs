use mathwise_core::{ResultEnvelope, StepTrace};

use super::Request;

/// Placeholder. Recognizes the requested operation but computes nothing.
pub fn solve(req: &Request<'_>) -> ResultEnvelope {
    let text = req.normalized;
    let lower = text.to_lowercase();
    let mut trace = StepTrace::new();
    trace.push(
        format!("Matrix operation: {text}"),
        "Processing matrix operation",
    );

    let solution = if lower.contains("determinant") || lower.contains("det") {
        trace.push(
            "Calculating determinant of matrix",
            "Finding determinant using cofactor expansion",
        );
        "Matrix determinant calculation would be here"
    } else if lower.contains("inverse") {
        trace.push(
            "Finding inverse of matrix",
            "Using adjugate method to find inverse",
        );
        "Matrix inverse calculation would be here"
    } else {
        trace.push("Processing matrix operation", "Performing matrix computation");
        "Matrix operation result"
    };

    req.builder(req.tag).solution(solution).trace(trace).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::{ProblemType, Solution};
    use mathwise_engine::LocalEngine;

    fn matrix(text: &str) -> ResultEnvelope {
        let engine = LocalEngine::new();
        let req = Request {
            engine: &engine,
            raw: text,
            normalized: text,
            tag: ProblemType::MatrixOperation,
            want_steps: true,
        };
        solve(&req)
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            matrix("determinant of [[1,2],[3,4]]").solution,
            Solution::Text("Matrix determinant calculation would be here".into())
        );
        assert_eq!(
            matrix("inverse of matrix [[1,0],[0,1]]").solution,
            Solution::Text("Matrix inverse calculation would be here".into())
        );
        let env = matrix("transpose the vector");
        assert_eq!(env.solution, Solution::Text("Matrix operation result".into()));
        assert_eq!(env.problem_type, ProblemType::MatrixOperation);
        assert_eq!(env.steps.len(), 2);
    }
}
