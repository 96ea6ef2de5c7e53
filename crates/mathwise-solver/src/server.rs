use std::io::{self, BufRead, Write};

use mathwise_core::wants_steps;
use tracing::{debug, error};

use crate::protocol::{SolveRequest, SolveResponse};
use crate::router::Router;

#[derive(Debug, Clone, Copy, Default)]
pub struct ServerOptions {
    /// Infer `steps` from the input wording when a request omits it.
    pub steps_by_keyword: bool,
}

/// Serve JSON-lines requests on stdio. Blocks until stdin is closed.
pub fn run_server(router: &Router, options: ServerOptions) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(router, options, stdin.lock(), stdout.lock())
}

/// One response line per non-blank request line, in order.
pub fn serve<R: BufRead, W: Write>(
    router: &Router,
    options: ServerOptions,
    input: R,
    mut output: W,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: SolveRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                error!("invalid request line: {e}");
                write_response(&mut output, &SolveResponse::rejected(format!("parse error: {e}")))?;
                continue;
            }
        };

        let response = handle(router, options, request);
        write_response(&mut output, &response)?;
    }

    Ok(())
}

fn handle(router: &Router, options: ServerOptions, request: SolveRequest) -> SolveResponse {
    let input = match request.input.as_deref().map(str::trim) {
        Some("") => return SolveResponse::rejected("Input cannot be empty"),
        Some(text) => text,
        None => return SolveResponse::rejected("Missing required field: input"),
    };
    let want_steps = request
        .steps
        .unwrap_or_else(|| options.steps_by_keyword && wants_steps(input));
    debug!(want_steps, "solve request");
    router.solve(input, want_steps).into()
}

fn write_response<W: Write>(output: &mut W, resp: &SolveResponse) -> anyhow::Result<()> {
    let json = serde_json::to_string(resp)?;
    writeln!(output, "{json}")?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn run(options: ServerOptions, input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        serve(&Router::default(), options, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_one_response_per_request() {
        let lines = run(
            ServerOptions::default(),
            "{\"input\": \"25% of 80\"}\n\n{\"input\": \"x^2 - 4 = 0\", \"steps\": true}\n",
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["solution"], "20.0000000000000");
        assert_eq!(lines[0]["steps"], serde_json::json!([]));
        assert_eq!(lines[1]["problem_type"], "Algebraic Equation");
        assert_eq!(lines[1]["solution"][0], "2.0000");
        assert!(!lines[1]["steps"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_bad_requests_get_error_objects() {
        let lines = run(
            ServerOptions::default(),
            "not json\n{\"input\": \"   \"}\n{\"steps\": true}\n",
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[0]["error"].as_str().unwrap().starts_with("parse error"));
        assert_eq!(lines[1]["error"], "Input cannot be empty");
        assert_eq!(lines[2]["error"], "Missing required field: input");
    }

    #[test]
    fn test_step_keywords_when_enabled() {
        let req = "{\"input\": \"solve x + 1 = 3 step by step\"}\n";
        let off = run(ServerOptions::default(), req);
        assert_eq!(off[0]["steps"], serde_json::json!([]));
        let on = run(ServerOptions { steps_by_keyword: true }, req);
        assert!(!on[0]["steps"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_explicit_flag_beats_keywords() {
        let req = "{\"input\": \"show work for 2 + 2\", \"steps\": false}\n";
        let lines = run(ServerOptions { steps_by_keyword: true }, req);
        assert_eq!(lines[0]["steps"], serde_json::json!([]));
    }
}
