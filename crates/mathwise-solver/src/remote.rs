//! Blocking client for the Newton simplification service.

use std::time::Duration;

use mathwise_core::{RemoteEngine, RemoteOperation};
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://newton.now.sh/api/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct NewtonClient {
    agent: ureq::Agent,
    base_url: String,
}

impl Default for NewtonClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl NewtonClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, op: RemoteOperation, expression: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            op.path(),
            encode_component(expression)
        )
    }
}

impl RemoteEngine for NewtonClient {
    fn request(&self, op: RemoteOperation, expression: &str) -> Option<String> {
        let url = self.url_for(op, expression);
        debug!(%url, "remote request");

        let response = match self.agent.get(&url).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(status, _)) => {
                warn!(status, %op, "remote service returned an error status");
                return None;
            }
            Err(e) => {
                warn!(error = %e, %op, "remote service unreachable");
                return None;
            }
        };

        let body: Value = match response.into_json() {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, %op, "remote service sent malformed JSON");
                return None;
            }
        };
        extract_result(&body)
    }
}

/// The `result` field as text. Absent, null, or the service's own
/// "no answer" markers count as no result.
fn extract_result(body: &Value) -> Option<String> {
    let text = match body.get("result")? {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match text.trim() {
        "" | "None" | "[None]" => None,
        _ => Some(text),
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("x^2+2x"), "x%5E2%2B2x");
        assert_eq!(encode_component("(x - 1)/2"), "%28x%20-%201%29%2F2");
        assert_eq!(encode_component("abc_1.~"), "abc_1.~");
        assert_eq!(encode_component("π"), "%CF%80");
    }

    #[test]
    fn test_url_layout() {
        let client = NewtonClient::new("http://localhost:9/api/v2/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://localhost:9/api/v2");
        assert_eq!(
            client.url_for(RemoteOperation::Solve, "(x^2)-(4)"),
            "http://localhost:9/api/v2/zeroes/%28x%5E2%29-%284%29"
        );
        assert_eq!(
            client.url_for(RemoteOperation::Derive, "x^3"),
            "http://localhost:9/api/v2/derive/x%5E3"
        );
    }

    #[test]
    fn test_extract_result() {
        assert_eq!(extract_result(&json!({"result": "2 x"})).as_deref(), Some("2 x"));
        assert_eq!(extract_result(&json!({"result": [-2, 2]})).as_deref(), Some("[-2,2]"));
        assert_eq!(extract_result(&json!({"result": "None"})), None);
        assert_eq!(extract_result(&json!({"result": null})), None);
        assert_eq!(extract_result(&json!({"operation": "derive"})), None);
    }

    #[test]
    fn test_unreachable_service_gives_none() {
        // port 9 (discard) is closed on test machines
        let client = NewtonClient::new("http://127.0.0.1:9", Duration::from_millis(200));
        assert_eq!(client.request(RemoteOperation::Simplify, "x + x"), None);
    }
}
