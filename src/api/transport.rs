use crate::api::endpoints::{JSONRPC_VERSION, TOOLS_CALL_METHOD, USER_AGENT};
use crate::api::models::{McpParams, McpRequest, McpResponse};
use crate::error::AppError;
use chrono::Utc;
use serde_json::Value;
use std::error::Error as _;
use std::io;
use std::time::Duration;
use tracing::debug;

/// The one remote primitive the engine depends on: invoke a named function
/// with a parameter object and get a JSON payload back.
pub trait RemoteTransport {
    fn invoke(&self, function: &str, params: &Value, timeout: Duration) -> Result<Value, AppError>;
}

/// OP.GG MCP endpoint over JSON-RPC.
pub struct McpTransport {
    url: String,
    agent: ureq::Agent,
}

impl McpTransport {
    pub fn new(url: &str) -> Self {
        McpTransport {
            url: url.to_string(),
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
        }
    }

    fn request_id() -> u64 {
        Utc::now()
            .timestamp_nanos_opt()
            .map(|n| n as u64)
            .unwrap_or_default()
    }
}

impl RemoteTransport for McpTransport {
    fn invoke(&self, function: &str, params: &Value, timeout: Duration) -> Result<Value, AppError> {
        let request = McpRequest {
            jsonrpc: JSONRPC_VERSION,
            id: Self::request_id(),
            method: TOOLS_CALL_METHOD,
            params: McpParams {
                name: function,
                arguments: params,
            },
        };

        debug!(function, %params, "calling OP.GG MCP");

        let response = self
            .agent
            .post(&self.url)
            .timeout(timeout)
            .set("Content-Type", "application/json")
            .send_json(&request)
            .map_err(|e| map_ureq_error(function, e))?;

        let envelope: McpResponse = response.into_json().map_err(|e| {
            if is_timeout(&e) {
                AppError::Timeout(function.to_string())
            } else {
                AppError::Malformed(format!("{}: {}", function, e))
            }
        })?;

        match (envelope.error, envelope.result) {
            (Some(error), _) => Err(AppError::TransportFailure(format!(
                "{} returned error: {}",
                function, error
            ))),
            (None, Some(result)) => match tool_error(&result) {
                Some(message) => Err(AppError::TransportFailure(format!("{}: {}", function, message))),
                None => Ok(result),
            },
            (None, None) => Err(AppError::Malformed(format!(
                "{}: no result or error in response",
                function
            ))),
        }
    }
}

/// Text of an MCP tool result flagged with `isError`, e.g. rate limiting
/// or rejected arguments.
pub fn tool_error(result: &Value) -> Option<String> {
    if !result.get("isError").and_then(Value::as_bool).unwrap_or(false) {
        return None;
    }

    let text: Vec<&str> = result
        .get("content")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|i| i.get("text").and_then(Value::as_str)).collect())
        .unwrap_or_default();

    if text.is_empty() {
        Some("tool reported an error".to_string())
    } else {
        Some(text.join(" "))
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

fn map_ureq_error(function: &str, e: ureq::Error) -> AppError {
    match e {
        ureq::Error::Status(code, _) => {
            AppError::TransportFailure(format!("{} returned HTTP {}", function, code))
        }
        ureq::Error::Transport(t) => {
            let timed_out = t
                .source()
                .and_then(|s| s.downcast_ref::<io::Error>())
                .map(is_timeout)
                .unwrap_or(false);

            if timed_out {
                AppError::Timeout(function.to_string())
            } else {
                AppError::TransportFailure(format!("{}: {}", function, t))
            }
        }
    }
}
