use serde::{Deserialize, Serialize};
use serde_json::Value;

// JSON-RPC envelope for MCP tools/call
#[derive(Debug, Serialize)]
pub struct McpRequest<'a> {
    pub jsonrpc: &'a str,
    pub id: u64,
    pub method: &'a str,
    pub params: McpParams<'a>,
}

#[derive(Debug, Serialize)]
pub struct McpParams<'a> {
    pub name: &'a str,
    pub arguments: &'a Value,
}

#[derive(Debug, Deserialize)]
pub struct McpResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}
