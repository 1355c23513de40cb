//! Stateless MCP endpoint (JSON-RPC 2.0 over a single POST).
//!
//! Supports `initialize`, `ping`, `tools/list` and `tools/call` for the two
//! relay tools. Every request is answered independently; there is no session.
//! Notifications (messages without an `id`) are acknowledged with 202.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use webtoys_types::info::ServerInfo;

use crate::http::handlers::tools::{BuildAppParams, run_build_tool};
use crate::state::AppState;

/// Protocol revision reported when the client does not ask for one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-03-26";

/// Name advertised in `serverInfo`.
const MCP_SERVER_NAME: &str = "Webtoys Builder";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// POST /mcp
pub async fn handle(State(state): State<AppState>, body: Bytes) -> Response {
    let request: RpcRequest = match serde_json::from_slice::<Value>(&body) {
        Err(e) => return rpc_response(Value::Null, Err(RpcError::new(PARSE_ERROR, e.to_string()))),
        Ok(value) => match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return rpc_response(
                    Value::Null,
                    Err(RpcError::new(INVALID_REQUEST, e.to_string())),
                );
            }
        },
    };

    if request.jsonrpc != "2.0" {
        return rpc_response(
            request.id.unwrap_or(Value::Null),
            Err(RpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\"")),
        );
    }

    let Some(id) = request.id else {
        tracing::debug!(method = %request.method, "notification acknowledged");
        return StatusCode::ACCEPTED.into_response();
    };

    let outcome = match request.method.as_str() {
        "initialize" => Ok(initialize(request.params.as_ref())),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(list_tools()),
        "tools/call" => call_tool(&state, request.params).await,
        other => Err(RpcError::new(
            METHOD_NOT_FOUND,
            format!("method not found: {other}"),
        )),
    };

    rpc_response(id, outcome)
}

fn rpc_response(id: Value, outcome: Result<Value, RpcError>) -> Response {
    let body = match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
    };
    Json(body).into_response()
}

fn initialize(params: Option<&Value>) -> Value {
    let protocol_version = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": {
            "name": MCP_SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

fn list_tools() -> Value {
    json!({
        "tools": [
            {
                "name": "build_webtoys_app",
                "description": "Build a Webtoys app by describing what you want",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "description": { "type": "string" },
                        "user_id": { "type": "string" },
                    },
                    "required": ["description"],
                },
            },
            {
                "name": "get_info",
                "description": "Get information about the Webtoys Builder",
                "inputSchema": { "type": "object", "properties": {} },
            },
        ]
    })
}

async fn call_tool(state: &AppState, params: Option<Value>) -> Result<Value, RpcError> {
    let call: ToolCall = params
        .ok_or_else(|| RpcError::new(INVALID_PARAMS, "missing params"))
        .and_then(|p| {
            serde_json::from_value(p).map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))
        })?;

    let structured = match call.name.as_str() {
        "build_webtoys_app" => {
            let arguments = call.arguments.unwrap_or_else(|| json!({}));
            let params: BuildAppParams = serde_json::from_value(arguments)
                .map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))?;
            let result = run_build_tool(state, params).await;
            serde_json::to_value(&result)
        }
        "get_info" => serde_json::to_value(ServerInfo::current()),
        other => return Err(RpcError::new(INVALID_PARAMS, format!("unknown tool: {other}"))),
    }
    .map_err(|e| RpcError::new(INTERNAL_ERROR, e.to_string()))?;

    Ok(json!({
        "content": [{ "type": "text", "text": structured.to_string() }],
        "structuredContent": structured,
        "isError": false,
    }))
}
