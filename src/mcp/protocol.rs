//! MCP wire types
//!
//! JSON-RPC 2.0 envelopes plus the handful of MCP payloads this server
//! speaks: initialize, tools, resources and ping.

use std::ops::Not;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "2.0";
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

// ============================================================================
// Envelopes
// ============================================================================

/// Incoming message. Without an `id` it is a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpErrorResponse>,
}

impl McpResponse {
    fn envelope(id: Option<RequestId>, result: Option<Value>, error: Option<McpErrorResponse>) -> Self {
        McpResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
            error,
        }
    }

    pub fn success(id: RequestId, result: Value) -> Self {
        Self::envelope(Some(id), Some(result), None)
    }

    /// `id` is absent when the request could not be read far enough to find it.
    pub fn error(id: Option<RequestId>, error: McpError) -> Self {
        Self::envelope(id, None, Some(error.into()))
    }

    pub fn reply(id: RequestId, outcome: Result<Value, McpError>) -> Self {
        match outcome {
            Ok(value) => Self::success(id, value),
            Err(error) => Self::error(Some(id), error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpErrorResponse {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// ============================================================================
// Errors
// ============================================================================

/// JSON-RPC standard errors plus the MCP-level ones this server raises.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("Rate limit exceeded, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u32 },
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
}

impl McpError {
    pub fn code(&self) -> i32 {
        match self {
            McpError::ParseError(_) => -32700,
            McpError::InvalidRequest(_) => -32600,
            McpError::MethodNotFound(_) => -32601,
            McpError::InvalidParams(_) => -32602,
            McpError::InternalError(_) => -32603,
            McpError::RateLimited { .. } => -32003,
            McpError::ResourceNotFound(_) => -32004,
        }
    }

    /// The detail without the category prefix of the `Display` text.
    pub fn cause(&self) -> String {
        match self {
            McpError::ParseError(detail)
            | McpError::InvalidRequest(detail)
            | McpError::MethodNotFound(detail)
            | McpError::InvalidParams(detail)
            | McpError::InternalError(detail)
            | McpError::ResourceNotFound(detail) => detail.clone(),
            McpError::RateLimited { .. } => self.to_string(),
        }
    }

    fn data(&self) -> Option<Value> {
        match self {
            McpError::RateLimited { retry_after_secs } => {
                Some(json!({ "retry_after_secs": retry_after_secs }))
            }
            _ => None,
        }
    }
}

impl From<McpError> for McpErrorResponse {
    fn from(err: McpError) -> Self {
        McpErrorResponse {
            code: err.code(),
            message: err.to_string(),
            data: err.data(),
        }
    }
}

// ============================================================================
// Methods
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Initialize,
    Initialized,
    Shutdown,
    Ping,
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
}

impl Method {
    const ALL: [Method; 8] = [
        Method::Initialize,
        Method::Initialized,
        Method::Shutdown,
        Method::Ping,
        Method::ToolsList,
        Method::ToolsCall,
        Method::ResourcesList,
        Method::ResourcesRead,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::Initialized => "notifications/initialized",
            Method::Shutdown => "shutdown",
            Method::Ping => "ping",
            Method::ToolsList => "tools/list",
            Method::ToolsCall => "tools/call",
            Method::ResourcesList => "resources/list",
            Method::ResourcesRead => "resources/read",
        }
    }

    pub fn parse(name: &str) -> Option<Method> {
        Method::ALL.into_iter().find(|method| method.name() == name)
    }

    /// Tools and resources are only served after `initialize`.
    pub fn needs_initialize(self) -> bool {
        matches!(
            self,
            Method::ToolsList | Method::ToolsCall | Method::ResourcesList | Method::ResourcesRead
        )
    }
}

// ============================================================================
// initialize
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    #[serde(default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

impl InitializeResult {
    pub fn new(name: &str, version: String) -> Self {
        InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: ServerInfo {
                name: name.to_string(),
                version,
            },
        }
    }
}

/// Static tool and resource lists, no subscriptions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
    pub resources: ResourcesCapability,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    #[serde(skip_serializing_if = "Not::not")]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    pub subscribe: bool,
    #[serde(skip_serializing_if = "Not::not")]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

// ============================================================================
// tools/*
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDefinition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Tool output. Failures are reported in-band with `isError`, so the
/// JSON-RPC call itself still succeeds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCallResult {
    pub content: Vec<ToolResultContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolResultContent {
    Text { text: String },
}

impl ToolsCallResult {
    fn single(text: String, is_error: Option<bool>) -> Self {
        ToolsCallResult {
            content: vec![ToolResultContent::Text { text }],
            is_error,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::single(text.into(), None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::single(message.into(), Some(true))
    }
}

// ============================================================================
// resources/*
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ResourcesListResult {
    pub resources: Vec<ResourceDefinition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourcesReadParams {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourcesReadResult {
    pub contents: Vec<ResourceContent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub text: String,
}

/// `ping` answers with an empty object.
#[derive(Debug, Clone, Serialize)]
pub struct PingResult {}
