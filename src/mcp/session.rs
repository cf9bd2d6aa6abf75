//! MCP Session
//!
//! Transport-independent message dispatch. Each connected client owns one
//! [`McpSession`]; every session shares the same [`McpState`].

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::context::ToolContext;
use super::protocol::{
    InitializeParams, InitializeResult, McpError, McpRequest, McpResponse, Method, PingResult,
    ResourcesListResult, ResourcesReadParams, ResourcesReadResult, ToolsCallParams,
    ToolsCallResult, ToolsListResult, JSONRPC_VERSION,
};
use super::rate_limit::{McpRateLimiter, RateLimitConfig};
use super::registry::{McpRegistry, ToolCategory};
use crate::engine::PlaylistEngine;

pub const SERVER_NAME: &str = "playlist-mcp";

pub fn server_version() -> String {
    format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("GIT_HASH"))
}

/// State shared across MCP sessions
pub struct McpState {
    pub registry: Arc<McpRegistry>,
    pub rate_limiter: Arc<McpRateLimiter>,
    pub engine: Arc<PlaylistEngine>,
    next_client_id: AtomicU64,
}

impl McpState {
    /// Starts a session with a fresh client id.
    pub fn open_session(self: &Arc<Self>) -> McpSession {
        let client_id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
        McpSession {
            state: self.clone(),
            client_id,
            initialized: false,
            closed: false,
        }
    }
}

/// Create the MCP state with registered tools and resources
pub fn create_mcp_state(engine: Arc<PlaylistEngine>, rate_limit: RateLimitConfig) -> McpState {
    let mut registry = McpRegistry::new();

    super::tools::register_all_tools(&mut registry);
    super::resources::register_all_resources(&mut registry);

    info!(
        "MCP registry initialized with {} tools and {} resources",
        registry.tool_count(),
        registry.resource_count()
    );

    McpState {
        registry: Arc::new(registry),
        rate_limiter: Arc::new(McpRateLimiter::new(rate_limit)),
        engine,
        next_client_id: AtomicU64::new(1),
    }
}

pub struct McpSession {
    state: Arc<McpState>,
    client_id: u64,
    initialized: bool,
    closed: bool,
}

impl McpSession {
    pub fn client_id(&self) -> u64 {
        self.client_id
    }

    /// True once the client sent `shutdown`.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Handle a single MCP message. Notifications produce no response.
    pub async fn handle_message(&mut self, text: &str) -> Option<McpResponse> {
        let raw: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                return Some(McpResponse::error(
                    None,
                    McpError::ParseError(e.to_string()),
                ));
            }
        };
        let request: McpRequest = match serde_json::from_value(raw) {
            Ok(req) => req,
            Err(e) => {
                return Some(McpResponse::error(
                    None,
                    McpError::InvalidRequest(e.to_string()),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(McpResponse::error(
                request.id,
                McpError::InvalidRequest(format!("Unsupported jsonrpc version {}", request.jsonrpc)),
            ));
        }

        let method = Method::parse(&request.method);
        let Some(request_id) = request.id.clone() else {
            if method == Some(Method::Initialized) {
                debug!("Client {} finished initialization", self.client_id);
            } else {
                debug!("Ignoring notification {}", request.method);
            }
            return None;
        };

        let result = match method {
            None => Err(McpError::MethodNotFound(request.method.clone())),
            Some(method) if method.needs_initialize() && !self.initialized => {
                Err(McpError::InvalidRequest("Not initialized".to_string()))
            }
            Some(Method::Initialize) => self.handle_initialize(&request),
            Some(Method::Initialized) => Ok(Value::Null),
            Some(Method::Ping) => to_value(PingResult {}),
            Some(Method::Shutdown) => {
                self.closed = true;
                Ok(Value::Null)
            }
            Some(Method::ToolsList) => to_value(ToolsListResult {
                tools: self.state.registry.tool_definitions(),
            }),
            Some(Method::ToolsCall) => self.handle_tools_call(&request).await,
            Some(Method::ResourcesList) => to_value(ResourcesListResult {
                resources: self.state.registry.resource_definitions(),
            }),
            Some(Method::ResourcesRead) => self.handle_resources_read(&request).await,
        };

        Some(McpResponse::reply(request_id, result))
    }

    fn context(&self) -> ToolContext {
        ToolContext {
            engine: self.state.engine.clone(),
            client_id: self.client_id,
        }
    }

    fn handle_initialize(&mut self, request: &McpRequest) -> Result<Value, McpError> {
        let params: Option<InitializeParams> = parse_params(request)?;
        if let Some(client) = params.and_then(|p| p.client_info) {
            info!(
                "Client {} is {} {}",
                self.client_id,
                client.name,
                client.version.unwrap_or_default()
            );
        }

        self.initialized = true;

        to_value(InitializeResult::new(SERVER_NAME, server_version()))
    }

    async fn handle_tools_call(&self, request: &McpRequest) -> Result<Value, McpError> {
        let params: ToolsCallParams = parse_params(request)?
            .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;

        let tool = self
            .state
            .registry
            .get_tool(&params.name)
            .ok_or_else(|| McpError::MethodNotFound(format!("Unknown tool: {}", params.name)))?;

        self.check_rate_limit(tool.category)?;

        debug!("Client {} calls {}", self.client_id, tool.name);
        let arguments = params.arguments.unwrap_or(serde_json::json!({}));
        let outcome = AssertUnwindSafe((tool.handler)(self.context(), arguments))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(error @ McpError::InvalidParams(_))) => return Err(error),
            Ok(Err(error)) => {
                warn!("Tool {} failed: {}", tool.name, error);
                ToolsCallResult::error(format!("Error {}: {}", tool.activity, error.cause()))
            }
            Err(panic) => {
                let cause = panic_message(panic.as_ref());
                warn!("Tool {} panicked: {}", tool.name, cause);
                ToolsCallResult::error(format!("Error {}: {}", tool.activity, cause))
            }
        };

        to_value(result)
    }

    async fn handle_resources_read(&self, request: &McpRequest) -> Result<Value, McpError> {
        let params: ResourcesReadParams = parse_params(request)?
            .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;

        let resource = self
            .state
            .registry
            .find_resource(&params.uri)
            .ok_or_else(|| McpError::ResourceNotFound(params.uri.clone()))?;

        self.check_rate_limit(ToolCategory::Lookup)?;

        let contents = AssertUnwindSafe((resource.handler)(self.context(), params.uri))
            .catch_unwind()
            .await
            .map_err(|panic| McpError::InternalError(panic_message(panic.as_ref())))??;

        to_value(ResourcesReadResult { contents })
    }

    fn check_rate_limit(&self, category: ToolCategory) -> Result<(), McpError> {
        self.state
            .rate_limiter
            .check_and_record(self.client_id, category)
            .map_err(|retry_after_secs| McpError::RateLimited { retry_after_secs })
    }
}

impl Drop for McpSession {
    fn drop(&mut self) {
        self.state.rate_limiter.forget(self.client_id);
    }
}

fn parse_params<T: DeserializeOwned>(request: &McpRequest) -> Result<Option<T>, McpError> {
    request
        .params
        .clone()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected internal failure".to_string()
    }
}
