//! MCP Tool and Resource Registry
//!
//! Manages registration and lookup of tools and resources.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use super::context::ToolContext;
use super::protocol::{
    McpError, ResourceContent, ResourceDefinition, ToolDefinition, ToolsCallResult,
};

// ============================================================================
// Tool Types
// ============================================================================

/// Result type for tool execution
pub type ToolResult = Result<ToolsCallResult, McpError>;

/// Boxed future for async tool execution
pub type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// Tool handler function type
pub type ToolHandler = Arc<dyn Fn(ToolContext, Value) -> ToolFuture + Send + Sync>;

/// A registered tool with metadata and handler
pub struct RegisteredTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: ToolHandler,
    pub category: ToolCategory,
    /// What the tool is doing, used in failure text ("Error <activity>: ...").
    pub activity: String,
}

/// Tool category for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCategory {
    /// Single-song lookups, statistics and resource reads.
    Lookup,
    /// Playlist generation and similarity ranking, which scan the dataset.
    Generate,
}

// ============================================================================
// Resource Types
// ============================================================================

/// Result type for resource read
pub type ResourceResult = Result<Vec<ResourceContent>, McpError>;

/// Boxed future for async resource read
pub type ResourceFuture = Pin<Box<dyn Future<Output = ResourceResult> + Send>>;

/// Resource handler function type
pub type ResourceHandler = Arc<dyn Fn(ToolContext, String) -> ResourceFuture + Send + Sync>;

/// A registered resource with metadata and handler
pub struct RegisteredResource {
    pub uri: String,
    pub name: String,
    pub description: Option<String>,
    pub mime_type: Option<String>,
    pub handler: ResourceHandler,
}

// ============================================================================
// Registry
// ============================================================================

/// Registry for MCP tools and resources
pub struct McpRegistry {
    tools: HashMap<String, RegisteredTool>,
    resources: Vec<RegisteredResource>,
}

impl McpRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            resources: Vec::new(),
        }
    }

    pub fn register_tool(&mut self, tool: RegisteredTool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    pub fn register_resource(&mut self, resource: RegisteredResource) {
        self.resources.push(resource);
    }

    /// Tool definitions sorted by name.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut tools: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name.clone(),
                description: tool.description.clone(),
                input_schema: tool.input_schema.clone(),
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn get_tool(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// Resource definitions in registration order.
    pub fn resource_definitions(&self) -> Vec<ResourceDefinition> {
        self.resources
            .iter()
            .map(|resource| ResourceDefinition {
                uri: resource.uri.clone(),
                name: resource.name.clone(),
                description: resource.description.clone(),
                mime_type: resource.mime_type.clone(),
            })
            .collect()
    }

    pub fn find_resource(&self, uri: &str) -> Option<&RegisteredResource> {
        self.resources.iter().find(|resource| resource.uri == uri)
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

impl Default for McpRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builder helpers
// ============================================================================

/// Builder for registering a tool
pub struct ToolBuilder {
    name: String,
    description: String,
    input_schema: Value,
    category: ToolCategory,
    activity: Option<String>,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
            category: ToolCategory::Lookup,
            activity: None,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn category(mut self, cat: ToolCategory) -> Self {
        self.category = cat;
        self
    }

    pub fn activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn build<F, Fut>(self, handler: F) -> RegisteredTool
    where
        F: Fn(ToolContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        let activity = self
            .activity
            .unwrap_or_else(|| format!("running {}", self.name));
        RegisteredTool {
            name: self.name,
            description: self.description,
            input_schema: self.input_schema,
            category: self.category,
            activity,
            handler: Arc::new(move |ctx, params| Box::pin(handler(ctx, params))),
        }
    }
}

/// Builder for registering a resource
pub struct ResourceBuilder {
    uri: String,
    name: String,
    description: Option<String>,
    mime_type: Option<String>,
}

impl ResourceBuilder {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: None,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn build<F, Fut>(self, handler: F) -> RegisteredResource
    where
        F: Fn(ToolContext, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResourceResult> + Send + 'static,
    {
        RegisteredResource {
            uri: self.uri,
            name: self.name,
            description: self.description,
            mime_type: self.mime_type,
            handler: Arc::new(move |ctx, uri| Box::pin(handler(ctx, uri))),
        }
    }
}
