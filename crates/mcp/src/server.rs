// MCP server: request dispatch and the newline-delimited JSON-RPC loop

use crate::error::{McpError, McpResult, NOT_AUTHENTICATED};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListResourceTemplatesResult, ListResourcesResult, ListToolsResult,
    ReadResourceParams, ResourcesCapability, ServerCapabilities, ServerInfo, ToolsCapability,
    PROTOCOL_VERSION,
};
use crate::resources::ResourceCatalog;
use crate::tools::{erpnext_tools, ToolRegistry};
use crate::{SERVER_NAME, SERVER_VERSION};
use anyhow::Result;
use erpnext_client::ErpNextApi;
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

/// Longest request line accepted from the client.
const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

pub struct McpServer {
    api: Arc<dyn ErpNextApi>,
    registry: ToolRegistry,
    resources: ResourceCatalog,
}

impl McpServer {
    /// Server exposing the ERPNext tools and resources over the given backend.
    pub fn new(api: Arc<dyn ErpNextApi>) -> Self {
        Self {
            registry: erpnext_tools(api.clone()),
            resources: ResourceCatalog::new(api.clone()),
            api,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve JSON-RPC over stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> Result<()> {
        info!("MCP server ready, listening on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC until the reader reaches EOF.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_BYTES));
        let mut sink = FramedWrite::new(writer, LinesCodec::new());

        while let Some(line) = lines.next().await {
            let response = match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => match serde_json::from_str::<JsonRpcRequest>(&line) {
                    Ok(request) => self.handle_request(request).await,
                    Err(e) => {
                        warn!(error = %e, "Failed to parse request");
                        Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error(e)))
                    }
                },
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    warn!(max_bytes = MAX_LINE_BYTES, "Request line too long");
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        JsonRpcError::parse_error("request line too long"),
                    ))
                }
                Err(LinesCodecError::Io(e)) => return Err(e.into()),
            };

            if let Some(response) = response {
                sink.send(serde_json::to_string(&response)?).await?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one request. Notifications produce no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Received notification");
            return None;
        }
        let id = request.id.unwrap_or_default();

        debug!(method = %request.method, id = %id, "Handling request");
        match self.dispatch(&request.method, request.params).await {
            Ok(result) => Some(JsonRpcResponse::success(id, result)),
            Err(e) => {
                debug!(method = %request.method, code = e.error_code(), error = %e, "Request failed");
                Some(JsonRpcResponse::error(id, e.into_rpc_error()))
            }
        }
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> McpResult<Value> {
        match method {
            "initialize" => to_result(self.initialize()),
            "ping" => Ok(serde_json::json!({})),
            "resources/list" => to_result(ListResourcesResult {
                resources: self.resources.list(),
            }),
            "resources/templates/list" => to_result(ListResourceTemplatesResult {
                resource_templates: self.resources.templates(),
            }),
            "resources/read" => {
                let params: ReadResourceParams = parse_params(params)?;
                to_result(self.resources.read(&params.uri).await?)
            }
            "tools/list" => to_result(ListToolsResult {
                tools: self.registry.list_schemas(),
            }),
            "tools/call" => {
                let params: CallToolParams = parse_params(params)?;
                to_result(self.call_tool(params).await?)
            }
            other => Err(McpError::MethodNotFound(format!("Method not found: {}", other))),
        }
    }

    fn initialize(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                resources: Some(ResourcesCapability::default()),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        }
    }

    /// Call a tool by name.
    ///
    /// Unknown tools are a protocol error. A missing login is reported as a
    /// failed tool result, and the tool is never invoked.
    pub async fn call_tool(&self, params: CallToolParams) -> McpResult<CallToolResult> {
        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| McpError::MethodNotFound(format!("Unknown tool: {}", params.name)))?;

        if !self.api.is_authenticated() {
            warn!(tool = %params.name, "Rejecting tool call without credentials");
            return Ok(CallToolResult::error(NOT_AUTHENTICATED));
        }

        info!(tool = %params.name, "Calling tool");
        let result = tool.execute(params.arguments.unwrap_or(Value::Null)).await?;
        if result.is_error() {
            warn!(tool = %params.name, "Tool reported an error");
        }
        Ok(result)
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> McpResult<T> {
    serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| McpError::InvalidParams(format!("Invalid params: {}", e)))
}

fn to_result<T: Serialize>(value: T) -> McpResult<Value> {
    Ok(serde_json::to_value(value)?)
}
