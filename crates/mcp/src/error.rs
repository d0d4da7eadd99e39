//! Protocol-level errors.
//!
//! An `McpError` fails the whole JSON-RPC request. Backend failures during a
//! well-formed tool call are not errors at this level; they are returned as
//! [`crate::protocol::CallToolResult::error`] values instead.

use crate::protocol::JsonRpcError;
use thiserror::Error;

/// Result type for request handlers
pub type McpResult<T> = Result<T, McpError>;

/// Message returned whenever an operation needs credentials that were not configured.
pub const NOT_AUTHENTICATED: &str =
    "Not authenticated with ERPNext. Please configure API key authentication.";

#[derive(Error, Debug)]
pub enum McpError {
    /// Request is structurally valid JSON-RPC but cannot be served.
    #[error("{0}")]
    InvalidRequest(String),

    /// Missing or malformed parameters.
    #[error("{0}")]
    InvalidParams(String),

    /// Unknown method or tool.
    #[error("{0}")]
    MethodNotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl McpError {
    pub fn not_authenticated() -> Self {
        McpError::InvalidRequest(NOT_AUTHENTICATED.to_string())
    }

    /// Get error code for MCP protocol
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::InvalidRequest(_) => JsonRpcError::INVALID_REQUEST,
            McpError::InvalidParams(_) => JsonRpcError::INVALID_PARAMS,
            McpError::MethodNotFound(_) => JsonRpcError::METHOD_NOT_FOUND,
            McpError::Internal(_) => JsonRpcError::INTERNAL_ERROR,
        }
    }

    pub fn into_rpc_error(self) -> JsonRpcError {
        JsonRpcError::new(self.error_code(), self.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Internal(format!("Serialization error: {}", err))
    }
}
