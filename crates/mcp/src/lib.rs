//! ERPNext MCP Server
//!
//! Exposes an ERPNext site to MCP clients over stdio.
//!
//! ```text
//! MCP client ──JSON-RPC──▶ McpServer ──▶ ErpNextApi ──HTTP──▶ ERPNext
//!                            │
//!                            ├─ tools:     get_doctypes, get_doctype_fields,
//!                            │             get_documents, create_document,
//!                            │             update_document, run_report
//!                            └─ resources: erpnext://DocTypes,
//!                                          erpnext://{doctype}/{name}
//! ```
//!
//! Malformed requests fail at the JSON-RPC level with an error code. Backend
//! failures during a well-formed tool call come back as a normal tool result
//! flagged `isError`.

pub mod error;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{McpError, McpResult};
pub use server::McpServer;

/// Server metadata for MCP protocol
pub const SERVER_NAME: &str = "erpnext-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
