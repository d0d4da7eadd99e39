//! ERPNext resources exposed over MCP.
//!
//! - `erpnext://DocTypes` - every doctype name
//! - `erpnext://{doctype}/{name}` - a single document

use crate::error::{McpError, McpResult, NOT_AUTHENTICATED};
use crate::protocol::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use erpnext_client::ErpNextApi;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub const URI_SCHEME: &str = "erpnext://";
pub const DOCTYPES_URI: &str = "erpnext://DocTypes";
pub const DOCUMENT_URI_TEMPLATE: &str = "erpnext://{doctype}/{name}";

const JSON_MIME: &str = "application/json";

/// A parsed resource URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    DocTypes,
    Document { doctype: String, name: String },
}

impl ResourceUri {
    /// Parse an `erpnext://` URI. The doctype runs up to the first `/`;
    /// everything after it is the document name. Both are percent-decoded.
    pub fn parse(uri: &str) -> Option<Self> {
        if uri == DOCTYPES_URI {
            return Some(Self::DocTypes);
        }

        let rest = uri.strip_prefix(URI_SCHEME)?;
        let (doctype, name) = rest.split_once('/')?;
        if doctype.is_empty() || name.is_empty() {
            return None;
        }

        Some(Self::Document {
            doctype: urlencoding::decode(doctype).ok()?.into_owned(),
            name: urlencoding::decode(name).ok()?.into_owned(),
        })
    }
}

/// Resource listing and reads backed by an [`ErpNextApi`].
pub struct ResourceCatalog {
    api: Arc<dyn ErpNextApi>,
}

impl ResourceCatalog {
    pub fn new(api: Arc<dyn ErpNextApi>) -> Self {
        Self { api }
    }

    /// Static resources.
    pub fn list(&self) -> Vec<Resource> {
        vec![Resource {
            uri: DOCTYPES_URI.to_string(),
            name: "All DocTypes".to_string(),
            description: Some("List of all available DocTypes in ERPNext".to_string()),
            mime_type: Some(JSON_MIME.to_string()),
        }]
    }

    /// Parameterised resources.
    pub fn templates(&self) -> Vec<ResourceTemplate> {
        vec![ResourceTemplate {
            uri_template: DOCUMENT_URI_TEMPLATE.to_string(),
            name: "ERPNext Document".to_string(),
            description: Some("Get an ERPNext document by doctype and name".to_string()),
            mime_type: Some(JSON_MIME.to_string()),
        }]
    }

    /// Read a resource. All failures here are protocol-level errors.
    pub async fn read(&self, uri: &str) -> McpResult<ReadResourceResult> {
        if !self.api.is_authenticated() {
            return Err(McpError::InvalidRequest(NOT_AUTHENTICATED.to_string()));
        }

        let parsed = ResourceUri::parse(uri)
            .ok_or_else(|| McpError::InvalidRequest(format!("Invalid ERPNext resource URI: {}", uri)))?;
        debug!(uri = %uri, "Reading resource");

        let body = match parsed {
            ResourceUri::DocTypes => json!({ "doctypes": self.api.get_all_doctypes().await }),
            ResourceUri::Document { doctype, name } => self
                .api
                .get_document(&doctype, &name)
                .await
                .map_err(|e| McpError::Internal(format!("ERPNext API error: {}", e)))?,
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: uri.to_string(),
                mime_type: JSON_MIME.to_string(),
                text: serde_json::to_string_pretty(&body)?,
            }],
        })
    }
}
