//! ERPNext API surface.
//!
//! [`ErpNextApi`] is the seam the MCP adapter talks to; [`crate::ErpNextClient`]
//! implements it over HTTP and tests substitute their own implementation.

pub mod doctypes;
pub mod documents;
pub mod reports;

pub use doctypes::{DocTypeSource, DocTypesApi, FallbackChain, FALLBACK_DOCTYPES};
pub use documents::DocumentsApi;
pub use reports::ReportsApi;

use crate::error::ErpNextResult;
use crate::transport::QueryPairs;
use serde_json::{Map, Value};

/// Operations the adapter needs from an ERPNext backend.
#[async_trait::async_trait]
pub trait ErpNextApi: Send + Sync {
    /// Whether API credentials were configured. Fixed for the client's lifetime.
    fn is_authenticated(&self) -> bool;

    /// Fetch one document by doctype and name.
    async fn get_document(&self, doctype: &str, name: &str) -> ErpNextResult<Value>;

    /// List documents of a doctype.
    async fn get_doc_list(&self, doctype: &str, query: &DocListQuery) -> ErpNextResult<Vec<Value>>;

    /// Create a document and return the stored record.
    async fn create_document(&self, doctype: &str, doc: &Value) -> ErpNextResult<Value>;

    /// Update a document and return the stored record.
    async fn update_document(&self, doctype: &str, name: &str, doc: &Value) -> ErpNextResult<Value>;

    /// Run a query report by name.
    async fn run_report(
        &self,
        report_name: &str,
        filters: Option<&Map<String, Value>>,
    ) -> ErpNextResult<Value>;

    /// Names of all doctypes. Never fails; degrades to a static list.
    async fn get_all_doctypes(&self) -> Vec<String>;
}

/// Field selection, filters and page size for a document listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocListQuery {
    /// Fields to return; empty means the backend's default fields.
    pub fields: Vec<String>,
    /// Backend filter mapping, passed through as JSON.
    pub filters: Option<Map<String, Value>>,
    /// Maximum number of records. `Some(0)` is treated like `None`.
    pub limit: Option<u64>,
}

impl DocListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filters(mut self, filters: Map<String, Value>) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query string for `GET /api/resource/{doctype}`.
    pub fn to_query_pairs(&self) -> QueryPairs {
        let mut pairs = Vec::new();

        if !self.fields.is_empty() {
            pairs.push(("fields", Value::from(self.fields.clone()).to_string()));
        }
        if let Some(ref filters) = self.filters {
            pairs.push(("filters", Value::Object(filters.clone()).to_string()));
        }
        // A zero limit is indistinguishable from no limit.
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit_page_length", limit.to_string()));
        }

        pairs
    }
}
