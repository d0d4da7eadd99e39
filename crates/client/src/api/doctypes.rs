//! DocType discovery.
//!
//! Listing every doctype is not possible on every ERPNext deployment: the
//! `DocType` resource may be permission-restricted, and older sites lack the
//! search endpoint. Discovery therefore walks an ordered [`FallbackChain`] of
//! sources and bottoms out in [`FALLBACK_DOCTYPES`], so it never fails.

use crate::client::ErpNextClient;
use crate::error::TransportError;
use crate::transport::{envelope, HttpTransport, TransportResult};
use serde_json::Value;
use tracing::{debug, warn};

/// Doctypes returned when no backend source answers.
pub const FALLBACK_DOCTYPES: [&str; 14] = [
    "Customer",
    "Supplier",
    "Item",
    "Sales Order",
    "Purchase Order",
    "Sales Invoice",
    "Purchase Invoice",
    "Employee",
    "Lead",
    "Opportunity",
    "Quotation",
    "Payment Entry",
    "Journal Entry",
    "Stock Entry",
];

/// Whitelisted method backing link-field search.
pub const SEARCH_LINK_METHOD: &str = "frappe.desk.search.search_link";

/// Page size requested from every source.
const DISCOVERY_LIMIT: u32 = 500;

/// One way of asking the backend for doctype names.
#[async_trait::async_trait]
pub trait DocTypeSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch(&self, http: &HttpTransport) -> TransportResult<Vec<String>>;
}

/// `GET /api/resource/DocType`, reading each record's `name`.
#[derive(Debug, Default)]
pub struct ResourceListing;

#[async_trait::async_trait]
impl DocTypeSource for ResourceListing {
    fn name(&self) -> &'static str {
        "resource_listing"
    }

    async fn fetch(&self, http: &HttpTransport) -> TransportResult<Vec<String>> {
        let query = vec![
            ("fields", r#"["name"]"#.to_string()),
            ("limit_page_length", DISCOVERY_LIMIT.to_string()),
        ];
        let body = http.get(&["api", "resource", "DocType"], &query).await?;
        pluck_strings(envelope(body, "data")?, "data", "name")
    }
}

/// `GET /api/method/frappe.desk.search.search_link`, reading each result's `value`.
#[derive(Debug, Default)]
pub struct SearchLink;

#[async_trait::async_trait]
impl DocTypeSource for SearchLink {
    fn name(&self) -> &'static str {
        "search_link"
    }

    async fn fetch(&self, http: &HttpTransport) -> TransportResult<Vec<String>> {
        let query = vec![
            ("doctype", "DocType".to_string()),
            ("txt", String::new()),
            ("limit", DISCOVERY_LIMIT.to_string()),
        ];
        let body = http.get(&["api", "method", SEARCH_LINK_METHOD], &query).await?;
        pluck_strings(envelope(body, "results")?, "results", "value")
    }
}

/// Map a list of objects to one string field of each, skipping elements
/// without it. A non-empty list with no usable element is an error.
fn pluck_strings(list: Value, list_key: &'static str, field: &'static str) -> TransportResult<Vec<String>> {
    let Value::Array(items) = list else {
        return Err(TransportError::NotAList(list_key));
    };

    let total = items.len();
    let names: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        })
        .collect();

    if total > 0 && names.is_empty() {
        return Err(TransportError::MissingField(field));
    }
    if names.len() < total {
        debug!(skipped = total - names.len(), field, "Skipped entries without a name");
    }
    Ok(names)
}

/// Ordered list of sources tried until one succeeds.
pub struct FallbackChain {
    sources: Vec<Box<dyn DocTypeSource>>,
}

impl FallbackChain {
    /// Chain with the given sources, tried in order.
    pub fn new(sources: Vec<Box<dyn DocTypeSource>>) -> Self {
        Self { sources }
    }

    /// Resource listing, then link search.
    pub fn standard() -> Self {
        Self::new(vec![Box::new(ResourceListing), Box::new(SearchLink)])
    }

    /// Names from the first source that answers, or [`FALLBACK_DOCTYPES`].
    pub async fn resolve(&self, http: &HttpTransport) -> Vec<String> {
        for source in &self.sources {
            match source.fetch(http).await {
                Ok(names) => {
                    debug!(source = source.name(), count = names.len(), "Resolved doctypes");
                    return names;
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "DocType source failed, trying next");
                }
            }
        }

        warn!("All DocType sources failed, using built-in list");
        FALLBACK_DOCTYPES.iter().map(|s| s.to_string()).collect()
    }
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// DocTypes API.
pub struct DocTypesApi<'a> {
    client: &'a ErpNextClient,
}

impl<'a> DocTypesApi<'a> {
    pub(crate) fn new(client: &'a ErpNextClient) -> Self {
        Self { client }
    }

    /// All doctype names, degrading through the client's fallback chain.
    pub async fn list(&self) -> Vec<String> {
        self.client.doctype_chain.resolve(&self.client.http).await
    }
}
