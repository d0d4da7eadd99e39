//! Main client for the ERPNext API.

use crate::api::*;
use crate::config::ClientConfig;
use crate::error::{ErpNextError, ErpNextResult};
use crate::transport::HttpTransport;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Client for the ERPNext REST API.
#[derive(Clone)]
pub struct ErpNextClient {
    config: Arc<ClientConfig>,
    authenticated: bool,
    pub(crate) http: HttpTransport,
    pub(crate) doctype_chain: Arc<FallbackChain>,
}

impl ErpNextClient {
    /// Create a new client builder.
    pub fn builder() -> ErpNextClientBuilder {
        ErpNextClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> ErpNextResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(&config)?;
        let authenticated = config.is_authenticated();

        Ok(Self {
            config,
            authenticated,
            http,
            doctype_chain: Arc::new(FallbackChain::standard()),
        })
    }

    /// Create a client from `ERPNEXT_URL`, `ERPNEXT_API_KEY` and `ERPNEXT_API_SECRET`.
    pub fn from_env() -> ErpNextResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Replace the doctype discovery chain.
    pub fn with_doctype_chain(mut self, chain: FallbackChain) -> Self {
        self.doctype_chain = Arc::new(chain);
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Whether credentials were configured at construction.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Get the documents API.
    pub fn documents(&self) -> DocumentsApi<'_> {
        DocumentsApi::new(self)
    }

    /// Get the reports API.
    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }

    /// Get the doctypes API.
    pub fn doctypes(&self) -> DocTypesApi<'_> {
        DocTypesApi::new(self)
    }
}

impl std::fmt::Debug for ErpNextClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErpNextClient")
            .field("base_url", &self.config.base_url)
            .field("authenticated", &self.authenticated)
            .finish()
    }
}

#[async_trait::async_trait]
impl ErpNextApi for ErpNextClient {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn get_document(&self, doctype: &str, name: &str) -> ErpNextResult<Value> {
        self.documents().get(doctype, name).await
    }

    async fn get_doc_list(&self, doctype: &str, query: &DocListQuery) -> ErpNextResult<Vec<Value>> {
        self.documents().list(doctype, query).await
    }

    async fn create_document(&self, doctype: &str, doc: &Value) -> ErpNextResult<Value> {
        self.documents().create(doctype, doc).await
    }

    async fn update_document(&self, doctype: &str, name: &str, doc: &Value) -> ErpNextResult<Value> {
        self.documents().update(doctype, name, doc).await
    }

    async fn run_report(
        &self,
        report_name: &str,
        filters: Option<&Map<String, Value>>,
    ) -> ErpNextResult<Value> {
        self.reports().run(report_name, filters).await
    }

    async fn get_all_doctypes(&self) -> Vec<String> {
        self.doctypes().list().await
    }
}

/// Builder for creating an ErpNextClient.
pub struct ErpNextClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    timeout: Option<Duration>,
}

impl ErpNextClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            api_secret: None,
            timeout: None,
        }
    }

    /// Set the base URL of the ERPNext site.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API secret.
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// Set a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> ErpNextResult<ErpNextClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ErpNextError::Config("base_url is required".to_string()))?;

        let mut config = ClientConfig::new(base_url, self.api_key, self.api_secret)?;
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        ErpNextClient::new(config)
    }
}

impl Default for ErpNextClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
