//! Document resource endpoints (`/api/resource/{doctype}`).

use crate::api::DocListQuery;
use crate::client::ErpNextClient;
use crate::error::{ErpNextError, ErpNextResult, TransportError};
use crate::transport::envelope;
use serde_json::{json, Value};

/// Documents API for reading and writing records of any doctype.
pub struct DocumentsApi<'a> {
    client: &'a ErpNextClient,
}

impl<'a> DocumentsApi<'a> {
    pub(crate) fn new(client: &'a ErpNextClient) -> Self {
        Self { client }
    }

    /// Fetch one document.
    pub async fn get(&self, doctype: &str, name: &str) -> ErpNextResult<Value> {
        self.client
            .http
            .get(&["api", "resource", doctype, name], &Vec::new())
            .await
            .and_then(|body| envelope(body, "data"))
            .map_err(|source| ErpNextError::Fetch {
                doctype: doctype.to_string(),
                name: name.to_string(),
                source,
            })
    }

    /// List documents of a doctype.
    pub async fn list(&self, doctype: &str, query: &DocListQuery) -> ErpNextResult<Vec<Value>> {
        self.client
            .http
            .get(&["api", "resource", doctype], &query.to_query_pairs())
            .await
            .and_then(|body| envelope(body, "data"))
            .and_then(|data| match data {
                Value::Array(items) => Ok(items),
                _ => Err(TransportError::NotAList("data")),
            })
            .map_err(|source| ErpNextError::List {
                doctype: doctype.to_string(),
                source,
            })
    }

    /// Create a document.
    pub async fn create(&self, doctype: &str, doc: &Value) -> ErpNextResult<Value> {
        self.client
            .http
            .post(&["api", "resource", doctype], &json!({ "data": doc }))
            .await
            .and_then(|body| envelope(body, "data"))
            .map_err(|source| ErpNextError::Create {
                doctype: doctype.to_string(),
                source,
            })
    }

    /// Update a document.
    pub async fn update(&self, doctype: &str, name: &str, doc: &Value) -> ErpNextResult<Value> {
        self.client
            .http
            .put(&["api", "resource", doctype, name], &json!({ "data": doc }))
            .await
            .and_then(|body| envelope(body, "data"))
            .map_err(|source| ErpNextError::Update {
                doctype: doctype.to_string(),
                name: name.to_string(),
                source,
            })
    }
}
