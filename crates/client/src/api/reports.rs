//! Query report endpoint.

use crate::client::ErpNextClient;
use crate::error::{ErpNextError, ErpNextResult};
use crate::transport::envelope;
use serde_json::{Map, Value};

/// Whitelisted method that executes a query report.
pub const REPORT_RUN_METHOD: &str = "frappe.desk.query_report.run";

/// Reports API.
pub struct ReportsApi<'a> {
    client: &'a ErpNextClient,
}

impl<'a> ReportsApi<'a> {
    pub(crate) fn new(client: &'a ErpNextClient) -> Self {
        Self { client }
    }

    /// Run a report. Report payloads come back under `message`, not `data`.
    pub async fn run(
        &self,
        report_name: &str,
        filters: Option<&Map<String, Value>>,
    ) -> ErpNextResult<Value> {
        let mut query = vec![("report_name", report_name.to_string())];
        if let Some(filters) = filters {
            query.push(("filters", Value::Object(filters.clone()).to_string()));
        }

        self.client
            .http
            .get(&["api", "method", REPORT_RUN_METHOD], &query)
            .await
            .and_then(|body| envelope(body, "message"))
            .map_err(|source| ErpNextError::Report {
                report_name: report_name.to_string(),
                source,
            })
    }
}
