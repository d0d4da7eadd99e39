// Document listing and write tools

use crate::error::{McpError, McpResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_array, json_schema_free_object, json_schema_number, json_schema_object,
    json_schema_string, parse_arguments, present, Tool,
};
use erpnext_client::{DocListQuery, ErpNextApi};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use std::sync::Arc;

/// Tool to list documents of a doctype
pub struct GetDocumentsTool {
    api: Arc<dyn ErpNextApi>,
}

impl GetDocumentsTool {
    pub fn new(api: Arc<dyn ErpNextApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct GetDocumentsArgs {
    doctype: Option<String>,
    #[serde(default)]
    fields: Option<Vec<String>>,
    #[serde(default)]
    filters: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "whole_number")]
    limit: Option<u64>,
}

/// Any JSON number without a fractional part, so `5.0` reads as `5`.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number.as_u64() {
        return Ok(Some(n));
    }
    match number.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {}",
            number
        ))),
    }
}

#[async_trait::async_trait]
impl Tool for GetDocumentsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_documents".to_string(),
            description: "Get a list of documents for a specific doctype".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "doctype": json_schema_string("ERPNext DocType (e.g., Customer, Item)"),
                    "fields": json_schema_array(
                        serde_json::json!({"type": "string"}),
                        "Fields to include (optional)"
                    ),
                    "filters": json_schema_free_object("Filters in the format {field: value} (optional)"),
                    "limit": json_schema_number("Maximum number of documents to return (optional)")
                }),
                vec!["doctype"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> McpResult<CallToolResult> {
        let args: GetDocumentsArgs = parse_arguments("get_documents", arguments)?;
        let doctype = present(&args.doctype)
            .ok_or_else(|| McpError::InvalidParams("Doctype is required".to_string()))?;

        let query = DocListQuery {
            fields: args.fields.unwrap_or_default(),
            filters: args.filters,
            limit: args.limit,
        };

        match self.api.get_doc_list(doctype, &query).await {
            Ok(documents) => Ok(CallToolResult::text(serde_json::to_string_pretty(&documents)?)),
            Err(e) => Ok(CallToolResult::error(format!(
                "Failed to get {} documents: {}",
                doctype, e
            ))),
        }
    }
}

/// Tool to create a document
pub struct CreateDocumentTool {
    api: Arc<dyn ErpNextApi>,
}

impl CreateDocumentTool {
    pub fn new(api: Arc<dyn ErpNextApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct CreateDocumentArgs {
    doctype: Option<String>,
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

#[async_trait::async_trait]
impl Tool for CreateDocumentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_document".to_string(),
            description: "Create a new document in ERPNext".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "doctype": json_schema_string("ERPNext DocType (e.g., Customer, Item)"),
                    "data": json_schema_free_object("Document data")
                }),
                vec!["doctype", "data"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> McpResult<CallToolResult> {
        let args: CreateDocumentArgs = parse_arguments("create_document", arguments)?;
        let (Some(doctype), Some(data)) = (present(&args.doctype), args.data) else {
            return Err(McpError::InvalidParams(
                "Doctype and data are required".to_string(),
            ));
        };

        match self.api.create_document(doctype, &Value::Object(data)).await {
            Ok(created) => Ok(CallToolResult::text(format!(
                "Created {}: {}\n\n{}",
                doctype,
                record_name(&created),
                serde_json::to_string_pretty(&created)?
            ))),
            Err(e) => Ok(CallToolResult::error(format!(
                "Failed to create {}: {}",
                doctype, e
            ))),
        }
    }
}

/// Tool to update a document
pub struct UpdateDocumentTool {
    api: Arc<dyn ErpNextApi>,
}

impl UpdateDocumentTool {
    pub fn new(api: Arc<dyn ErpNextApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateDocumentArgs {
    doctype: Option<String>,
    name: Option<String>,
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

#[async_trait::async_trait]
impl Tool for UpdateDocumentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_document".to_string(),
            description: "Update an existing document in ERPNext".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "doctype": json_schema_string("ERPNext DocType (e.g., Customer, Item)"),
                    "name": json_schema_string("Document name/ID"),
                    "data": json_schema_free_object("Document data to update")
                }),
                vec!["doctype", "name", "data"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> McpResult<CallToolResult> {
        let args: UpdateDocumentArgs = parse_arguments("update_document", arguments)?;
        let (Some(doctype), Some(name), Some(data)) =
            (present(&args.doctype), present(&args.name), args.data)
        else {
            return Err(McpError::InvalidParams(
                "Doctype, name, and data are required".to_string(),
            ));
        };

        match self
            .api
            .update_document(doctype, name, &Value::Object(data))
            .await
        {
            Ok(updated) => Ok(CallToolResult::text(format!(
                "Updated {} {}\n\n{}",
                doctype,
                name,
                serde_json::to_string_pretty(&updated)?
            ))),
            Err(e) => Ok(CallToolResult::error(format!(
                "Failed to update {} {}: {}",
                doctype, name, e
            ))),
        }
    }
}

/// `name` of a stored record, as assigned by the backend.
fn record_name(record: &Value) -> &str {
    record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("(unnamed)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockApi;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_documents_passes_query() {
        let api = Arc::new(MockApi::authenticated().with_list(vec![json!({"name": "CUST-0001"})]));
        let tool = GetDocumentsTool::new(api.clone());

        let result = tool
            .execute(json!({
                "doctype": "Customer",
                "fields": ["name", "customer_name"],
                "filters": {"customer_group": "Commercial"},
                "limit": 5
            }))
            .await
            .unwrap();

        assert!(!result.is_error());
        let docs: Vec<Value> = serde_json::from_str(&result.text_content()).unwrap();
        assert_eq!(docs, vec![json!({"name": "CUST-0001"})]);

        let (doctype, query) = api.last_list_query().unwrap();
        assert_eq!(doctype, "Customer");
        assert_eq!(query.fields, vec!["name", "customer_name"]);
        assert_eq!(
            query.filters,
            json!({"customer_group": "Commercial"}).as_object().cloned()
        );
        assert_eq!(query.limit, Some(5));
    }

    #[tokio::test]
    async fn test_get_documents_defaults() {
        let api = Arc::new(MockApi::authenticated());
        let tool = GetDocumentsTool::new(api.clone());

        let result = tool.execute(json!({"doctype": "Item"})).await.unwrap();
        assert_eq!(result.text_content(), "[]");

        let (_, query) = api.last_list_query().unwrap();
        assert_eq!(query, DocListQuery::new());
    }

    #[tokio::test]
    async fn test_get_documents_backend_failure_is_tool_error() {
        let api = Arc::new(MockApi::authenticated().failing());
        let tool = GetDocumentsTool::new(api);

        let result = tool.execute(json!({"doctype": "Item"})).await.unwrap();
        assert!(result.is_error());
        assert_eq!(
            result.text_content(),
            "Failed to get Item documents: Failed to get Item list: API error (status 500): boom"
        );
    }

    #[tokio::test]
    async fn test_get_documents_accepts_whole_float_limit() {
        let api = Arc::new(MockApi::authenticated());
        let tool = GetDocumentsTool::new(api.clone());

        let result = tool
            .execute(json!({"doctype": "Item", "limit": 5.0}))
            .await
            .unwrap();
        assert!(!result.is_error());

        let (_, query) = api.last_list_query().unwrap();
        assert_eq!(query.limit, Some(5));
    }

    #[tokio::test]
    async fn test_get_documents_rejects_fractional_limit() {
        let api = Arc::new(MockApi::authenticated());
        let tool = GetDocumentsTool::new(api.clone());

        for limit in [json!(2.5), json!(-1)] {
            let err = tool
                .execute(json!({"doctype": "Item", "limit": limit}))
                .await
                .unwrap_err();
            assert!(matches!(err, McpError::InvalidParams(_)));
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_documents_null_limit_is_absent() {
        let api = Arc::new(MockApi::authenticated());
        let tool = GetDocumentsTool::new(api.clone());

        tool.execute(json!({"doctype": "Item", "limit": null}))
            .await
            .unwrap();

        let (_, query) = api.last_list_query().unwrap();
        assert_eq!(query.limit, None);
    }

    #[tokio::test]
    async fn test_get_documents_bad_filters_type() {
        let api = Arc::new(MockApi::authenticated());
        let tool = GetDocumentsTool::new(api.clone());

        let err = tool
            .execute(json!({"doctype": "Item", "filters": "status=Open"}))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_document_text() {
        let api = Arc::new(
            MockApi::authenticated()
                .with_record(json!({"name": "CUST-0001", "customer_name": "Acme"})),
        );
        let tool = CreateDocumentTool::new(api.clone());

        let result = tool
            .execute(json!({"doctype": "Customer", "data": {"customer_name": "Acme"}}))
            .await
            .unwrap();

        assert!(!result.is_error());
        let text = result.text_content();
        assert!(text.starts_with("Created Customer: CUST-0001"));
        let pretty =
            serde_json::to_string_pretty(&json!({"name": "CUST-0001", "customer_name": "Acme"}))
                .unwrap();
        assert!(text.ends_with(&pretty));
        assert_eq!(api.calls(), vec!["create_document Customer"]);
    }

    #[tokio::test]
    async fn test_create_document_requires_data() {
        let api = Arc::new(MockApi::authenticated());
        let tool = CreateDocumentTool::new(api.clone());

        let err = tool.execute(json!({"doctype": "Customer"})).await.unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(ref m) if m == "Doctype and data are required"));

        let err = tool
            .execute(json!({"data": {"customer_name": "Acme"}}))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_document_failure() {
        let api = Arc::new(MockApi::authenticated().failing());
        let tool = CreateDocumentTool::new(api);

        let result = tool
            .execute(json!({"doctype": "Customer", "data": {}}))
            .await
            .unwrap();
        assert!(result.is_error());
        assert!(result
            .text_content()
            .starts_with("Failed to create Customer: "));
    }

    #[tokio::test]
    async fn test_update_document_text() {
        let api = Arc::new(
            MockApi::authenticated().with_record(json!({"name": "CUST-0001", "customer_group": "Retail"})),
        );
        let tool = UpdateDocumentTool::new(api.clone());

        let result = tool
            .execute(json!({
                "doctype": "Customer",
                "name": "CUST-0001",
                "data": {"customer_group": "Retail"}
            }))
            .await
            .unwrap();

        assert!(result.text_content().starts_with("Updated Customer CUST-0001\n\n"));
        assert_eq!(api.calls(), vec!["update_document Customer CUST-0001"]);
    }

    #[tokio::test]
    async fn test_update_document_requires_name() {
        let api = Arc::new(MockApi::authenticated());
        let tool = UpdateDocumentTool::new(api.clone());

        let err = tool
            .execute(json!({"doctype": "Customer", "name": "", "data": {}}))
            .await
            .unwrap_err();
        assert!(
            matches!(err, McpError::InvalidParams(ref m) if m == "Doctype, name, and data are required")
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_document_failure() {
        let api = Arc::new(MockApi::authenticated().failing());
        let tool = UpdateDocumentTool::new(api);

        let result = tool
            .execute(json!({"doctype": "Customer", "name": "CUST-0001", "data": {}}))
            .await
            .unwrap();
        assert!(result.is_error());
        assert_eq!(
            result.text_content(),
            "Failed to update Customer CUST-0001: Failed to update Customer CUST-0001: API error (status 500): boom"
        );
    }

    #[test]
    fn test_record_name() {
        assert_eq!(record_name(&json!({"name": "SO-0001"})), "SO-0001");
        assert_eq!(record_name(&json!({})), "(unnamed)");
    }
}
