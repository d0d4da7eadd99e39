// DocType discovery and field introspection tools

use crate::error::{McpError, McpResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, parse_arguments, present, Tool};
use erpnext_client::{DocListQuery, ErpNextApi};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Maximum characters kept in a field's sample value.
const SAMPLE_CHARS: usize = 50;

/// Tool to list every DocType name
pub struct GetDocTypesTool {
    api: Arc<dyn ErpNextApi>,
}

impl GetDocTypesTool {
    pub fn new(api: Arc<dyn ErpNextApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Tool for GetDocTypesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_doctypes".to_string(),
            description: "Get a list of all available DocTypes".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: Value) -> McpResult<CallToolResult> {
        let doctypes = self.api.get_all_doctypes().await;
        Ok(CallToolResult::text(serde_json::to_string_pretty(&doctypes)?))
    }
}

/// Tool to infer a DocType's fields from one sample document
pub struct GetDocTypeFieldsTool {
    api: Arc<dyn ErpNextApi>,
}

impl GetDocTypeFieldsTool {
    pub fn new(api: Arc<dyn ErpNextApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct GetDocTypeFieldsArgs {
    doctype: Option<String>,
}

/// Field inferred from a sample record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub fieldname: String,
    /// Kind of the sample value: string, number, boolean, object, array or null.
    pub value: &'static str,
    pub sample: Option<String>,
}

/// Describe each key of a sample record.
pub fn describe_fields(record: &Map<String, Value>) -> Vec<FieldDescriptor> {
    record
        .iter()
        .map(|(name, value)| FieldDescriptor {
            fieldname: name.clone(),
            value: value_kind(value),
            sample: sample_text(value),
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn sample_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(SAMPLE_CHARS).collect())
}

#[async_trait::async_trait]
impl Tool for GetDocTypeFieldsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_doctype_fields".to_string(),
            description: "Get fields list for a specific DocType".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "doctype": json_schema_string("ERPNext DocType (e.g., Customer, Item)")
                }),
                vec!["doctype"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> McpResult<CallToolResult> {
        let args: GetDocTypeFieldsArgs = parse_arguments("get_doctype_fields", arguments)?;
        let doctype = present(&args.doctype)
            .ok_or_else(|| McpError::InvalidParams("Doctype is required".to_string()))?;

        let query = DocListQuery::new()
            .filters(Map::new())
            .fields(["*"])
            .limit(1);
        let documents = match self.api.get_doc_list(doctype, &query).await {
            Ok(documents) => documents,
            Err(e) => {
                return Ok(CallToolResult::error(format!(
                    "Failed to get fields for {}: {}",
                    doctype, e
                )))
            }
        };

        let Some(sample) = documents.first() else {
            return Ok(CallToolResult::error(format!(
                "No documents found for {}. Cannot determine fields.",
                doctype
            )));
        };

        let Some(record) = sample.as_object() else {
            return Ok(CallToolResult::error(format!(
                "Failed to get fields for {}: sample document is not an object",
                doctype
            )));
        };

        let fields = describe_fields(record);
        Ok(CallToolResult::text(serde_json::to_string_pretty(&fields)?))
    }
}
