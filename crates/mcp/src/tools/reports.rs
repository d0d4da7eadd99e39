// Report tool

use crate::error::{McpError, McpResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_free_object, json_schema_object, json_schema_string, parse_arguments, present, Tool};
use erpnext_client::ErpNextApi;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Tool to run a query report
pub struct RunReportTool {
    api: Arc<dyn ErpNextApi>,
}

impl RunReportTool {
    pub fn new(api: Arc<dyn ErpNextApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Deserialize)]
struct RunReportArgs {
    report_name: Option<String>,
    #[serde(default)]
    filters: Option<Map<String, Value>>,
}

#[async_trait::async_trait]
impl Tool for RunReportTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "run_report".to_string(),
            description: "Run an ERPNext report".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "report_name": json_schema_string("Name of the report"),
                    "filters": json_schema_free_object("Report filters (optional)")
                }),
                vec!["report_name"],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> McpResult<CallToolResult> {
        let args: RunReportArgs = parse_arguments("run_report", arguments)?;
        let report_name = present(&args.report_name)
            .ok_or_else(|| McpError::InvalidParams("Report name is required".to_string()))?;

        match self.api.run_report(report_name, args.filters.as_ref()).await {
            Ok(report) => Ok(CallToolResult::text(serde_json::to_string_pretty(&report)?)),
            Err(e) => Ok(CallToolResult::error(format!(
                "Failed to run report {}: {}",
                report_name, e
            ))),
        }
    }
}
