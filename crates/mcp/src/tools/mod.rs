pub mod doctypes;
pub mod documents;
pub mod reports;
mod registry;

pub use doctypes::{describe_fields, FieldDescriptor, GetDocTypeFieldsTool, GetDocTypesTool};
pub use documents::{CreateDocumentTool, GetDocumentsTool, UpdateDocumentTool};
pub use reports::RunReportTool;
pub use registry::{
    json_schema_array, json_schema_free_object, json_schema_number, json_schema_object,
    json_schema_string, parse_arguments, present, Tool, ToolRegistry,
};

use erpnext_client::ErpNextApi;
use std::sync::Arc;

/// Registry holding the six ERPNext tools, in the order they are advertised.
pub fn erpnext_tools(api: Arc<dyn ErpNextApi>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GetDocTypesTool::new(api.clone())));
    registry.register(Arc::new(GetDocTypeFieldsTool::new(api.clone())));
    registry.register(Arc::new(GetDocumentsTool::new(api.clone())));
    registry.register(Arc::new(CreateDocumentTool::new(api.clone())));
    registry.register(Arc::new(UpdateDocumentTool::new(api.clone())));
    registry.register(Arc::new(RunReportTool::new(api)));
    registry
}
