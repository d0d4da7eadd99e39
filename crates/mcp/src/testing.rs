// In-memory ErpNextApi used by adapter tests

use erpnext_client::{DocListQuery, ErpNextApi, ErpNextError, ErpNextResult, TransportError};
use serde_json::{json, Map, Value};
use std::sync::Mutex;

pub(crate) struct MockApi {
    authenticated: bool,
    fail: bool,
    list: Vec<Value>,
    record: Option<Value>,
    calls: Mutex<Vec<String>>,
    list_queries: Mutex<Vec<(String, DocListQuery)>>,
}

impl MockApi {
    pub(crate) fn authenticated() -> Self {
        Self {
            authenticated: true,
            fail: false,
            list: Vec::new(),
            record: None,
            calls: Mutex::new(Vec::new()),
            list_queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn anonymous() -> Self {
        Self {
            authenticated: false,
            ..Self::authenticated()
        }
    }

    /// Every document operation fails with a 500.
    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn with_list(mut self, list: Vec<Value>) -> Self {
        self.list = list;
        self
    }

    /// Record returned by get, create, update and run_report.
    pub(crate) fn with_record(mut self, record: Value) -> Self {
        self.record = Some(record);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn last_list_query(&self) -> Option<(String, DocListQuery)> {
        self.list_queries.lock().unwrap().last().cloned()
    }

    fn log_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn boom() -> TransportError {
        TransportError::Api {
            status: 500,
            message: "boom".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ErpNextApi for MockApi {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn get_document(&self, doctype: &str, name: &str) -> ErpNextResult<Value> {
        self.log_call(format!("get_document {} {}", doctype, name));
        if self.fail {
            return Err(ErpNextError::Fetch {
                doctype: doctype.to_string(),
                name: name.to_string(),
                source: Self::boom(),
            });
        }
        Ok(self
            .record
            .clone()
            .unwrap_or_else(|| json!({"doctype": doctype, "name": name})))
    }

    async fn get_doc_list(&self, doctype: &str, query: &DocListQuery) -> ErpNextResult<Vec<Value>> {
        self.log_call(format!("get_doc_list {}", doctype));
        self.list_queries
            .lock()
            .unwrap()
            .push((doctype.to_string(), query.clone()));
        if self.fail {
            return Err(ErpNextError::List {
                doctype: doctype.to_string(),
                source: Self::boom(),
            });
        }
        Ok(self.list.clone())
    }

    async fn create_document(&self, doctype: &str, doc: &Value) -> ErpNextResult<Value> {
        self.log_call(format!("create_document {}", doctype));
        if self.fail {
            return Err(ErpNextError::Create {
                doctype: doctype.to_string(),
                source: Self::boom(),
            });
        }
        Ok(self.record.clone().unwrap_or_else(|| doc.clone()))
    }

    async fn update_document(&self, doctype: &str, name: &str, doc: &Value) -> ErpNextResult<Value> {
        self.log_call(format!("update_document {} {}", doctype, name));
        if self.fail {
            return Err(ErpNextError::Update {
                doctype: doctype.to_string(),
                name: name.to_string(),
                source: Self::boom(),
            });
        }
        Ok(self.record.clone().unwrap_or_else(|| doc.clone()))
    }

    async fn run_report(
        &self,
        report_name: &str,
        filters: Option<&Map<String, Value>>,
    ) -> ErpNextResult<Value> {
        self.log_call(format!(
            "run_report {} {}",
            report_name,
            filters.map(|f| Value::Object(f.clone())).unwrap_or(Value::Null)
        ));
        if self.fail {
            return Err(ErpNextError::Report {
                report_name: report_name.to_string(),
                source: Self::boom(),
            });
        }
        Ok(self.record.clone().unwrap_or_else(|| json!({"result": []})))
    }

    async fn get_all_doctypes(&self) -> Vec<String> {
        self.log_call("get_all_doctypes".to_string());
        vec!["Customer".to_string(), "Item".to_string()]
    }
}
