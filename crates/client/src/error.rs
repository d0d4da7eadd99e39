//! Error types for the ERPNext client.

use serde::Deserialize;

/// Result type for client operations.
pub type ErpNextResult<T> = Result<T, ErpNextError>;

/// A single HTTP exchange with the backend failed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS or body read failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The body parsed but lacked the expected envelope field.
    #[error("Unexpected response body: missing `{0}` field")]
    MissingField(&'static str),

    /// An envelope field that must hold a list held something else.
    #[error("Unexpected response body: `{0}` is not a list")]
    NotAList(&'static str),

    /// A request URL could not be built from the configured base.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<FrappeErrorBody>(body)
            .ok()
            .and_then(FrappeErrorBody::into_message)
            .unwrap_or_else(|| body.trim().to_string());

        Self::Api { status, message }
    }
}

/// Error body shape used by Frappe for failed requests.
#[derive(Debug, Deserialize)]
struct FrappeErrorBody {
    #[serde(default)]
    exception: Option<String>,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default, rename = "_server_messages")]
    server_messages: Option<String>,
}

impl FrappeErrorBody {
    fn into_message(self) -> Option<String> {
        if let Some(exception) = self.exception.filter(|e| !e.is_empty()) {
            return Some(exception);
        }
        match self.message {
            Some(serde_json::Value::String(m)) if !m.is_empty() => return Some(m),
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return Some(other.to_string()),
        }
        self.server_messages.filter(|m| !m.is_empty())
    }
}

/// Errors returned by [`crate::ErpNextClient`] operations.
///
/// Every backend failure is wrapped with the action and target it was
/// attempted for; the underlying [`TransportError`] stays reachable via
/// [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
pub enum ErpNextError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to get {doctype} {name}: {source}")]
    Fetch {
        doctype: String,
        name: String,
        source: TransportError,
    },

    #[error("Failed to get {doctype} list: {source}")]
    List {
        doctype: String,
        source: TransportError,
    },

    #[error("Failed to create {doctype}: {source}")]
    Create {
        doctype: String,
        source: TransportError,
    },

    #[error("Failed to update {doctype} {name}: {source}")]
    Update {
        doctype: String,
        name: String,
        source: TransportError,
    },

    #[error("Failed to run report {report_name}: {source}")]
    Report {
        report_name: String,
        source: TransportError,
    },
}

impl ErpNextError {
    /// HTTP status of the failed exchange, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Config(_) => None,
            Self::Fetch { source, .. }
            | Self::List { source, .. }
            | Self::Create { source, .. }
            | Self::Update { source, .. }
            | Self::Report { source, .. } => match source {
                TransportError::Api { status, .. } => Some(*status),
                _ => None,
            },
        }
    }
}
