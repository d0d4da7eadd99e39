//! HTTP transport layer for the ERPNext client.

use crate::config::ClientConfig;
use crate::error::{ErpNextError, ErpNextResult, TransportError};
use reqwest::{header, Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Result of a single HTTP exchange.
pub type TransportResult<T> = Result<T, TransportError>;

/// Query string pairs appended to a GET request.
pub type QueryPairs = Vec<(&'static str, String)>;

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: &ClientConfig) -> ErpNextResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ErpNextError::Config(format!("Invalid ERPNext URL: {}", e)))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(ref credentials) = config.credentials {
            let mut value = header::HeaderValue::from_str(&credentials.authorization_value())
                .map_err(|_| ErpNextError::Config("Invalid API key format".to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ErpNextError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Build a URL by appending percent-encoded path segments to the base URL.
    pub fn build_url(&self, segments: &[&str]) -> TransportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and parse the JSON body of a successful response.
    async fn execute(&self, request: RequestBuilder) -> TransportResult<Value> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::from_response(status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute a GET request with query parameters.
    pub async fn get(&self, segments: &[&str], query: &QueryPairs) -> TransportResult<Value> {
        let url = self.build_url(segments)?;
        debug!(url = %url, params = query.len(), "GET request");

        self.execute(self.client.get(url).query(query)).await
    }

    /// Execute a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> TransportResult<Value> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "POST request");

        self.execute(self.client.post(url).json(body)).await
    }

    /// Execute a PUT request with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> TransportResult<Value> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "PUT request");

        self.execute(self.client.put(url).json(body)).await
    }
}

/// Take the named envelope field out of a response body.
pub fn envelope(mut body: Value, key: &'static str) -> TransportResult<Value> {
    body.as_object_mut()
        .and_then(|map| map.remove(key))
        .ok_or(TransportError::MissingField(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_transport(base_url: &str) -> HttpTransport {
        let config = ClientConfig::new(base_url, None, None).unwrap();
        HttpTransport::new(&config).unwrap()
    }

    fn create_transport_with_auth(base_url: &str, key: &str, secret: &str) -> HttpTransport {
        let config =
            ClientConfig::new(base_url, Some(key.to_string()), Some(secret.to_string())).unwrap();
        HttpTransport::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_request_with_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/resource/Item"))
            .and(query_param("limit_page_length", "5"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let query = vec![("limit_page_length", "5".to_string())];

        let body = transport.get(&["api", "resource", "Item"], &query).await.unwrap();
        assert_eq!(body, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_post_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/resource/Customer"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"data": {"customer_name": "Acme"}})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"name": "CUST-0001"}})),
            )
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let body = transport
            .post(
                &["api", "resource", "Customer"],
                &json!({"data": {"customer_name": "Acme"}}),
            )
            .await
            .unwrap();

        assert_eq!(body["data"]["name"], "CUST-0001");
    }

    #[tokio::test]
    async fn test_put_request() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/resource/Customer/CUST-0001"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"name": "CUST-0001"}})),
            )
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let body = transport
            .put(&["api", "resource", "Customer", "CUST-0001"], &json!({"data": {}}))
            .await
            .unwrap();

        assert_eq!(body["data"]["name"], "CUST-0001");
    }

    #[tokio::test]
    async fn test_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/resource/Item/ITEM-001"))
            .and(header("Authorization", "token key123:secret456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport_with_auth(&server.uri(), "key123", "secret456");
        let result = transport
            .get(&["api", "resource", "Item", "ITEM-001"], &Vec::new())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_error_on_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/resource/Item/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"exception": "DoesNotExistError", "exc_type": "DoesNotExistError"})),
            )
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let result = transport
            .get(&["api", "resource", "Item", "missing"], &Vec::new())
            .await;

        match result {
            Err(TransportError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "DoesNotExistError");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/resource/Item"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let result = transport.get(&["api", "resource", "Item"], &Vec::new()).await;

        assert!(matches!(result, Err(TransportError::Json(_))));
    }

    #[tokio::test]
    async fn test_timeout_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/resource/Item"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig::new(server.uri(), None, None)
            .unwrap()
            .with_timeout(Duration::from_millis(50));
        let transport = HttpTransport::new(&config).unwrap();

        let result = transport.get(&["api", "resource", "Item"], &Vec::new()).await;
        assert!(matches!(result, Err(TransportError::Http(_))));
    }

    #[test]
    fn test_build_url() {
        let transport = create_transport("http://localhost:8000");

        let url = transport.build_url(&["api", "resource", "Item"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/resource/Item");
    }

    #[test]
    fn test_transport_is_independent_of_config() {
        let transport = {
            let config = ClientConfig::new("http://localhost:8000", None, None).unwrap();
            HttpTransport::new(&config).unwrap()
        };

        let url = transport.build_url(&["api", "resource", "Item"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/resource/Item");
    }

    #[test]
    fn test_build_url_with_trailing_slash() {
        let transport = create_transport("http://localhost:8000/");

        let url = transport.build_url(&["api", "resource", "Item"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/resource/Item");
        assert!(!url.path().contains("//"));
    }

    #[test]
    fn test_build_url_keeps_base_path() {
        let transport = create_transport("https://erp.example.com/erp/");

        let url = transport.build_url(&["api", "resource", "Item"]).unwrap();
        assert_eq!(url.as_str(), "https://erp.example.com/erp/api/resource/Item");
    }

    #[test]
    fn test_build_url_encodes_segments() {
        let transport = create_transport("http://localhost:8000");

        let url = transport
            .build_url(&["api", "resource", "Sales Order", "SO/0001"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/resource/Sales%20Order/SO%2F0001"
        );
    }

    #[test]
    fn test_envelope() {
        let data = envelope(json!({"data": [1, 2]}), "data").unwrap();
        assert_eq!(data, json!([1, 2]));

        let missing = envelope(json!({"message": "ok"}), "data");
        assert!(matches!(missing, Err(TransportError::MissingField("data"))));

        let not_object = envelope(json!([1]), "data");
        assert!(matches!(not_object, Err(TransportError::MissingField("data"))));
    }
}
