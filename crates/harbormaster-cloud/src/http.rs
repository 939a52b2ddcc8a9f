//! Provider HTTP client
//!
//! Every provider call goes through the [`Transport`] trait so reconciliation
//! logic can be driven by [`HttpTransport`] in production and by a scripted
//! transport in tests. The transport is stateless between calls.

use crate::error::{CloudError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// HTTP verbs used against provider APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether the verb changes remote state
    pub fn is_mutating(self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A request relative to a provider base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn post(path: impl Into<String>, body: &impl Serialize) -> Result<Self> {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: &impl Serialize) -> Result<Self> {
        Self::new(Method::Put, path).with_body(body)
    }

    fn with_body(mut self, body: &impl Serialize) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Look up a query parameter by key
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw provider response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx, including 204 No Content
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }

    /// Turn a non-2xx response into the matching error kind
    pub fn error_for_status(self, request: &ApiRequest) -> Result<Self> {
        match self.status {
            _ if self.is_success() => Ok(self),
            401 | 403 => Err(CloudError::AuthenticationFailed {
                status: self.status,
                message: self.body_text(),
            }),
            404 => Err(CloudError::ResourceNotFound(request.path.clone())),
            status => Err(CloudError::UnexpectedStatus {
                method: request.method,
                path: request.path.clone(),
                status,
            }),
        }
    }

    /// Require one exact success code, e.g. 204 for deletes
    pub fn expect_status(self, request: &ApiRequest, expected: u16) -> Result<Self> {
        match self.status {
            status if status == expected => Ok(self),
            401 | 403 => Err(CloudError::AuthenticationFailed {
                status: self.status,
                message: self.body_text(),
            }),
            status => Err(CloudError::UnexpectedStatus {
                method: request.method,
                path: request.path.clone(),
                status,
            }),
        }
    }
}

/// Sends provider requests
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Send a request, require 2xx and decode the JSON body
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: &ApiRequest,
) -> Result<T> {
    transport
        .send(request)
        .await?
        .error_for_status(request)?
        .json()
}

/// How requests authenticate against the provider
#[derive(Clone)]
pub enum Credentials {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `X-Auth-Email` and `X-Auth-Key` headers
    EmailKey { email: String, key: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Credentials::EmailKey { email, .. } => f
                .debug_struct("EmailKey")
                .field("email", email)
                .field("key", &"<redacted>")
                .finish(),
        }
    }
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        builder = match &self.credentials {
            Credentials::Bearer(token) => builder.bearer_auth(token),
            Credentials::EmailKey { email, key } => builder
                .header("X-Auth-Email", email)
                .header("X-Auth-Key", key),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::trace!("{} {}", request.method, url);

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        tracing::trace!(
            "response status: {} body: {}",
            status,
            String::from_utf8_lossy(&body)
        );

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_bearer_get_with_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/droplets"))
            .and(query_param("page", "2"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"droplets":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(
            format!("{}/", server.uri()),
            Credentials::Bearer("secret-token".to_string()),
        );
        let response = transport
            .send(&ApiRequest::get("droplets").query("page", 2))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let value: serde_json::Value = response.json().unwrap();
        assert!(value["droplets"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_email_key_headers_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zone-1/dns_records"))
            .and(header("X-Auth-Email", "ops@example.com"))
            .and(header("X-Auth-Key", "cf-key"))
            .and(body_json(serde_json::json!({"type": "A"})))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(
            format!("{}/zone-1", server.uri()),
            Credentials::EmailKey {
                email: "ops@example.com".to_string(),
                key: "cf-key".to_string(),
            },
        );
        let request =
            ApiRequest::post("dns_records", &serde_json::json!({"type": "A"})).unwrap();
        let response = transport.send(&request).await.unwrap();

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_no_content_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/droplets/42"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Credentials::Bearer("t".to_string()));
        let request = ApiRequest::delete("droplets/42");
        let response = transport.send(&request).await.unwrap();

        assert!(response.is_success());
        assert!(response.expect_status(&request, 204).is_ok());
    }

    #[test]
    fn test_error_for_status_classification() {
        let request = ApiRequest::get("floating_ips/203.0.113.9");

        let auth = ApiResponse::new(401, r#"{"id":"unauthorized"}"#).error_for_status(&request);
        assert!(matches!(
            auth,
            Err(CloudError::AuthenticationFailed { status: 401, .. })
        ));

        let missing = ApiResponse::new(404, "").error_for_status(&request);
        assert!(matches!(missing, Err(CloudError::ResourceNotFound(_))));

        let server_error = ApiResponse::new(500, "").error_for_status(&request);
        assert!(matches!(
            server_error,
            Err(CloudError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[test]
    fn test_expect_status_rejects_other_success_codes() {
        let request = ApiRequest::delete("droplets/1");
        let result = ApiResponse::new(200, "").expect_status(&request, 204);

        assert!(matches!(
            result,
            Err(CloudError::UnexpectedStatus {
                method: Method::Delete,
                status: 200,
                ..
            })
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let creds = Credentials::EmailKey {
            email: "ops@example.com".to_string(),
            key: "very-secret".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("ops@example.com"));
        assert!(!rendered.contains("very-secret"));
    }
}
