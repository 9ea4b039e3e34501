//! HTTP request wrapper for the huddle API.
//!
//! Every request carries `Content-Type: application/json`, and
//! `Authorization: Bearer <token>` when a token is available. Bodies are
//! serialized to JSON text; responses are parsed as JSON. Non-2xx responses
//! become [`ApiError::Http`] carrying only the status text.

use huddle_shared::{ApiError, Call, CreateUserRequest, TokenResponse, User};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::storage;

/// Per-request options: method, extra headers and an optional JSON body.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RequestConfig {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add an extra header. `Content-Type` and `Authorization` are always
    /// set by the client and override anything given here.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[derive(Debug, Clone)]
enum TokenSource {
    /// Read from client storage on every request.
    Storage,
    Fixed(Option<String>),
}

/// HTTP client for the huddle API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    token: TokenSource,
}

impl ApiClient {
    /// Create a client that reads its token from client storage.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            token: TokenSource::Storage,
        }
    }

    /// Client configured from the environment, token from storage.
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    /// Use a fixed token instead of client storage. `None` sends
    /// unauthenticated requests.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = TokenSource::Fixed(token);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn current_token(&self) -> Option<String> {
        match &self.token {
            TokenSource::Storage => storage::token(),
            TokenSource::Fixed(token) => token.clone(),
        }
    }

    fn headers(&self, extra: HeaderMap) -> Result<HeaderMap, ApiError> {
        let mut headers = extra;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.current_token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::InvalidRequest(format!("invalid token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Issue a request and return the parsed JSON body.
    ///
    /// An empty 2xx body parses as `null`.
    pub async fn request(&self, path: &str, config: RequestConfig) -> Result<Value, ApiError> {
        let url = self.config.api_url(path);
        let method = config.method.clone();
        let mut rb = self
            .client
            .request(config.method, &url)
            .headers(self.headers(config.headers)?);

        if let Some(body) = &config.body {
            let text = serde_json::to_string(body)
                .map_err(|e| ApiError::InvalidRequest(format!("unencodable body: {e}")))?;
            rb = rb.body(text);
        }

        crate::log_debug!("{} {}", method, url);
        let resp = rb.send().await.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or(status.as_str()).to_string();
            crate::log_warn!("{} {} failed: {} {}", method, url, status.as_u16(), status_text);
            return Err(ApiError::Http { status_text });
        }

        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if text.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))
        }
    }

    async fn request_typed<TRes: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<TRes, ApiError> {
        let value = self.request(path, config).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    fn with_json<TReq: Serialize>(method: Method, body: &TReq) -> Result<RequestConfig, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("unencodable body: {e}")))?;
        Ok(RequestConfig::new(method).with_body(body))
    }

    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        self.request_typed(path, RequestConfig::new(Method::GET)).await
    }

    pub async fn post_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        self.request_typed(path, Self::with_json(Method::POST, body)?).await
    }

    pub async fn put_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        self.request_typed(path, Self::with_json(Method::PUT, body)?).await
    }

    pub async fn patch_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        self.request_typed(path, Self::with_json(Method::PATCH, body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(path, RequestConfig::new(Method::DELETE)).await?;
        Ok(())
    }

    // --- Call service endpoints ---

    /// The user owning the current token.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_json("/api/me").await
    }

    /// Register a user. Persist the returned token with
    /// [`storage::set_token`] to authenticate later requests.
    pub async fn create_user(&self, name: &str) -> Result<TokenResponse, ApiError> {
        self.post_json(
            "/api/users",
            &CreateUserRequest {
                name: name.to_string(),
            },
        )
        .await
    }

    /// Start a new, empty call.
    pub async fn create_call(&self) -> Result<Call, ApiError> {
        self.request_typed("/api/calls", RequestConfig::new(Method::POST)).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::from_env()
    }
}
