use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{PanelConfig, TimeoutConfig};
use crate::error::{ApiError, Result};

/// HTTP verbs the panel API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A successful (2xx) panel response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body. `Value::Null` for 204 and empty bodies.
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Accept only `expected`; any other 2xx is reported as unrecognized.
    pub fn expect_status(self, expected: u16) -> Result<Value> {
        if self.status == expected {
            Ok(self.body)
        } else {
            Err(ApiError::UnrecognizedStatus {
                status: self.status,
            })
        }
    }
}

/// One request/response round-trip against the panel.
///
/// Implementations attach authentication, enforce a timeout, and turn every
/// non-2xx status into an [`ApiError`] via [`ApiError::from_status`].
/// No retries happen at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>)
        -> Result<ApiResponse>;
}

/// reqwest-backed transport used against a real panel.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(panel: &PanelConfig, timeouts: &TimeoutConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key_header = HeaderName::from_bytes(panel.api_key_header.as_bytes())
            .map_err(|e| ApiError::Config(format!("invalid api_key_header: {e}")))?;
        let mut key_value = HeaderValue::from_str(&panel.api_key)
            .map_err(|e| ApiError::Config(format!("invalid api_key: {e}")))?;
        key_value.set_sensitive(true);
        headers.insert(key_header, key_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeouts.connect())
            .read_timeout(timeouts.read())
            .build()?;

        Ok(Self {
            client,
            base_url: panel.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %path, "panel request");

        let mut req = self.client.request(method.into(), &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, %method, %path, body = %text, "panel API error");
            return Err(ApiError::from_status(status, path, &text));
        }

        // 204 carries no body and is never inspected.
        if status == 204 {
            return Ok(ApiResponse::new(status, Value::Null));
        }

        let text = resp.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Ok(ApiResponse::new(status, body))
    }
}
