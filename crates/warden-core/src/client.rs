use std::sync::Arc;

use serde_json::Value;

use crate::config::WardenConfig;
use crate::endpoints::Endpoints;
use crate::error::Result;
use crate::transport::{ApiResponse, HttpTransport, Method, Transport};

/// Cheap-to-clone handle shared by every scheduler, task and job handle.
///
/// Holds no per-server state; it is a transport plus the route table.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Build a reqwest-backed client from loaded configuration.
    pub fn from_config(config: &WardenConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config.panel, &config.timeouts)?;
        Ok(Self::new(
            Arc::new(transport),
            Endpoints::new(&config.panel.api_version),
        ))
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.transport.request(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.transport.request(Method::Post, path, body).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.transport.request(Method::Put, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.transport.request(Method::Delete, path, None).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}
