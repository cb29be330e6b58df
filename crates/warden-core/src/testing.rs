//! In-memory [`Transport`] for tests.
//!
//! Replies are scripted per `(method, path)`. Each route holds a queue; the
//! last reply on a route is sticky so a single scripted reply answers every
//! later call, until a new reply is scripted for that route. Every request is
//! recorded, which lets tests assert that a client-side validation failure
//! performed zero network calls.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::ApiClient;
use crate::endpoints::Endpoints;
use crate::error::{ApiError, Result};
use crate::transport::{ApiResponse, Method, Transport};

/// A request observed by [`FakeTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: Value,
    served: bool,
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FakeTransport::script`].
    pub fn with(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.script(method, path, status, body);
        self
    }

    /// Queue a reply for `(method, path)`.
    pub fn script(&self, method: Method, path: &str, status: u16, body: Value) {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = routes.entry((method, path.to_string())).or_default();
        // A sticky reply that already answered is replaced, not queued behind.
        if queue.len() == 1 && queue.front().is_some_and(|r| r.served) {
            queue.clear();
        }
        queue.push_back(Reply {
            status,
            body,
            served: false,
        });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Calls matching one verb, in order.
    pub fn calls_with(&self, method: Method) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                method,
                path: path.to_string(),
                body: body.cloned(),
            });

        let reply = {
            let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
            match routes.get_mut(&(method, path.to_string())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front_mut().map(|r| {
                    r.served = true;
                    r.clone()
                }),
                None => None,
            }
        };

        // Unscripted routes behave like a panel that has never heard of them.
        let Some(reply) = reply else {
            return Err(ApiError::from_status(404, path, ""));
        };

        if (200..300).contains(&reply.status) {
            Ok(ApiResponse::new(reply.status, reply.body))
        } else {
            Err(ApiError::from_status(
                reply.status,
                path,
                &reply.body.to_string(),
            ))
        }
    }
}

/// Wrap a fake in an [`ApiClient`] using the default route table.
pub fn fake_client(fake: &Arc<FakeTransport>) -> ApiClient {
    ApiClient::new(fake.clone(), Endpoints::default())
}
