//! Shared plumbing for the panel SDK.
//!
//! Configuration, the error taxonomy for HTTP statuses, the route table and
//! the [`Transport`] seam every higher-level crate talks through.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::ApiClient;
pub use config::WardenConfig;
pub use endpoints::Endpoints;
pub use error::{ApiError, Result};
pub use transport::{ApiResponse, HttpTransport, Method, Transport};
pub use types::{ServerAction, ServerId, TaskId};
