use serde_json::json;
use tracing::debug;
use warden_core::{ApiClient, ApiError, ServerId};

use crate::error::{decode, unwrap_list, Result, ServerError};
use crate::types::ConsoleLine;

/// Read and write a server's live console.
#[derive(Debug, Clone)]
pub struct Console {
    client: ApiClient,
}

impl Console {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Recent console output, oldest first.
    pub async fn lines(&self, server_id: &ServerId) -> Result<Vec<ConsoleLine>> {
        let body = self
            .client
            .get(&self.client.endpoints().server_console(server_id))
            .await?
            .expect_status(200)?;
        decode("console", unwrap_list("console", "lines", body)?)
    }

    pub async fn send(&self, server_id: &ServerId, command: &str) -> Result<()> {
        let command = command.trim();
        if command.is_empty() {
            return Err(ServerError::EmptyCommand);
        }
        let path = self.client.endpoints().server_console(server_id);
        let resp = self
            .client
            .post(&path, Some(&json!({ "command": command })))
            .await?;
        match resp.status {
            200 | 204 => {
                debug!(server_id = %server_id, command, "Console command sent");
                Ok(())
            }
            status => Err(ApiError::UnrecognizedStatus { status }.into()),
        }
    }
}
