use serde_json::json;
use tracing::info;
use warden_core::{ApiClient, ServerId};

use crate::error::{decode, unwrap_list, Result};
use crate::types::Backup;

/// Backup listing and on-demand backups.
#[derive(Debug, Clone)]
pub struct Backups {
    client: ApiClient,
}

impl Backups {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, server_id: &ServerId) -> Result<Vec<Backup>> {
        let body = self
            .client
            .get(&self.client.endpoints().server_backups(server_id))
            .await?
            .expect_status(200)?;
        decode("backup list", unwrap_list("backup list", "backups", body)?)
    }

    /// Start a backup using the configuration named by `backup_config`.
    /// The panel answers 201 with the new backup entry.
    pub async fn start(&self, server_id: &ServerId, backup_config: &str) -> Result<Backup> {
        let path = self.client.endpoints().server_backups(server_id);
        let body = self
            .client
            .post(&path, Some(&json!({ "backupIdentifier": backup_config })))
            .await?
            .expect_status(201)?;
        let backup: Backup = decode("backup", body)?;
        info!(server_id = %server_id, backup_id = %backup.backup_id, "Backup started");
        Ok(backup)
    }
}
