use serde::{Deserialize, Serialize};
use warden_core::ServerId;

/// Process state of a managed game server as reported by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Offline,
    Starting,
    Online,
    Stopping,
    Crashed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServerStatus::Offline => "offline",
            ServerStatus::Starting => "starting",
            ServerStatus::Online => "online",
            ServerStatus::Stopping => "stopping",
            ServerStatus::Crashed => "crashed",
            ServerStatus::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Listing and details entry for one server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub server_id: ServerId,
    pub name: String,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub players_online: u32,
    #[serde(default)]
    pub max_players: u32,
    /// Game/server software version, if the panel reports one.
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleLine {
    pub text: String,
    /// RFC3339, when the panel timestamps lines.
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub backup_id: String,
    #[serde(default)]
    pub name: String,
    /// Backup configuration the archive was produced from.
    pub backup_identifier: Option<String>,
    pub created_at: Option<String>,
    pub size_bytes: Option<u64>,
}
