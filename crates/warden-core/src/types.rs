use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a managed game server, assigned by the panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerId(pub String);

impl ServerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ServerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a scheduled task, unique within one server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Power action applied to a game server, either directly or by a scheduled job.
///
/// The panel encodes these as integers on the wire (see [`ServerAction::value`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerAction {
    Invalid,
    Stop,
    Start,
    Kill,
    Restart,
}

impl ServerAction {
    pub fn value(self) -> i64 {
        match self {
            ServerAction::Invalid => 0,
            ServerAction::Stop => 1,
            ServerAction::Start => 2,
            ServerAction::Kill => 3,
            ServerAction::Restart => 4,
        }
    }

    /// Inverse of [`ServerAction::value`]. `None` for integers outside the enum.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(ServerAction::Invalid),
            1 => Some(ServerAction::Stop),
            2 => Some(ServerAction::Start),
            3 => Some(ServerAction::Kill),
            4 => Some(ServerAction::Restart),
            _ => None,
        }
    }

    /// Every action the panel will actually execute.
    pub fn is_executable(self) -> bool {
        !matches!(self, ServerAction::Invalid)
    }
}

impl fmt::Display for ServerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerAction::Invalid => write!(f, "invalid"),
            ServerAction::Stop => write!(f, "stop"),
            ServerAction::Start => write!(f, "start"),
            ServerAction::Kill => write!(f, "kill"),
            ServerAction::Restart => write!(f, "restart"),
        }
    }
}

impl std::str::FromStr for ServerAction {
    type Err = String;

    /// Parses the action name, ignoring ASCII case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invalid" => Ok(ServerAction::Invalid),
            "stop" => Ok(ServerAction::Stop),
            "start" => Ok(ServerAction::Start),
            "kill" => Ok(ServerAction::Kill),
            "restart" => Ok(ServerAction::Restart),
            other => Err(format!("unknown server action: {other}")),
        }
    }
}
