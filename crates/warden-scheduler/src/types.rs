use serde::{Deserialize, Serialize};
use warden_core::TaskId;

use crate::error::{Result, SchedulerError};

/// When a task fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingKind {
    /// Daily at a time of day.
    FixedTime,
    /// Every N seconds.
    Interval,
    /// Only when triggered manually.
    Timeless,
}

impl std::fmt::Display for TimingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TimingKind::FixedTime => "fixed-time",
            TimingKind::Interval => "interval",
            TimingKind::Timeless => "timeless",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TimingKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fixed-time" | "fixed" | "time" => Ok(TimingKind::FixedTime),
            "interval" => Ok(TimingKind::Interval),
            "timeless" => Ok(TimingKind::Timeless),
            other => Err(format!("unknown timing kind: {other}")),
        }
    }
}

/// What a task does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    ServerAction,
    RunCommands,
    StartBackup,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobKind::ServerAction => "server-action",
            JobKind::RunCommands => "run-commands",
            JobKind::StartBackup => "start-backup",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "server-action" | "action" => Ok(JobKind::ServerAction),
            "run-commands" | "commands" => Ok(JobKind::RunCommands),
            "start-backup" | "backup" => Ok(JobKind::StartBackup),
            other => Err(format!("unknown job kind: {other}")),
        }
    }
}

/// Whether players must (not) be online for the task to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerRequirement {
    #[default]
    None,
    /// Fire only when the server is empty.
    Empty,
    /// Fire only when at least one player is online.
    AtLeastOne,
}

impl PlayerRequirement {
    pub fn value(self) -> i64 {
        match self {
            PlayerRequirement::None => 0,
            PlayerRequirement::Empty => 1,
            PlayerRequirement::AtLeastOne => 2,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(PlayerRequirement::None),
            1 => Some(PlayerRequirement::Empty),
            2 => Some(PlayerRequirement::AtLeastOne),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlayerRequirement::None => "none",
            PlayerRequirement::Empty => "empty",
            PlayerRequirement::AtLeastOne => "at-least-one",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PlayerRequirement {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(PlayerRequirement::None),
            "empty" => Ok(PlayerRequirement::Empty),
            "at-least-one" => Ok(PlayerRequirement::AtLeastOne),
            other => Err(format!("unknown player requirement: {other}")),
        }
    }
}

/// One entry of the task list endpoint. Carries no shape information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub task_id: TaskId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
}

/// Task counts reported by the scheduler summary endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerSummary {
    pub total: u64,
    #[serde(default)]
    pub fixed_time: u64,
    #[serde(default)]
    pub interval: u64,
    #[serde(default)]
    pub timeless: u64,
}

impl SchedulerSummary {
    pub fn count(&self, timing: TimingKind) -> u64 {
        match timing {
            TimingKind::FixedTime => self.fixed_time,
            TimingKind::Interval => self.interval,
            TimingKind::Timeless => self.timeless,
        }
    }
}

/// Task names may only contain ASCII letters, digits and spaces.
pub fn validate_task_name(name: &str) -> Result<()> {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
        Ok(())
    } else {
        Err(SchedulerError::NameContainsSpecialCharacters {
            name: name.to_string(),
        })
    }
}
