use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;
use warden_core::{ApiClient, ServerAction, ServerId, TaskId};

use crate::error::{Result, SchedulerError};
use crate::shape::section_field;
use crate::types::JobKind;

/// Desired job payload for a create or update request.
///
/// This is the one place that turns a job kind plus its data into the wire
/// shape; task creation and the job setters both go through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSpec {
    ServerAction(ServerAction),
    RunCommands(Vec<String>),
    StartBackup(String),
}

impl JobSpec {
    /// Build a spec from a job kind and its textual data.
    ///
    /// - `RunCommands`: `data` is split on `;`, blank segments are dropped.
    /// - `ServerAction`: `data` is an action name (`stop`, `start`, `kill`, `restart`).
    /// - `StartBackup`: `data` is the backup configuration id, passed through verbatim.
    pub fn parse(kind: JobKind, data: &str) -> Result<Self> {
        let spec = match kind {
            JobKind::ServerAction => {
                let action = data
                    .parse::<ServerAction>()
                    .map_err(SchedulerError::InvalidServerAction)?;
                JobSpec::ServerAction(action)
            }
            JobKind::RunCommands => JobSpec::RunCommands(clean_commands(data.split(';'))),
            JobKind::StartBackup => JobSpec::StartBackup(data.to_string()),
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn kind(&self) -> JobKind {
        match self {
            JobSpec::ServerAction(_) => JobKind::ServerAction,
            JobSpec::RunCommands(_) => JobKind::RunCommands,
            JobSpec::StartBackup(_) => JobKind::StartBackup,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            JobSpec::ServerAction(action) if !action.is_executable() => Err(
                SchedulerError::InvalidServerAction(format!("{action} cannot be scheduled")),
            ),
            JobSpec::RunCommands(cmds) if cmds.is_empty() => Err(SchedulerError::EmptyCommandList),
            _ => Ok(()),
        }
    }

    /// Wire shape of the `job` section.
    pub fn to_json(&self) -> Value {
        match self {
            JobSpec::ServerAction(action) => json!({ "action": action.value() }),
            JobSpec::RunCommands(cmds) => json!({ "commands": cmds }),
            JobSpec::StartBackup(id) => json!({ "backupIdentifier": id }),
        }
    }
}

/// Trimmed commands with blank entries dropped.
fn clean_commands<I, S>(commands: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    commands
        .into_iter()
        .map(Into::into)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// The task a job handle points at. Job handles hold no cached payload.
///
/// `deleted` is shared with the owning [`Task`](crate::Task).
#[derive(Debug, Clone)]
struct JobTarget {
    client: ApiClient,
    server_id: ServerId,
    task_id: TaskId,
    deleted: Arc<AtomicBool>,
}

impl JobTarget {
    fn ensure_active(&self) -> Result<()> {
        if self.deleted.load(Ordering::Acquire) {
            return Err(SchedulerError::OperationOnDeletedTask {
                task_id: self.task_id.to_string(),
            });
        }
        Ok(())
    }

    /// Re-fetch the task document; the job may have been edited since last call.
    async fn document(&self) -> Result<Value> {
        self.ensure_active()?;
        let path = self.client.endpoints().task(&self.server_id, &self.task_id);
        debug!(server_id = %self.server_id, task_id = %self.task_id, "fetching job payload");
        Ok(self.client.get(&path).await?.expect_status(200)?)
    }

    async fn put(&self, spec: &JobSpec) -> Result<()> {
        self.ensure_active()?;
        spec.validate()?;
        let path = self.client.endpoints().task(&self.server_id, &self.task_id);
        let body = json!({ "job": spec.to_json() });
        self.client.put(&path, &body).await?.expect_status(200)?;
        debug!(server_id = %self.server_id, task_id = %self.task_id, job = %spec.kind(), "job updated");
        Ok(())
    }
}

/// Job that applies a power action to the server.
#[derive(Debug, Clone)]
pub struct ServerActionJob {
    target: JobTarget,
}

impl ServerActionJob {
    pub async fn action(&self) -> Result<ServerAction> {
        let doc = self.target.document().await?;
        let raw = section_field(&doc, "job", "action")?;
        raw.as_i64()
            .and_then(ServerAction::from_value)
            .ok_or_else(|| SchedulerError::InvalidTaskDetails(format!("unknown action: {raw}")))
    }

    /// `ServerAction::Invalid` is rejected before any request.
    pub async fn set_action(&self, action: ServerAction) -> Result<()> {
        self.target.put(&JobSpec::ServerAction(action)).await
    }
}

/// Job that runs console commands in order.
#[derive(Debug, Clone)]
pub struct RunCommandsJob {
    target: JobTarget,
}

impl RunCommandsJob {
    pub async fn commands(&self) -> Result<Vec<String>> {
        let doc = self.target.document().await?;
        let raw = section_field(&doc, "job", "commands")?;
        let list = raw
            .as_array()
            .ok_or_else(|| SchedulerError::InvalidTaskDetails(format!("commands is not a list: {raw}")))?;
        let commands = list
            .iter()
            .map(|c| {
                c.as_str().map(String::from).ok_or_else(|| {
                    SchedulerError::InvalidTaskDetails(format!("command is not a string: {c}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if commands.is_empty() {
            return Err(SchedulerError::NoCommandsFound);
        }
        Ok(commands)
    }

    /// Replace the command list. Entries are trimmed and blank ones dropped;
    /// if none remain this fails with `EmptyCommandList` before any request.
    pub async fn set_commands<I, S>(&self, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target
            .put(&JobSpec::RunCommands(clean_commands(commands)))
            .await
    }
}

/// Job that starts a backup using a stored backup configuration.
#[derive(Debug, Clone)]
pub struct BackupJob {
    target: JobTarget,
}

impl BackupJob {
    pub async fn backup_guid(&self) -> Result<String> {
        let doc = self.target.document().await?;
        let raw = section_field(&doc, "job", "backupIdentifier")?;
        raw.as_str().map(String::from).ok_or_else(|| {
            SchedulerError::InvalidTaskDetails(format!("backupIdentifier is not a string: {raw}"))
        })
    }

    pub async fn set_backup_guid(&self, backup_id: &str) -> Result<()> {
        self.target
            .put(&JobSpec::StartBackup(backup_id.to_string()))
            .await
    }
}

/// The job side of a task, one variant per [`JobKind`].
///
/// Match on the variant to reach kind-specific methods statically. The
/// forwarding methods on `Job` itself are the dynamic fallback: calling one
/// that does not belong to the variant fails with
/// [`SchedulerError::MethodNotSupportedForJobKind`] and sends nothing.
#[derive(Debug, Clone)]
pub enum Job {
    ServerAction(ServerActionJob),
    RunCommands(RunCommandsJob),
    StartBackup(BackupJob),
}

impl Job {
    pub(crate) fn new(
        kind: JobKind,
        client: ApiClient,
        server_id: ServerId,
        task_id: TaskId,
        deleted: Arc<AtomicBool>,
    ) -> Self {
        let target = JobTarget {
            client,
            server_id,
            task_id,
            deleted,
        };
        match kind {
            JobKind::ServerAction => Job::ServerAction(ServerActionJob { target }),
            JobKind::RunCommands => Job::RunCommands(RunCommandsJob { target }),
            JobKind::StartBackup => Job::StartBackup(BackupJob { target }),
        }
    }

    pub fn kind(&self) -> JobKind {
        match self {
            Job::ServerAction(_) => JobKind::ServerAction,
            Job::RunCommands(_) => JobKind::RunCommands,
            Job::StartBackup(_) => JobKind::StartBackup,
        }
    }

    fn unsupported(&self, method: &'static str) -> SchedulerError {
        SchedulerError::MethodNotSupportedForJobKind {
            method,
            job: self.kind(),
        }
    }

    pub async fn action(&self) -> Result<ServerAction> {
        match self {
            Job::ServerAction(job) => job.action().await,
            _ => Err(self.unsupported("action")),
        }
    }

    pub async fn set_action(&self, action: ServerAction) -> Result<()> {
        match self {
            Job::ServerAction(job) => job.set_action(action).await,
            _ => Err(self.unsupported("set_action")),
        }
    }

    pub async fn commands(&self) -> Result<Vec<String>> {
        match self {
            Job::RunCommands(job) => job.commands().await,
            _ => Err(self.unsupported("commands")),
        }
    }

    pub async fn set_commands<I, S>(&self, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Job::RunCommands(job) => job.set_commands(commands).await,
            _ => Err(self.unsupported("set_commands")),
        }
    }

    pub async fn backup_guid(&self) -> Result<String> {
        match self {
            Job::StartBackup(job) => job.backup_guid().await,
            _ => Err(self.unsupported("backup_guid")),
        }
    }

    pub async fn set_backup_guid(&self, backup_id: &str) -> Result<()> {
        match self {
            Job::StartBackup(job) => job.set_backup_guid(backup_id).await,
            _ => Err(self.unsupported("set_backup_guid")),
        }
    }
}
