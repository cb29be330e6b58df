use chrono::NaiveTime;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use warden_core::{ApiClient, ServerId, TaskId};

use crate::error::{Result, SchedulerError};
use crate::job::JobSpec;
use crate::shape::format_time_of_day;
use crate::task::Task;
use crate::types::{validate_task_name, JobKind, SchedulerSummary, TaskSummary, TimingKind};

/// Timing section of a task creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingSpec {
    FixedTime { time: NaiveTime, repeat: bool },
    Interval { secs: u64, repeat: bool },
    Timeless,
}

impl TimingSpec {
    pub fn kind(&self) -> TimingKind {
        match self {
            TimingSpec::FixedTime { .. } => TimingKind::FixedTime,
            TimingSpec::Interval { .. } => TimingKind::Interval,
            TimingSpec::Timeless => TimingKind::Timeless,
        }
    }

    /// Wire shape; `None` for timeless tasks, which omit the section.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            TimingSpec::FixedTime { time, repeat } => Some(json!({
                "time": format_time_of_day(*time),
                "repeat": repeat,
            })),
            TimingSpec::Interval { secs, repeat } => Some(json!({
                "interval": secs,
                "repeat": repeat,
            })),
            TimingSpec::Timeless => None,
        }
    }
}

/// A task creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub enabled: bool,
    pub timing: TimingSpec,
    pub job: JobSpec,
}

impl NewTask {
    pub fn validate(&self) -> Result<()> {
        validate_task_name(&self.name)?;
        if let TimingSpec::Interval { secs: 0, .. } = self.timing {
            return Err(SchedulerError::NonPositiveInterval);
        }
        self.job.validate()
    }

    /// `{name, enabled, timing?, job}`.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".to_string(), json!(self.name));
        body.insert("enabled".to_string(), json!(self.enabled));
        if let Some(timing) = self.timing.to_json() {
            body.insert("timing".to_string(), timing);
        }
        body.insert("job".to_string(), self.job.to_json());
        Value::Object(body)
    }
}

/// Per-server gateway for listing, counting and creating tasks.
///
/// Holds nothing but the owning server id; tasks it returns are independent
/// handles.
#[derive(Debug, Clone)]
pub struct Scheduler {
    client: ApiClient,
    server_id: ServerId,
}

impl Scheduler {
    pub fn new(client: ApiClient, server_id: impl Into<ServerId>) -> Self {
        Self {
            client,
            server_id: server_id.into(),
        }
    }

    pub fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    /// Task counts for this server.
    ///
    /// A 404 here means the server does not exist; it is never read as
    /// "no tasks".
    pub async fn summary(&self) -> Result<SchedulerSummary> {
        let path = self.client.endpoints().scheduler(&self.server_id);
        let body = self.client.get(&path).await?.expect_status(200)?;
        serde_json::from_value(body)
            .map_err(|e| SchedulerError::InvalidTaskDetails(format!("scheduler summary: {e}")))
    }

    pub async fn total_task_amount(&self) -> Result<u64> {
        Ok(self.summary().await?.total)
    }

    pub async fn total_task_amount_of(&self, timing: TimingKind) -> Result<u64> {
        Ok(self.summary().await?.count(timing))
    }

    /// Summaries from the list endpoint only, without per-task round-trips.
    pub async fn task_summaries(&self) -> Result<Vec<TaskSummary>> {
        let path = self.client.endpoints().tasks(&self.server_id);
        let body = self.client.get(&path).await?.expect_status(200)?;
        let list = match body {
            Value::Array(items) => Value::Array(items),
            Value::Object(mut obj) => obj.remove("tasks").ok_or_else(|| {
                SchedulerError::InvalidTaskDetails("task list has no tasks field".to_string())
            })?,
            other => {
                return Err(SchedulerError::InvalidTaskDetails(format!(
                    "task list is not an array: {other}"
                )))
            }
        };
        serde_json::from_value(list)
            .map_err(|e| SchedulerError::InvalidTaskDetails(format!("task list: {e}")))
    }

    /// Every task on the server as a classified handle.
    ///
    /// One list request, then one document request per task, issued in order.
    pub async fn tasks(&self) -> Result<Vec<Task>> {
        let summaries = self.task_summaries().await?;
        debug!(server_id = %self.server_id, count = summaries.len(), "materialising tasks");
        let mut tasks = Vec::with_capacity(summaries.len());
        for summary in summaries {
            tasks.push(
                Task::load(
                    self.client.clone(),
                    self.server_id.clone(),
                    summary.task_id,
                    summary.name,
                    summary.enabled,
                )
                .await?,
            );
        }
        Ok(tasks)
    }

    /// One task by id.
    pub async fn task(&self, task_id: impl Into<TaskId>) -> Result<Task> {
        Task::fetch(self.client.clone(), self.server_id.clone(), task_id.into()).await
    }

    pub async fn create_interval_task(
        &self,
        name: &str,
        enabled: bool,
        repeating: bool,
        interval_secs: u64,
        job_kind: JobKind,
        job_data: &str,
    ) -> Result<Task> {
        validate_task_name(name)?;
        let timing = TimingSpec::Interval {
            secs: interval_secs,
            repeat: repeating,
        };
        self.create_from_parts(name, enabled, timing, job_kind, job_data)
            .await
    }

    pub async fn create_fixed_time_task(
        &self,
        name: &str,
        enabled: bool,
        repeating: bool,
        time: NaiveTime,
        job_kind: JobKind,
        job_data: &str,
    ) -> Result<Task> {
        validate_task_name(name)?;
        let timing = TimingSpec::FixedTime {
            time,
            repeat: repeating,
        };
        self.create_from_parts(name, enabled, timing, job_kind, job_data)
            .await
    }

    pub async fn create_timeless_task(
        &self,
        name: &str,
        enabled: bool,
        job_kind: JobKind,
        job_data: &str,
    ) -> Result<Task> {
        validate_task_name(name)?;
        self.create_from_parts(name, enabled, TimingSpec::Timeless, job_kind, job_data)
            .await
    }

    async fn create_from_parts(
        &self,
        name: &str,
        enabled: bool,
        timing: TimingSpec,
        job_kind: JobKind,
        job_data: &str,
    ) -> Result<Task> {
        let job = JobSpec::parse(job_kind, job_data)?;
        self.create_task(NewTask {
            name: name.to_string(),
            enabled,
            timing,
            job,
        })
        .await
    }

    /// Create a task and return a handle to it.
    ///
    /// All validation happens before the POST. The panel must answer 201 with
    /// the new `taskId`; the handle is then loaded like any listed task. If
    /// that load fails the error is `TaskCreatedButUnloadable`, which still
    /// carries the id.
    pub async fn create_task(&self, request: NewTask) -> Result<Task> {
        request.validate()?;
        let path = self.client.endpoints().tasks(&self.server_id);
        let body = self
            .client
            .post(&path, Some(&request.to_body()))
            .await?
            .expect_status(201)?;

        let task_id = body
            .get("taskId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                SchedulerError::InvalidTaskDetails(format!("create response has no taskId: {body}"))
            })?;
        let task_id = TaskId::from(task_id);

        info!(
            server_id = %self.server_id,
            task_id = %task_id,
            timing = %request.timing.kind(),
            job = %request.job.kind(),
            "task created"
        );

        Task::load(
            self.client.clone(),
            self.server_id.clone(),
            task_id.clone(),
            request.name,
            request.enabled,
        )
        .await
        .map_err(|source| {
            warn!(
                server_id = %self.server_id,
                task_id = %task_id,
                error = %source,
                "created task could not be loaded"
            );
            SchedulerError::TaskCreatedButUnloadable {
                task_id,
                source: Box::new(source),
            }
        })
    }
}
