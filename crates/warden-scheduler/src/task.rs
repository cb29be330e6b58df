use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveTime;
use serde_json::{json, Value};
use tracing::{debug, info};
use warden_core::{ApiClient, ServerId, TaskId};

use crate::error::{Result, SchedulerError};
use crate::job::Job;
use crate::shape::{classify_task, format_time_of_day, parse_time_of_day, player_requirement, section_field};
use crate::types::{validate_task_name, JobKind, PlayerRequirement, TimingKind};

/// Lifecycle of a task handle. `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Active,
    Deleted,
}

/// Client-side handle for one scheduled task on one server.
///
/// Identity is `(server_id, task_id)`. `name`, `enabled` and
/// `player_requirement` are cached and only change after the panel confirms a
/// write with HTTP 200. Timing values (time of day, interval, repeat) are never
/// cached; read them back after setting them.
///
/// Every precondition (deleted state, timing kind, argument validity) is
/// checked before a request is sent.
///
/// Job handles taken from [`Task::job`] share the deleted flag, so they stop
/// working once the task is deleted through this handle (or a clone of it).
///
/// Two handles for the same task are independent caches. The panel offers no
/// version token, so concurrent writes through separate handles race and the
/// last write wins server-side.
#[derive(Debug, Clone)]
pub struct Task {
    client: ApiClient,
    server_id: ServerId,
    task_id: TaskId,
    name: String,
    enabled: bool,
    timing: TimingKind,
    job: JobKind,
    player_requirement: PlayerRequirement,
    deleted: Arc<AtomicBool>,
}

impl Task {
    /// Build a handle from already-known name and enabled flag.
    ///
    /// Fetches the full task document once to fix the timing and job kind.
    /// If the fetch or the classification fails, no handle is produced.
    pub async fn load(
        client: ApiClient,
        server_id: ServerId,
        task_id: TaskId,
        name: String,
        enabled: bool,
    ) -> Result<Self> {
        let doc = fetch_document(&client, &server_id, &task_id).await?;
        let shape = classify_task(&doc)?;
        let player_requirement = player_requirement(&doc)?;
        debug!(
            server_id = %server_id,
            task_id = %task_id,
            timing = %shape.timing,
            job = %shape.job,
            "task classified"
        );
        Ok(Self {
            client,
            server_id,
            task_id,
            name,
            enabled,
            timing: shape.timing,
            job: shape.job,
            player_requirement,
            deleted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Build a handle taking name and enabled flag from the task document itself.
    pub async fn fetch(client: ApiClient, server_id: ServerId, task_id: TaskId) -> Result<Self> {
        let mut task = Self::load(client, server_id, task_id, String::new(), false).await?;
        task.refresh().await?;
        Ok(task)
    }

    pub fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn timing_kind(&self) -> TimingKind {
        self.timing
    }

    pub fn job_kind(&self) -> JobKind {
        self.job
    }

    pub fn player_requirement(&self) -> PlayerRequirement {
        self.player_requirement
    }

    pub fn state(&self) -> TaskState {
        if self.is_deleted() {
            TaskState::Deleted
        } else {
            TaskState::Active
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::Acquire)
    }

    // --- state gates ---------------------------------------------------------

    fn ensure_active(&self) -> Result<()> {
        if self.is_deleted() {
            return Err(SchedulerError::OperationOnDeletedTask {
                task_id: self.task_id.to_string(),
            });
        }
        Ok(())
    }

    /// Active and not timeless.
    fn ensure_timed(&self, operation: &'static str) -> Result<()> {
        self.ensure_active()?;
        if self.timing == TimingKind::Timeless {
            return Err(SchedulerError::OperationIncompatibleWithTimingKind {
                operation,
                timing: self.timing,
            });
        }
        Ok(())
    }

    /// Active and of exactly `required` timing.
    fn ensure_timing(&self, operation: &'static str, required: TimingKind) -> Result<()> {
        self.ensure_active()?;
        if self.timing != required {
            return Err(SchedulerError::OperationIncompatibleWithTimingKind {
                operation,
                timing: self.timing,
            });
        }
        Ok(())
    }

    // --- wire helpers ----------------------------------------------------------

    fn path(&self) -> String {
        self.client.endpoints().task(&self.server_id, &self.task_id)
    }

    async fn document(&self) -> Result<Value> {
        fetch_document(&self.client, &self.server_id, &self.task_id).await
    }

    async fn update(&self, body: Value) -> Result<()> {
        self.client.put(&self.path(), &body).await?.expect_status(200)?;
        Ok(())
    }

    // --- operations --------------------------------------------------------------

    pub async fn set_enabled(&mut self) -> Result<()> {
        self.put_enabled(true).await
    }

    pub async fn set_disabled(&mut self) -> Result<()> {
        self.put_enabled(false).await
    }

    async fn put_enabled(&mut self, enabled: bool) -> Result<()> {
        self.ensure_timed(if enabled { "set_enabled" } else { "set_disabled" })?;
        self.update(json!({ "enabled": enabled })).await?;
        self.enabled = enabled;
        Ok(())
    }

    /// Current repeat flag as reported by the panel.
    pub async fn is_repeating(&self) -> Result<bool> {
        self.ensure_timed("is_repeating")?;
        let doc = self.document().await?;
        let raw = section_field(&doc, "timing", "repeat")?;
        raw.as_bool()
            .ok_or_else(|| SchedulerError::InvalidTaskDetails(format!("repeat is not a bool: {raw}")))
    }

    pub async fn set_repeating(&self, repeat: bool) -> Result<()> {
        self.ensure_timed("set_repeating")?;
        self.update(json!({ "timing": { "repeat": repeat } })).await
    }

    pub async fn time(&self) -> Result<NaiveTime> {
        self.ensure_timing("time", TimingKind::FixedTime)?;
        let doc = self.document().await?;
        parse_time_of_day(section_field(&doc, "timing", "time")?)
    }

    pub async fn set_time(&self, time: NaiveTime) -> Result<()> {
        self.ensure_timing("set_time", TimingKind::FixedTime)?;
        self.update(json!({ "timing": { "time": format_time_of_day(time) } }))
            .await
    }

    /// Interval in seconds.
    pub async fn interval(&self) -> Result<u64> {
        self.ensure_timing("interval", TimingKind::Interval)?;
        let doc = self.document().await?;
        let raw = section_field(&doc, "timing", "interval")?;
        raw.as_u64()
            .filter(|secs| *secs >= 1)
            .ok_or_else(|| SchedulerError::InvalidTaskDetails(format!("bad interval: {raw}")))
    }

    pub async fn set_interval(&self, secs: u64) -> Result<()> {
        self.ensure_timing("set_interval", TimingKind::Interval)?;
        if secs == 0 {
            return Err(SchedulerError::NonPositiveInterval);
        }
        self.update(json!({ "timing": { "interval": secs } })).await
    }

    pub async fn change_name(&mut self, new_name: &str) -> Result<()> {
        self.ensure_active()?;
        validate_task_name(new_name)?;
        self.update(json!({ "name": new_name })).await?;
        self.name = new_name.to_string();
        Ok(())
    }

    pub async fn set_player_requirement(&mut self, requirement: PlayerRequirement) -> Result<()> {
        self.ensure_active()?;
        self.update(json!({ "playerRequirement": requirement.value() }))
            .await?;
        self.player_requirement = requirement;
        Ok(())
    }

    /// Fire the task once, now.
    pub async fn run_task(&self) -> Result<()> {
        self.ensure_active()?;
        let path = self.client.endpoints().task_run(&self.server_id, &self.task_id);
        let resp = self.client.post(&path, None).await?;
        if resp.status != 204 {
            resp.expect_status(200)?;
        }
        info!(server_id = %self.server_id, task_id = %self.task_id, "task triggered");
        Ok(())
    }

    /// Job handle matching this task's job kind. Sends nothing.
    pub fn job(&self) -> Result<Job> {
        self.ensure_active()?;
        Ok(Job::new(
            self.job,
            self.client.clone(),
            self.server_id.clone(),
            self.task_id.clone(),
            self.deleted.clone(),
        ))
    }

    /// Delete the task on the panel and mark this handle as deleted.
    pub async fn delete_task(&mut self) -> Result<()> {
        self.ensure_active()?;
        let resp = self.client.delete(&self.path()).await?;
        if resp.status != 204 {
            resp.expect_status(200)?;
        }
        self.deleted.store(true, Ordering::Release);
        info!(server_id = %self.server_id, task_id = %self.task_id, "task deleted");
        Ok(())
    }

    /// Re-sync cached fields from the panel.
    ///
    /// The task's shape must not have changed; if it has, this handle no
    /// longer describes the task and `InvalidTaskDetails` is returned with the
    /// cache left untouched.
    pub async fn refresh(&mut self) -> Result<()> {
        self.ensure_active()?;
        let doc = self.document().await?;
        let shape = classify_task(&doc)?;
        if shape.timing != self.timing || shape.job != self.job {
            return Err(SchedulerError::InvalidTaskDetails(format!(
                "task shape changed from {}/{} to {}/{}",
                self.timing, self.job, shape.timing, shape.job
            )));
        }
        let requirement = player_requirement(&doc)?;
        let name = doc
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SchedulerError::InvalidTaskDetails("missing name".to_string()))?
            .to_string();
        let enabled = doc
            .get("enabled")
            .and_then(Value::as_bool)
            .ok_or_else(|| SchedulerError::InvalidTaskDetails("missing enabled".to_string()))?;

        self.name = name;
        self.enabled = enabled;
        self.player_requirement = requirement;
        Ok(())
    }
}

async fn fetch_document(client: &ApiClient, server_id: &ServerId, task_id: &TaskId) -> Result<Value> {
    let path = client.endpoints().task(server_id, task_id);
    Ok(client.get(&path).await?.expect_status(200)?)
}
