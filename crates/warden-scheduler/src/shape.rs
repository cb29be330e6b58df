//! Shape classification of task documents.
//!
//! The panel sends no type tag for a task's timing or job; the set of keys
//! present is the type. This module is the only place that inspects raw key
//! presence. Everything else matches on [`TimingKind`] / [`JobKind`].
//!
//! Tie-break: if a payload carries more than one candidate key, the first
//! match in the documented order wins (`time` before `interval` before
//! `timeless`; `action` before `commands` before `backupIdentifier`).

use chrono::NaiveTime;
use serde_json::Value;

use crate::error::{Result, SchedulerError};
use crate::types::{JobKind, PlayerRequirement, TimingKind};

/// Timing and job kind of one task, fixed at classification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskShape {
    pub timing: TimingKind,
    pub job: JobKind,
}

/// Classify the `timing` section of a task document.
///
/// `null` (absent) and `{}` are timeless, as is an explicit `timeless` marker.
/// An object with only unrelated keys, or a non-object, is malformed.
pub fn classify_timing(timing: &Value) -> Result<TimingKind> {
    let obj = match timing {
        Value::Null => return Ok(TimingKind::Timeless),
        Value::Object(obj) => obj,
        other => {
            return Err(SchedulerError::MalformedTaskDetails(format!(
                "timing is not an object: {other}"
            )))
        }
    };

    if obj.contains_key("time") {
        Ok(TimingKind::FixedTime)
    } else if obj.contains_key("interval") {
        Ok(TimingKind::Interval)
    } else if obj.contains_key("timeless") || obj.is_empty() {
        Ok(TimingKind::Timeless)
    } else {
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        Err(SchedulerError::MalformedTaskDetails(format!(
            "timing has none of time/interval/timeless (keys: {})",
            keys.join(", ")
        )))
    }
}

/// Classify the `job` section of a task document.
pub fn classify_job(job: &Value) -> Result<JobKind> {
    let Some(obj) = job.as_object() else {
        return Err(SchedulerError::UnknownJobType);
    };

    if obj.contains_key("action") {
        Ok(JobKind::ServerAction)
    } else if obj.contains_key("commands") {
        Ok(JobKind::RunCommands)
    } else if obj.contains_key("backupIdentifier") {
        Ok(JobKind::StartBackup)
    } else {
        Err(SchedulerError::UnknownJobType)
    }
}

/// Classify a full task document.
pub fn classify_task(doc: &Value) -> Result<TaskShape> {
    Ok(TaskShape {
        timing: classify_timing(doc.get("timing").unwrap_or(&Value::Null))?,
        job: classify_job(doc.get("job").unwrap_or(&Value::Null))?,
    })
}

/// `playerRequirement` of a task document; absent means [`PlayerRequirement::None`].
pub fn player_requirement(doc: &Value) -> Result<PlayerRequirement> {
    match doc.get("playerRequirement") {
        None | Some(Value::Null) => Ok(PlayerRequirement::None),
        Some(v) => v
            .as_i64()
            .and_then(PlayerRequirement::from_value)
            .ok_or_else(|| {
                SchedulerError::InvalidTaskDetails(format!("unknown playerRequirement: {v}"))
            }),
    }
}

/// Look up `doc[section][key]`, failing when either level is missing.
pub(crate) fn section_field<'a>(doc: &'a Value, section: &str, key: &str) -> Result<&'a Value> {
    doc.get(section)
        .and_then(|s| s.get(key))
        .ok_or_else(|| SchedulerError::InvalidTaskDetails(format!("missing {section}.{key}")))
}

pub(crate) fn parse_time_of_day(value: &Value) -> Result<NaiveTime> {
    let raw = value
        .as_str()
        .ok_or_else(|| SchedulerError::InvalidTaskDetails(format!("time is not a string: {value}")))?;
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| SchedulerError::InvalidTaskDetails(format!("bad time {raw:?}: {e}")))
}

/// `HH:MM`, or `HH:MM:SS` when seconds are set.
pub(crate) fn format_time_of_day(time: NaiveTime) -> String {
    use chrono::Timelike;
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}
