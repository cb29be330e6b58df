use thiserror::Error;
use warden_core::{ApiError, TaskId};

use crate::types::{JobKind, TimingKind};

/// Errors that can occur within the scheduler subsystem.
///
/// Variants below `Api` split into two groups: payload problems found after a
/// response arrived, and client-side validation failures raised before any
/// request is sent (see [`SchedulerError::is_client_side`]).
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Transport failure or non-success HTTP status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The `timing` section matches none of the known shapes.
    #[error("Malformed task details: {0}")]
    MalformedTaskDetails(String),

    /// The `job` section carries none of `action`, `commands`, `backupIdentifier`.
    #[error("Unknown job type in task payload")]
    UnknownJobType,

    /// A well-formed response with unexpected content.
    #[error("Invalid task details: {0}")]
    InvalidTaskDetails(String),

    /// The panel returned a run-commands job with an empty command list.
    #[error("No commands found on task")]
    NoCommandsFound,

    #[error("Invalid server action: {0}")]
    InvalidServerAction(String),

    #[error("Task name may only contain letters, digits and spaces: {name:?}")]
    NameContainsSpecialCharacters { name: String },

    #[error("Command list is empty")]
    EmptyCommandList,

    #[error("Interval must be at least one second")]
    NonPositiveInterval,

    #[error("Task {task_id} has been deleted")]
    OperationOnDeletedTask { task_id: String },

    #[error("{operation} is not available on {timing} tasks")]
    OperationIncompatibleWithTimingKind {
        operation: &'static str,
        timing: TimingKind,
    },

    #[error("{method} is not supported for {job} jobs")]
    MethodNotSupportedForJobKind { method: &'static str, job: JobKind },

    /// The panel accepted the create (201) but the new task could not be
    /// loaded. The task exists; retrying the create would duplicate it.
    #[error("Task {task_id} was created but could not be loaded: {source}")]
    TaskCreatedButUnloadable {
        task_id: TaskId,
        #[source]
        source: Box<SchedulerError>,
    },
}

impl SchedulerError {
    /// True when the error was raised before any network call.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            SchedulerError::InvalidServerAction(_)
                | SchedulerError::NameContainsSpecialCharacters { .. }
                | SchedulerError::EmptyCommandList
                | SchedulerError::NonPositiveInterval
                | SchedulerError::OperationOnDeletedTask { .. }
                | SchedulerError::OperationIncompatibleWithTimingKind { .. }
                | SchedulerError::MethodNotSupportedForJobKind { .. }
        )
    }

    /// HTTP 409 and every payload classification or parsing failure.
    pub fn is_invalid_task_details(&self) -> bool {
        matches!(
            self,
            SchedulerError::Api(ApiError::Conflict { .. })
                | SchedulerError::MalformedTaskDetails(_)
                | SchedulerError::UnknownJobType
                | SchedulerError::InvalidTaskDetails(_)
        )
    }

    /// Short error code string for logs and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            SchedulerError::Api(e) => e.code(),
            SchedulerError::MalformedTaskDetails(_) => "MALFORMED_TASK_DETAILS",
            SchedulerError::UnknownJobType => "UNKNOWN_JOB_TYPE",
            SchedulerError::InvalidTaskDetails(_) => "INVALID_TASK_DETAILS",
            SchedulerError::NoCommandsFound => "NO_COMMANDS_FOUND",
            SchedulerError::InvalidServerAction(_) => "INVALID_SERVER_ACTION",
            SchedulerError::NameContainsSpecialCharacters { .. } => {
                "NAME_CONTAINS_SPECIAL_CHARACTERS"
            }
            SchedulerError::EmptyCommandList => "EMPTY_COMMAND_LIST",
            SchedulerError::NonPositiveInterval => "NON_POSITIVE_INTERVAL",
            SchedulerError::OperationOnDeletedTask { .. } => "OPERATION_ON_DELETED_TASK",
            SchedulerError::OperationIncompatibleWithTimingKind { .. } => {
                "OPERATION_INCOMPATIBLE_WITH_TIMING_KIND"
            }
            SchedulerError::MethodNotSupportedForJobKind { .. } => {
                "METHOD_NOT_SUPPORTED_FOR_JOB_KIND"
            }
            SchedulerError::TaskCreatedButUnloadable { .. } => "TASK_CREATED_BUT_UNLOADABLE",
        }
    }

    /// Id of a task that exists on the panel despite this error.
    pub fn created_task_id(&self) -> Option<&TaskId> {
        match self {
            SchedulerError::TaskCreatedButUnloadable { task_id, .. } => Some(task_id),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
