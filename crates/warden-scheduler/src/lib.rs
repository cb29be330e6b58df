//! Client-side model of a server's task scheduler.
//!
//! # Overview
//!
//! The panel stores scheduled tasks per game server. Each task document has a
//! timing section and a job section whose *shape* (which keys are present)
//! determines its kind; [`shape`] turns that shape into explicit enums once.
//! A [`Task`] handle then gates every operation on its kind and on whether it
//! has been deleted, before anything is sent.
//!
//! # Timing kinds
//!
//! | Kind        | Payload key  | Time of day | Interval | Enable/repeat |
//! |-------------|--------------|-------------|----------|---------------|
//! | `FixedTime` | `time`       | yes         | no       | yes           |
//! | `Interval`  | `interval`   | no          | yes      | yes           |
//! | `Timeless`  | `timeless`/∅ | no          | no       | no            |
//!
//! # Job kinds
//!
//! | Kind           | Payload key        | Data                     |
//! |----------------|--------------------|--------------------------|
//! | `ServerAction` | `action`           | stop / start / kill / restart |
//! | `RunCommands`  | `commands`         | non-empty command list   |
//! | `StartBackup`  | `backupIdentifier` | backup configuration id  |

pub mod error;
pub mod job;
pub mod scheduler;
pub mod shape;
pub mod task;
pub mod types;

pub use error::{Result, SchedulerError};
pub use job::{BackupJob, Job, JobSpec, RunCommandsJob, ServerActionJob};
pub use scheduler::{NewTask, Scheduler, TimingSpec};
pub use task::{Task, TaskState};
pub use types::{JobKind, PlayerRequirement, SchedulerSummary, TaskSummary, TimingKind};
