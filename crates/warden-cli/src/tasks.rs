use anyhow::{bail, Context};
use chrono::NaiveTime;
use clap::Subcommand;
use warden_core::{ApiClient, ServerId, TaskId};
use warden_scheduler::{
    Job, JobKind, JobSpec, NewTask, PlayerRequirement, Scheduler, TimingKind, TimingSpec,
};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks with their timing and job kinds.
    List,

    /// Count tasks, optionally of one timing kind.
    Count {
        #[arg(long)]
        timing: Option<TimingKind>,
    },

    /// Create a task.
    Create {
        name: String,
        /// fixed-time, interval or timeless.
        #[arg(long)]
        timing: TimingKind,
        /// Time of day (HH:MM) for fixed-time tasks.
        #[arg(long)]
        time: Option<String>,
        /// Seconds between runs for interval tasks.
        #[arg(long)]
        interval: Option<u64>,
        #[arg(long)]
        repeat: bool,
        /// server-action, run-commands or start-backup.
        #[arg(long)]
        job: JobKind,
        /// Action name, `;`-separated commands, or backup id.
        #[arg(long)]
        data: String,
        #[arg(long)]
        disabled: bool,
        #[arg(long, default_value = "none")]
        players: PlayerRequirement,
    },

    /// Trigger a task now.
    Run { task_id: String },

    Delete { task_id: String },

    Enable { task_id: String },

    Disable { task_id: String },

    Rename { task_id: String, name: String },

    /// Show what a task's job does.
    Job { task_id: String },
}

pub async fn run(client: ApiClient, server_id: ServerId, action: TaskAction) -> anyhow::Result<()> {
    let scheduler = Scheduler::new(client, server_id);

    match action {
        TaskAction::List => {
            for task in scheduler.tasks().await? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    task.task_id(),
                    task.name(),
                    if task.is_enabled() { "enabled" } else { "disabled" },
                    task.timing_kind(),
                    task.job_kind()
                );
            }
        }
        TaskAction::Count { timing: None } => {
            println!("{}", scheduler.total_task_amount().await?);
        }
        TaskAction::Count {
            timing: Some(timing),
        } => {
            println!("{}", scheduler.total_task_amount_of(timing).await?);
        }
        TaskAction::Create {
            name,
            timing,
            time,
            interval,
            repeat,
            job,
            data,
            disabled,
            players,
        } => {
            let timing = timing_spec(timing, time, interval, repeat)?;
            let mut task = scheduler
                .create_task(NewTask {
                    name,
                    enabled: !disabled,
                    timing,
                    job: JobSpec::parse(job, &data)?,
                })
                .await?;
            if players != PlayerRequirement::None {
                task.set_player_requirement(players).await?;
            }
            println!("{}", task.task_id());
        }
        TaskAction::Run { task_id } => {
            scheduler.task(task_id).await?.run_task().await?;
        }
        TaskAction::Delete { task_id } => {
            scheduler.task(task_id).await?.delete_task().await?;
        }
        TaskAction::Enable { task_id } => {
            scheduler.task(task_id).await?.set_enabled().await?;
        }
        TaskAction::Disable { task_id } => {
            scheduler.task(task_id).await?.set_disabled().await?;
        }
        TaskAction::Rename { task_id, name } => {
            scheduler.task(task_id).await?.change_name(&name).await?;
        }
        TaskAction::Job { task_id } => {
            let task = scheduler.task(TaskId::from(task_id)).await?;
            match task.job()? {
                Job::ServerAction(job) => println!("server-action\t{}", job.action().await?),
                Job::RunCommands(job) => {
                    println!("run-commands");
                    for command in job.commands().await? {
                        println!("  {command}");
                    }
                }
                Job::StartBackup(job) => println!("start-backup\t{}", job.backup_guid().await?),
            }
        }
    }

    Ok(())
}

/// Turn the create flags into a timing section, refusing flags that do not
/// apply to the chosen timing kind.
fn timing_spec(
    timing: TimingKind,
    time: Option<String>,
    interval: Option<u64>,
    repeat: bool,
) -> anyhow::Result<TimingSpec> {
    match timing {
        TimingKind::FixedTime => {
            if interval.is_some() {
                bail!("--interval does not apply to fixed-time tasks");
            }
            let raw = time.context("--time is required for fixed-time tasks")?;
            let time = NaiveTime::parse_from_str(&raw, "%H:%M")
                .with_context(|| format!("invalid time of day: {raw}"))?;
            Ok(TimingSpec::FixedTime { time, repeat })
        }
        TimingKind::Interval => {
            if time.is_some() {
                bail!("--time does not apply to interval tasks");
            }
            let secs = interval.context("--interval is required for interval tasks")?;
            Ok(TimingSpec::Interval { secs, repeat })
        }
        TimingKind::Timeless => {
            if time.is_some() || interval.is_some() || repeat {
                bail!("timeless tasks take no --time, --interval or --repeat");
            }
            Ok(TimingSpec::Timeless)
        }
    }
}
