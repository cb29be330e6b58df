// End-to-end behaviour of scheduler, task and job handles over a fake panel.

use std::sync::Arc;

use serde_json::{json, Value};
use warden_core::testing::{fake_client, FakeTransport};
use warden_core::{ApiError, Method};
use warden_scheduler::{
    Job, JobKind, PlayerRequirement, Scheduler, SchedulerError, Task, TimingKind,
};

const TASKS: &str = "/api/v1/servers/srv1/scheduler/tasks";

fn task_path(id: &str) -> String {
    format!("{TASKS}/{id}")
}

fn document(timing: Value, job: Value) -> Value {
    json!({
        "taskId": "t1",
        "name": "Nightly",
        "enabled": true,
        "playerRequirement": 0,
        "timing": timing,
        "job": job,
    })
}

async fn load(fake: &Arc<FakeTransport>, timing: Value, job: Value) -> Task {
    fake.script(Method::Get, &task_path("t1"), 200, document(timing, job));
    let task = Scheduler::new(fake_client(fake), "srv1")
        .task("t1")
        .await
        .expect("task");
    fake.clear_calls();
    task
}

#[tokio::test]
async fn timeless_run_commands_created_from_job_data() {
    let fake = Arc::new(
        FakeTransport::new()
            .with(Method::Post, TASKS, 201, json!({"taskId": "abc123"}))
            .with(
                Method::Get,
                &task_path("abc123"),
                200,
                json!({
                    "taskId": "abc123",
                    "name": "Greeter",
                    "enabled": true,
                    "job": {"commands": ["say hi", "say bye"]}
                }),
            ),
    );
    let scheduler = Scheduler::new(fake_client(&fake), "srv1");

    let task = scheduler
        .create_timeless_task("Greeter", true, JobKind::RunCommands, "say hi;say bye")
        .await
        .unwrap();

    assert_eq!(task.task_id().as_str(), "abc123");
    assert_eq!(task.timing_kind(), TimingKind::Timeless);
    assert_eq!(task.job_kind(), JobKind::RunCommands);
    assert_eq!(
        task.job().unwrap().commands().await.unwrap(),
        vec!["say hi".to_string(), "say bye".to_string()]
    );

    let post = &fake.calls_with(Method::Post)[0];
    assert_eq!(
        post.body,
        Some(json!({
            "name": "Greeter",
            "enabled": true,
            "job": {"commands": ["say hi", "say bye"]}
        }))
    );
}

#[tokio::test]
async fn zero_interval_fails_without_network() {
    let fake = Arc::new(FakeTransport::new());
    let task = load(&fake, json!({"interval": 300, "repeat": true}), json!({"action": 4})).await;

    let err = task.set_interval(0).await.unwrap_err();
    assert!(matches!(err, SchedulerError::NonPositiveInterval));
    assert!(err.is_client_side());
    assert_eq!(fake.call_count(), 0);
}

#[tokio::test]
async fn double_delete_is_operation_on_deleted_task() {
    let fake = Arc::new(FakeTransport::new());
    let mut task = load(&fake, json!({"time": "04:00"}), json!({"action": 4})).await;
    fake.script(Method::Delete, &task_path("t1"), 200, json!({}));

    task.delete_task().await.unwrap();
    assert!(task.is_deleted());

    let err = task.delete_task().await.unwrap_err();
    assert!(matches!(err, SchedulerError::OperationOnDeletedTask { .. }));
    assert_eq!(fake.calls_with(Method::Delete).len(), 1);
}

#[tokio::test]
async fn deleted_task_rejects_every_operation_without_network() {
    let fake = Arc::new(FakeTransport::new());
    let mut task = load(&fake, json!({"interval": 60, "repeat": true}), json!({"commands": ["save-all"]})).await;
    fake.script(Method::Delete, &task_path("t1"), 204, Value::Null);
    task.delete_task().await.unwrap();
    fake.clear_calls();

    let deleted = |r: Result<(), SchedulerError>| {
        matches!(r, Err(SchedulerError::OperationOnDeletedTask { .. }))
    };

    assert!(deleted(task.set_enabled().await));
    assert!(deleted(task.set_disabled().await));
    assert!(deleted(task.set_repeating(false).await));
    assert!(deleted(task.set_interval(10).await));
    assert!(deleted(
        task.set_time(chrono::NaiveTime::from_hms_opt(1, 0, 0).unwrap()).await
    ));
    assert!(deleted(task.change_name("abc").await));
    assert!(deleted(task.set_player_requirement(PlayerRequirement::Empty).await));
    assert!(deleted(task.run_task().await));
    assert!(deleted(task.delete_task().await));
    assert!(deleted(task.refresh().await));
    assert!(matches!(task.is_repeating().await, Err(SchedulerError::OperationOnDeletedTask { .. })));
    assert!(matches!(task.interval().await, Err(SchedulerError::OperationOnDeletedTask { .. })));
    assert!(matches!(task.time().await, Err(SchedulerError::OperationOnDeletedTask { .. })));
    assert!(matches!(task.job(), Err(SchedulerError::OperationOnDeletedTask { .. })));

    assert_eq!(fake.call_count(), 0);
}

#[tokio::test]
async fn timing_kind_gates_are_symmetric() {
    let fake = Arc::new(FakeTransport::new());
    let fixed = load(&fake, json!({"time": "04:00"}), json!({"action": 4})).await;
    let interval = load(&fake, json!({"interval": 60}), json!({"action": 4})).await;
    let timeless = load(&fake, json!({"timeless": true}), json!({"action": 4})).await;

    let incompatible = |e: SchedulerError| {
        matches!(e, SchedulerError::OperationIncompatibleWithTimingKind { .. })
    };

    assert!(incompatible(fixed.interval().await.unwrap_err()));
    assert!(incompatible(fixed.set_interval(5).await.unwrap_err()));
    assert!(incompatible(interval.time().await.unwrap_err()));
    assert!(incompatible(
        interval
            .set_time(chrono::NaiveTime::from_hms_opt(2, 0, 0).unwrap())
            .await
            .unwrap_err()
    ));
    assert!(incompatible(timeless.time().await.unwrap_err()));
    assert!(incompatible(timeless.interval().await.unwrap_err()));
    assert_eq!(fake.call_count(), 0);
}

#[tokio::test]
async fn rename_validates_before_network() {
    let fake = Arc::new(FakeTransport::new());
    let mut task = load(&fake, json!({"interval": 60}), json!({"action": 1})).await;
    fake.script(Method::Put, &task_path("t1"), 200, json!({}));

    task.change_name("abc 123").await.unwrap();
    assert_eq!(task.name(), "abc 123");
    assert_eq!(fake.calls_with(Method::Put)[0].body, Some(json!({"name": "abc 123"})));

    fake.clear_calls();
    let err = task.change_name("abc!123").await.unwrap_err();
    assert!(matches!(err, SchedulerError::NameContainsSpecialCharacters { .. }));
    assert_eq!(fake.call_count(), 0);
    assert_eq!(task.name(), "abc 123");
}

#[tokio::test]
async fn rejected_enable_keeps_cached_flag() {
    let fake = Arc::new(FakeTransport::new());
    let mut task = load(&fake, json!({"time": "04:00"}), json!({"action": 1})).await;
    task.set_disabled().await.unwrap_err();
    assert!(task.is_enabled());

    fake.script(Method::Put, &task_path("t1"), 401, Value::Null);
    let err = task.set_disabled().await.unwrap_err();
    assert!(matches!(err, SchedulerError::Api(ApiError::Unauthorized)));
    assert!(task.is_enabled());
}

#[tokio::test]
async fn run_commands_job_refuses_action_accessor() {
    let fake = Arc::new(FakeTransport::new());
    let task = load(&fake, json!({}), json!({"commands": ["say hi"]})).await;

    let job = task.job().unwrap();
    assert!(matches!(job, Job::RunCommands(_)));
    assert!(matches!(
        job.action().await,
        Err(SchedulerError::MethodNotSupportedForJobKind { job: JobKind::RunCommands, .. })
    ));
    assert_eq!(fake.call_count(), 0);
    assert_eq!(job.commands().await.unwrap(), vec!["say hi".to_string()]);
}

#[tokio::test]
async fn job_reads_are_not_cached() {
    let fake = Arc::new(FakeTransport::new());
    let task = load(&fake, json!({}), json!({"backupIdentifier": "first"})).await;
    let Job::StartBackup(job) = task.job().unwrap() else {
        panic!("expected backup job");
    };

    assert_eq!(job.backup_guid().await.unwrap(), "first");
    fake.script(
        Method::Get,
        &task_path("t1"),
        200,
        document(json!({}), json!({"backupIdentifier": "second"})),
    );
    assert_eq!(job.backup_guid().await.unwrap(), "second");
    assert_eq!(fake.calls_with(Method::Get).len(), 2);
}

#[tokio::test]
async fn job_taken_before_delete_stops_sending() {
    let fake = Arc::new(FakeTransport::new());
    let mut task = load(&fake, json!({"interval": 60}), json!({"commands": ["save-all"]})).await;
    let job = task.job().unwrap();
    fake.script(Method::Delete, &task_path("t1"), 204, Value::Null);
    fake.script(Method::Put, &task_path("t1"), 200, json!({}));

    task.delete_task().await.unwrap();
    fake.clear_calls();

    assert!(matches!(
        job.set_commands(["say x"]).await,
        Err(SchedulerError::OperationOnDeletedTask { .. })
    ));
    assert!(matches!(
        job.commands().await,
        Err(SchedulerError::OperationOnDeletedTask { .. })
    ));
    assert_eq!(fake.call_count(), 0);
}

#[tokio::test]
async fn failed_load_after_create_keeps_task_id() {
    let fake = Arc::new(
        FakeTransport::new()
            .with(Method::Post, TASKS, 201, json!({"taskId": "new1"}))
            .with(Method::Get, &task_path("new1"), 500, Value::Null),
    );
    let scheduler = Scheduler::new(fake_client(&fake), "srv1");

    let err = scheduler
        .create_timeless_task("Fresh", true, JobKind::ServerAction, "restart")
        .await
        .unwrap_err();

    assert_eq!(err.created_task_id().map(|id| id.as_str()), Some("new1"));
    match err {
        SchedulerError::TaskCreatedButUnloadable { source, .. } => {
            assert!(matches!(*source, SchedulerError::Api(ApiError::ServerSide { .. })));
        }
        other => panic!("expected TaskCreatedButUnloadable, got {other:?}"),
    }
    assert_eq!(fake.calls_with(Method::Post).len(), 1);
}

#[tokio::test]
async fn failed_delete_leaves_task_active() {
    let fake = Arc::new(FakeTransport::new());
    let mut task = load(&fake, json!({"time": "04:00"}), json!({"action": 1})).await;
    fake.script(Method::Delete, &task_path("t1"), 500, Value::Null);

    let err = task.delete_task().await.unwrap_err();
    assert!(matches!(err, SchedulerError::Api(ApiError::ServerSide { .. })));
    assert!(!task.is_deleted());

    fake.script(Method::Delete, &task_path("t1"), 404, Value::Null);
    let err = task.delete_task().await.unwrap_err();
    assert!(matches!(err, SchedulerError::Api(ApiError::NotFound { .. })));
    assert!(!task.is_deleted());

    fake.script(Method::Delete, &task_path("t1"), 204, Value::Null);
    task.delete_task().await.unwrap();
    assert!(task.is_deleted());
    assert_eq!(fake.calls_with(Method::Delete).len(), 3);
}

#[tokio::test]
async fn run_task_rejects_unexpected_status() {
    let fake = Arc::new(FakeTransport::new());
    let task = load(&fake, json!({}), json!({"action": 4})).await;
    let run = format!("{}/run", task_path("t1"));

    fake.script(Method::Post, &run, 202, Value::Null);
    assert!(matches!(
        task.run_task().await,
        Err(SchedulerError::Api(ApiError::UnrecognizedStatus { status: 202 }))
    ));

    fake.script(Method::Post, &run, 403, Value::Null);
    assert!(matches!(
        task.run_task().await,
        Err(SchedulerError::Api(ApiError::Forbidden { .. }))
    ));
    assert!(!task.is_deleted());
    assert_eq!(fake.calls_with(Method::Post).len(), 2);
}
