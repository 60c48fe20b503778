use chrono::{TimeZone, Utc};

use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{AuditAction, TaskId, UserId};

use crate::test_support::{AuditMode, FakeEntityStore, Harness, actor};
use crate::{CreateTaskInput, UpdateTaskInput};

use super::TaskService;

fn service(harness: &Harness) -> TaskService {
    TaskService::new(
        harness.store.clone(),
        harness.store.clone(),
        harness.recorder.clone(),
    )
}

fn buy_milk(user_id: UserId) -> CreateTaskInput {
    CreateTaskInput {
        user_id,
        todo: "buy milk".to_owned(),
        start_date: None,
        end_date: None,
    }
}

#[tokio::test]
async fn create_task_records_one_create_without_before() -> AppResult<()> {
    let harness = Harness::new();
    let owner = harness.seed_user("ada").await;

    let task = service(&harness)
        .create_task(Some(&actor()), buy_milk(owner.id()))
        .await?;

    let records = harness.audit_records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action(), AuditAction::Create);
    assert_eq!(records[0].entity(), "tasks");
    assert_eq!(records[0].entity_id(), task.task().id().to_string());
    assert!(records[0].meta().before().is_none());
    let after = records[0]
        .meta()
        .after()
        .unwrap_or_else(|| panic!("create should carry after"));
    assert_eq!(
        after.get("todo").and_then(|value| value.as_str()),
        Some("buy milk")
    );
    Ok(())
}

#[tokio::test]
async fn task_snapshots_embed_the_owner_without_credentials() -> AppResult<()> {
    let harness = Harness::new();
    let owner = harness.seed_user("ada").await;

    let task = service(&harness)
        .create_task(Some(&actor()), buy_milk(owner.id()))
        .await?;

    assert_eq!(task.user().map(|user| user.id()), Some(owner.id()));
    let records = harness.audit_records().await;
    let user = records[0]
        .meta()
        .after()
        .and_then(|after| after.get("user"))
        .unwrap_or_else(|| panic!("create snapshot should embed the owner"));
    assert_eq!(user["username"], "ada");
    assert!(user.get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn list_tasks_embeds_each_owner() -> AppResult<()> {
    let harness = Harness::new();
    let ada = harness.seed_user("ada").await;
    let grace = harness.seed_user("grace").await;
    let service = service(&harness);
    service.create_task(None, buy_milk(ada.id())).await?;
    service.create_task(None, buy_milk(grace.id())).await?;

    let tasks = service.list_tasks().await?;

    assert_eq!(tasks.len(), 2);
    for details in &tasks {
        assert_eq!(
            details.user().map(|user| user.id()),
            Some(details.task().user_id())
        );
    }
    Ok(())
}

#[tokio::test]
async fn reassigning_a_task_records_the_new_owner() -> AppResult<()> {
    let harness = Harness::new();
    let ada = harness.seed_user("ada").await;
    let grace = harness.seed_user("grace").await;
    let service = service(&harness);
    let task = service.create_task(None, buy_milk(ada.id())).await?;

    service
        .update_task(
            Some(&actor()),
            task.task().id(),
            UpdateTaskInput {
                user_id: Some(grace.id()),
                ..UpdateTaskInput::default()
            },
        )
        .await?;

    let records = harness.audit_records().await;
    let meta = records[0].meta();
    let (Some(before), Some(after)) = (meta.before(), meta.after()) else {
        panic!("update should carry both snapshots");
    };
    assert_eq!(
        before.changed_fields(after),
        vec!["user_id".to_owned(), "user".to_owned()]
    );
    assert_eq!(
        after.get("user").and_then(|user| user.get("username")),
        Some(&serde_json::json!("grace"))
    );
    Ok(())
}

#[tokio::test]
async fn create_task_for_unknown_owner_is_rejected() {
    let harness = Harness::new();

    let result = service(&harness)
        .create_task(Some(&actor()), buy_milk(UserId::new()))
        .await;

    assert!(
        matches!(result, Err(AppError::Validation(ref message)) if message == "User not found")
    );
    assert!(harness.store.tasks.lock().await.is_empty());
    assert!(harness.audit_records().await.is_empty());
}

#[tokio::test]
async fn create_task_rejects_blank_todo() {
    let harness = Harness::new();
    let owner = harness.seed_user("ada").await;
    let mut input = buy_milk(owner.id());
    input.todo = "   ".to_owned();

    let result = service(&harness).create_task(Some(&actor()), input).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn anonymous_mutations_write_no_audit() -> AppResult<()> {
    let harness = Harness::new();
    let owner = harness.seed_user("ada").await;
    let service = service(&harness);

    let task = service.create_task(None, buy_milk(owner.id())).await?;
    service
        .update_task(
            None,
            task.task().id(),
            UpdateTaskInput {
                todo: Some("buy oat milk".to_owned()),
                ..UpdateTaskInput::default()
            },
        )
        .await?;
    service.delete_task(None, task.task().id()).await?;

    assert!(harness.audit_records().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_task_records_only_changed_fields() -> AppResult<()> {
    let harness = Harness::new();
    let owner = harness.seed_user("ada").await;
    let service = service(&harness);
    let task = service.create_task(None, buy_milk(owner.id())).await?;

    let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single();
    let updated = service
        .update_task(
            Some(&actor()),
            task.task().id(),
            UpdateTaskInput {
                start_date: start,
                ..UpdateTaskInput::default()
            },
        )
        .await?;

    assert_eq!(updated.task().start_date(), start);
    let records = harness.audit_records().await;
    assert_eq!(records.len(), 1);
    let meta = records[0].meta();
    let (Some(before), Some(after)) = (meta.before(), meta.after()) else {
        panic!("update should carry both snapshots");
    };
    assert_eq!(before.changed_fields(after), vec!["start_date".to_owned()]);
    Ok(())
}

#[tokio::test]
async fn update_task_to_unknown_owner_is_rejected() -> AppResult<()> {
    let harness = Harness::new();
    let owner = harness.seed_user("ada").await;
    let service = service(&harness);
    let task = service.create_task(None, buy_milk(owner.id())).await?;

    let result = service
        .update_task(
            Some(&actor()),
            task.task().id(),
            UpdateTaskInput {
                user_id: Some(UserId::new()),
                ..UpdateTaskInput::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(harness.audit_records().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_missing_task_is_not_found() {
    let harness = Harness::new();

    let result = service(&harness)
        .delete_task(Some(&actor()), TaskId::new())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(ref message)) if message == "Task not found"));
    assert!(harness.audit_records().await.is_empty());
}

#[tokio::test]
async fn hung_audit_store_does_not_block_the_mutation() -> AppResult<()> {
    let harness = Harness::with(FakeEntityStore::default(), AuditMode::Hang);
    let owner = harness.seed_user("ada").await;

    let task = service(&harness)
        .create_task(Some(&actor()), buy_milk(owner.id()))
        .await?;

    assert!(harness.store.tasks.lock().await.contains_key(&task.task().id()));
    assert!(harness.audit_records().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_delete_writes_no_audit() -> AppResult<()> {
    let store = FakeEntityStore {
        fail_writes: true,
        ..FakeEntityStore::default()
    };
    let harness = Harness::with(store, AuditMode::Accept);
    let owner = harness.seed_user("ada").await;
    let task = tasktrail_domain::Task::new(TaskId::new(), owner.id(), "buy milk", None, None)?;
    harness.store.tasks.lock().await.insert(task.id(), task.clone());

    let result = service(&harness)
        .delete_task(Some(&actor()), task.id())
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert!(harness.audit_records().await.is_empty());
    Ok(())
}
