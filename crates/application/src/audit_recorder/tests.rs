use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{AuditAction, Snapshot};

use crate::test_support::{AuditMode, FakeAuditRepository};

use super::{AuditRecorder, MonotonicClock};

fn recorder(mode: AuditMode) -> (Arc<FakeAuditRepository>, AuditRecorder) {
    let repository = Arc::new(FakeAuditRepository::with_mode(mode));
    let recorder =
        AuditRecorder::new(repository.clone()).with_write_timeout(Duration::from_millis(50));
    (repository, recorder)
}

#[tokio::test]
async fn record_create_stores_after_only() -> AppResult<()> {
    let (repository, recorder) = recorder(AuditMode::Accept);
    let after = Snapshot::capture(&json!({ "id": "t-1", "todo": "buy milk" }))?;

    recorder
        .record_create("actor-1", "tasks", "t-1", after.clone())
        .await?;

    let records = repository.records.lock().await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.user_id(), "actor-1");
    assert_eq!(record.action(), AuditAction::Create);
    assert_eq!(record.entity(), "tasks");
    assert_eq!(record.entity_id(), "t-1");
    assert!(record.meta().before().is_none());
    assert_eq!(record.meta().after(), Some(&after));
    Ok(())
}

#[tokio::test]
async fn record_update_stores_both_snapshots() -> AppResult<()> {
    let (repository, recorder) = recorder(AuditMode::Accept);
    let before = Snapshot::capture(&json!({ "id": "p-1", "name": "Ops" }))?;
    let after = Snapshot::capture(&json!({ "id": "p-1", "name": "Operations" }))?;

    recorder
        .record_update("actor-1", "positions", "p-1", before.clone(), after.clone())
        .await?;

    let records = repository.records.lock().await;
    assert_eq!(records[0].action(), AuditAction::Update);
    assert_eq!(records[0].meta().before(), Some(&before));
    assert_eq!(records[0].meta().after(), Some(&after));
    Ok(())
}

#[tokio::test]
async fn record_delete_stores_before_only() -> AppResult<()> {
    let (repository, recorder) = recorder(AuditMode::Accept);
    let before = Snapshot::capture(&json!({ "id": "u-1", "username": "ada" }))?;

    recorder
        .record_delete("actor-1", "users", "u-1", before.clone())
        .await?;

    let records = repository.records.lock().await;
    assert_eq!(records[0].action(), AuditAction::Delete);
    assert_eq!(records[0].meta().before(), Some(&before));
    assert!(records[0].meta().after().is_none());
    Ok(())
}

#[tokio::test]
async fn entity_type_is_stored_verbatim() -> AppResult<()> {
    let (repository, recorder) = recorder(AuditMode::Accept);

    recorder
        .record_create(
            "actor-1",
            "legacy_imports",
            "42",
            Snapshot::capture(&json!({ "id": 42 }))?,
        )
        .await?;

    assert_eq!(repository.records.lock().await[0].entity(), "legacy_imports");
    Ok(())
}

#[tokio::test]
async fn timestamps_strictly_increase_across_records() -> AppResult<()> {
    let (repository, recorder) = recorder(AuditMode::Accept);

    for index in 0..20 {
        recorder
            .record_create(
                "actor-1",
                "tasks",
                &index.to_string(),
                Snapshot::capture(&json!({ "id": index }))?,
            )
            .await?;
    }

    let records = repository.records.lock().await;
    assert!(
        records
            .windows(2)
            .all(|pair| pair[0].timestamp() < pair[1].timestamp())
    );
    Ok(())
}

#[tokio::test]
async fn store_failure_is_returned_to_the_caller() -> AppResult<()> {
    let (_, recorder) = recorder(AuditMode::Fail);

    let result = recorder
        .record_delete(
            "actor-1",
            "tasks",
            "t-1",
            Snapshot::capture(&json!({ "id": "t-1" }))?,
        )
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    Ok(())
}

#[tokio::test]
async fn hung_store_times_out() -> AppResult<()> {
    let (repository, recorder) = recorder(AuditMode::Hang);

    let result = recorder
        .record_create(
            "actor-1",
            "tasks",
            "t-1",
            Snapshot::capture(&json!({ "id": "t-1" }))?,
        )
        .await;

    assert!(
        matches!(result, Err(AppError::Internal(ref message)) if message.contains("50 ms"))
    );
    assert!(repository.records.lock().await.is_empty());
    Ok(())
}

#[test]
fn monotonic_clock_never_repeats() {
    let clock = MonotonicClock::new();
    let readings: Vec<_> = (0..1_000).map(|_| clock.now()).collect();

    assert!(readings.windows(2).all(|pair| pair[0] < pair[1]));
}
