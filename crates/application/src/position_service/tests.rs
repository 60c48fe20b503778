use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{AuditAction, PositionId};

use crate::test_support::{Harness, actor};

use super::PositionService;

fn service(harness: &Harness) -> PositionService {
    PositionService::new(harness.store.clone(), harness.recorder.clone())
}

#[tokio::test]
async fn position_lifecycle_is_fully_audited() -> AppResult<()> {
    let harness = Harness::new();
    let service = service(&harness);
    let actor = actor();

    let position = service
        .create_position(Some(&actor), "Engineer".to_owned())
        .await?;
    let renamed = service
        .update_position(Some(&actor), position.id(), Some("Staff Engineer".to_owned()))
        .await?;
    service.delete_position(Some(&actor), position.id()).await?;

    assert_eq!(renamed.name(), "Staff Engineer");
    let records = harness.audit_records().await;
    let actions: Vec<_> = records.iter().map(|record| record.action()).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Create, AuditAction::Update, AuditAction::Delete]
    );
    assert!(records.iter().all(|record| record.entity() == "positions"
        && record.entity_id() == position.id().to_string()));
    let before = records[2]
        .meta()
        .before()
        .unwrap_or_else(|| panic!("delete should carry before"));
    assert_eq!(
        before.get("name").and_then(|value| value.as_str()),
        Some("Staff Engineer")
    );
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_a_conflict_without_audit() -> AppResult<()> {
    let harness = Harness::new();
    harness.seed_position("Engineer").await;

    let result = service(&harness)
        .create_position(Some(&actor()), "Engineer".to_owned())
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(harness.audit_records().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_without_name_keeps_state() -> AppResult<()> {
    let harness = Harness::new();
    let position = harness.seed_position("Engineer").await;

    let updated = service(&harness)
        .update_position(Some(&actor()), position.id(), None)
        .await?;

    assert_eq!(updated, position);
    let records = harness.audit_records().await;
    let meta = records[0].meta();
    assert_eq!(meta.before(), meta.after());
    Ok(())
}

#[tokio::test]
async fn unknown_position_is_not_found() {
    let harness = Harness::new();

    let result = service(&harness)
        .delete_position(Some(&actor()), PositionId::new())
        .await;

    assert!(
        matches!(result, Err(AppError::NotFound(ref message)) if message == "Position not found")
    );
}
