use async_trait::async_trait;
use tokio::sync::RwLock;

use tasktrail_application::AuditRecordRepository;
use tasktrail_core::AppResult;
use tasktrail_domain::{AuditRecord, AuditRecordId, NewAuditRecord};

/// In-memory append-only audit store.
#[derive(Debug, Default)]
pub struct InMemoryAuditRecordRepository {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditRecordRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every record in append order.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl AuditRecordRepository for InMemoryAuditRecordRepository {
    async fn append_record(&self, record: NewAuditRecord) -> AppResult<AuditRecord> {
        let record = record.into_record(AuditRecordId::from_uuid(uuid::Uuid::new_v4()));
        self.records.write().await.push(record.clone());
        Ok(record)
    }
}
