use async_trait::async_trait;

use tasktrail_core::AppResult;
use tasktrail_domain::{AuditRecord, NewAuditRecord};

/// Append-only port into the audit store.
///
/// No update or delete is exposed; records are immutable once written.
#[async_trait]
pub trait AuditRecordRepository: Send + Sync {
    /// Persists one record and returns it with its store-generated id.
    async fn append_record(&self, record: NewAuditRecord) -> AppResult<AuditRecord>;
}
