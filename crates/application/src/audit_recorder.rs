//! Audit Recorder: the only writer into the audit store.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

use tasktrail_core::{AppError, AppResult};
use tasktrail_domain::{AuditChange, NewAuditRecord, Snapshot};

use crate::AuditRecordRepository;

/// Upper bound for one audit append when none is configured.
pub const DEFAULT_AUDIT_WRITE_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Per-process clock whose readings strictly increase.
///
/// Each reading is `max(now, previous + 1µs)`.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_micros: AtomicI64,
}

impl MonotonicClock {
    /// Creates a clock with no prior reading.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next timestamp.
    pub fn now(&self) -> DateTime<Utc> {
        let wall_clock = Utc::now();
        let now_micros = wall_clock.timestamp_micros();
        let assigned = match self.last_micros.fetch_update(
            Ordering::AcqRel,
            Ordering::Acquire,
            |last| Some(now_micros.max(last.saturating_add(1))),
        ) {
            Ok(previous) | Err(previous) => now_micros.max(previous.saturating_add(1)),
        };

        DateTime::from_timestamp_micros(assigned).unwrap_or(wall_clock)
    }
}

/// Appends one immutable record per committed mutation.
///
/// The recorder does not inspect the actor id; callers decide whether a
/// mutation is attributable before calling it. Errors are returned so the
/// caller can contain them.
#[derive(Clone)]
pub struct AuditRecorder {
    repository: Arc<dyn AuditRecordRepository>,
    clock: Arc<MonotonicClock>,
    write_timeout: Duration,
}

impl AuditRecorder {
    /// Creates a recorder with the default write timeout.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditRecordRepository>) -> Self {
        Self {
            repository,
            clock: Arc::new(MonotonicClock::new()),
            write_timeout: DEFAULT_AUDIT_WRITE_TIMEOUT,
        }
    }

    /// Overrides the bound on a single append.
    #[must_use]
    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    /// Records a CREATE with the post-mutation snapshot.
    pub async fn record_create(
        &self,
        actor_id: &str,
        entity_type: &str,
        entity_id: &str,
        after: Snapshot,
    ) -> AppResult<()> {
        self.record_change(actor_id, entity_type, entity_id, AuditChange::Create { after })
            .await
    }

    /// Records an UPDATE with both snapshots.
    pub async fn record_update(
        &self,
        actor_id: &str,
        entity_type: &str,
        entity_id: &str,
        before: Snapshot,
        after: Snapshot,
    ) -> AppResult<()> {
        self.record_change(
            actor_id,
            entity_type,
            entity_id,
            AuditChange::Update { before, after },
        )
        .await
    }

    /// Records a DELETE with the pre-mutation snapshot.
    pub async fn record_delete(
        &self,
        actor_id: &str,
        entity_type: &str,
        entity_id: &str,
        before: Snapshot,
    ) -> AppResult<()> {
        self.record_change(actor_id, entity_type, entity_id, AuditChange::Delete { before })
            .await
    }

    async fn record_change(
        &self,
        actor_id: &str,
        entity_type: &str,
        entity_id: &str,
        change: AuditChange,
    ) -> AppResult<()> {
        let record = NewAuditRecord::new(
            actor_id,
            entity_type,
            entity_id,
            change,
            self.clock.now(),
        );

        match tokio::time::timeout(self.write_timeout, self.repository.append_record(record)).await
        {
            Ok(result) => result.map(|_| ()),
            Err(_) => Err(AppError::Internal(format!(
                "audit append did not complete within {} ms",
                self.write_timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
mod tests;
