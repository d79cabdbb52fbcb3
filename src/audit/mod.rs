//! Audit logging for Medstock
//!
//! Backup exports, restores and deletions are recorded in an append-only
//! audit log.
//!
//! - `AuditEntry`: one `(actor, action, entity type, entity id?, old value?,
//!   new value?)` record.
//! - `AuditSink`: where the engine sends entries. Audit writes are best-effort
//!   from the engine's point of view; see [`record_best_effort`].
//! - `AuditLogger`: a JSONL file implementation of `AuditSink`.

mod entry;
mod logger;

pub use entry::{Action, AuditEntry, EntityType};
pub use logger::AuditLogger;

use crate::error::MedstockResult;

/// Destination for audit entries
pub trait AuditSink {
    fn record(&self, entry: &AuditEntry) -> MedstockResult<()>;
}

/// Record an entry, logging instead of propagating any failure
pub fn record_best_effort(sink: &dyn AuditSink, entry: &AuditEntry) {
    if let Err(e) = sink.record(entry) {
        tracing::warn!(
            action = %entry.action,
            entity_id = entry.entity_id.as_deref().unwrap_or("-"),
            error = %e,
            "failed to write audit entry"
        );
    }
}
