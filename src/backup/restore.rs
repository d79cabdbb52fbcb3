//! Backup restoration
//!
//! Applies a COMPLETED JSON backup to the record source in full, merge or
//! preview mode. Only the inventory group is restored.

use std::fs;
use std::time::Instant;

use serde_json::json;
use tracing::{info, warn};

use crate::audit::{record_best_effort, Action, AuditEntry, AuditSink, EntityType};
use crate::clock::Clock;
use crate::error::{MedstockError, MedstockResult};
use crate::export::decode;
use crate::models::{Backup, BackupId, InventoryItem, RestoreMode};
use crate::storage::{BackupStore, RecordSource};

/// Restores backups into a record source
pub struct RestoreEngine<'a> {
    source: &'a dyn RecordSource,
    store: &'a dyn BackupStore,
    audit: &'a dyn AuditSink,
    clock: &'a dyn Clock,
}

impl<'a> RestoreEngine<'a> {
    pub fn new(
        source: &'a dyn RecordSource,
        store: &'a dyn BackupStore,
        audit: &'a dyn AuditSink,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            source,
            store,
            audit,
            clock,
        }
    }

    /// Restore a backup
    ///
    /// An unknown id, a non-JSON backup or a backup that is not COMPLETED is an
    /// error and nothing is touched. Everything after that is reported through
    /// the returned `RestoreResult`: per-item failures are skipped and listed,
    /// a failure that stops the restore sets `success` to false.
    pub fn restore(
        &self,
        backup_id: BackupId,
        actor: &str,
        mode: RestoreMode,
    ) -> MedstockResult<RestoreResult> {
        let backup = self
            .store
            .get_backup(backup_id)?
            .ok_or_else(|| MedstockError::backup_not_found(backup_id.to_string()))?;

        if !backup.file_type.is_restorable() {
            return Err(MedstockError::UnsupportedFormat {
                operation: "restore",
                format: backup.file_type.to_string(),
            });
        }

        if !backup.is_completed() {
            return Err(MedstockError::Validation(format!(
                "Backup {} is {} and cannot be restored",
                backup.id, backup.status
            )));
        }

        let started = Instant::now();
        info!(backup_id = %backup.id, mode = %mode, actor, "starting restore");

        let mut result = RestoreResult::new(mode);
        if let Err(e) = self.apply(&backup, mode, &mut result) {
            warn!(backup_id = %backup.id, error = %e, "restore aborted");
            result.errors.push(e.to_string());
            result.success = false;
        }
        result.duration_ms = started.elapsed().as_millis() as u64;

        if mode != RestoreMode::Preview {
            self.audit_restore(actor, &backup, &result);
        }

        info!(
            backup_id = %backup.id,
            added = result.items_added,
            updated = result.items_updated,
            skipped = result.items_skipped,
            success = result.success,
            "restore finished"
        );
        Ok(result)
    }

    fn apply(&self, backup: &Backup, mode: RestoreMode, result: &mut RestoreResult) -> MedstockResult<()> {
        let bytes = fs::read(&backup.storage_path).map_err(|e| {
            MedstockError::Io(format!(
                "Failed to read backup file {}: {}",
                backup.storage_path.display(),
                e
            ))
        })?;
        let payload = decode(&bytes, backup.file_type)?;

        match mode {
            RestoreMode::Full => {
                let removed = self.source.delete_all_inventory_items()?;
                info!(removed, "cleared inventory for full restore");
                for item in payload.inventory_items {
                    self.insert_item(item, result);
                }
            }
            RestoreMode::Merge => {
                for item in payload.inventory_items {
                    if self.source.inventory_item_exists(item.id)? {
                        self.update_item(item, result);
                    } else {
                        self.insert_item(item, result);
                    }
                }
            }
            RestoreMode::Preview => {
                for item in &payload.inventory_items {
                    if self.source.inventory_item_exists(item.id)? {
                        result.items_updated += 1;
                    } else {
                        result.items_added += 1;
                    }
                }
            }
        }
        Ok(())
    }

    fn insert_item(&self, item: InventoryItem, result: &mut RestoreResult) {
        let id = item.id;
        match self.source.insert_inventory_item(item) {
            Ok(()) => result.items_added += 1,
            Err(e) => result.skip(format!("Item {}: {}", id, e)),
        }
    }

    fn update_item(&self, item: InventoryItem, result: &mut RestoreResult) {
        let id = item.id;
        match self.source.update_inventory_item(item) {
            Ok(()) => result.items_updated += 1,
            Err(e) => result.skip(format!("Item {}: {}", id, e)),
        }
    }

    fn audit_restore(&self, actor: &str, backup: &Backup, result: &RestoreResult) {
        let entry = AuditEntry::new(self.clock.now(), actor, Action::BackupRestore, EntityType::Backup)
            .with_entity_id(backup.id.as_uuid().to_string())
            .with_new_value(&json!({
                "fileName": backup.file_name,
                "mode": result.mode,
                "itemsAdded": result.items_added,
                "itemsUpdated": result.items_updated,
                "itemsSkipped": result.items_skipped,
                "success": result.success,
            }));
        record_best_effort(self.audit, &entry);
    }
}

/// Outcome of a restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreResult {
    pub mode: RestoreMode,
    pub items_added: u64,
    pub items_updated: u64,
    pub items_skipped: u64,
    pub errors: Vec<String>,
    pub duration_ms: u64,
    pub success: bool,
}

impl RestoreResult {
    fn new(mode: RestoreMode) -> Self {
        Self {
            mode,
            items_added: 0,
            items_updated: 0,
            items_skipped: 0,
            errors: Vec::new(),
            duration_ms: 0,
            success: true,
        }
    }

    fn skip(&mut self, message: String) {
        warn!(error = %message, "skipping item during restore");
        self.items_skipped += 1;
        self.errors.push(message);
    }

    /// Items that were (or, for a preview, would be) written
    pub fn items_restored(&self) -> u64 {
        self.items_added + self.items_updated
    }

    /// One-line summary of the counts
    pub fn summary(&self) -> String {
        let verb = if self.mode == RestoreMode::Preview {
            "Would restore"
        } else {
            "Restored"
        };
        let mut summary = format!(
            "{} {} item(s): {} added, {} updated",
            verb,
            self.items_restored(),
            self.items_added,
            self.items_updated
        );
        if self.items_skipped > 0 {
            summary.push_str(&format!(", {} skipped", self.items_skipped));
        }
        if !self.success {
            summary.push_str(" (incomplete)");
        }
        summary
    }
}
