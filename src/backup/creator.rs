//! Backup creation
//!
//! Produces one file and one Backup row per requested format. Each row is
//! inserted IN_PROGRESS before any data is read and always ends COMPLETED or
//! FAILED; a failure in one format never touches another format's row.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::audit::{record_best_effort, Action, AuditEntry, AuditSink, EntityType};
use crate::clock::Clock;
use crate::error::{MedstockError, MedstockResult};
use crate::export::{encode, BackupPayload};
use crate::models::{Backup, BackupCreateOptions, BackupId, FileType};
use crate::storage::{BackupStore, RecordSource};

/// Steps reported per format
const STEPS_PER_FORMAT: usize = 8;

/// A progress notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupProgress {
    /// 0 to 100, strictly increasing within one call
    pub percent: u8,
    pub step: String,
}

struct ProgressTracker<'p> {
    sink: &'p mut dyn FnMut(&BackupProgress),
    total_steps: usize,
    last: Option<u8>,
}

impl<'p> ProgressTracker<'p> {
    fn new(format_count: usize, sink: &'p mut dyn FnMut(&BackupProgress)) -> Self {
        Self {
            sink,
            total_steps: format_count * STEPS_PER_FORMAT,
            last: None,
        }
    }

    /// Report the start of `step` (1-based) for the format at `format_index`
    fn step(&mut self, format_index: usize, step: usize, format: FileType, label: &str) {
        let done = format_index * STEPS_PER_FORMAT + step - 1;
        let percent = (done * 100 / self.total_steps) as u8;
        self.emit(percent, format!("[{}] {}", format, label));
    }

    fn finish(&mut self, label: &str) {
        self.emit(100, label.to_string());
    }

    fn emit(&mut self, percent: u8, step: String) {
        if self.last.map_or(false, |last| percent <= last) {
            return;
        }
        debug!(percent, step = %step, "backup progress");
        self.last = Some(percent);
        (self.sink)(&BackupProgress { percent, step });
    }
}

/// Why a single format did not complete
enum FormatFailure {
    /// The row reached FAILED
    Failed(BackupId, MedstockError),
    /// The IN_PROGRESS row could not even be inserted
    Untracked(MedstockError),
}

/// Creates, lists and deletes backups
pub struct BackupCreator<'a> {
    source: &'a dyn RecordSource,
    store: &'a dyn BackupStore,
    audit: &'a dyn AuditSink,
    clock: &'a dyn Clock,
    backup_dir: PathBuf,
}

impl<'a> BackupCreator<'a> {
    pub fn new(
        source: &'a dyn RecordSource,
        store: &'a dyn BackupStore,
        audit: &'a dyn AuditSink,
        clock: &'a dyn Clock,
        backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            store,
            audit,
            clock,
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Create backups without progress reporting
    pub fn create_backup(
        &self,
        actor: &str,
        options: &BackupCreateOptions,
        formats: &[FileType],
    ) -> MedstockResult<Vec<BackupId>> {
        self.create_backup_with_progress(actor, options, formats, &mut |_: &BackupProgress| {})
    }

    /// Create one backup per requested format, reporting progress as it goes
    ///
    /// Formats are deduplicated and processed in the order JSON, CSV, SQL.
    /// Returns the ids of the completed rows. If any format fails, including
    /// one whose IN_PROGRESS row could not be inserted, every other format
    /// still runs and the call returns `BackupFailed` carrying the first
    /// failure and the ids that did complete.
    pub fn create_backup_with_progress(
        &self,
        actor: &str,
        options: &BackupCreateOptions,
        formats: &[FileType],
        progress: &mut dyn FnMut(&BackupProgress),
    ) -> MedstockResult<Vec<BackupId>> {
        let formats: Vec<FileType> = FileType::ALL
            .into_iter()
            .filter(|f| formats.contains(f))
            .collect();

        if formats.is_empty() {
            return Err(MedstockError::Validation(
                "At least one backup format must be requested".into(),
            ));
        }

        let started_at = self.clock.now();
        let base_name = self.unique_base_name(&options.name, started_at, &formats)?;
        let mut tracker = ProgressTracker::new(formats.len(), progress);
        let mut completed = Vec::new();
        let mut first_failure = None;

        info!(actor, base_name = %base_name, formats = formats.len(), "starting backup");

        for (index, format) in formats.iter().copied().enumerate() {
            match self.create_one(actor, options, format, index, &base_name, &mut tracker) {
                Ok(id) => completed.push(id),
                Err(FormatFailure::Failed(id, e)) => {
                    warn!(backup_id = %id, format = %format, error = %e, "backup format failed");
                    first_failure.get_or_insert((Some(id), e));
                }
                Err(FormatFailure::Untracked(e)) => {
                    error!(format = %format, error = %e, "could not record backup metadata");
                    first_failure.get_or_insert((None, e));
                }
            }
        }

        tracker.finish("Backup complete");

        match first_failure {
            None => {
                info!(completed = completed.len(), "backup finished");
                Ok(completed)
            }
            Some((backup_id, source)) => Err(MedstockError::BackupFailed {
                backup_id,
                completed,
                source: Box::new(source),
            }),
        }
    }

    fn create_one(
        &self,
        actor: &str,
        options: &BackupCreateOptions,
        format: FileType,
        index: usize,
        base_name: &str,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<BackupId, FormatFailure> {
        let file_name = format!("{}.{}", base_name, format.extension());
        let storage_path = self.backup_dir.join(&file_name);

        let mut backup = Backup::start(file_name, format, storage_path, actor, self.clock.now());
        backup.notes = options.notes.clone();
        self.store
            .insert_backup(backup.clone())
            .map_err(FormatFailure::Untracked)?;

        match self.produce(&mut backup, options, index, tracker) {
            Ok(()) => {
                tracker.step(index, 8, format, "Recording audit entry");
                self.audit_export(actor, &backup, options);
                info!(
                    backup_id = %backup.id,
                    format = %format,
                    file_size = backup.file_size,
                    record_count = backup.record_count,
                    "backup completed"
                );
                Ok(backup.id)
            }
            Err(e) => {
                self.mark_failed(&mut backup);
                Err(FormatFailure::Failed(backup.id, e))
            }
        }
    }

    /// Steps 1-7: read, encode, write, mark COMPLETED
    fn produce(
        &self,
        backup: &mut Backup,
        options: &BackupCreateOptions,
        index: usize,
        tracker: &mut ProgressTracker<'_>,
    ) -> MedstockResult<()> {
        let format = backup.file_type;

        tracker.step(index, 1, format, "Reading inventory items");
        let mut payload = BackupPayload::new(self.source.inventory_items(options.date_range.as_ref())?);

        if options.include_audit_logs {
            tracker.step(index, 2, format, "Reading audit logs");
            payload.audit_logs = Some(self.source.audit_logs()?);
        }

        if options.include_users {
            tracker.step(index, 3, format, "Reading user records");
            payload.users = Some(self.source.users()?);
        }

        if options.include_settings {
            tracker.step(index, 4, format, "Reading system settings");
            payload.system_settings = Some(self.source.system_settings()?);
        }

        tracker.step(index, 5, format, "Preparing backup directory");
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            MedstockError::Io(format!(
                "Failed to create backup directory {}: {}",
                self.backup_dir.display(),
                e
            ))
        })?;

        tracker.step(index, 6, format, &format!("Writing {} file", format));
        let bytes = encode(&payload, format)?;
        fs::write(&backup.storage_path, &bytes).map_err(|e| {
            MedstockError::Io(format!(
                "Failed to write backup file {}: {}",
                backup.storage_path.display(),
                e
            ))
        })?;

        tracker.step(index, 7, format, "Finalizing backup metadata");
        let mut finished = backup.clone();
        finished.complete(bytes.len() as u64, payload.record_count())?;
        self.store.update_backup(&finished)?;
        *backup = finished;

        Ok(())
    }

    fn mark_failed(&self, backup: &mut Backup) {
        if let Err(e) = backup.fail() {
            error!(backup_id = %backup.id, error = %e, "backup row already terminal");
            return;
        }
        if let Err(e) = self.store.update_backup(backup) {
            error!(backup_id = %backup.id, error = %e, "failed to mark backup as FAILED");
        }
    }

    fn audit_export(&self, actor: &str, backup: &Backup, options: &BackupCreateOptions) {
        let entry = AuditEntry::new(self.clock.now(), actor, Action::BackupExport, EntityType::Backup)
            .with_entity_id(backup.id.as_uuid().to_string())
            .with_new_value(&json!({
                "fileName": backup.file_name,
                "fileType": backup.file_type,
                "fileSize": backup.file_size,
                "recordCount": backup.record_count,
                "includeAuditLogs": options.include_audit_logs,
                "includeUsers": options.include_users,
                "includeSettings": options.include_settings,
                "notes": options.notes,
            }));
        record_best_effort(self.audit, &entry);
    }

    /// `<name>-YYYYMMDD-HHMMSS-mmm`, with a counter appended if any target file exists
    fn unique_base_name(
        &self,
        name: &str,
        at: DateTime<Utc>,
        formats: &[FileType],
    ) -> MedstockResult<String> {
        let stem = format!(
            "{}-{}-{:03}",
            sanitize_name(name),
            at.format("%Y%m%d-%H%M%S"),
            at.timestamp_subsec_millis()
        );

        let taken: HashSet<String> = self
            .store
            .list_backups()?
            .into_iter()
            .map(|b| b.file_name)
            .collect();

        let is_free = |candidate: &str| {
            formats.iter().all(|f| {
                let file_name = format!("{}.{}", candidate, f.extension());
                !taken.contains(&file_name) && !self.backup_dir.join(&file_name).exists()
            })
        };

        if is_free(&stem) {
            return Ok(stem);
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", stem, n);
            if is_free(&candidate) {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    /// All backup rows, newest first
    pub fn list_backups(&self) -> MedstockResult<Vec<Backup>> {
        self.store.list_backups()
    }

    pub fn get_backup(&self, id: BackupId) -> MedstockResult<Backup> {
        self.store
            .get_backup(id)?
            .ok_or_else(|| MedstockError::backup_not_found(id.to_string()))
    }

    /// Most recent COMPLETED backup
    pub fn latest_completed(&self) -> MedstockResult<Option<Backup>> {
        Ok(self.store.list_backups()?.into_iter().find(Backup::is_completed))
    }

    /// Explicitly delete a backup's file and metadata row
    pub fn delete_backup(&self, actor: &str, id: BackupId) -> MedstockResult<Backup> {
        let backup = self.get_backup(id)?;

        match fs::remove_file(&backup.storage_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(backup_id = %id, "backup file already missing");
            }
            Err(e) => {
                return Err(MedstockError::Io(format!(
                    "Failed to delete backup file {}: {}",
                    backup.storage_path.display(),
                    e
                )))
            }
        }

        self.store.delete_backup(id)?;

        let entry = AuditEntry::new(self.clock.now(), actor, Action::BackupDelete, EntityType::Backup)
            .with_entity_id(id.as_uuid().to_string())
            .with_old_value(&backup);
        record_best_effort(self.audit, &entry);

        info!(backup_id = %id, "backup deleted");
        Ok(backup)
    }
}

/// Keep names filesystem-safe
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    let cleaned = cleaned.trim_matches('-');
    if cleaned.is_empty() {
        "backup".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLogger;
    use crate::clock::FixedClock;
    use crate::config::paths::MedstockPaths;
    use crate::models::{BackupStatus, InventoryItem, UserRecord, UserRole};
    use crate::storage::Storage;
    use chrono::TimeZone;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, FixedClock) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MedstockPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap());
        (temp_dir, storage, clock)
    }

    fn seed(storage: &Storage, count: usize) {
        for i in 0..count {
            storage
                .insert_inventory_item(InventoryItem::new(format!("Item {}", i), i as i64 + 1))
                .unwrap();
        }
    }

    fn creator<'a>(storage: &'a Storage, clock: &'a FixedClock) -> BackupCreator<'a> {
        BackupCreator::new(storage, storage, storage, clock, storage.paths().backup_dir())
    }

    /// Fails every inventory read after the first `ok_reads`
    struct FlakySource<'a> {
        inner: &'a Storage,
        ok_reads: usize,
        reads: Cell<usize>,
    }

    impl RecordSource for FlakySource<'_> {
        fn inventory_items(
            &self,
            range: Option<&crate::models::DateRange>,
        ) -> MedstockResult<Vec<InventoryItem>> {
            let n = self.reads.get();
            self.reads.set(n + 1);
            if n >= self.ok_reads {
                return Err(MedstockError::Storage("connection reset".into()));
            }
            self.inner.inventory_items(range)
        }
        fn audit_logs(&self) -> MedstockResult<Vec<AuditEntry>> {
            self.inner.audit_logs()
        }
        fn users(&self) -> MedstockResult<Vec<UserRecord>> {
            self.inner.users()
        }
        fn system_settings(&self) -> MedstockResult<Vec<crate::models::SystemSetting>> {
            self.inner.system_settings()
        }
        fn inventory_count(&self) -> MedstockResult<usize> {
            self.inner.inventory_count()
        }
        fn inventory_item_exists(&self, id: crate::models::ItemId) -> MedstockResult<bool> {
            self.inner.inventory_item_exists(id)
        }
        fn insert_inventory_item(&self, item: InventoryItem) -> MedstockResult<()> {
            self.inner.insert_inventory_item(item)
        }
        fn update_inventory_item(&self, item: InventoryItem) -> MedstockResult<()> {
            self.inner.update_inventory_item(item)
        }
        fn delete_all_inventory_items(&self) -> MedstockResult<usize> {
            self.inner.delete_all_inventory_items()
        }
    }

    /// Refuses the `fail_on`-th (0-based) backup row insert
    struct FullDiskStore<'a> {
        inner: &'a Storage,
        fail_on: usize,
        inserts: Cell<usize>,
    }

    impl BackupStore for FullDiskStore<'_> {
        fn insert_backup(&self, backup: Backup) -> MedstockResult<()> {
            let n = self.inserts.get();
            self.inserts.set(n + 1);
            if n == self.fail_on {
                return Err(MedstockError::Storage("disk full".into()));
            }
            self.inner.insert_backup(backup)
        }
        fn update_backup(&self, backup: &Backup) -> MedstockResult<()> {
            self.inner.update_backup(backup)
        }
        fn get_backup(&self, id: BackupId) -> MedstockResult<Option<Backup>> {
            self.inner.get_backup(id)
        }
        fn list_backups(&self) -> MedstockResult<Vec<Backup>> {
            self.inner.list_backups()
        }
        fn delete_backup(&self, id: BackupId) -> MedstockResult<bool> {
            self.inner.delete_backup(id)
        }
    }

    #[test]
    fn test_json_backup_of_eight_items() {
        let (_temp, storage, clock) = setup();
        seed(&storage, 8);

        let ids = creator(&storage, &clock)
            .create_backup("admin", &BackupCreateOptions::named("nightly"), &[FileType::Json])
            .unwrap();
        assert_eq!(ids.len(), 1);

        let backup = storage.get_backup(ids[0]).unwrap().unwrap();
        assert_eq!(backup.status, BackupStatus::Completed);
        assert_eq!(backup.record_count, 8);
        assert!(backup.file_size > 0);
        assert_eq!(backup.file_name, "nightly-20250602-093000-000.json");

        let bytes = fs::read(&backup.storage_path).unwrap();
        assert_eq!(bytes.len() as u64, backup.file_size);
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["inventoryItems"].as_array().unwrap().len(), 8);
        assert!(value.get("users").is_none());
    }

    #[test]
    fn test_one_row_per_format() {
        let (_temp, storage, clock) = setup();
        seed(&storage, 2);

        let ids = creator(&storage, &clock)
            .create_backup(
                "admin",
                &BackupCreateOptions::named("weekly"),
                &[FileType::Sql, FileType::Json, FileType::Csv, FileType::Json],
            )
            .unwrap();

        assert_eq!(ids.len(), 3);
        let types: Vec<FileType> = ids
            .iter()
            .map(|id| storage.get_backup(*id).unwrap().unwrap().file_type)
            .collect();
        assert_eq!(types, vec![FileType::Json, FileType::Csv, FileType::Sql]);

        for id in ids {
            let backup = storage.get_backup(id).unwrap().unwrap();
            assert!(backup.storage_path.exists());
            assert_eq!(backup.record_count, 2);
        }
    }

    #[test]
    fn test_record_count_only_counts_inventory() {
        // Known asymmetry: users, audit logs and settings are written to the
        // file but are not reflected in record_count.
        let (_temp, storage, clock) = setup();
        seed(&storage, 3);
        for name in ["amir", "bea", "cho", "dev"] {
            storage.users.upsert(UserRecord::new(name, UserRole::Staff)).unwrap();
        }

        let mut options = BackupCreateOptions::named("full");
        options.include_users = true;
        options.include_audit_logs = true;
        let ids = creator(&storage, &clock)
            .create_backup("admin", &options, &[FileType::Json])
            .unwrap();

        let backup = storage.get_backup(ids[0]).unwrap().unwrap();
        assert_eq!(backup.record_count, 3);

        let value: serde_json::Value =
            serde_json::from_slice(&fs::read(&backup.storage_path).unwrap()).unwrap();
        assert_eq!(value["users"].as_array().unwrap().len(), 4);
        assert!(value["auditLogs"].is_array());
    }

    #[test]
    fn test_unwritable_directory_marks_failed() {
        let (temp, storage, clock) = setup();
        seed(&storage, 2);
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let creator = BackupCreator::new(&storage, &storage, &storage, &clock, blocker.join("backups"));
        let err = creator
            .create_backup("admin", &BackupCreateOptions::named("nightly"), &[FileType::Json])
            .unwrap_err();

        let MedstockError::BackupFailed { backup_id, completed, source } = err else {
            panic!("expected BackupFailed");
        };
        assert!(completed.is_empty());
        assert!(matches!(*source, MedstockError::Io(_)));

        let backup = storage.get_backup(backup_id.unwrap()).unwrap().unwrap();
        assert_eq!(backup.status, BackupStatus::Failed);
        assert_eq!(backup.file_size, 0);
        assert_eq!(backup.record_count, 0);
    }

    #[test]
    fn test_failed_format_does_not_affect_completed_one() {
        let (_temp, storage, clock) = setup();
        seed(&storage, 4);
        let source = FlakySource {
            inner: &storage,
            ok_reads: 1,
            reads: Cell::new(0),
        };

        let creator = BackupCreator::new(&source, &storage, &storage, &clock, storage.paths().backup_dir());
        let err = creator
            .create_backup(
                "admin",
                &BackupCreateOptions::named("mixed"),
                &[FileType::Json, FileType::Csv, FileType::Sql],
            )
            .unwrap_err();

        let MedstockError::BackupFailed { completed, .. } = err else {
            panic!("expected BackupFailed");
        };
        assert_eq!(completed.len(), 1);

        let rows = storage.list_backups().unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|b| b.status.is_terminal()));
        let json = rows.iter().find(|b| b.file_type == FileType::Json).unwrap();
        assert_eq!(json.status, BackupStatus::Completed);
        assert_eq!(json.id, completed[0]);
        assert_eq!(rows.iter().filter(|b| b.is_failed()).count(), 2);
    }

    #[test]
    fn test_unrecorded_format_does_not_stop_the_others() {
        let (_temp, storage, clock) = setup();
        seed(&storage, 3);
        let store = FullDiskStore {
            inner: &storage,
            fail_on: 1,
            inserts: Cell::new(0),
        };

        let creator = BackupCreator::new(&storage, &store, &storage, &clock, storage.paths().backup_dir());
        let err = creator
            .create_backup(
                "admin",
                &BackupCreateOptions::named("nightly"),
                &[FileType::Json, FileType::Csv, FileType::Sql],
            )
            .unwrap_err();

        let MedstockError::BackupFailed { backup_id, completed, source } = err else {
            panic!("expected BackupFailed");
        };
        assert_eq!(backup_id, None);
        assert!(matches!(*source, MedstockError::Storage(_)));
        assert_eq!(completed.len(), 2);

        let rows = storage.list_backups().unwrap();
        let mut types: Vec<FileType> = rows.iter().map(|b| b.file_type).collect();
        types.sort_by_key(|t| t.extension());
        assert_eq!(types, vec![FileType::Json, FileType::Sql]);
        assert!(rows.iter().all(Backup::is_completed));
        assert!(rows.iter().all(|b| completed.contains(&b.id)));
        assert!(!storage.paths().backup_dir().join("nightly-20250602-093000-000.csv").exists());
    }

    #[test]
    fn test_date_range_limits_inventory() {
        let (_temp, storage, clock) = setup();
        let now = clock.now();
        for (name, days_ago) in [("Gauze", 60), ("Saline", 45), ("Gloves", 3), ("Masks", 1)] {
            let mut item = InventoryItem::new(name, 5);
            item.created_at = now - chrono::Duration::days(days_ago);
            storage.insert_inventory_item(item).unwrap();
        }

        let mut options = BackupCreateOptions::named("recent");
        options.date_range = Some(crate::models::DateRange::new(
            Some(now - chrono::Duration::days(7)),
            Some(now),
        ));
        let ids = creator(&storage, &clock)
            .create_backup("admin", &options, &[FileType::Json])
            .unwrap();

        let backup = storage.get_backup(ids[0]).unwrap().unwrap();
        assert_eq!(backup.record_count, 2);

        let value: serde_json::Value =
            serde_json::from_slice(&fs::read(&backup.storage_path).unwrap()).unwrap();
        let names: Vec<&str> = value["inventoryItems"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Gloves") && names.contains(&"Masks"));
    }

    #[test]
    fn test_progress_strictly_increases_to_100() {
        let (_temp, storage, clock) = setup();
        seed(&storage, 1);
        let mut events = Vec::new();

        creator(&storage, &clock)
            .create_backup_with_progress(
                "admin",
                &BackupCreateOptions::named("p"),
                &[FileType::Json, FileType::Csv],
                &mut |p: &BackupProgress| events.push(p.clone()),
            )
            .unwrap();

        assert_eq!(events.first().unwrap().percent, 0);
        assert_eq!(events.last().unwrap().percent, 100);
        assert!(events.windows(2).all(|w| w[0].percent < w[1].percent));
        assert!(events.iter().any(|e| e.step == "[CSV] Writing CSV file"));
    }

    #[test]
    fn test_empty_format_list_has_no_side_effects() {
        let (_temp, storage, clock) = setup();
        let err = creator(&storage, &clock)
            .create_backup("admin", &BackupCreateOptions::default(), &[])
            .unwrap_err();

        assert!(err.is_validation());
        assert!(storage.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_repeated_backup_gets_distinct_file() {
        let (_temp, storage, clock) = setup();
        seed(&storage, 1);
        let creator = creator(&storage, &clock);
        let options = BackupCreateOptions::named("nightly");

        let first = creator.create_backup("admin", &options, &[FileType::Json]).unwrap();
        let second = creator.create_backup("admin", &options, &[FileType::Json]).unwrap();

        let a = storage.get_backup(first[0]).unwrap().unwrap();
        let b = storage.get_backup(second[0]).unwrap().unwrap();
        assert_ne!(a.storage_path, b.storage_path);
        assert_eq!(b.file_name, "nightly-20250602-093000-000-1.json");
    }

    #[test]
    fn test_export_is_audited() {
        let (_temp, storage, clock) = setup();
        seed(&storage, 2);
        let ids = creator(&storage, &clock)
            .create_backup("pharm01", &BackupCreateOptions::named("n"), &[FileType::Csv])
            .unwrap();

        let entries = storage.audit_logs().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, Action::BackupExport);
        assert_eq!(entries[0].actor, "pharm01");
        assert_eq!(entries[0].entity_id, Some(ids[0].as_uuid().to_string()));
        assert_eq!(entries[0].new_value.as_ref().unwrap()["recordCount"], 2);
    }

    #[test]
    fn test_audit_failure_does_not_fail_backup() {
        let (temp, storage, clock) = setup();
        seed(&storage, 1);
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let broken_audit = AuditLogger::new(blocker.join("audit.log"));

        let creator = BackupCreator::new(&storage, &storage, &broken_audit, &clock, storage.paths().backup_dir());
        let ids = creator
            .create_backup("admin", &BackupCreateOptions::named("n"), &[FileType::Json])
            .unwrap();

        assert!(storage.get_backup(ids[0]).unwrap().unwrap().is_completed());
    }

    #[test]
    fn test_delete_backup_removes_file_and_row() {
        let (_temp, storage, clock) = setup();
        seed(&storage, 1);
        let creator = creator(&storage, &clock);
        let ids = creator
            .create_backup("admin", &BackupCreateOptions::named("old"), &[FileType::Sql])
            .unwrap();
        let path = storage.get_backup(ids[0]).unwrap().unwrap().storage_path;

        creator.delete_backup("admin", ids[0]).unwrap();

        assert!(!path.exists());
        assert!(storage.get_backup(ids[0]).unwrap().is_none());
        assert!(creator.delete_backup("admin", ids[0]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Ward 3 / nightly"), "Ward-3---nightly");
        assert_eq!(sanitize_name("   "), "backup");
        assert_eq!(sanitize_name("../etc"), "etc");
    }
}
