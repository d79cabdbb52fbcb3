//! Structural check of stored backup files
//!
//! Read-only: neither the record source nor the metadata is ever touched.

use std::fs;

use tracing::{debug, warn};

use crate::export::decode_json;
use crate::models::{BackupId, FileType};
use crate::storage::BackupStore;

pub struct Verifier<'a> {
    store: &'a dyn BackupStore,
}

impl<'a> Verifier<'a> {
    pub fn new(store: &'a dyn BackupStore) -> Self {
        Self { store }
    }

    /// Check that a backup's file is present and structurally sound
    ///
    /// JSON must parse as a full backup document and CSV must be non-empty.
    /// SQL files are accepted once read. Any failure yields `false`.
    pub fn verify(&self, backup_id: BackupId) -> bool {
        let backup = match self.store.get_backup(backup_id) {
            Ok(Some(backup)) => backup,
            Ok(None) => {
                debug!(backup_id = %backup_id, "verify: no such backup");
                return false;
            }
            Err(e) => {
                warn!(backup_id = %backup_id, error = %e, "verify: metadata lookup failed");
                return false;
            }
        };

        let bytes = match fs::read(&backup.storage_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(backup_id = %backup_id, error = %e, "verify: cannot read backup file");
                return false;
            }
        };

        let valid = match backup.file_type {
            FileType::Json => decode_json(&bytes).is_ok(),
            FileType::Csv => !bytes.is_empty(),
            FileType::Sql => true,
        };
        debug!(backup_id = %backup_id, valid, "verify finished");
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupCreator;
    use crate::clock::SystemClock;
    use crate::config::paths::MedstockPaths;
    use crate::models::{BackupCreateOptions, InventoryItem};
    use crate::storage::{RecordSource, Storage};
    use tempfile::TempDir;

    fn setup(items: usize) -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(MedstockPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        for i in 0..items {
            storage
                .insert_inventory_item(InventoryItem::new(format!("Gauze {}", i), 5))
                .unwrap();
        }
        (temp_dir, storage)
    }

    fn backup(storage: &Storage, format: FileType) -> BackupId {
        let clock = SystemClock;
        BackupCreator::new(storage, storage, storage, &clock, storage.paths().backup_dir())
            .create_backup("admin", &BackupCreateOptions::named("v"), &[format])
            .unwrap()[0]
    }

    #[test]
    fn test_valid_backups_verify() {
        let (_temp, storage) = setup(3);
        for format in FileType::ALL {
            let id = backup(&storage, format);
            assert!(Verifier::new(&storage).verify(id), "{} should verify", format);
        }
    }

    #[test]
    fn test_corrupt_json_fails() {
        let (_temp, storage) = setup(1);
        let id = backup(&storage, FileType::Json);
        let path = storage.get_backup(id).unwrap().unwrap().storage_path;
        fs::write(path, "[1, 2").unwrap();

        assert!(!Verifier::new(&storage).verify(id));
    }

    #[test]
    fn test_empty_csv_fails() {
        let (_temp, storage) = setup(0);
        let id = backup(&storage, FileType::Csv);
        assert!(!Verifier::new(&storage).verify(id));
    }

    #[test]
    fn test_missing_file_or_row_fails() {
        let (_temp, storage) = setup(1);
        let id = backup(&storage, FileType::Sql);
        fs::remove_file(storage.get_backup(id).unwrap().unwrap().storage_path).unwrap();

        let verifier = Verifier::new(&storage);
        assert!(!verifier.verify(id));
        assert!(!verifier.verify(BackupId::new()));
    }

    #[test]
    fn test_verify_does_not_mutate() {
        let (_temp, storage) = setup(2);
        let id = backup(&storage, FileType::Json);
        let before_rows = storage.list_backups().unwrap();
        let before_items = storage.inventory_items(None).unwrap();

        let verifier = Verifier::new(&storage);
        verifier.verify(id);
        verifier.verify(BackupId::new());

        assert_eq!(storage.list_backups().unwrap(), before_rows);
        assert_eq!(storage.inventory_items(None).unwrap(), before_items);
    }
}
