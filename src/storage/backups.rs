//! Backup metadata repository
//!
//! Persists `Backup` rows to backups.json. Rows are inserted once and updated
//! only for their single IN_PROGRESS -> terminal transition.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MedstockError;
use crate::models::{Backup, BackupId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BackupData {
    backups: Vec<Backup>,
}

pub struct BackupRepository {
    path: PathBuf,
    data: RwLock<HashMap<BackupId, Backup>>,
}

impl BackupRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), MedstockError> {
        let file_data: BackupData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        *data = file_data.backups.into_iter().map(|b| (b.id, b)).collect();
        Ok(())
    }

    fn save_locked(&self, data: &HashMap<BackupId, Backup>) -> Result<(), MedstockError> {
        let mut backups: Vec<_> = data.values().cloned().collect();
        backups.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        write_json_atomic(&self.path, &BackupData { backups })
    }

    pub fn insert(&self, backup: Backup) -> Result<(), MedstockError> {
        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if data.contains_key(&backup.id) {
            return Err(MedstockError::Duplicate {
                entity_type: "Backup",
                identifier: backup.id.to_string(),
            });
        }

        let id = backup.id;
        data.insert(id, backup);
        if let Err(e) = self.save_locked(&data) {
            data.remove(&id);
            return Err(e);
        }
        Ok(())
    }

    /// Store a row's terminal state
    ///
    /// Only rows that are still IN_PROGRESS may be updated.
    pub fn update(&self, backup: &Backup) -> Result<(), MedstockError> {
        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let previous = match data.get(&backup.id) {
            Some(existing) if existing.status.is_terminal() => {
                return Err(MedstockError::Validation(format!(
                    "Backup {} is already {}",
                    existing.id, existing.status
                )))
            }
            Some(existing) => existing.clone(),
            None => return Err(MedstockError::backup_not_found(backup.id.to_string())),
        };

        data.insert(backup.id, backup.clone());
        if let Err(e) = self.save_locked(&data) {
            data.insert(previous.id, previous);
            return Err(e);
        }
        Ok(())
    }

    pub fn get(&self, id: BackupId) -> Result<Option<Backup>, MedstockError> {
        let data = self.data.read().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All rows, newest first
    pub fn get_all(&self) -> Result<Vec<Backup>, MedstockError> {
        let data = self.data.read().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut backups: Vec<_> = data.values().cloned().collect();
        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    pub fn delete(&self, id: BackupId) -> Result<bool, MedstockError> {
        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let Some(removed) = data.remove(&id) else {
            return Ok(false);
        };

        if let Err(e) = self.save_locked(&data) {
            data.insert(id, removed);
            return Err(e);
        }
        Ok(true)
    }
}
