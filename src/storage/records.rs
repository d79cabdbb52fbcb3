//! User and system-setting repositories
//!
//! The backup engine only reads these tables; `upsert` exists for the
//! surrounding application and for seeding.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MedstockError;
use crate::models::{SystemSetting, UserId, UserRecord};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<UserRecord>,
}

pub struct UserRepository {
    path: PathBuf,
    data: RwLock<BTreeMap<UserId, UserRecord>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), MedstockError> {
        let file_data: UserData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        *data = file_data.users.into_iter().map(|u| (u.id, u)).collect();
        Ok(())
    }

    /// All users ordered by username
    pub fn get_all(&self) -> Result<Vec<UserRecord>, MedstockError> {
        let data = self.data.read().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    pub fn upsert(&self, user: UserRecord) -> Result<(), MedstockError> {
        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(user.id, user);
        write_json_atomic(
            &self.path,
            &UserData {
                users: data.values().cloned().collect(),
            },
        )
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettingData {
    settings: Vec<SystemSetting>,
}

/// Key-value application settings, kept in key order
pub struct SystemSettingRepository {
    path: PathBuf,
    data: RwLock<BTreeMap<String, SystemSetting>>,
}

impl SystemSettingRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), MedstockError> {
        let file_data: SettingData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        *data = file_data
            .settings
            .into_iter()
            .map(|s| (s.key.clone(), s))
            .collect();
        Ok(())
    }

    pub fn get_all(&self) -> Result<Vec<SystemSetting>, MedstockError> {
        let data = self.data.read().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().cloned().collect())
    }

    pub fn upsert(&self, setting: SystemSetting) -> Result<(), MedstockError> {
        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(setting.key.clone(), setting);
        write_json_atomic(
            &self.path,
            &SettingData {
                settings: data.values().cloned().collect(),
            },
        )
    }
}
