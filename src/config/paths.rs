//! Path management for Medstock
//!
//! ## Path Resolution Order
//!
//! 1. `MEDSTOCK_DATA_DIR` environment variable (if set), otherwise the current
//!    directory
//! 2. Backups go to `MEDSTOCK_BACKUP_DIR` (if set), otherwise `<base>/backups`

use std::path::PathBuf;

use crate::error::MedstockError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "MEDSTOCK_DATA_DIR";

/// Environment variable overriding the backup directory
pub const BACKUP_DIR_ENV: &str = "MEDSTOCK_BACKUP_DIR";

/// Manages all paths used by Medstock
#[derive(Debug, Clone)]
pub struct MedstockPaths {
    base_dir: PathBuf,
    backup_dir: PathBuf,
}

impl MedstockPaths {
    /// Resolve paths from the environment
    pub fn new() -> Result<Self, MedstockError> {
        let base_dir = std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let backup_dir = match std::env::var(BACKUP_DIR_ENV) {
            Ok(dir) if dir.trim().is_empty() => {
                return Err(MedstockError::Config(format!("{} is set but empty", BACKUP_DIR_ENV)))
            }
            Ok(dir) => PathBuf::from(dir),
            Err(_) => base_dir.join("backups"),
        };

        Ok(Self {
            base_dir,
            backup_dir,
        })
    }

    /// Create MedstockPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        let backup_dir = base_dir.join("backups");
        Self {
            base_dir,
            backup_dir,
        }
    }

    /// Override the backup directory
    pub fn with_backup_dir(mut self, backup_dir: PathBuf) -> Self {
        self.backup_dir = backup_dir;
        self
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.backup_dir.clone()
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn inventory_file(&self) -> PathBuf {
        self.data_dir().join("inventory.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    pub fn system_settings_file(&self) -> PathBuf {
        self.data_dir().join("settings.json")
    }

    /// Get the path to the backup metadata table
    pub fn backups_file(&self) -> PathBuf {
        self.data_dir().join("backups.json")
    }

    /// Ensure the base and data directories exist
    ///
    /// The backup directory is left alone; backup creation makes it on demand
    /// so an unwritable backup location surfaces as a backup failure.
    pub fn ensure_directories(&self) -> Result<(), MedstockError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MedstockError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| MedstockError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}
