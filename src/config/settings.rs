//! Engine settings for Medstock
//!
//! Storage limits, staleness thresholds and the optional backup schedule.

use serde::{Deserialize, Serialize};

use super::paths::MedstockPaths;
use crate::error::MedstockError;

const GIB: u64 = 1024 * 1024 * 1024;

/// Recurring backup schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSchedule {
    /// Hours between scheduled backups
    pub interval_hours: u32,
}

impl Default for BackupSchedule {
    fn default() -> Self {
        Self { interval_hours: 24 }
    }
}

/// Persisted settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Bytes of completed backups the storage volume is sized for
    #[serde(default = "default_storage_limit")]
    pub storage_limit_bytes: u64,

    /// Fraction of the limit past which a warning is raised
    #[serde(default = "default_warning_ratio")]
    pub storage_warning_ratio: f64,

    /// Age of the newest completed backup past which it counts as stale
    #[serde(default = "default_stale_after_hours")]
    pub stale_after_hours: u32,

    /// Backup schedule, if one is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BackupSchedule>,

    /// Actor recorded when the caller does not name one
    #[serde(default = "default_actor")]
    pub default_actor: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_storage_limit() -> u64 {
    GIB
}

fn default_warning_ratio() -> f64 {
    0.8
}

fn default_stale_after_hours() -> u32 {
    24
}

fn default_actor() -> String {
    "system".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            storage_limit_bytes: default_storage_limit(),
            storage_warning_ratio: default_warning_ratio(),
            stale_after_hours: default_stale_after_hours(),
            schedule: None,
            default_actor: default_actor(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &MedstockPaths) -> Result<Self, MedstockError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| MedstockError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| MedstockError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MedstockPaths) -> Result<(), MedstockError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| MedstockError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| MedstockError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject values the health monitor cannot work with
    pub fn validate(&self) -> Result<(), MedstockError> {
        if !(0.0..=1.0).contains(&self.storage_warning_ratio) {
            return Err(MedstockError::Config(format!(
                "storage_warning_ratio must be between 0 and 1, got {}",
                self.storage_warning_ratio
            )));
        }
        if let Some(schedule) = self.schedule {
            if schedule.interval_hours == 0 {
                return Err(MedstockError::Config(
                    "schedule.interval_hours must be at least 1".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.storage_limit_bytes, GIB);
        assert_eq!(settings.stale_after_hours, 24);
        assert!(settings.schedule.is_none());
        assert_eq!(settings.default_actor, "system");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MedstockPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.storage_limit_bytes = 500;
        settings.schedule = Some(BackupSchedule { interval_hours: 12 });
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.storage_limit_bytes, 500);
        assert_eq!(loaded.schedule, Some(BackupSchedule { interval_hours: 12 }));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"stale_after_hours": 48}"#).unwrap();
        assert_eq!(settings.stale_after_hours, 48);
        assert_eq!(settings.storage_warning_ratio, 0.8);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MedstockPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"storage_warning_ratio": 1.5}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, MedstockError::Config(_)));
    }
}
