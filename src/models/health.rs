//! Backup health report
//!
//! Derived on demand from backup metadata; never persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a health alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Error,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAlert {
    pub level: AlertLevel,
    pub message: String,
}

impl HealthAlert {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }
}

/// Snapshot of backup health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupHealth {
    pub last_successful_backup: Option<DateTime<Utc>>,
    pub next_scheduled_backup: Option<DateTime<Utc>>,
    /// Consecutive calendar days with a completed backup
    pub backup_streak: u32,
    /// FAILED rows created in the trailing 30 days
    pub failed_backups_last_30_days: u32,
    pub total_storage_used: u64,
    pub storage_limit: u64,
    pub alerts: Vec<HealthAlert>,
}

impl BackupHealth {
    /// Fraction of the storage limit in use
    pub fn storage_ratio(&self) -> f64 {
        if self.storage_limit == 0 {
            return 0.0;
        }
        self.total_storage_used as f64 / self.storage_limit as f64
    }

    pub fn has_errors(&self) -> bool {
        self.alerts.iter().any(|a| a.level == AlertLevel::Error)
    }

    pub fn is_healthy(&self) -> bool {
        self.alerts.is_empty()
    }
}
