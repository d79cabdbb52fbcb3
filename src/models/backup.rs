//! Backup metadata model
//!
//! One `Backup` row exists per produced file. Rows are created IN_PROGRESS and
//! make exactly one transition to a terminal state.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::BackupId;
use crate::error::{MedstockError, MedstockResult};

/// Encoded file format of a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    Json,
    Csv,
    Sql,
}

impl FileType {
    /// Every format, in the order a multi-format backup processes them
    pub const ALL: [FileType; 3] = [FileType::Json, FileType::Csv, FileType::Sql];

    /// Lowercase file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Sql => "sql",
        }
    }

    /// Whether a backup in this format can be restored
    pub fn is_restorable(&self) -> bool {
        matches!(self, Self::Json)
    }

    /// Parse a format from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "sql" => Some(Self::Sql),
            _ => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Csv => write!(f, "CSV"),
            Self::Sql => write!(f, "SQL"),
        }
    }
}

/// Lifecycle state of a backup row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackupStatus {
    InProgress,
    Completed,
    Failed,
}

impl BackupStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Persisted metadata for one backup file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub id: BackupId,
    pub file_name: String,
    pub file_type: FileType,
    pub storage_path: PathBuf,
    /// Bytes written; zero until the write succeeds
    pub file_size: u64,
    /// Inventory rows included; other record groups are not counted
    pub record_count: u64,
    pub status: BackupStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Backup {
    /// Create a new IN_PROGRESS row
    pub fn start(
        file_name: impl Into<String>,
        file_type: FileType,
        storage_path: PathBuf,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BackupId::new(),
            file_name: file_name.into(),
            file_type,
            storage_path,
            file_size: 0,
            record_count: 0,
            status: BackupStatus::InProgress,
            created_by: created_by.into(),
            created_at,
            notes: None,
        }
    }

    /// Transition IN_PROGRESS -> COMPLETED
    pub fn complete(&mut self, file_size: u64, record_count: u64) -> MedstockResult<()> {
        self.ensure_in_progress()?;
        self.file_size = file_size;
        self.record_count = record_count;
        self.status = BackupStatus::Completed;
        Ok(())
    }

    /// Transition IN_PROGRESS -> FAILED, keeping size and count as they are
    pub fn fail(&mut self) -> MedstockResult<()> {
        self.ensure_in_progress()?;
        self.status = BackupStatus::Failed;
        Ok(())
    }

    fn ensure_in_progress(&self) -> MedstockResult<()> {
        if self.status.is_terminal() {
            return Err(MedstockError::Validation(format!(
                "Backup {} is already {}",
                self.id, self.status
            )));
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == BackupStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == BackupStatus::Failed
    }
}

/// Inclusive creation-time window applied to inventory items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| ts >= from) && self.to.map_or(true, |to| ts <= to)
    }
}

/// Input for a backup run; never persisted
#[derive(Debug, Clone, Default)]
pub struct BackupCreateOptions {
    /// Base name for produced files; a timestamp suffix is always appended
    pub name: String,
    pub include_audit_logs: bool,
    pub include_users: bool,
    pub include_settings: bool,
    pub date_range: Option<DateRange>,
    pub notes: Option<String>,
}

impl BackupCreateOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// How a restore applies a backup to the record source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreMode {
    /// Delete every inventory item, then insert the backup's items
    Full,
    /// Update items with a matching id, insert the rest
    Merge,
    /// Report what a merge would do without writing anything
    Preview,
}

impl RestoreMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" | "replace" => Some(Self::Full),
            "merge" => Some(Self::Merge),
            "preview" | "dry-run" | "dryrun" => Some(Self::Preview),
            _ => None,
        }
    }

    pub fn is_destructive(&self) -> bool {
        !matches!(self, Self::Preview)
    }
}

impl fmt::Display for RestoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Merge => write!(f, "merge"),
            Self::Preview => write!(f, "preview"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn in_progress() -> Backup {
        Backup::start(
            "nightly.json",
            FileType::Json,
            PathBuf::from("backups/nightly.json"),
            "admin",
            Utc::now(),
        )
    }

    #[test]
    fn test_complete_transition() {
        let mut backup = in_progress();
        assert_eq!(backup.status, BackupStatus::InProgress);
        assert_eq!(backup.file_size, 0);

        backup.complete(2048, 8).unwrap();
        assert!(backup.is_completed());
        assert_eq!(backup.file_size, 2048);
        assert_eq!(backup.record_count, 8);
    }

    #[test]
    fn test_terminal_rows_are_immutable() {
        let mut backup = in_progress();
        backup.fail().unwrap();
        assert!(backup.is_failed());

        assert!(backup.complete(10, 1).is_err());
        assert!(backup.fail().is_err());
        assert_eq!(backup.file_size, 0);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&BackupStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let json = serde_json::to_string(&FileType::Csv).unwrap();
        assert_eq!(json, "\"CSV\"");
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        let range = DateRange::new(Some(from), Some(to));

        assert!(range.contains(from));
        assert!(range.contains(to));
        assert!(!range.contains(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()));
        assert!(DateRange::default().contains(Utc::now()));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(FileType::parse(" JSON "), Some(FileType::Json));
        assert_eq!(FileType::parse("yaml"), None);
        assert!(FileType::Json.is_restorable());
        assert!(!FileType::Sql.is_restorable());
        assert_eq!(RestoreMode::parse("dry-run"), Some(RestoreMode::Preview));
    }
}
