//! Audit entry data structures
//!
//! Defines the structure of audit log entries: who did what to which entity,
//! with optional before/after values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of actions that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Create,
    Update,
    Delete,
    /// A backup file was produced
    BackupExport,
    /// A backup was applied to the inventory
    BackupRestore,
    /// A backup row and its file were removed
    BackupDelete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Create => write!(f, "CREATE"),
            Action::Update => write!(f, "UPDATE"),
            Action::Delete => write!(f, "DELETE"),
            Action::BackupExport => write!(f, "BACKUP_EXPORT"),
            Action::BackupRestore => write!(f, "BACKUP_RESTORE"),
            Action::BackupDelete => write!(f, "BACKUP_DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    InventoryItem,
    User,
    SystemSetting,
    Backup,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::InventoryItem => write!(f, "InventoryItem"),
            EntityType::User => write!(f, "User"),
            EntityType::SystemSetting => write!(f, "SystemSetting"),
            EntityType::Backup => write!(f, "Backup"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// When the action occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Who performed the action
    pub actor: String,

    pub action: Action,

    pub entity_type: EntityType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Create an entry with no entity id or values
    pub fn new(
        timestamp: DateTime<Utc>,
        actor: impl Into<String>,
        action: Action,
        entity_type: EntityType,
    ) -> Self {
        Self {
            timestamp,
            actor: actor.into(),
            action,
            entity_type,
            entity_id: None,
            old_value: None,
            new_value: None,
        }
    }

    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_old_value<T: Serialize>(mut self, value: &T) -> Self {
        self.old_value = serde_json::to_value(value).ok();
        self
    }

    pub fn with_new_value<T: Serialize>(mut self, value: &T) -> Self {
        self.new_value = serde_json::to_value(value).ok();
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.actor,
            self.action,
            self.entity_type
        );

        if let Some(id) = &self.entity_id {
            output.push_str(&format!(" {}", id));
        }

        if let Some(value) = &self.new_value {
            output.push_str(&format!("\n  {}", value));
        }

        output
    }
}
