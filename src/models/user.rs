//! User and system setting records
//!
//! These are read-only from the backup engine's point of view: they are
//! exported when requested but never restored.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Access role of an application user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Pharmacist,
    #[default]
    Staff,
    Viewer,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "Admin"),
            Self::Pharmacist => write!(f, "Pharmacist"),
            Self::Staff => write!(f, "Staff"),
            Self::Viewer => write!(f, "Viewer"),
        }
    }
}

/// An application user account (credentials are never exported)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl UserRecord {
    /// Create a new active user
    pub fn new(username: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            full_name: String::new(),
            email: None,
            role,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// Typed value of a system setting
///
/// Settings are stored as a tagged union so every variant round-trips through
/// the JSON backup unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SettingValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    List(Vec<String>),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// A single application-wide setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSetting {
    pub key: String,
    pub value: SettingValue,
    pub updated_at: DateTime<Utc>,
}

impl SystemSetting {
    pub fn new(key: impl Into<String>, value: SettingValue) -> Self {
        Self {
            key: key.into(),
            value,
            updated_at: Utc::now(),
        }
    }
}
