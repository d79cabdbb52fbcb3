//! Core data models for Medstock
//!
//! This module contains the record types the backup engine reads and writes:
//! inventory items, users, system settings, and the backup metadata itself.

pub mod backup;
pub mod health;
pub mod ids;
pub mod inventory;
pub mod user;

pub use backup::{Backup, BackupCreateOptions, BackupStatus, DateRange, FileType, RestoreMode};
pub use health::{AlertLevel, BackupHealth, HealthAlert};
pub use ids::{BackupId, ItemId, UserId};
pub use inventory::{InventoryItem, ItemCategory};
pub use user::{SettingValue, SystemSetting, UserRecord, UserRole};
