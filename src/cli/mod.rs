//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup engine.

pub mod backup;
pub mod inventory;

pub use backup::{handle_backup_command, BackupCommands};
pub use inventory::{handle_inventory_command, InventoryCommands};
