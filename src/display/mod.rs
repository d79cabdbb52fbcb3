//! Display formatting for terminal output
//!
//! Provides utilities for formatting backups, health reports, restore results
//! and inventory for terminal display.

pub mod backup;
pub mod inventory;

pub use backup::{
    format_age, format_backup_details, format_backup_list, format_health, format_restore_result,
    format_size,
};
pub use inventory::format_inventory_list;
