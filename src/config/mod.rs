//! Configuration module for Medstock
//!
//! - Environment-driven path resolution
//! - Engine settings persistence (storage limits, schedule)

pub mod paths;
pub mod settings;

pub use paths::MedstockPaths;
pub use settings::{BackupSchedule, Settings};
