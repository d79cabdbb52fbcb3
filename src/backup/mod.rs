//! Backup and restore engine for Medstock
//!
//! # Architecture
//!
//! - `BackupCreator`: writes one file and one metadata row per requested
//!   format, reporting progress; also lists and deletes backups
//! - `HealthMonitor`: derives streak, staleness and storage pressure from the
//!   metadata history
//! - `RestoreEngine`: applies a JSON backup in full, merge or preview mode
//! - `Verifier`: read-only structural check of a stored file
//!
//! All four work against the `RecordSource`, `BackupStore`, `AuditSink` and
//! `Clock` collaborators, so they can run over `Storage` or any other
//! implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use medstock_backup::backup::{BackupCreator, RestoreEngine};
//! use medstock_backup::clock::SystemClock;
//! use medstock_backup::models::{BackupCreateOptions, FileType, RestoreMode};
//!
//! let creator = BackupCreator::new(&storage, &storage, &storage, &SystemClock, backup_dir);
//! let ids = creator.create_backup("admin", &BackupCreateOptions::named("nightly"), &[FileType::Json])?;
//!
//! let engine = RestoreEngine::new(&storage, &storage, &storage, &SystemClock);
//! let result = engine.restore(ids[0], "admin", RestoreMode::Preview)?;
//! println!("{}", result.summary());
//! ```

mod creator;
mod health;
mod restore;
mod verify;

pub use creator::{BackupCreator, BackupProgress};
pub use health::HealthMonitor;
pub use restore::{RestoreEngine, RestoreResult};
pub use verify::Verifier;
