//! Medstock - backup and restore engine for a medical inventory tracker
//!
//! This library snapshots inventory, audit, user and settings records into
//! JSON, CSV or SQL files, tracks backup health over time, and restores
//! inventory from JSON backups.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and persisted settings
//! - `error`: Custom error types
//! - `clock`: Injectable time source
//! - `models`: Inventory items, users, settings, backup metadata and health
//! - `audit`: Audit entries, the audit sink trait and the JSONL logger
//! - `export`: JSON, CSV and SQL encoders and the JSON decoder
//! - `storage`: JSON file storage and the record source / backup store traits
//! - `backup`: Backup creation, health, restore and verification
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `medstock` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use medstock_backup::config::{paths::MedstockPaths, settings::Settings};
//! use medstock_backup::storage::Storage;
//!
//! let paths = MedstockPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod storage;

pub use error::{MedstockError, MedstockResult};
