//! Storage layer for Medstock
//!
//! The backup engine never talks to files directly for record data. It goes
//! through two collaborator traits:
//!
//! - [`RecordSource`]: read access to every record group, plus the inventory
//!   writes a restore needs
//! - [`BackupStore`]: the Backup metadata table
//!
//! [`Storage`] implements both on top of JSON files with atomic writes, and
//! also acts as the [`AuditSink`] by appending to the audit log.

pub mod backups;
pub mod file_io;
pub mod inventory;
pub mod records;

pub use backups::BackupRepository;
pub use file_io::{read_json, write_json_atomic};
pub use inventory::InventoryRepository;
pub use records::{SystemSettingRepository, UserRepository};

use crate::audit::{AuditEntry, AuditLogger, AuditSink};
use crate::config::paths::MedstockPaths;
use crate::error::{MedstockError, MedstockResult};
use crate::models::{
    Backup, BackupId, DateRange, InventoryItem, ItemId, SystemSetting, UserRecord,
};

/// Read/write contract over the application's records
pub trait RecordSource {
    /// Inventory items, restricted to a creation-time window when given
    fn inventory_items(&self, range: Option<&DateRange>) -> MedstockResult<Vec<InventoryItem>>;

    fn audit_logs(&self) -> MedstockResult<Vec<AuditEntry>>;

    fn users(&self) -> MedstockResult<Vec<UserRecord>>;

    fn system_settings(&self) -> MedstockResult<Vec<SystemSetting>>;

    fn inventory_count(&self) -> MedstockResult<usize>;

    fn inventory_item_exists(&self, id: ItemId) -> MedstockResult<bool>;

    /// Insert an item; an existing id is a `Duplicate` error
    fn insert_inventory_item(&self, item: InventoryItem) -> MedstockResult<()>;

    /// Replace an item; an unknown id is a `NotFound` error
    fn update_inventory_item(&self, item: InventoryItem) -> MedstockResult<()>;

    /// Remove every inventory item, returning how many were removed
    fn delete_all_inventory_items(&self) -> MedstockResult<usize>;
}

/// Persistence for Backup metadata rows
pub trait BackupStore {
    fn insert_backup(&self, backup: Backup) -> MedstockResult<()>;

    /// Persist a row's IN_PROGRESS -> terminal transition
    fn update_backup(&self, backup: &Backup) -> MedstockResult<()>;

    fn get_backup(&self, id: BackupId) -> MedstockResult<Option<Backup>>;

    /// All rows, newest first
    fn list_backups(&self) -> MedstockResult<Vec<Backup>>;

    fn delete_backup(&self, id: BackupId) -> MedstockResult<bool>;
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: MedstockPaths,
    pub inventory: InventoryRepository,
    pub users: UserRepository,
    pub settings: SystemSettingRepository,
    pub backups: BackupRepository,
    pub audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: MedstockPaths) -> Result<Self, MedstockError> {
        paths.ensure_directories()?;

        Ok(Self {
            inventory: InventoryRepository::new(paths.inventory_file()),
            users: UserRepository::new(paths.users_file()),
            settings: SystemSettingRepository::new(paths.system_settings_file()),
            backups: BackupRepository::new(paths.backups_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Open storage and load every table
    pub fn open(paths: MedstockPaths) -> Result<Self, MedstockError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &MedstockPaths {
        &self.paths
    }

    pub fn load_all(&self) -> Result<(), MedstockError> {
        self.inventory.load()?;
        self.users.load()?;
        self.settings.load()?;
        self.backups.load()?;
        Ok(())
    }
}

impl RecordSource for Storage {
    fn inventory_items(&self, range: Option<&DateRange>) -> MedstockResult<Vec<InventoryItem>> {
        self.inventory.get_all(range)
    }

    fn audit_logs(&self) -> MedstockResult<Vec<AuditEntry>> {
        self.audit.read_all()
    }

    fn users(&self) -> MedstockResult<Vec<UserRecord>> {
        self.users.get_all()
    }

    fn system_settings(&self) -> MedstockResult<Vec<SystemSetting>> {
        self.settings.get_all()
    }

    fn inventory_count(&self) -> MedstockResult<usize> {
        self.inventory.count()
    }

    fn inventory_item_exists(&self, id: ItemId) -> MedstockResult<bool> {
        self.inventory.exists(id)
    }

    fn insert_inventory_item(&self, item: InventoryItem) -> MedstockResult<()> {
        self.inventory.insert(item)
    }

    fn update_inventory_item(&self, item: InventoryItem) -> MedstockResult<()> {
        self.inventory.update(item)
    }

    fn delete_all_inventory_items(&self) -> MedstockResult<usize> {
        self.inventory.delete_all()
    }
}

impl BackupStore for Storage {
    fn insert_backup(&self, backup: Backup) -> MedstockResult<()> {
        self.backups.insert(backup)
    }

    fn update_backup(&self, backup: &Backup) -> MedstockResult<()> {
        self.backups.update(backup)
    }

    fn get_backup(&self, id: BackupId) -> MedstockResult<Option<Backup>> {
        self.backups.get(id)
    }

    fn list_backups(&self) -> MedstockResult<Vec<Backup>> {
        self.backups.get_all()
    }

    fn delete_backup(&self, id: BackupId) -> MedstockResult<bool> {
        self.backups.delete(id)
    }
}

impl AuditSink for Storage {
    fn record(&self, entry: &AuditEntry) -> MedstockResult<()> {
        self.audit.log(entry)
    }
}
