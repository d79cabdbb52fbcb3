//! Inventory repository for JSON storage
//!
//! Manages loading and saving inventory items to inventory.json. Every
//! mutation is written through to disk before it returns.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MedstockError;
use crate::models::{DateRange, InventoryItem, ItemId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct InventoryData {
    items: Vec<InventoryItem>,
}

/// Repository for inventory persistence
pub struct InventoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<ItemId, InventoryItem>>,
}

impl InventoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load items from disk
    pub fn load(&self) -> Result<(), MedstockError> {
        let file_data: InventoryData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for item in file_data.items {
            data.insert(item.id, item);
        }

        Ok(())
    }

    fn save_locked(&self, data: &HashMap<ItemId, InventoryItem>) -> Result<(), MedstockError> {
        let mut items: Vec<_> = data.values().cloned().collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        write_json_atomic(&self.path, &InventoryData { items })
    }

    /// Get an item by ID
    pub fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, MedstockError> {
        let data = self.data.read().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all items created inside the range (all items when `None`), oldest first
    pub fn get_all(&self, range: Option<&DateRange>) -> Result<Vec<InventoryItem>, MedstockError> {
        let data = self.data.read().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut items: Vec<_> = data
            .values()
            .filter(|item| range.map_or(true, |r| r.contains(item.created_at)))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(items)
    }

    /// Insert a new item; fails if the id is taken
    pub fn insert(&self, item: InventoryItem) -> Result<(), MedstockError> {
        item.validate().map_err(MedstockError::Validation)?;

        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if data.contains_key(&item.id) {
            return Err(MedstockError::Duplicate {
                entity_type: "Inventory item",
                identifier: item.id.to_string(),
            });
        }

        let id = item.id;
        data.insert(id, item);
        if let Err(e) = self.save_locked(&data) {
            data.remove(&id);
            return Err(e);
        }
        Ok(())
    }

    /// Replace an existing item; fails if the id is unknown
    pub fn update(&self, item: InventoryItem) -> Result<(), MedstockError> {
        item.validate().map_err(MedstockError::Validation)?;

        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let Some(previous) = data.insert(item.id, item.clone()) else {
            data.remove(&item.id);
            return Err(MedstockError::item_not_found(item.id.to_string()));
        };

        if let Err(e) = self.save_locked(&data) {
            data.insert(previous.id, previous);
            return Err(e);
        }
        Ok(())
    }

    /// Delete every item, returning how many were removed
    pub fn delete_all(&self) -> Result<usize, MedstockError> {
        let mut data = self.data.write().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let removed = std::mem::take(&mut *data);
        if let Err(e) = self.save_locked(&data) {
            *data = removed;
            return Err(e);
        }
        Ok(removed.len())
    }

    pub fn exists(&self, id: ItemId) -> Result<bool, MedstockError> {
        let data = self.data.read().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.contains_key(&id))
    }

    pub fn count(&self) -> Result<usize, MedstockError> {
        let data = self.data.read().map_err(|e| {
            MedstockError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
