//! Inventory item model
//!
//! Represents a stocked medical supply: a drug, consumable or device held at a
//! storage location, optionally tracked by lot and expiry.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ItemId;

/// Broad classification of a stocked item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// Prescription or over-the-counter drugs
    Medication,
    /// Single-use supplies (gloves, syringes, dressings)
    #[default]
    Consumable,
    /// Reusable equipment
    Equipment,
    /// Lab reagents and test kits
    Reagent,
    /// Anything else
    Other,
}

impl ItemCategory {
    /// Parse a category from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "medication" | "drug" | "med" => Some(Self::Medication),
            "consumable" | "supply" => Some(Self::Consumable),
            "equipment" | "device" => Some(Self::Equipment),
            "reagent" | "lab" => Some(Self::Reagent),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Medication => write!(f, "Medication"),
            Self::Consumable => write!(f, "Consumable"),
            Self::Equipment => write!(f, "Equipment"),
            Self::Reagent => write!(f, "Reagent"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A single inventory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Unique identifier
    pub id: ItemId,

    /// Display name (e.g., "Amoxicillin 500mg")
    pub name: String,

    /// Stock keeping unit / catalogue code
    #[serde(default)]
    pub sku: Option<String>,

    /// Item classification
    #[serde(default)]
    pub category: ItemCategory,

    /// Units currently on hand
    pub quantity: i64,

    /// Unit of measure ("box", "vial", "each")
    #[serde(default)]
    pub unit: String,

    /// Reorder threshold
    #[serde(default)]
    pub min_stock: i64,

    /// Cost per unit in cents
    #[serde(default)]
    pub unit_cost_cents: i64,

    /// Manufacturer lot number
    #[serde(default)]
    pub lot_number: Option<String>,

    /// Expiry date, if the item expires
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,

    /// Storage location (room, shelf, fridge)
    #[serde(default)]
    pub location: Option<String>,

    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Site-specific attributes; nested, so not carried by flat exports
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// When this item was created
    pub created_at: DateTime<Utc>,

    /// When this item was last modified
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Create a new item with the given name and quantity
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(),
            name: name.into(),
            sku: None,
            category: ItemCategory::default(),
            quantity,
            unit: "each".to_string(),
            min_stock: 0,
            unit_cost_cents: 0,
            lot_number: None,
            expiration_date: None,
            location: None,
            notes: None,
            attributes: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether stock has dropped to or below the reorder threshold
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.min_stock
    }

    /// Whether the item has expired as of the given date
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date.map_or(false, |d| d < today)
    }

    /// Validate the item
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Item name cannot be empty".into());
        }
        if self.quantity < 0 {
            return Err(format!("Quantity cannot be negative: {}", self.quantity));
        }
        Ok(())
    }
}

impl fmt::Display for InventoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.quantity, self.unit)
    }
}
