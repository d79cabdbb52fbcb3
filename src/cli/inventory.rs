//! Inventory CLI commands
//!
//! Minimal item management so there is something to back up.

use chrono::{Local, NaiveDate, Utc};
use clap::Subcommand;

use crate::audit::{record_best_effort, Action, AuditEntry, EntityType};
use crate::display::format_inventory_list;
use crate::error::{MedstockError, MedstockResult};
use crate::models::{InventoryItem, ItemCategory};
use crate::storage::{RecordSource, Storage};

/// Inventory subcommands
#[derive(Subcommand)]
pub enum InventoryCommands {
    /// Add an inventory item
    Add {
        /// Item name
        name: String,
        /// Units on hand
        quantity: i64,
        /// Category (medication, consumable, equipment, reagent, other)
        #[arg(short, long, default_value = "consumable")]
        category: String,
        /// Unit of measure
        #[arg(short, long, default_value = "each")]
        unit: String,
        /// Catalogue code
        #[arg(long)]
        sku: Option<String>,
        /// Manufacturer lot number
        #[arg(long)]
        lot: Option<String>,
        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expires: Option<String>,
        /// Storage location
        #[arg(short, long)]
        location: Option<String>,
        /// Reorder threshold
        #[arg(long, default_value = "0")]
        min_stock: i64,
    },
    /// List inventory items
    List,
}

/// Handle an inventory command
pub fn handle_inventory_command(
    storage: &Storage,
    actor: &str,
    cmd: InventoryCommands,
) -> MedstockResult<()> {
    match cmd {
        InventoryCommands::Add {
            name,
            quantity,
            category,
            unit,
            sku,
            lot,
            expires,
            location,
            min_stock,
        } => {
            let category = ItemCategory::parse(&category).ok_or_else(|| {
                MedstockError::Validation(format!(
                    "Invalid category: '{}'. Valid categories: medication, consumable, equipment, reagent, other",
                    category
                ))
            })?;

            let expiration_date = expires
                .map(|s| {
                    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                        MedstockError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", s))
                    })
                })
                .transpose()?;

            let mut item = InventoryItem::new(name, quantity);
            item.category = category;
            item.unit = unit;
            item.sku = sku;
            item.lot_number = lot;
            item.expiration_date = expiration_date;
            item.location = location;
            item.min_stock = min_stock;

            storage.insert_inventory_item(item.clone())?;

            let entry = AuditEntry::new(Utc::now(), actor, Action::Create, EntityType::InventoryItem)
                .with_entity_id(item.id.as_uuid().to_string())
                .with_new_value(&item);
            record_best_effort(storage, &entry);

            println!("Added: {} ({})", item, item.id);
        }

        InventoryCommands::List => {
            let items = storage.inventory_items(None)?;
            print!("{}", format_inventory_list(&items, Local::now().date_naive()));
        }
    }

    Ok(())
}
