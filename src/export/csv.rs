//! CSV backup encoding
//!
//! Inventory items only. Columns come from the first item's scalar fields;
//! nested fields are dropped and null or missing values become empty cells.

use serde_json::Value;

use crate::error::{MedstockError, MedstockResult};
use crate::models::InventoryItem;

use super::{is_scalar, record_fields};

/// Encode inventory items as CSV; an empty slice yields empty output
pub fn encode_csv(items: &[InventoryItem]) -> MedstockResult<Vec<u8>> {
    let Some(first) = items.first() else {
        return Ok(Vec::new());
    };

    let columns: Vec<String> = record_fields(first)?
        .into_iter()
        .filter(|(_, value)| is_scalar(value))
        .map(|(key, _)| key)
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(&columns)?;

    for item in items {
        let fields = record_fields(item)?;
        writer.write_record(columns.iter().map(|c| cell_text(fields.get(c))))?;
    }

    writer
        .into_inner()
        .map_err(|e| MedstockError::Csv(format!("Failed to flush CSV output: {}", e)))
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
