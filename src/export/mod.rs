//! Backup encoders
//!
//! Pure conversions from an in-memory [`BackupPayload`] to file bytes:
//! - JSON: every included record group, pretty-printed; the only restorable format
//! - CSV: inventory items only, flat scalar columns
//! - SQL: inventory items only, one `INSERT` per item
//!
//! Nothing in this module touches the filesystem.

pub mod csv;
pub mod json;
pub mod sql;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::audit::AuditEntry;
use crate::error::{MedstockError, MedstockResult};
use crate::models::{FileType, InventoryItem, SystemSetting, UserRecord};

pub use self::csv::encode_csv;
pub use self::json::{decode_json, encode_json};
pub use self::sql::{encode_sql, INVENTORY_TABLE};

/// The logical content of a backup
///
/// Optional groups are `None` when they were not requested, which keeps them
/// out of the JSON document entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub inventory_items: Vec<InventoryItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_logs: Option<Vec<AuditEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserRecord>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_settings: Option<Vec<SystemSetting>>,
}

impl BackupPayload {
    pub fn new(inventory_items: Vec<InventoryItem>) -> Self {
        Self {
            inventory_items,
            ..Self::default()
        }
    }

    /// Rows counted into a backup's `record_count` (inventory only)
    pub fn record_count(&self) -> u64 {
        self.inventory_items.len() as u64
    }
}

/// Encode a payload in the given format
pub fn encode(payload: &BackupPayload, format: FileType) -> MedstockResult<Vec<u8>> {
    match format {
        FileType::Json => encode_json(payload),
        FileType::Csv => encode_csv(&payload.inventory_items),
        FileType::Sql => encode_sql(&payload.inventory_items),
    }
}

/// Decode file bytes back into a payload
///
/// Only JSON carries enough information to decode; CSV and SQL are export-only.
pub fn decode(bytes: &[u8], format: FileType) -> MedstockResult<BackupPayload> {
    match format {
        FileType::Json => decode_json(bytes),
        other => Err(MedstockError::UnsupportedFormat {
            operation: "decode",
            format: other.to_string(),
        }),
    }
}

/// Serialize a record to its JSON object form, keeping field declaration order
pub(crate) fn record_fields<T: Serialize>(record: &T) -> MedstockResult<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(MedstockError::Export(format!(
            "Expected a record object, got {}",
            other
        ))),
    }
}

/// Whether a JSON value is flat enough for a CSV/SQL column
pub(crate) fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}
