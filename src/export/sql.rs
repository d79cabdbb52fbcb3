//! SQL backup encoding
//!
//! Inventory items only, as `INSERT` statements against a fixed table.

use serde_json::Value;

use crate::error::MedstockResult;
use crate::models::InventoryItem;

use super::record_fields;

/// Table every generated statement targets
pub const INVENTORY_TABLE: &str = "inventory_items";

/// Encode inventory items as SQL text
///
/// The output always starts with two comment lines; an empty slice yields
/// only those.
pub fn encode_sql(items: &[InventoryItem]) -> MedstockResult<Vec<u8>> {
    let mut out = String::new();
    out.push_str("-- Medical inventory backup\n");
    out.push_str(&format!("-- Items: {}\n", items.len()));

    for item in items {
        let fields = record_fields(item)?;
        let columns: Vec<&str> = fields.keys().map(String::as_str).collect();
        let values: Vec<String> = fields.values().map(sql_literal).collect();

        out.push_str(&format!(
            "INSERT INTO {} ({}) VALUES ({});\n",
            INVENTORY_TABLE,
            columns.join(", "),
            values.join(", ")
        ));
    }

    Ok(out.into_bytes())
}

/// Render a JSON value as a SQL literal
fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        // objects and arrays are stored as JSON text
        nested => quote(&nested.to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_to_string(items: &[InventoryItem]) -> String {
        String::from_utf8(encode_sql(items).unwrap()).unwrap()
    }

    #[test]
    fn test_header_and_one_insert_per_item() {
        let items = vec![
            InventoryItem::new("Lidocaine 1%", 10),
            InventoryItem::new("Suture kit", 7),
        ];
        let sql = encode_to_string(&items);
        let lines: Vec<&str> = sql.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("--"));
        assert!(lines[1].starts_with("--"));
        assert!(lines[2].starts_with("INSERT INTO inventory_items ("));
        assert!(lines[3].ends_with(");"));
    }

    #[test]
    fn test_single_quotes_doubled() {
        let item = InventoryItem::new("Children's Tylenol", 12);
        let sql = encode_to_string(&[item]);
        assert!(sql.contains("'Children''s Tylenol'"));
    }

    #[test]
    fn test_literals() {
        assert_eq!(sql_literal(&Value::Null), "NULL");
        assert_eq!(sql_literal(&Value::Bool(true)), "TRUE");
        assert_eq!(sql_literal(&serde_json::json!(42)), "42");
        assert_eq!(
            sql_literal(&serde_json::json!({"vendor": "O'Neil"})),
            "'{\"vendor\":\"O''Neil\"}'"
        );
    }

    #[test]
    fn test_empty_input_is_header_only() {
        let sql = encode_to_string(&[]);
        assert_eq!(sql, "-- Medical inventory backup\n-- Items: 0\n");
    }
}
