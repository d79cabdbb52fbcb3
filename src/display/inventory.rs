//! Inventory display formatting

use chrono::NaiveDate;

use crate::models::InventoryItem;

/// Format inventory items as an aligned table
pub fn format_inventory_list(items: &[InventoryItem], today: NaiveDate) -> String {
    if items.is_empty() {
        return "No inventory items found.".to_string();
    }

    let name_width = items.iter().map(|i| i.name.len()).max().unwrap_or(4).max(4);
    let category_width = items
        .iter()
        .map(|i| i.category.to_string().len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:<category_width$}  {:>8}  {:<8}  {}\n",
        "ID",
        "Name",
        "Category",
        "Qty",
        "Unit",
        "Status",
        name_width = name_width,
        category_width = category_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<category_width$}  {:->8}  {:-<8}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        category_width = category_width,
    ));

    for item in items {
        let status = if item.is_expired(today) {
            "Expired"
        } else if item.needs_reorder() {
            "Reorder"
        } else {
            ""
        };

        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<category_width$}  {:>8}  {:<8}  {}\n",
            item.id.to_string(),
            item.name,
            item.category.to_string(),
            item.quantity,
            item.unit,
            status,
            name_width = name_width,
            category_width = category_width,
        ));
    }

    output.push_str(&format!("\nTotal: {} item(s)\n", items.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inventory_list() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut expired = InventoryItem::new("Saline 0.9%", 12);
        expired.expiration_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        let mut low = InventoryItem::new("Syringes 5ml", 3);
        low.min_stock = 10;

        let output = format_inventory_list(&[expired, low], today);
        assert!(output.contains("Saline 0.9%"));
        assert!(output.contains("Expired"));
        assert!(output.contains("Reorder"));
        assert!(output.contains("Total: 2 item(s)"));
    }

    #[test]
    fn test_empty_list() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_inventory_list(&[], today), "No inventory items found.");
    }
}
