//! Tabular rendering of records

use comfy_table::{ContentArrangement, Table, presets};
use serde_json::Value;
use sq_core::Record;

/// Render records as a table
///
/// Columns are the union of record keys in first-seen order; missing
/// fields are left blank.
pub fn records_table(records: &[Record]) -> Table {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.clone());

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| cell_text(record.get(*column)))
            .collect();
        table.add_row(row);
    }

    table
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
