//! Spreadsheet rendering

use rust_xlsxwriter::Workbook;
use serde_json::Value;
use tracing::warn;

use super::render::flatten_value;
use crate::models::ExportRecord;
use crate::utils::errors::ExportResult;

pub const SHEET_NAME: &str = "Data";

/// Longest text a spreadsheet cell accepts
pub const MAX_CELL_CHARS: usize = 32_767;

/// Cut text down to the cell limit on a character boundary
fn cell_text(field: &str, text: String) -> String {
    let length = text.chars().count();
    if length <= MAX_CELL_CHARS {
        return text;
    }

    warn!(
        field,
        length,
        limit = MAX_CELL_CHARS,
        "Spreadsheet cell truncated"
    );
    text.chars().take(MAX_CELL_CHARS).collect()
}

/// One sheet named "Data": a header row of field names, then one row per record.
///
/// Numbers and booleans keep their cell type; everything else is flattened to text.
pub fn render_xlsx(records: &[ExportRecord], fields: &[String]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, field) in (0u16..).zip(fields) {
        worksheet.write_string(0, col, cell_text(field, field.clone()))?;
    }

    for (row, record) in (1u32..).zip(records) {
        for (col, field) in (0u16..).zip(fields) {
            match record.get(field) {
                None | Some(Value::Null) => {}
                Some(Value::Number(n)) if n.as_f64().is_some() => {
                    worksheet.write_number(row, col, n.as_f64().unwrap_or_default())?;
                }
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                value => {
                    worksheet.write_string(row, col, cell_text(field, flatten_value(field, value)))?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
