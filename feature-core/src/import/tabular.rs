//! Spreadsheet importer
//!
//! Reads the first worksheet, skips the header row and maps columns A-D to
//! id, name, description and priority. Empty rows are ignored; rows with a
//! non-integer id or priority are skipped and reported by worksheet row.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use log::debug;
use std::io::Cursor;

use super::{feature_from_fields, log_skipped, ImportReport, RowError};
use crate::error::{FeatureError, Result};

/// Parses spreadsheet bytes (xlsx, xlsm, xlsb, xls or ods)
pub fn parse_spreadsheet(bytes: &[u8]) -> Result<ImportReport> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| FeatureError::Spreadsheet(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| FeatureError::Spreadsheet(e.to_string()))?,
        None => {
            debug!("Workbook has no worksheets");
            return Ok(ImportReport::default());
        }
    };

    let (first_row, first_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    // The range only covers used cells; pad each row so index 0 is column A.
    // Row numbers are reported the way a spreadsheet shows them.
    let rows = range.rows().enumerate().map(|(offset, cells)| {
        let mut texts = vec![String::new(); first_col];
        texts.extend(cells.iter().map(cell_text));
        (first_row + offset + 1, texts)
    });

    Ok(rows_to_report(rows))
}

/// Maps worksheet rows (number, cell texts) to records, skipping the header
pub(crate) fn rows_to_report<I>(rows: I) -> ImportReport
where
    I: IntoIterator<Item = (usize, Vec<String>)>,
{
    let mut report = ImportReport::default();

    let used_rows = rows
        .into_iter()
        .filter(|(_, cells)| cells.iter().any(|cell| !cell.trim().is_empty()));

    for (row, mut cells) in used_rows.skip(1) {
        cells.resize(cells.len().max(4), String::new());
        let fields: Vec<&str> = cells.iter().take(4).map(String::as_str).collect();

        match feature_from_fields(&fields) {
            Ok(feature) => report.features.push(feature),
            Err(issue) => report.skipped.push(RowError {
                row,
                content: fields.join(" | "),
                issue,
            }),
        }
    }

    log_skipped("Excel", &report.skipped);
    report
}

/// Cell value as text; whole floats print without a fraction so that
/// numeric id and priority cells parse as integers
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (*f as i64).to_string(),
        other => other.to_string(),
    }
}
