//! Excel export of the filtered rows.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::debug;

use crate::error::{Result, SurveyError};
use crate::input::SurveyTable;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Survey";

/// Tokens read as NA by the usual CSV tooling; written as blank cells.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How one raw cell lands in the worksheet.
#[derive(Debug, Clone, PartialEq)]
enum Cell<'a> {
    Blank,
    Number(f64),
    Text(&'a str),
}

impl<'a> Cell<'a> {
    /// Exact matches only: padded or unusual text stays text.
    fn classify(raw: &'a str) -> Self {
        if raw.is_empty() || NA_TOKENS.contains(&raw) {
            return Cell::Blank;
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw),
        }
    }
}

/// Build the workbook: header row, then one row per survey row, verbatim.
fn workbook(table: &SurveyTable) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(xlsx_error)?;

    let header = Format::new().set_bold();
    for (col, name) in table.headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, column(col)?, name, &header)
            .map_err(xlsx_error)?;
    }

    for (r, cells) in table.rows.iter().enumerate() {
        let row = u32::try_from(r + 1)
            .map_err(|_| SurveyError::Export("too many rows for a worksheet".to_string()))?;
        for (c, raw) in cells.iter().enumerate() {
            let col = column(c)?;
            match Cell::classify(raw) {
                Cell::Blank => {}
                Cell::Number(n) => {
                    sheet.write_number(row, col, n).map_err(xlsx_error)?;
                }
                Cell::Text(text) => {
                    sheet.write_string(row, col, text).map_err(xlsx_error)?;
                }
            }
        }
    }

    sheet.autofit();
    debug!(rows = table.row_count(), "built worksheet");
    Ok(workbook)
}

/// Encode the table as XLSX bytes.
pub fn xlsx_bytes(table: &SurveyTable) -> Result<Vec<u8>> {
    workbook(table)?.save_to_buffer().map_err(xlsx_error)
}

/// Write the table to an XLSX file.
pub fn write_xlsx(table: &SurveyTable, path: impl AsRef<Path>) -> Result<()> {
    workbook(table)?.save(path.as_ref()).map_err(xlsx_error)
}

fn column(index: usize) -> Result<u16> {
    u16::try_from(index)
        .map_err(|_| SurveyError::Export("too many columns for a worksheet".to_string()))
}

fn xlsx_error(e: XlsxError) -> SurveyError {
    SurveyError::Export(format!("Excel export failed: {}", e))
}
