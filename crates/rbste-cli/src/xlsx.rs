//! Spreadsheet output.

use std::path::Path;

use rbste_core::OutputTable;
use rust_xlsxwriter::{Workbook, XlsxError};

/// Name of the single worksheet in the produced workbook.
pub const SHEET_NAME: &str = "Выписка из Альфа банка";

/// Write the table to one worksheet, header first, every cell as a string.
///
/// The workbook is assembled in memory and saved once at the end.
pub fn write_table(table: &OutputTable, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (r, row) in table.iter_all().enumerate() {
        let r = u32::try_from(r).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (c, cell) in row.cells.iter().enumerate() {
            let c = u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
            worksheet.write_string(r, c, cell)?;
        }
    }

    workbook.save(path)
}
