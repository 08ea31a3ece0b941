use std::path::Path;

use rbste_core::{LayoutOptions, reconstruct};

use crate::shared::open_statement;
use crate::xlsx::write_table;

/// Convert the statement at `input` into a spreadsheet at `output`.
///
/// Nothing is written unless every page was extracted and reconstructed.
pub fn run(input: &Path, output: &Path) -> Result<(), i32> {
    let doc = open_statement(input)?;

    let pages = doc.pages().map_err(|e| {
        eprintln!("Error: failed to extract text: {e}");
        1
    })?;

    let table = reconstruct(&pages, &LayoutOptions::default()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    write_table(&table, output).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", output.display());
        1
    })?;

    tracing::info!(
        pages = pages.len(),
        rows = table.row_count(),
        output = %output.display(),
        "statement converted"
    );
    Ok(())
}
