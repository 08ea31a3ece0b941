use std::path::Path;

use rbste_parse::StatementDocument;

/// Open a statement PDF with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be parsed as a PDF.
pub fn open_statement(file: &Path) -> Result<StatementDocument, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    StatementDocument::open_file(file).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}
