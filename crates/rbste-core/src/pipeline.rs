//! End-to-end reconstruction of the statement table from extracted pages.

use crate::error::LayoutError;
use crate::fragment::{Page, PageRole};
use crate::layout::{LayoutOptions, filter_page};
use crate::rows::{group_rows, merge_paragraphs, serialize_rows};
use crate::table::{OutputTable, Row};

/// Rebuild the rows of a single page.
///
/// Applies the template filter for the page's role, groups fragments into
/// rows, merges wrapped description lines and serializes the result.
pub fn page_rows(
    page: &Page,
    index: usize,
    options: &LayoutOptions,
) -> Result<Vec<Row>, LayoutError> {
    let role = PageRole::for_index(index);
    let filtered = filter_page(page, role, options);
    let groups = group_rows(&filtered);
    let group_count = groups.len();
    let merged =
        merge_paragraphs(groups, options.merge_threshold).map_err(|e| e.on_page(index))?;

    tracing::debug!(
        page = index + 1,
        kept = filtered.texts.len(),
        dropped = page.texts.len() - filtered.texts.len(),
        groups = group_count,
        rows = merged.len(),
        "reconstructed page"
    );
    Ok(serialize_rows(&merged))
}

/// Rebuild the whole statement table.
///
/// Pages are processed in order; rows keep page order and, within a page,
/// ascending y order. Every row has its amount cell cleaned and the standard
/// header row is prepended. The first layout mismatch aborts the run.
pub fn reconstruct(pages: &[Page], options: &LayoutOptions) -> Result<OutputTable, LayoutError> {
    let mut rows = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        rows.extend(page_rows(page, index, options)?);
    }

    let rows: Vec<Row> = rows
        .iter()
        .map(|row| row.cleaned(&options.currency_suffix))
        .collect();
    Ok(OutputTable::new(rows))
}
