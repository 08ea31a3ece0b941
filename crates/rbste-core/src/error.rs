//! Error types for statement reconstruction.
//!
//! Provides [`LayoutError`], raised when a page does not match the statement
//! template closely enough for continuation lines to be merged safely.

use std::fmt;

/// Fatal layout mismatch detected while merging wrapped rows.
///
/// Every variant carries the 0-indexed page and the y-coordinate (extractor
/// units) of the offending row so the failure can be located in the source
/// document.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The row receiving a continuation line has no description cell.
    MissingDescription {
        /// Page index (0-based).
        page: usize,
        /// y-coordinate of the target row.
        y: f64,
        /// Number of cells the target row actually has.
        cells: usize,
        /// Number of cells required to address the description column.
        required: usize,
    },
    /// A continuation row carries no fragments.
    EmptyContinuation {
        /// Page index (0-based).
        page: usize,
        /// y-coordinate of the continuation row.
        y: f64,
    },
    /// A continuation row carries more than one fragment, so it is unclear
    /// which cell the extra text belongs to.
    AmbiguousContinuation {
        /// Page index (0-based).
        page: usize,
        /// y-coordinate of the continuation row.
        y: f64,
        /// Number of fragments found on the continuation row.
        fragments: usize,
    },
}

impl LayoutError {
    /// Page index (0-based) the error occurred on.
    pub fn page(&self) -> usize {
        match self {
            LayoutError::MissingDescription { page, .. }
            | LayoutError::EmptyContinuation { page, .. }
            | LayoutError::AmbiguousContinuation { page, .. } => *page,
        }
    }

    /// Re-attribute the error to another page.
    ///
    /// The merger works on one page at a time and does not know its index;
    /// the pipeline fills it in.
    pub fn on_page(mut self, index: usize) -> Self {
        match &mut self {
            LayoutError::MissingDescription { page, .. }
            | LayoutError::EmptyContinuation { page, .. }
            | LayoutError::AmbiguousContinuation { page, .. } => *page = index,
        }
        self
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::MissingDescription {
                page,
                y,
                cells,
                required,
            } => write!(
                f,
                "unexpected layout on page {}: row at y={y} has {cells} cell(s), \
                 continuation needs at least {required}",
                page + 1
            ),
            LayoutError::EmptyContinuation { page, y } => write!(
                f,
                "unexpected layout on page {}: continuation row at y={y} is empty",
                page + 1
            ),
            LayoutError::AmbiguousContinuation { page, y, fragments } => write!(
                f,
                "unexpected layout on page {}: continuation row at y={y} has {fragments} \
                 fragments, expected exactly one",
                page + 1
            ),
        }
    }
}

impl std::error::Error for LayoutError {}
