/// One decoded run of text at a position on the page.
///
/// Coordinates are in extractor units with a top-left origin: `y` grows
/// downward. Fragments are produced once by the extractor and never mutated;
/// the merger builds new cell strings instead.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    /// Horizontal position of the start of the run.
    pub x: f64,
    /// Vertical position of the run, measured from the top of the page.
    pub y: f64,
    /// Decoded text content.
    pub content: String,
}

impl TextFragment {
    pub fn new(x: f64, y: f64, content: impl Into<String>) -> Self {
        Self {
            x,
            y,
            content: content.into(),
        }
    }
}

/// A single page of positioned text, in extraction order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// Page width in extractor units.
    pub width: f64,
    /// Page height in extractor units.
    pub height: f64,
    /// Text fragments in the order the extractor emitted them.
    pub texts: Vec<TextFragment>,
}

impl Page {
    pub fn new(width: f64, height: f64, texts: Vec<TextFragment>) -> Self {
        Self {
            width,
            height,
            texts,
        }
    }
}

/// Position of a page within the statement.
///
/// The first page carries the account header above the transaction table, so
/// its table body starts lower than on continuation pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRole {
    /// Page 0.
    First,
    /// Any later page.
    Continuation,
}

impl PageRole {
    /// Role of the page at the given 0-based index.
    pub fn for_index(index: usize) -> Self {
        if index == 0 {
            PageRole::First
        } else {
            PageRole::Continuation
        }
    }
}
