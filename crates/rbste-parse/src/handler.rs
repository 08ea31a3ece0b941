//! Callback seam between the content stream interpreter and its consumers.

/// A run of text shown by one `Tj`, `TJ`, `'` or `"` operator.
///
/// Coordinates are PDF user space (origin bottom-left, y up) after the CTM
/// has been applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextRun {
    /// Decoded Unicode text of the whole run.
    pub text: String,
    /// x of the run origin.
    pub x: f64,
    /// Baseline y of the run origin.
    pub baseline: f64,
    /// Font size after the text and current transformation matrices.
    pub font_size: f64,
}

/// Receives text runs in content stream order.
pub(crate) trait ContentHandler {
    fn on_text(&mut self, run: TextRun);
}

impl ContentHandler for Vec<TextRun> {
    fn on_text(&mut self, run: TextRun) {
        self.push(run);
    }
}
