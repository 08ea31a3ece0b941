//! Text state machine for the content stream interpreter.
//!
//! Tracks BT/ET text objects, font selection (Tf), the text and line
//! matrices (Tm, Td, TD, T*) and the spacing parameters that affect how far
//! each shown string advances the pen.

use crate::matrix::Matrix;

/// Text state parameters saved and restored by `q`/`Q`.
///
/// The text and line matrices are not part of the graphics state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStateSnapshot {
    pub char_spacing: f64,
    pub word_spacing: f64,
    pub h_scaling: f64,
    pub leading: f64,
    pub font_name: Vec<u8>,
    pub font_size: f64,
    pub rise: f64,
}

/// Text state tracked while interpreting a content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Character spacing (Tc).
    pub char_spacing: f64,
    /// Word spacing (Tw), applied to single-byte code 32.
    pub word_spacing: f64,
    /// Horizontal scaling (Tz) as a percentage.
    pub h_scaling: f64,
    /// Leading (TL).
    pub leading: f64,
    /// Resource name of the current font (Tf).
    pub font_name: Vec<u8>,
    /// Current font size (Tf).
    pub font_size: f64,
    /// Text rise (Ts).
    pub rise: f64,
    text_matrix: Matrix,
    line_matrix: Matrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextState {
    pub fn new() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: Vec::new(),
            font_size: 0.0,
            rise: 0.0,
            text_matrix: Matrix::identity(),
            line_matrix: Matrix::identity(),
        }
    }

    pub fn text_matrix(&self) -> &Matrix {
        &self.text_matrix
    }

    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scaling_normalized(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// `BT`: reset both matrices to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Matrix::identity();
        self.line_matrix = Matrix::identity();
    }

    /// `Tf`.
    pub fn set_font(&mut self, font_name: Vec<u8>, font_size: f64) {
        self.font_name = font_name;
        self.font_size = font_size;
    }

    /// `Tm`: replace text and line matrices.
    pub fn set_text_matrix(&mut self, m: Matrix) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: offset from the start of the current line.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: set leading to `-ty`, then `Td`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`: equivalent to `0 -TL Td`.
    pub fn move_to_next_line(&mut self) {
        let leading = self.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Move the pen horizontally by `tx` text space units.
    pub fn advance(&mut self, tx: f64) {
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }

    pub fn save_snapshot(&self) -> TextStateSnapshot {
        TextStateSnapshot {
            char_spacing: self.char_spacing,
            word_spacing: self.word_spacing,
            h_scaling: self.h_scaling,
            leading: self.leading,
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            rise: self.rise,
        }
    }

    pub fn restore_snapshot(&mut self, snapshot: TextStateSnapshot) {
        self.char_spacing = snapshot.char_spacing;
        self.word_spacing = snapshot.word_spacing;
        self.h_scaling = snapshot.h_scaling;
        self.leading = snapshot.leading;
        self.font_name = snapshot.font_name;
        self.font_size = snapshot.font_size;
        self.rise = snapshot.rise;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_text_resets_matrices() {
        let mut ts = TextState::new();
        ts.move_text_position(10.0, 20.0);
        ts.begin_text();
        assert_eq!(*ts.text_matrix(), Matrix::identity());
    }

    #[test]
    fn td_accumulates_from_line_start() {
        let mut ts = TextState::new();
        ts.begin_text();
        ts.move_text_position(72.0, 720.0);
        ts.advance(30.0);
        ts.move_text_position(0.0, -14.0);
        // Td offsets the line start, not the advanced pen.
        assert_eq!(ts.text_matrix().e, 72.0);
        assert_eq!(ts.text_matrix().f, 706.0);
    }

    #[test]
    fn td_respects_scaled_line_matrix() {
        let mut ts = TextState::new();
        ts.set_text_matrix(Matrix::new(2.0, 0.0, 0.0, 2.0, 100.0, 500.0));
        ts.move_text_position(5.0, -10.0);
        assert_eq!(ts.text_matrix().e, 110.0);
        assert_eq!(ts.text_matrix().f, 480.0);
    }

    #[test]
    fn upper_td_sets_leading_and_t_star_uses_it() {
        let mut ts = TextState::new();
        ts.begin_text();
        ts.move_text_position(50.0, 700.0);
        ts.move_text_position_and_set_leading(0.0, -12.0);
        assert_eq!(ts.leading, 12.0);
        ts.move_to_next_line();
        assert_eq!(ts.text_matrix().f, 676.0);
        assert_eq!(ts.text_matrix().e, 50.0);
    }

    #[test]
    fn snapshot_round_trip_keeps_matrices() {
        let mut ts = TextState::new();
        ts.set_font(b"F1".to_vec(), 9.0);
        ts.char_spacing = 0.5;
        let snap = ts.save_snapshot();

        ts.set_font(b"F2".to_vec(), 14.0);
        ts.char_spacing = 2.0;
        ts.move_text_position(10.0, 10.0);
        ts.restore_snapshot(snap);

        assert_eq!(ts.font_name, b"F1".to_vec());
        assert_eq!(ts.font_size, 9.0);
        assert_eq!(ts.char_spacing, 0.5);
        assert_eq!(ts.text_matrix().e, 10.0);
    }
}
