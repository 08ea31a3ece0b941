/// A PDF transformation matrix `[a b c d e f]`.
///
/// Uses the PDF row-vector convention: a point `(x, y)` maps to
/// `(a*x + c*y + e, b*x + d*y + f)`, and `m1.multiply(&m2)` applies `m1` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Length of the transformed unit y-vector; the vertical scale factor.
    pub fn vertical_scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    /// Build a matrix from a 6-number lopdf array, as found in `/Matrix`.
    pub fn from_objects(objects: &[lopdf::Object]) -> Option<Matrix> {
        if objects.len() != 6 {
            return None;
        }
        let mut values = [0.0; 6];
        for (slot, obj) in values.iter_mut().zip(objects) {
            *slot = crate::document::object_to_f64(obj).ok()?;
        }
        let [a, b, c, d, e, f] = values;
        Some(Matrix::new(a, b, c, d, e, f))
    }
}
