/// Dense row-major matrix of `f64`. Only its row and column vectors ever
/// cross the wire, one pair per output cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from row slices.
    ///
    /// # Panics
    /// Panics if the rows are not all the same length.
    pub fn from_rows(rows: &[&[f64]]) -> Self {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        assert!(
            rows.iter().all(|r| r.len() == cols),
            "matrix rows must all have the same length"
        );
        Self {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> Vec<f64> {
        self.data[row * self.cols..(row + 1) * self.cols].to_vec()
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    /// Sequential product, the single-process reference the distributed
    /// path is checked against.
    ///
    /// # Panics
    /// Panics if `self.cols() != other.rows()`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, other.rows,
            "cannot multiply a {}x{} matrix by a {}x{} matrix",
            self.rows, self.cols, other.rows, other.cols
        );
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let cell = (0..self.cols).map(|k| self.get(i, k) * other.get(k, j)).sum();
                out.set(i, j, cell);
            }
        }
        out
    }
}

/// Dot product of two equal-length vectors, `None` when the lengths
/// differ. The worker treats a mismatch as a compute failure.
pub fn dot(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    Some(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_matches_hand_computation() {
        assert_eq!(dot(&[2.0, 2.0], &[1.0, 3.0]), Some(8.0));
        assert_eq!(dot(&[], &[]), Some(0.0));
    }

    #[test]
    fn dot_rejects_mismatched_lengths() {
        assert_eq!(dot(&[1.0, 2.0], &[1.0]), None);
    }

    #[test]
    fn rows_and_columns_slice_correctly() {
        let m = Matrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert_eq!(m.row(1), vec![4.0, 5.0, 6.0]);
        assert_eq!(m.column(2), vec![3.0, 6.0]);
    }

    #[test]
    fn sequential_multiply() {
        let a = Matrix::from_rows(&[&[2.0, 2.0], &[3.0, 1.0]]);
        let b = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let expected = Matrix::from_rows(&[&[8.0, 12.0], &[6.0, 10.0]]);
        assert_eq!(a.multiply(&b), expected);
    }

    #[test]
    #[should_panic(expected = "cannot multiply")]
    fn multiply_panics_on_shape_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 2);
        let _ = a.multiply(&b);
    }
}
