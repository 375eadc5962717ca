use log::error;

/// Anything that can add $A\vec y$ to $\vec x$.
pub trait LinearOperator {
    /// Dimension of the (square) operator.
    fn dim(&self) -> usize;
    /// $\vec x \mathrel{+}= A\vec y$.
    /// # Panics
    /// If `x` does not have one entry per row or `y` one per column.
    fn apply(&self, x: &mut [f64], y: &[f64]);
}

/// Matrix in compressed sparse row format.
/// # Construction
/// The number of rows and non-zeros is reserved first with
/// [CrsMatrix::resize], then every row, in increasing order, gets its start
/// offset through [CrsMatrix::set_row] followed by its entries through
/// [CrsMatrix::push]. The sentinel offset `set_row(rows, nnz)` closes the
/// matrix.
/// ```rust
/// use exactdiag::sparse::CrsMatrix;
/// let mut m = CrsMatrix::new();
/// m.resize(2, 3);
/// m.set_row(0, 0);
/// m.push(0, 1.0);
/// m.push(1, 2.0);
/// m.set_row(1, 2);
/// m.push(1, 3.0);
/// m.set_row(2, 3);
/// assert_eq!(m.to_dense(), vec![1.0, 2.0, 0.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrsMatrix {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CrsMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a square matrix with `nnz` non-zeros.
    pub fn resize(&mut self, rows: usize, nnz: usize) {
        self.resize_rectangular(rows, rows, nnz);
    }

    pub fn resize_rectangular(&mut self, rows: usize, cols: usize, nnz: usize) {
        self.rows = rows;
        self.cols = cols;
        self.row_ptr = vec![0; rows + 1];
        self.col_idx = Vec::with_capacity(nnz);
        self.values = Vec::with_capacity(nnz);
    }

    /// Sets the offset of the first entry of `row`.
    /// # Panics
    /// The offset must be the number of entries pushed so far.
    pub fn set_row(&mut self, row: usize, offset: usize) {
        if offset != self.col_idx.len() {
            error!("Row {} starts at {} but {} entries were pushed.", row, offset, self.col_idx.len());
            panic!("Sparse row offset does not match the pushed entries.");
        }
        self.row_ptr[row] = offset;
    }

    pub fn push(&mut self, col: usize, value: f64) {
        self.col_idx.push(col);
        self.values.push(value);
    }

    /// Builds a matrix from its raw arrays.
    /// # Panics
    /// The arrays must describe a valid matrix.
    pub fn from_parts(rows: usize, cols: usize, row_ptr: Vec<usize>, col_idx: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(row_ptr.len(), rows + 1);
        assert_eq!(col_idx.len(), values.len());
        assert_eq!(row_ptr[rows], values.len());
        CrsMatrix { rows, cols, row_ptr, col_idx, values }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Entries `(col, value)` of a row, in storage order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        self.col_idx[range.clone()].iter().copied().zip(self.values[range].iter().copied())
    }

    /// Row major dense copy. Duplicated entries are summed.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for (j, v) in self.row(i) {
                dense[j + i * self.cols] += v;
            }
        }
        dense
    }

    /// Whether the matrix equals its transpose within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if self.rows != self.cols {
            return false;
        }
        let n = self.rows;
        let dense = self.to_dense();
        (0..n).all(|i| (0..i).all(|j| <f64>::abs(dense[j + i * n] - dense[i + j * n]) <= tol))
    }

    /// $A\vec y$.
    pub fn matvec(&self, y: &[f64]) -> Vec<f64> {
        let mut x = vec![0.0; self.rows];
        self.apply(&mut x, y);
        x
    }
}

impl LinearOperator for CrsMatrix {
    fn dim(&self) -> usize {
        self.rows
    }

    fn apply(&self, x: &mut [f64], y: &[f64]) {
        if x.len() != self.rows || y.len() != self.cols {
            error!("Product of a {}x{} matrix with x of length {} and y of length {}.",
                self.rows, self.cols, x.len(), y.len());
            panic!("Vector lengths do not match the matrix dimensions.");
        }
        for (i, xi) in x.iter_mut().enumerate() {
            *xi += self.row(i).map(|(j, v)| v * y[j]).sum::<f64>();
        }
    }
}

/// Sparse row buffer, filled once per basis state then contracted or
/// flushed.
#[derive(Debug, Clone, Default)]
pub struct SparseRow {
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl SparseRow {
    pub fn with_capacity(capacity: usize) -> Self {
        SparseRow {
            cols: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn add(&mut self, col: usize, value: f64) {
        self.cols.push(col);
        self.values.push(value);
    }

    pub fn clear(&mut self) {
        self.cols.clear();
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Scalar product of the row with `y`.
    #[inline(always)]
    pub fn matrix_vector_product(&self, y: &[f64]) -> f64 {
        self.cols.iter().zip(self.values.iter()).map(|(&j, &v)| v * y[j]).sum()
    }

    /// Appends the row to `matrix` and empties the buffer. Returns the number
    /// of entries written.
    pub fn finalize(&mut self, matrix: &mut CrsMatrix) -> usize {
        let n = self.len();
        for (&j, &v) in self.cols.iter().zip(self.values.iter()) {
            matrix.push(j, v);
        }
        self.clear();
        n
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn small() -> CrsMatrix {
        let mut m = CrsMatrix::new();
        m.resize(3, 5);
        m.set_row(0, 0);
        m.push(0, 2.0);
        m.push(2, 1.0);
        m.set_row(1, 2);
        m.push(1, -1.0);
        m.set_row(2, 3);
        m.push(2, 4.0);
        m.push(0, 1.0);
        m.set_row(3, 5);
        m
    }

    #[test]
    fn test_matvec() {
        let m = small();
        assert_eq!(m.nnz(), 5);
        assert_eq!(m.matvec(&[1.0, 2.0, 3.0]), vec![5.0, -2.0, 13.0]);
        let mut x = vec![1.0; 3];
        m.apply(&mut x, &[1.0, 0.0, 0.0]);
        assert_eq!(x, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_symmetric() {
        assert!(small().is_symmetric(1e-14));
        let mut m = CrsMatrix::new();
        m.resize(2, 1);
        m.set_row(0, 0);
        m.push(1, 1.0);
        m.set_row(1, 1);
        m.set_row(2, 1);
        assert!(!m.is_symmetric(1e-14));
    }

    #[test]
    #[should_panic]
    fn test_bad_offset() {
        let mut m = CrsMatrix::new();
        m.resize(2, 2);
        m.set_row(0, 0);
        m.push(0, 1.0);
        m.set_row(1, 0);
    }

    #[test]
    fn test_sparse_row() {
        let mut row = SparseRow::with_capacity(4);
        row.add(0, 1.0);
        row.add(2, -2.0);
        assert_eq!(row.matrix_vector_product(&[3.0, 5.0, 1.0]), 1.0);
        let mut m = CrsMatrix::new();
        m.resize_rectangular(1, 3, 2);
        m.set_row(0, 0);
        assert_eq!(row.finalize(&mut m), 2);
        m.set_row(1, 2);
        assert!(row.is_empty());
        assert_eq!(m.to_dense(), vec![1.0, 0.0, -2.0]);
        assert_eq!(m.rows(), 1);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.matvec(&[3.0, 5.0, 1.0]), vec![1.0]);
    }

    #[test]
    #[should_panic]
    fn test_apply_short_x() {
        let m = small();
        let mut x = vec![0.0; 2];
        m.apply(&mut x, &[1.0, 1.0, 1.0]);
    }

    #[test]
    #[should_panic]
    fn test_apply_short_y() {
        let m = small();
        let mut x = vec![0.0; 3];
        m.apply(&mut x, &[1.0, 1.0]);
    }
}
