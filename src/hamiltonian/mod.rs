use log::{debug, error, info};
use rayon::prelude::*;

use crate::basis::Basis;
use crate::sparse::{CrsMatrix, LinearOperator, SparseRow};

/// Off-diagonal matrix element $\langle x'\vert H\vert x\rangle$ produced by a
/// model for the state $\vert x\rangle$.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    /// Index of $\vert x'\rangle$.
    pub col: usize,
    pub amplitude: f64,
    /// Fermion sign of the term.
    pub sign: i32,
}

impl Term {
    #[inline(always)]
    pub fn value(&self) -> f64 {
        self.amplitude * self.sign as f64
    }
}

/// A lattice Hamiltonian over a fixed basis.
/// # Contract
/// [Model::for_each_term] must emit the same sequence of terms every time it
/// is called on the same index. The assembly counts the terms on a first
/// call and stores them on a second one.
pub trait Model: Sync {
    type Basis: Basis;

    fn basis(&self) -> &Self::Basis;

    /// Diagonal element $\langle x\vert H\vert x\rangle$ of the state at `idx`.
    fn diagonal(&self, idx: usize) -> f64;

    /// Calls `emit` on every structurally non-zero off-diagonal term of the
    /// row `idx`.
    fn for_each_term<F: FnMut(Term)>(&self, idx: usize, emit: F);
}

/// Counting pass.
/// # Returns
/// * __`counts`__ - Number of stored entries of each row, diagonal included.
/// * __`diag`__ - The diagonal of the Hamiltonian.
pub fn count_non_zero<M: Model>(model: &M) -> (Vec<usize>, Vec<f64>) {
    let hilbert = model.basis().size();
    (0..hilbert).into_par_iter()
        .map(|idx| {
            let mut n = 1;
            model.for_each_term(idx, |_| n += 1);
            (n, model.diagonal(idx))
        })
        .unzip()
}

/// Builds the full Hamiltonian in compressed sparse row format.
/// # Definition
/// The rows are counted first with [count_non_zero], then filled in
/// parallel, each worker owning the slice of its row. Every row starts with
/// its diagonal element, followed by the terms in emission order.
/// # Panics
/// If a row does not emit as many terms as were counted.
pub fn setup_hamiltonian<M: Model>(model: &M) -> CrsMatrix {
    let hilbert = model.basis().size();
    let (counts, diag) = count_non_zero(model);

    let mut row_ptr = Vec::with_capacity(hilbert + 1);
    let mut nnz = 0;
    row_ptr.push(0);
    for c in counts.iter() {
        nnz += c;
        row_ptr.push(nnz);
    }
    debug!("Counted {} non-zeros over {} rows.", nnz, hilbert);

    let mut cols = vec![0usize; nnz];
    let mut values = vec![0.0; nnz];
    let mut rows: Vec<(&mut [usize], &mut [f64])> = Vec::with_capacity(hilbert);
    {
        let mut cols_rest: &mut [usize] = &mut cols;
        let mut values_rest: &mut [f64] = &mut values;
        for &c in counts.iter() {
            let (row_cols, tail_cols) = std::mem::take(&mut cols_rest).split_at_mut(c);
            let (row_values, tail_values) = std::mem::take(&mut values_rest).split_at_mut(c);
            rows.push((row_cols, row_values));
            cols_rest = tail_cols;
            values_rest = tail_values;
        }
    }

    rows.into_par_iter().enumerate().for_each(|(idx, (row_cols, row_values))| {
        row_cols[0] = idx;
        row_values[0] = diag[idx];
        let mut k = 1;
        model.for_each_term(idx, |term| {
            if k < row_cols.len() {
                row_cols[k] = term.col;
                row_values[k] = term.value();
            }
            k += 1;
        });
        if k != row_cols.len() {
            error!("Row {} counted {} entries but emitted {}.", idx, row_cols.len(), k);
            panic!("Counting and filling passes disagree on row {}.", idx);
        }
    });

    info!("Hamiltonian of dimension {} with {} non-zeros.", hilbert, nnz);
    CrsMatrix::from_parts(hilbert, hilbert, row_ptr, cols, values)
}

/// Matrix-free product $\vec x \mathrel{+}= H\vec y$.
/// # Definition
/// Every row is rebuilt in a cached [SparseRow] and contracted with `y`.
/// Rows are independent and processed in parallel.
/// # Panics
/// If `x` or `y` does not have the dimension of the basis.
pub fn matrix_vector_product<M: Model>(model: &M, x: &mut [f64], y: &[f64]) {
    let hilbert = model.basis().size();
    if x.len() != hilbert || y.len() != hilbert {
        error!("Matrix-free product of dimension {} with x of length {} and y of length {}.",
            hilbert, x.len(), y.len());
        panic!("Vector lengths do not match the Hilbert space dimension.");
    }
    x.par_iter_mut().enumerate().for_each_init(
        || SparseRow::with_capacity(64),
        |row, (idx, xi)| {
            row.clear();
            row.add(idx, model.diagonal(idx));
            model.for_each_term(idx, |term| row.add(term.col, term.value()));
            *xi += row.matrix_vector_product(y);
        },
    );
}

/// [LinearOperator] view of a model, for solvers that never need the
/// explicit matrix.
pub struct MatrixFree<'a, M> {
    model: &'a M,
}

impl<'a, M: Model> MatrixFree<'a, M> {
    pub fn new(model: &'a M) -> Self {
        MatrixFree { model }
    }
}

impl<'a, M: Model> LinearOperator for MatrixFree<'a, M> {
    fn dim(&self) -> usize {
        self.model.basis().size()
    }

    fn apply(&self, x: &mut [f64], y: &[f64]) {
        matrix_vector_product(self.model, x, y);
    }
}
