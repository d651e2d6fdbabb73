//! Row-compressed sparse matrix

use super::{sort_desc_by_value, DenseMatrix, MatrixRows};

/// Sparse matrix in compressed-sparse-row form
///
/// Used for the k-nearest-neighbor diffusion kernels, which keep only K
/// entries per row. Column indices within each row are stored in ascending
/// order.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    n_rows: usize,
    n_cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f32>,
}

impl SparseMatrix {
    /// Build from per-row `(column, value)` entry lists
    ///
    /// Entries within each row are sorted by column index; duplicate columns
    /// are not merged and must not be passed.
    pub fn from_row_entries(n_cols: usize, rows: Vec<Vec<(usize, f32)>>) -> Self {
        let n_rows = rows.len();
        let mut row_ptr = Vec::with_capacity(n_rows + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);
        for mut row in rows {
            row.sort_by_key(|&(j, _)| j);
            for (j, v) in row {
                debug_assert!(j < n_cols);
                col_idx.push(j);
                values.push(v);
            }
            row_ptr.push(col_idx.len());
        }
        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored entries of row `i` as `(column, value)` pairs
    pub fn row_entries(&self, i: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        self.col_idx[start..end]
            .iter()
            .zip(self.values[start..end].iter())
            .map(|(&j, &v)| (j, v))
    }

    /// All stored entries as `(row, column, value)` triplets
    pub fn triplets(&self) -> Vec<(usize, usize, f32)> {
        let mut out = Vec::with_capacity(self.nnz());
        for i in 0..self.n_rows {
            for (j, v) in self.row_entries(i) {
                out.push((i, j, v));
            }
        }
        out
    }

    /// Sparse-dense product `S · X`
    pub fn mul_dense(&self, x: &DenseMatrix) -> DenseMatrix {
        debug_assert_eq!(self.n_cols, x.rows());
        let m = x.cols();
        let mut out = DenseMatrix::zeros(self.n_rows, m);
        for i in 0..self.n_rows {
            for (k, v) in self.row_entries(i) {
                let src = x.row(k);
                let dst = out.row_mut(i);
                for j in 0..m {
                    dst[j] += v * src[j];
                }
            }
        }
        out
    }

    /// Bilateral projection `S · X · Sᵀ`
    ///
    /// Computed as two sparse-on-the-left products, S·(S·Xᵀ)ᵀ, so the sparse
    /// operand always multiplies from the left.
    pub fn project(&self, x: &DenseMatrix) -> DenseMatrix {
        let a = self.mul_dense(&x.transpose());
        self.mul_dense(&a.transpose())
    }
}

impl MatrixRows for SparseMatrix {
    fn rows(&self) -> usize {
        self.n_rows
    }

    fn cols(&self) -> usize {
        self.n_cols
    }

    fn row_sum(&self, i: usize) -> f32 {
        self.row_entries(i).map(|(_, v)| v).sum()
    }

    fn row_top_k(&self, i: usize, k: usize) -> Vec<(usize, f32)> {
        let mut entries: Vec<(usize, f32)> = self.row_entries(i).collect();
        sort_desc_by_value(&mut entries);
        entries.truncate(k);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseMatrix {
        // [[0.5, 0.5, 0.0],
        //  [0.0, 1.0, 0.0],
        //  [0.0, 0.0, 1.0]]
        SparseMatrix::from_row_entries(
            3,
            vec![
                vec![(1, 0.5), (0, 0.5)],
                vec![(1, 1.0)],
                vec![(2, 1.0)],
            ],
        )
    }

    #[test]
    fn test_nnz_and_row_entries() {
        let s = sample();
        assert_eq!(s.nnz(), 4);
        let row0: Vec<_> = s.row_entries(0).collect();
        assert_eq!(row0, vec![(0, 0.5), (1, 0.5)]);
    }

    #[test]
    fn test_mul_dense() {
        let s = sample();
        let x = DenseMatrix::from_rows(&[
            vec![2.0, 0.0],
            vec![0.0, 2.0],
            vec![4.0, 4.0],
        ])
        .unwrap();
        let y = s.mul_dense(&x);
        assert!((y.get(0, 0) - 1.0).abs() < 1e-6);
        assert!((y.get(0, 1) - 1.0).abs() < 1e-6);
        assert!((y.get(1, 1) - 2.0).abs() < 1e-6);
        assert!((y.get(2, 0) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_project_identity_kernel() {
        // S = I leaves X unchanged
        let s = SparseMatrix::from_row_entries(
            2,
            vec![vec![(0, 1.0)], vec![(1, 1.0)]],
        );
        let x = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let y = s.project(&x);
        assert_eq!(y, x);
    }

    #[test]
    fn test_row_sum_sparse() {
        let s = sample();
        assert!((s.row_sum(0) - 1.0).abs() < 1e-6);
        assert!((s.row_sum(2) - 1.0).abs() < 1e-6);
    }
}
