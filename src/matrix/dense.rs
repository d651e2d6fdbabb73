//! Dense row-major matrix

use super::{sort_desc_by_value, MatrixRows};
use crate::error::FusionError;

/// Dense row-major `f32` matrix
///
/// The workhorse type for distance, affinity and probability matrices.
/// All fusion-core matrices are square, but the type itself is rectangular
/// (eigenvector and descriptor matrices are N×d).
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f32>,
}

impl DenseMatrix {
    /// Create an all-zero matrix
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![0.0; n_rows * n_cols],
        }
    }

    /// Create an identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Build a matrix from row vectors
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the rows have inconsistent lengths.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, FusionError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(FusionError::InvalidInput(format!(
                    "Row {} has length {}, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    /// Element at `(i, j)`
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.n_cols + j]
    }

    /// Set element at `(i, j)`
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: f32) {
        self.data[i * self.n_cols + j] = v;
    }

    /// Add `v` to element at `(i, j)`
    #[inline]
    pub fn add_at(&mut self, i: usize, j: usize, v: f32) {
        self.data[i * self.n_cols + j] += v;
    }

    /// Row `i` as a slice
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// Mutable row `i`
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// True if the matrix is square
    pub fn is_square(&self) -> bool {
        self.n_rows == self.n_cols
    }

    /// Transposed copy
    pub fn transpose(&self) -> DenseMatrix {
        let mut t = DenseMatrix::zeros(self.n_cols, self.n_rows);
        for i in 0..self.n_rows {
            for j in 0..self.n_cols {
                t.set(j, i, self.get(i, j));
            }
        }
        t
    }

    /// Symmetrized copy `0.5 * (A + Aᵀ)` (square matrices only)
    pub fn symmetrize(&self) -> DenseMatrix {
        debug_assert!(self.is_square());
        let n = self.n_rows;
        let mut s = DenseMatrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                s.set(i, j, 0.5 * (self.get(i, j) + self.get(j, i)));
            }
        }
        s
    }

    /// Zero out the main diagonal
    pub fn zero_diagonal(&mut self) {
        let n = self.n_rows.min(self.n_cols);
        for i in 0..n {
            self.set(i, i, 0.0);
        }
    }

    /// Largest element value (0.0 for an empty matrix)
    pub fn max_value(&self) -> f32 {
        self.data.iter().fold(0.0f32, |m, &v| m.max(v))
    }

    /// Add another matrix elementwise
    pub fn add_assign(&mut self, other: &DenseMatrix) {
        debug_assert_eq!(self.n_rows, other.n_rows);
        debug_assert_eq!(self.n_cols, other.n_cols);
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += *b;
        }
    }

    /// Scale every element by `s`
    pub fn scale(&mut self, s: f32) {
        for v in self.data.iter_mut() {
            *v *= s;
        }
    }

    /// True if every element is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl MatrixRows for DenseMatrix {
    fn rows(&self) -> usize {
        self.n_rows
    }

    fn cols(&self) -> usize {
        self.n_cols
    }

    fn row_sum(&self, i: usize) -> f32 {
        self.row(i).iter().sum()
    }

    fn row_top_k(&self, i: usize, k: usize) -> Vec<(usize, f32)> {
        let mut entries: Vec<(usize, f32)> = self
            .row(i)
            .iter()
            .enumerate()
            .map(|(j, &v)| (j, v))
            .collect();
        sort_desc_by_value(&mut entries);
        entries.truncate(k);
        entries
    }
}
