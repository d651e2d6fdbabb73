//! Row-stochastic probability normalization

use crate::matrix::{DenseMatrix, MatrixRows};

/// Row-normalize an affinity matrix into a probability matrix
///
/// Plain mode (`regularize = false`) divides each row by its sum. Rows
/// summing to zero are left all-zero: the denominator is substituted with 1
/// instead of spreading a uniform distribution. The asymmetry is deliberate
/// and relied on downstream.
///
/// Regularized mode returns `0.5·I + 0.5·(row-normalized W with zeroed
/// diagonal)`, pinning exactly half the probability mass on the point
/// itself regardless of local density. The diffusion engine initializes
/// with plain mode only.
pub fn to_probability(w: &DenseMatrix, regularize: bool) -> DenseMatrix {
    let n = w.rows();
    if regularize {
        let mut p = DenseMatrix::zeros(n, n);
        for i in 0..n {
            let mut row_sum = w.row_sum(i) - w.get(i, i);
            if row_sum == 0.0 {
                row_sum = 1.0;
            }
            for j in 0..n {
                if i == j {
                    p.set(i, j, 0.5);
                } else {
                    p.set(i, j, 0.5 * w.get(i, j) / row_sum);
                }
            }
        }
        p
    } else {
        let mut p = w.clone();
        for i in 0..n {
            let mut row_sum = p.row_sum(i);
            if row_sum == 0.0 {
                row_sum = 1.0;
            }
            for v in p.row_mut(i) {
                *v /= row_sum;
            }
        }
        p
    }
}
