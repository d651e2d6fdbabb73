//! Sparse k-nearest-neighbor diffusion kernels

use crate::matrix::{MatrixRows, SparseMatrix};

/// Restrict an affinity matrix to its K largest entries per row
///
/// Neighbor selection is self-inclusive: the diagonal entry competes with
/// the rest of the row. The selected entries are L1-normalized to sum to 1;
/// an all-zero row keeps a denominator of 1 and stays all-zero. Selection
/// uses the pinned total order (value descending, column ascending) so the
/// kernel is reproducible when affinities tie.
///
/// The result acts as a bilateral projection kernel `S·X·Sᵀ` that restricts
/// any matrix onto mutually high-confidence neighbor pairs during
/// cross-diffusion.
///
/// Rows shorter than `k` (only possible when `n < k`) keep all their
/// entries.
pub fn neighbor_kernel<M: MatrixRows>(w: &M, k: usize) -> SparseMatrix {
    let n = w.rows();
    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        let mut entries = w.row_top_k(i, k);
        let mut norm: f32 = entries.iter().map(|&(_, v)| v).sum();
        if norm == 0.0 {
            norm = 1.0;
            entries.clear();
        }
        for entry in entries.iter_mut() {
            entry.1 /= norm;
        }
        rows.push(entries);
    }
    log::debug!("Built {}x{} neighbor kernel with k = {}", n, w.cols(), k);
    SparseMatrix::from_row_entries(w.cols(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseMatrix;

    #[test]
    fn test_k_nonzeros_per_row_summing_to_one() {
        let w = DenseMatrix::from_rows(&[
            vec![1.0, 0.8, 0.1, 0.3],
            vec![0.8, 1.0, 0.2, 0.1],
            vec![0.1, 0.2, 1.0, 0.9],
            vec![0.3, 0.1, 0.9, 1.0],
        ])
        .unwrap();
        let s = neighbor_kernel(&w, 2);
        assert_eq!(s.nnz(), 8);
        for i in 0..4 {
            let entries: Vec<_> = s.row_entries(i).collect();
            assert_eq!(entries.len(), 2, "row {} should keep 2 entries", i);
            let sum: f32 = entries.iter().map(|&(_, v)| v).sum();
            assert!((sum - 1.0).abs() < 1e-6);
        }
        // Row 0 keeps its two largest: the self entry and column 1
        let cols: Vec<usize> = s.row_entries(0).map(|(j, _)| j).collect();
        assert_eq!(cols, vec![0, 1]);
    }

    #[test]
    fn test_zero_row_stays_empty() {
        let w = DenseMatrix::from_rows(&[vec![0.0, 0.0], vec![0.4, 0.6]]).unwrap();
        let s = neighbor_kernel(&w, 2);
        assert_eq!(s.row_entries(0).count(), 0);
        assert!((s.row_sum(1) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tie_break_prefers_lower_column() {
        let w = DenseMatrix::from_rows(&[vec![0.5, 0.5, 0.5]]).unwrap();
        let s = neighbor_kernel(&w, 2);
        let cols: Vec<usize> = s.row_entries(0).map(|(j, _)| j).collect();
        assert_eq!(cols, vec![0, 1]);
    }

    #[test]
    fn test_k_larger_than_n_keeps_all() {
        let w = DenseMatrix::from_rows(&[vec![0.2, 0.8], vec![0.8, 0.2]]).unwrap();
        let s = neighbor_kernel(&w, 5);
        assert_eq!(s.row_entries(0).count(), 2);
        assert!((s.row_sum(0) - 1.0).abs() < 1e-6);
    }
}
