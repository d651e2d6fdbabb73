//! Numeric matrix types shared by the fusion engine
//!
//! Two storage variants behind one row-capability interface:
//! - [`DenseMatrix`]: row-major dense storage for distance, affinity and
//!   probability matrices
//! - [`SparseMatrix`]: row-compressed storage for k-nearest-neighbor kernels
//!
//! Both implement [`MatrixRows`], which exposes the row operations the
//! fusion core needs (row sums and deterministic top-K selection) without
//! runtime type inspection.

pub mod dense;
pub mod sparse;

pub use dense::DenseMatrix;
pub use sparse::SparseMatrix;

/// Row-level operations shared by dense and sparse matrices
pub trait MatrixRows {
    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn cols(&self) -> usize;

    /// Sum of row `i`
    fn row_sum(&self, i: usize) -> f32;

    /// The `k` largest entries of row `i` as `(column, value)` pairs
    ///
    /// Ordering is pinned to a fixed total order for reproducibility:
    /// value descending, then column index ascending. Returns fewer than
    /// `k` entries only when the row has fewer than `k` stored values.
    fn row_top_k(&self, i: usize, k: usize) -> Vec<(usize, f32)>;
}

/// Sort `(column, value)` pairs by value descending, then column ascending.
///
/// This is the pinned tie-break order used by every top-K selection in the
/// crate; partial sorts with unstable tie handling would make the sparse
/// kernels (and therefore the fused output) run-dependent.
pub(crate) fn sort_desc_by_value(entries: &mut [(usize, f32)]) {
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_desc_tie_break() {
        let mut entries = vec![(3, 0.5), (0, 0.7), (1, 0.5), (2, 0.9)];
        sort_desc_by_value(&mut entries);
        assert_eq!(entries, vec![(2, 0.9), (0, 0.7), (1, 0.5), (3, 0.5)]);
    }
}
