//! Random-walk Laplacian eigenvectors

use nalgebra::{DMatrix, SymmetricEigen};

use crate::error::FusionError;
use crate::matrix::{DenseMatrix, MatrixRows};

/// Eigenvectors of the random-walk Laplacian of a similarity matrix
///
/// Computes the `n_eigs` eigenvectors with smallest eigenvalues of
/// `L_rw = I − D⁻¹W`. Because `L_rw` is not symmetric, the decomposition
/// goes through the symmetric-normalized Laplacian
/// `L_sym = I − D^{-1/2} W D^{-1/2}`: its eigenvectors rescaled by
/// `D^{-1/2}` are the random-walk eigenvectors with the same eigenvalues.
///
/// Zero-degree rows substitute degree 1, consistent with the crate-wide
/// zero-denominator policy.
///
/// # Returns
///
/// An N×`n_eigs` matrix whose columns are eigenvectors ordered by
/// ascending eigenvalue.
///
/// # Errors
///
/// Returns `InvalidInput` for a non-square or empty matrix and
/// `NumericalError` if the decomposition produces non-finite values.
pub fn random_walk_laplacian_eigs(
    w: &DenseMatrix,
    n_eigs: usize,
) -> Result<DenseMatrix, FusionError> {
    let n = w.rows();
    if n == 0 || !w.is_square() {
        return Err(FusionError::InvalidInput(format!(
            "Expected non-empty square matrix, got {}x{}",
            w.rows(),
            w.cols()
        )));
    }
    let n_eigs = n_eigs.min(n);

    let mut inv_sqrt_deg = vec![0.0f32; n];
    for i in 0..n {
        let mut deg = w.row_sum(i);
        if deg == 0.0 {
            deg = 1.0;
        }
        inv_sqrt_deg[i] = 1.0 / deg.sqrt();
    }

    let l_sym = DMatrix::<f32>::from_fn(n, n, |i, j| {
        let off = -w.get(i, j) * inv_sqrt_deg[i] * inv_sqrt_deg[j];
        if i == j {
            1.0 + off
        } else {
            off
        }
    });

    let eig = SymmetricEigen::new(l_sym);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eig.eigenvalues[a]
            .partial_cmp(&eig.eigenvalues[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut vecs = DenseMatrix::zeros(n, n_eigs);
    for (c, &src) in order.iter().take(n_eigs).enumerate() {
        for i in 0..n {
            vecs.set(i, c, eig.eigenvectors[(i, src)] * inv_sqrt_deg[i]);
        }
    }
    if !vecs.is_finite() {
        return Err(FusionError::NumericalError(
            "Laplacian eigendecomposition produced non-finite values".to_string(),
        ));
    }
    log::debug!("Computed {} Laplacian eigenvectors of {}x{} matrix", n_eigs, n, n);
    Ok(vecs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_block_similarity() -> DenseMatrix {
        DenseMatrix::from_rows(&[
            vec![1.0, 0.9, 0.05, 0.05],
            vec![0.9, 1.0, 0.05, 0.05],
            vec![0.05, 0.05, 1.0, 0.9],
            vec![0.05, 0.05, 0.9, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_second_eigenvector_separates_blocks() {
        let vecs = random_walk_laplacian_eigs(&two_block_similarity(), 2).unwrap();
        assert_eq!(vecs.cols(), 2);
        // The Fiedler vector splits the two blocks by sign
        let v = [vecs.get(0, 1), vecs.get(1, 1), vecs.get(2, 1), vecs.get(3, 1)];
        assert!(v[0] * v[1] > 0.0, "block members should share sign");
        assert!(v[2] * v[3] > 0.0);
        assert!(v[0] * v[2] < 0.0, "blocks should have opposite sign");
    }

    #[test]
    fn test_n_eigs_clamped() {
        let vecs = random_walk_laplacian_eigs(&two_block_similarity(), 10).unwrap();
        assert_eq!(vecs.cols(), 4);
    }

    #[test]
    fn test_rejects_empty() {
        let w = DenseMatrix::zeros(0, 0);
        assert!(random_walk_laplacian_eigs(&w, 2).is_err());
    }
}
