//! Locally-scaled Gaussian affinity construction
//!
//! Converts a distance matrix into an affinity matrix using an adaptive
//! per-pair bandwidth estimated from each point's K-nearest-neighbor
//! distances (Equation 1 of the SNF paper).

use crate::error::FusionError;
use crate::matrix::{DenseMatrix, MatrixRows};

/// Build a locally-scaled Gaussian affinity matrix from a distance matrix
///
/// The input is symmetrized and its diagonal zeroed before scale
/// estimation. Each row's local scale is the mean of its K+1 smallest
/// distances (the zero self-distance included), rescaled by (K+1)/K to
/// correct for the injected zero. The pairwise bandwidth is the average of
/// both local scales and the pair distance.
///
/// # Arguments
///
/// * `d` - Square distance matrix (N×N)
/// * `k` - Number of nearest neighbors for local scale estimation
/// * `mu` - Bandwidth multiplier (> 0, typically 0.5)
///
/// # Returns
///
/// Symmetric affinity matrix with values in (0, 1] and diagonal exactly 1.
///
/// # Errors
///
/// Returns `InvalidInput` if `d` is not square, `mu <= 0`, `k == 0`, or
/// `k + 1 >= n`.
///
/// # Edge cases
///
/// A zero pairwise bandwidth (all K neighbors at distance zero) substitutes
/// denominator 1, producing affinity 1 rather than NaN. Maximal similarity
/// for coincident points is the intended reading.
pub fn affinity_from_distances(
    d: &DenseMatrix,
    k: usize,
    mu: f32,
) -> Result<DenseMatrix, FusionError> {
    let n = d.rows();
    if !d.is_square() {
        return Err(FusionError::InvalidInput(format!(
            "Distance matrix must be square, got {}x{}",
            d.rows(),
            d.cols()
        )));
    }
    if !(mu > 0.0) {
        return Err(FusionError::InvalidInput(format!(
            "mu must be positive, got {}",
            mu
        )));
    }
    if k == 0 || k + 1 >= n {
        return Err(FusionError::InvalidInput(format!(
            "Need 1 <= k and k + 1 < n, got k = {}, n = {}",
            k, n
        )));
    }

    let mut dsym = d.symmetrize();
    dsym.zero_diagonal();

    // Local neighborhood radius per row: mean of the K+1 smallest distances
    // (self included), rescaled to exclude the self-distance from the mean.
    let mut mean_dist = vec![0.0f32; n];
    let mut scratch = vec![0.0f32; n];
    for i in 0..n {
        scratch.copy_from_slice(dsym.row(i));
        scratch.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let sum: f32 = scratch[..k + 1].iter().sum();
        mean_dist[i] = sum / (k + 1) as f32 * (k + 1) as f32 / k as f32;
    }

    let mut w = DenseMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let dij = dsym.get(i, j);
            let eps = (mean_dist[i] + mean_dist[j] + dij) / 3.0;
            let mut denom = 2.0 * (mu * eps) * (mu * eps);
            if denom == 0.0 {
                denom = 1.0;
            }
            w.set(i, j, (-dij * dij / denom).exp());
        }
    }
    log::debug!("Built {}x{} affinity matrix (k = {}, mu = {})", n, n, k, mu);
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_distances() -> DenseMatrix {
        DenseMatrix::from_rows(&[
            vec![0.0, 0.1, 5.0, 5.0],
            vec![0.1, 0.0, 5.0, 5.0],
            vec![5.0, 5.0, 0.0, 0.1],
            vec![5.0, 5.0, 0.1, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_affinity_symmetric_unit_diagonal() {
        let w = affinity_from_distances(&block_distances(), 2, 0.5).unwrap();
        for i in 0..4 {
            assert_eq!(w.get(i, i), 1.0, "diagonal must be exactly 1");
            for j in 0..4 {
                assert!(
                    (w.get(i, j) - w.get(j, i)).abs() < 1e-7,
                    "affinity must be symmetric at ({}, {})",
                    i,
                    j
                );
                assert!(w.get(i, j) > 0.0 && w.get(i, j) <= 1.0);
            }
        }
    }

    #[test]
    fn test_affinity_orders_by_distance() {
        let w = affinity_from_distances(&block_distances(), 1, 0.5).unwrap();
        assert!(
            w.get(0, 1) > w.get(0, 2),
            "near pair should have higher affinity than far pair"
        );
    }

    #[test]
    fn test_affinity_zero_scale_yields_one() {
        // All-zero distances: every bandwidth degenerates, every affinity is 1
        let d = DenseMatrix::zeros(4, 4);
        let w = affinity_from_distances(&d, 2, 0.5).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(w.get(i, j), 1.0);
            }
        }
    }

    #[test]
    fn test_affinity_rejects_large_k() {
        let d = DenseMatrix::zeros(4, 4);
        assert!(affinity_from_distances(&d, 3, 0.5).is_err());
        assert!(affinity_from_distances(&d, 0, 0.5).is_err());
    }

    #[test]
    fn test_affinity_rejects_bad_mu() {
        let d = block_distances();
        assert!(affinity_from_distances(&d, 2, 0.0).is_err());
        assert!(affinity_from_distances(&d, 2, -1.0).is_err());
    }

    #[test]
    fn test_affinity_symmetrizes_input() {
        let d = DenseMatrix::from_rows(&[
            vec![0.0, 1.0, 2.0, 4.0],
            vec![3.0, 0.0, 1.0, 2.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![4.0, 2.0, 1.0, 0.0],
        ])
        .unwrap();
        let w = affinity_from_distances(&d, 2, 0.5).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert!((w.get(i, j) - w.get(j, i)).abs() < 1e-7);
            }
        }
    }
}
