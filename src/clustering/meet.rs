//! Pairwise agreement ("meet") matrix across granularities

use crate::clustering::Segmentation;
use crate::error::FusionError;
use crate::matrix::DenseMatrix;

/// Aggregate segmentations at several granularities into a meet matrix
///
/// The timeline is sampled on a fixed grid of `interval` seconds spanning
/// the latest boundary of any segmentation. Entry (i, j) is the fraction
/// of granularities that place grid frames i and j in the same cluster, so
/// values run from 0 (never co-clustered) to 1 (co-clustered at every
/// granularity).
///
/// # Errors
///
/// Returns `InvalidInput` if no segmentations are given or `interval` is
/// not positive.
pub fn meet_matrix(
    segmentations: &[Segmentation],
    interval: f32,
) -> Result<DenseMatrix, FusionError> {
    if segmentations.is_empty() {
        return Err(FusionError::InvalidInput(
            "Need at least one segmentation".to_string(),
        ));
    }
    if !(interval > 0.0) {
        return Err(FusionError::InvalidInput(format!(
            "Meet interval must be positive, got {}",
            interval
        )));
    }

    let t_end = segmentations
        .iter()
        .filter_map(|s| s.boundaries.last().copied())
        .fold(0.0f32, f32::max);
    let n = ((t_end / interval).ceil() as usize).max(1);

    // Per-granularity labels on the shared grid
    let grid_labels: Vec<Vec<usize>> = segmentations
        .iter()
        .map(|seg| (0..n).map(|i| seg.label_at(i as f32 * interval)).collect())
        .collect();

    let depth = segmentations.len() as f32;
    let mut meet = DenseMatrix::zeros(n, n);
    for i in 0..n {
        for j in i..n {
            let agree = grid_labels
                .iter()
                .filter(|labels| labels[i] == labels[j])
                .count() as f32;
            let v = agree / depth;
            meet.set(i, j, v);
            meet.set(j, i, v);
        }
    }
    log::debug!(
        "Meet matrix: {}x{} grid at {} s over {} granularities",
        n,
        n,
        interval,
        segmentations.len()
    );
    Ok(meet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MatrixRows;

    #[test]
    fn test_single_segmentation_binary_agreement() {
        let seg = Segmentation {
            boundaries: vec![0.0, 1.0, 2.0],
            labels: vec![0, 1],
        };
        let meet = meet_matrix(&[seg], 0.5).unwrap();
        assert_eq!(meet.rows(), 4);
        assert_eq!(meet.get(0, 1), 1.0);
        assert_eq!(meet.get(0, 2), 0.0);
        assert_eq!(meet.get(2, 3), 1.0);
    }

    #[test]
    fn test_fraction_across_granularities() {
        // Coarse: one segment everywhere. Fine: split at t = 1.
        let coarse = Segmentation {
            boundaries: vec![0.0, 2.0],
            labels: vec![0],
        };
        let fine = Segmentation {
            boundaries: vec![0.0, 1.0, 2.0],
            labels: vec![0, 1],
        };
        let meet = meet_matrix(&[coarse, fine], 1.0).unwrap();
        assert_eq!(meet.rows(), 2);
        assert!((meet.get(0, 0) - 1.0).abs() < 1e-6);
        assert!((meet.get(0, 1) - 0.5).abs() < 1e-6, "agree only at coarse level");
    }

    #[test]
    fn test_diagonal_is_one() {
        let seg = Segmentation {
            boundaries: vec![0.0, 3.0],
            labels: vec![7],
        };
        let meet = meet_matrix(&[seg], 0.25).unwrap();
        for i in 0..meet.rows() {
            assert_eq!(meet.get(i, i), 1.0);
        }
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(meet_matrix(&[], 0.25).is_err());
        let seg = Segmentation {
            boundaries: vec![0.0, 1.0],
            labels: vec![0],
        };
        assert!(meet_matrix(&[seg], 0.0).is_err());
    }
}
