//! Multi-scale segmentation boundary
//!
//! The structural embedder consumes hierarchical segmentations through the
//! [`SegmentationBackend`] trait: one flat segmentation per cluster-count
//! granularity, aggregated into a pairwise agreement ("meet") matrix. The
//! default [`SpectralBackend`] clusters random-walk Laplacian eigenvectors
//! of the fused similarity matrix; callers with their own segmentation
//! machinery plug in behind the same trait.

pub mod laplacian;
pub mod meet;
pub mod spectral;

pub use laplacian::random_walk_laplacian_eigs;
pub use meet::meet_matrix;
pub use spectral::SpectralBackend;

use crate::error::FusionError;
use crate::matrix::DenseMatrix;

/// One flat segmentation of the timeline at a single granularity
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Interval boundaries in seconds; `labels.len() + 1` entries,
    /// ascending
    pub boundaries: Vec<f32>,
    /// Cluster label per interval
    pub labels: Vec<usize>,
}

impl Segmentation {
    /// Label of the interval containing time `t`
    ///
    /// Times before the first boundary map to the first interval, times at
    /// or past the last boundary to the last.
    pub fn label_at(&self, t: f32) -> usize {
        if self.labels.is_empty() {
            return 0;
        }
        let idx = self.boundaries.partition_point(|&b| b <= t);
        self.labels[idx.saturating_sub(1).min(self.labels.len() - 1)]
    }
}

/// Produces segmentations of a fused similarity matrix at multiple
/// granularities
pub trait SegmentationBackend {
    /// Segment `fused` at every granularity from 2 up to `max_clusters`
    /// clusters
    ///
    /// `times` gives the time in seconds of each matrix row and must have
    /// one entry per row.
    fn segmentations(
        &self,
        fused: &DenseMatrix,
        times: &[f32],
        max_clusters: usize,
    ) -> Result<Vec<Segmentation>, FusionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_at_boundaries() {
        let seg = Segmentation {
            boundaries: vec![0.0, 1.0, 2.5],
            labels: vec![0, 1],
        };
        assert_eq!(seg.label_at(-1.0), 0);
        assert_eq!(seg.label_at(0.5), 0);
        assert_eq!(seg.label_at(1.0), 1);
        assert_eq!(seg.label_at(99.0), 1);
    }
}
