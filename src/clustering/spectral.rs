//! Spectral segmentation backend

use crate::clustering::laplacian::random_walk_laplacian_eigs;
use crate::clustering::{Segmentation, SegmentationBackend};
use crate::error::FusionError;
use crate::matrix::{DenseMatrix, MatrixRows};

/// Default segmentation backend: k-means over Laplacian eigenvector
/// coordinates
///
/// For each granularity k, every frame is represented by its first k
/// random-walk Laplacian eigenvector coordinates and clustered with a
/// deterministic k-means (farthest-first seeding, ties broken by lowest
/// index, no randomness). Maximal runs of a constant label become the
/// segmentation intervals.
#[derive(Debug, Clone)]
pub struct SpectralBackend {
    /// Maximum Lloyd iterations per granularity (default: 100)
    pub max_kmeans_iters: usize,
}

impl Default for SpectralBackend {
    fn default() -> Self {
        Self {
            max_kmeans_iters: 100,
        }
    }
}

impl SegmentationBackend for SpectralBackend {
    fn segmentations(
        &self,
        fused: &DenseMatrix,
        times: &[f32],
        max_clusters: usize,
    ) -> Result<Vec<Segmentation>, FusionError> {
        let n = fused.rows();
        if times.len() != n {
            return Err(FusionError::InvalidInput(format!(
                "Got {} frame times for a {}x{} matrix",
                times.len(),
                n,
                n
            )));
        }
        if max_clusters < 2 {
            return Err(FusionError::InvalidInput(format!(
                "max_clusters must be at least 2, got {}",
                max_clusters
            )));
        }

        // One decomposition covers every granularity
        let vecs = random_walk_laplacian_eigs(fused, max_clusters.min(n))?;

        let mut out = Vec::new();
        for k in 2..=max_clusters.min(n) {
            let points: Vec<&[f32]> = (0..n).map(|i| &vecs.row(i)[..k]).collect();
            let labels = kmeans(&points, k, self.max_kmeans_iters);
            out.push(runs_to_segmentation(&labels, times));
        }
        log::debug!(
            "Spectral segmentation at {} granularities over {} frames",
            out.len(),
            n
        );
        Ok(out)
    }
}

/// Deterministic Lloyd k-means with farthest-first seeding
fn kmeans(points: &[&[f32]], k: usize, max_iters: usize) -> Vec<usize> {
    let n = points.len();
    let dims = points[0].len();
    let k = k.min(n);

    // Farthest-first seeding from point 0
    let mut centers: Vec<Vec<f32>> = vec![points[0].to_vec()];
    while centers.len() < k {
        let mut best = 0usize;
        let mut best_dist = -1.0f32;
        for (i, p) in points.iter().enumerate() {
            let d = centers
                .iter()
                .map(|c| sq_dist(p, c))
                .fold(f32::INFINITY, f32::min);
            if d > best_dist {
                best_dist = d;
                best = i;
            }
        }
        centers.push(points[best].to_vec());
    }

    let mut labels = vec![0usize; n];
    for _ in 0..max_iters {
        let mut changed = false;
        for (i, p) in points.iter().enumerate() {
            let mut best = 0usize;
            let mut best_dist = f32::INFINITY;
            for (c, center) in centers.iter().enumerate() {
                let d = sq_dist(p, center);
                if d < best_dist {
                    best_dist = d;
                    best = c;
                }
            }
            if labels[i] != best {
                labels[i] = best;
                changed = true;
            }
        }
        if !changed {
            break;
        }
        let mut counts = vec![0usize; k];
        let mut sums = vec![vec![0.0f32; dims]; k];
        for (i, p) in points.iter().enumerate() {
            counts[labels[i]] += 1;
            for d in 0..dims {
                sums[labels[i]][d] += p[d];
            }
        }
        for c in 0..k {
            // Empty clusters keep their previous center
            if counts[c] > 0 {
                for d in 0..dims {
                    centers[c][d] = sums[c][d] / counts[c] as f32;
                }
            }
        }
    }
    labels
}

fn sq_dist(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Collapse per-frame labels into contiguous intervals
fn runs_to_segmentation(labels: &[usize], times: &[f32]) -> Segmentation {
    let dt = if times.len() > 1 {
        times[times.len() - 1] - times[times.len() - 2]
    } else {
        1.0
    };
    let mut boundaries = vec![times[0]];
    let mut run_labels = Vec::new();
    let mut current = labels[0];
    for i in 1..labels.len() {
        if labels[i] != current {
            boundaries.push(times[i]);
            run_labels.push(current);
            current = labels[i];
        }
    }
    run_labels.push(current);
    boundaries.push(times[times.len() - 1] + dt);
    Segmentation {
        boundaries,
        labels: run_labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmeans_separates_two_clusters() {
        let data = [
            vec![0.0f32, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
        ];
        let points: Vec<&[f32]> = data.iter().map(|v| v.as_slice()).collect();
        let labels = kmeans(&points, 2, 100);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_runs_to_segmentation() {
        let labels = vec![0, 0, 1, 1, 0];
        let times = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let seg = runs_to_segmentation(&labels, &times);
        assert_eq!(seg.labels, vec![0, 1, 0]);
        assert_eq!(seg.boundaries, vec![0.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn test_backend_granularity_count() {
        // Two clean blocks over 6 frames
        let mut w = DenseMatrix::zeros(6, 6);
        for i in 0..6 {
            for j in 0..6 {
                let same = (i < 3) == (j < 3);
                w.set(i, j, if same { 0.9 } else { 0.05 });
            }
        }
        let times: Vec<f32> = (0..6).map(|i| i as f32).collect();
        let backend = SpectralBackend::default();
        let segs = backend.segmentations(&w, &times, 4).unwrap();
        assert_eq!(segs.len(), 3, "granularities 2, 3, 4");
        for seg in &segs {
            assert_eq!(seg.boundaries.len(), seg.labels.len() + 1);
        }
        // At k = 2 the blocks should be separated
        let two = &segs[0];
        assert_ne!(two.label_at(0.0), two.label_at(5.0));
    }

    #[test]
    fn test_backend_rejects_mismatched_times() {
        let w = DenseMatrix::identity(4);
        let backend = SpectralBackend::default();
        assert!(backend.segmentations(&w, &[0.0, 1.0], 3).is_err());
    }
}
