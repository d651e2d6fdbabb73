//! Structural embedding orchestration
//!
//! Turns three time-aligned feature streams (chroma, MFCC, tempogram) into
//! a low-dimensional per-frame structure descriptor:
//! synchronization → delay embedding → distance matrices → similarity
//! network fusion → multi-scale segmentation → meet-matrix SVD →
//! resampling to the caller's output timeline.

pub mod delay;
pub mod resample;
pub mod sync;

pub use sync::SyncedFeatures;

use nalgebra::DMatrix;

use crate::clustering::{meet_matrix, SegmentationBackend, SpectralBackend};
use crate::config::{FusionConfig, StructureConfig};
use crate::embedding::delay::{cosine_distances, delay_embed, euclidean_distances, pad_to_min};
use crate::embedding::resample::interp_linear;
use crate::embedding::sync::synchronize;
use crate::error::FusionError;
use crate::fusion::{affinity_from_distances, fuse_affinities};
use crate::matrix::{DenseMatrix, MatrixRows};

/// Compute a per-frame structure descriptor with the default spectral
/// segmentation backend
///
/// See [`structure_features_with`] for the full contract.
#[allow(clippy::too_many_arguments)]
pub fn structure_features(
    chroma: &[Vec<f32>],
    mfcc: &[Vec<f32>],
    tempogram: &[Vec<f32>],
    hop_length: usize,
    n_samples: usize,
    sample_rate: u32,
    final_times: &[f32],
    cfg: &StructureConfig,
) -> Result<Vec<Vec<f32>>, FusionError> {
    structure_features_with(
        chroma,
        mfcc,
        tempogram,
        hop_length,
        n_samples,
        sample_rate,
        final_times,
        cfg,
        &SpectralBackend::default(),
    )
}

/// Compute a per-frame structure descriptor
///
/// # Arguments
///
/// * `chroma`, `mfcc`, `tempogram` - Frame-major feature streams over a
///   common hop grid; frame counts may differ and are truncated to the
///   minimum
/// * `hop_length` - Samples between consecutive feature frames
/// * `n_samples` - Raw audio length in samples
/// * `sample_rate` - Sample rate in Hz
/// * `final_times` - Output timestamps in seconds; the descriptor is
///   resampled onto these
/// * `cfg` - Structure analysis parameters
/// * `backend` - Segmentation provider for the multi-scale clustering
///   stage
///
/// # Returns
///
/// A `final_times.len()` × `cfg.ndim` descriptor matrix as row vectors.
///
/// # Errors
///
/// Returns `InvalidInput` if the audio is shorter than one synchronization
/// window or the features are malformed, and propagates backend and
/// numerical errors from the clustering and SVD stages. Tracks with fewer
/// synchronized frames than the diffusion stage needs are not an error:
/// their distance matrices are silently zero-padded to 2k×2k.
#[allow(clippy::too_many_arguments)]
pub fn structure_features_with(
    chroma: &[Vec<f32>],
    mfcc: &[Vec<f32>],
    tempogram: &[Vec<f32>],
    hop_length: usize,
    n_samples: usize,
    sample_rate: u32,
    final_times: &[f32],
    cfg: &StructureConfig,
    backend: &dyn SegmentationBackend,
) -> Result<Vec<Vec<f32>>, FusionError> {
    // Step 1: synchronize features onto a coarse interval grid
    let synced = synchronize(
        chroma,
        mfcc,
        tempogram,
        hop_length,
        n_samples,
        sample_rate,
        cfg.win_fac,
        cfg.wins_per_block,
    )?;

    // Step 2: delay embedding and per-feature distance matrices
    let x_chroma = delay_embed(&synced.chroma, cfg.wins_per_block);
    let x_mfcc = delay_embed(&synced.mfcc, cfg.wins_per_block);
    let x_tempogram = delay_embed(&synced.tempogram, cfg.wins_per_block);
    let ds = [
        euclidean_distances(&x_mfcc),
        cosine_distances(&x_chroma),
        euclidean_distances(&x_tempogram),
    ];

    // Step 3: zero-pad degenerate tracks so the neighbor preconditions of
    // the diffusion stage stay satisfiable, then fuse
    let min_size = 2 * cfg.k;
    let ds: Vec<DenseMatrix> = ds.iter().map(|d| pad_to_min(d, min_size)).collect();
    let n_fused = ds[0].rows();

    let fusion_cfg = FusionConfig {
        k: cfg.k,
        niters: cfg.niters,
        reg_diag: cfg.reg_diag,
        reg_neighbs: cfg.reg_neighbs,
        ..FusionConfig::default()
    };
    let ws = ds
        .iter()
        .map(|d| affinity_from_distances(d, fusion_cfg.k, fusion_cfg.mu))
        .collect::<Result<Vec<_>, _>>()?;
    let fused = fuse_affinities(&ws, &fusion_cfg)?;

    // Zero-padding may have appended frames past the synchronized grid;
    // extend the timeline at the same rate for the clustering stage
    let mut times = synced.times.clone();
    let dt = if times.len() > 1 {
        times[times.len() - 1] - times[times.len() - 2]
    } else {
        cfg.meet_interval
    };
    while times.len() < n_fused {
        times.push(times.last().copied().unwrap_or(0.0) + dt);
    }

    // Step 4: multi-scale segmentation and the meet matrix
    let segmentations = backend.segmentations(&fused, &times, cfg.neigs)?;
    let meet = meet_matrix(&segmentations, cfg.meet_interval)?;

    // Step 5: SVD of the meet matrix, keeping ndim scaled singular vectors
    let n = meet.rows();
    let mat = DMatrix::<f32>::from_fn(n, n, |i, j| meet.get(i, j));
    let svd = mat.svd(true, false);
    let u = svd.u.ok_or_else(|| {
        FusionError::NumericalError("SVD of meet matrix failed to produce U".to_string())
    })?;
    let ndim_eff = cfg.ndim.min(u.ncols());

    // Step 6: resample each descriptor dimension onto the output timeline
    let grid_times: Vec<f32> = (0..n).map(|i| i as f32 * cfg.meet_interval).collect();
    let mut out = vec![vec![0.0f32; cfg.ndim]; final_times.len()];
    for d in 0..ndim_eff {
        let column: Vec<f32> = (0..n)
            .map(|i| u[(i, d)] * svd.singular_values[d])
            .collect();
        let resampled = interp_linear(&grid_times, &column, final_times);
        for (row, v) in out.iter_mut().zip(resampled) {
            row[d] = v;
        }
    }
    log::debug!(
        "Structure embedding: {} output frames x {} dims (meet grid {})",
        final_times.len(),
        cfg.ndim,
        n
    );
    Ok(out)
}
