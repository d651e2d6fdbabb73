//! Iterative cross-diffusion of multiple similarity views
//!
//! Each view's probability matrix is repeatedly replaced by the consensus
//! of the *other* views, projected through the view's own sparse neighbor
//! kernel. Signal shared across views survives the projection and is
//! amplified; view-specific noise falls outside the mutual neighbor
//! structure and is damped.

use rayon::prelude::*;

use crate::config::FusionConfig;
use crate::error::FusionError;
use crate::fusion::affinity::affinity_from_distances;
use crate::fusion::diagnostics::{CancelToken, DiagnosticsSink, NoopDiagnostics};
use crate::fusion::neighbors::neighbor_kernel;
use crate::fusion::probability::to_probability;
use crate::matrix::{DenseMatrix, MatrixRows, SparseMatrix};

/// Fuse affinity matrices from multiple feature views into one similarity
/// matrix
///
/// Convenience form of [`fuse_affinities_with`] with no diagnostics sink
/// and no cancellation.
pub fn fuse_affinities(
    ws: &[DenseMatrix],
    cfg: &FusionConfig,
) -> Result<DenseMatrix, FusionError> {
    fuse_affinities_with(ws, cfg, &mut NoopDiagnostics, None)
}

/// Fuse affinity matrices with a diagnostics sink and optional cancellation
///
/// # Arguments
///
/// * `ws` - One affinity matrix per feature view; at least 2, all N×N
/// * `cfg` - Fusion parameters (`k`, `niters`, `reg_diag`, `reg_neighbs`)
/// * `sink` - Observer called once per iteration with the current state
/// * `cancel` - Checked between iterations; a cancelled token aborts with
///   [`FusionError::Cancelled`]
///
/// # Algorithm
///
/// Initialization computes, once per view, a plain row-stochastic matrix
/// `P` and a sparse K-neighbor kernel `S`. Every iteration then performs a
/// synchronous sweep: each view's next state is the mean of the *other*
/// views' previous states, projected as `S·avg·Sᵀ`, plus `reg_diag` on the
/// diagonal and `reg_neighbs` on the two one-off-diagonal bands. All views
/// update from the same snapshot and the state is swapped wholesale, so no
/// view ever observes a same-iteration update. The regularizers are added
/// after the projection; row sums can drift above 1 over iterations, which
/// is preserved behavior.
///
/// With `niters = 0` the result is simply the mean of the initial
/// probability matrices.
///
/// # Errors
///
/// Returns `InvalidInput` if fewer than two views are given or the views
/// are not square matrices of a common size.
pub fn fuse_affinities_with(
    ws: &[DenseMatrix],
    cfg: &FusionConfig,
    sink: &mut dyn DiagnosticsSink,
    cancel: Option<&CancelToken>,
) -> Result<DenseMatrix, FusionError> {
    let m = ws.len();
    if m < 2 {
        return Err(FusionError::InvalidInput(format!(
            "Fusion needs at least 2 views, got {}",
            m
        )));
    }
    let n = ws[0].rows();
    for (v, w) in ws.iter().enumerate() {
        if !w.is_square() || w.rows() != n {
            return Err(FusionError::InvalidInput(format!(
                "View {} is {}x{}, expected {}x{}",
                v,
                w.rows(),
                w.cols(),
                n,
                n
            )));
        }
    }

    // Dense probability matrices and sparse neighbor kernels are computed
    // once and stay fixed across all iterations.
    let mut pts: Vec<DenseMatrix> = ws.iter().map(|w| to_probability(w, false)).collect();
    let kernels: Vec<SparseMatrix> = ws.iter().map(|w| neighbor_kernel(w, cfg.k)).collect();

    log::debug!(
        "Cross-diffusion: {} views of {}x{}, k = {}, {} iterations",
        m,
        n,
        n,
        cfg.k,
        cfg.niters
    );

    for iteration in 0..cfg.niters {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                log::debug!("Cross-diffusion cancelled before iteration {}", iteration);
                return Err(FusionError::Cancelled);
            }
        }
        sink.on_iteration(iteration, &pts);

        // Synchronous sweep: every view reads only the shared snapshot, so
        // the per-view updates are independent and safe to parallelize.
        let next: Vec<DenseMatrix> = (0..m)
            .into_par_iter()
            .map(|i| update_view(i, &pts, &kernels[i], cfg))
            .collect();
        pts = next;
    }

    let mut fused = DenseMatrix::zeros(n, n);
    for p in &pts {
        fused.add_assign(p);
    }
    fused.scale(1.0 / m as f32);
    Ok(fused)
}

/// One view's update within a sweep, reading only the previous snapshot
fn update_view(
    i: usize,
    pts: &[DenseMatrix],
    kernel: &SparseMatrix,
    cfg: &FusionConfig,
) -> DenseMatrix {
    let m = pts.len();
    let n = pts[0].rows();

    // Cross-view consensus, excluding this view
    let mut avg = DenseMatrix::zeros(n, n);
    for (k, p) in pts.iter().enumerate() {
        if k != i {
            avg.add_assign(p);
        }
    }
    avg.scale(1.0 / (m - 1) as f32);

    let mut next = kernel.project(&avg);

    if cfg.reg_diag > 0.0 {
        for j in 0..n {
            next.add_at(j, j, cfg.reg_diag);
        }
    }
    if cfg.reg_neighbs > 0.0 {
        for j in 0..n.saturating_sub(1) {
            next.add_at(j, j + 1, cfg.reg_neighbs);
            next.add_at(j + 1, j, cfg.reg_neighbs);
        }
    }
    next
}

/// Fuse raw distance matrices, building the per-view affinities first
///
/// Returns both the per-view affinity matrices and the fused similarity
/// matrix, mirroring the two-stage pipeline callers usually want to
/// inspect.
pub fn fuse_distances(
    ds: &[DenseMatrix],
    cfg: &FusionConfig,
) -> Result<(Vec<DenseMatrix>, DenseMatrix), FusionError> {
    let ws = ds
        .iter()
        .map(|d| affinity_from_distances(d, cfg.k, cfg.mu))
        .collect::<Result<Vec<_>, _>>()?;
    let fused = fuse_affinities(&ws, cfg)?;
    Ok((ws, fused))
}
