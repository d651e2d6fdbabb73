//! Configuration parameters for similarity fusion and structure analysis

/// Cross-diffusion fusion parameters
///
/// Defaults match the canonical similarity network fusion setup:
/// 5 nearest neighbors, 20 iterations, identity regularization 1.0 and
/// temporal-adjacency regularization 0.5.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// Number of nearest neighbors for the sparse diffusion kernel (default: 5)
    pub k: usize,

    /// Number of cross-diffusion iterations (default: 20)
    ///
    /// The iteration count is fixed; there is no convergence test.
    pub niters: usize,

    /// Identity regularization added after each bilateral projection (default: 1.0)
    ///
    /// Restores the self-similarity mass lost when projecting onto the
    /// sparse neighbor kernel.
    pub reg_diag: f32,

    /// Regularization added to the two one-off-diagonal bands each iteration
    /// (default: 0.5)
    ///
    /// Promotes similarity between temporally adjacent frames.
    pub reg_neighbs: f32,

    /// Local scale multiplier for the Gaussian affinity kernel (default: 0.5)
    pub mu: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            k: 5,
            niters: 20,
            reg_diag: 1.0,
            reg_neighbs: 0.5,
            mu: 0.5,
        }
    }
}

/// Structural embedding parameters
///
/// Controls feature synchronization, delay embedding, the fusion stage and
/// the multi-scale clustering stage of
/// [`structure_features`](crate::embedding::structure_features).
#[derive(Debug, Clone)]
pub struct StructureConfig {
    /// Number of hops aggregated into one synchronized interval (default: 10)
    pub win_fac: usize,

    /// Number of synchronized frames stacked per delay-embedding vector
    /// (default: 20)
    pub wins_per_block: usize,

    /// Nearest neighbor count for affinity construction and diffusion
    /// (default: 3)
    pub k: usize,

    /// Cross-diffusion iterations for the fusion stage (default: 10)
    pub niters: usize,

    /// Identity regularization for the fusion stage (default: 1.0)
    pub reg_diag: f32,

    /// Temporal-adjacency regularization for the fusion stage (default: 0.0)
    pub reg_neighbs: f32,

    /// Largest cluster count for multi-scale segmentation; granularities
    /// 2..=neigs are clustered (default: 10)
    pub neigs: usize,

    /// Number of descriptor dimensions kept from the meet-matrix SVD
    /// (default: 12)
    pub ndim: usize,

    /// Time resolution in seconds of the meet-matrix grid (default: 0.25)
    pub meet_interval: f32,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            win_fac: 10,
            wins_per_block: 20,
            k: 3,
            niters: 10,
            reg_diag: 1.0,
            reg_neighbs: 0.0,
            neigs: 10,
            ndim: 12,
            meet_interval: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fusion_defaults() {
        let cfg = FusionConfig::default();
        assert_eq!(cfg.k, 5);
        assert_eq!(cfg.niters, 20);
        assert!((cfg.reg_diag - 1.0).abs() < 1e-6);
        assert!((cfg.reg_neighbs - 0.5).abs() < 1e-6);
        assert!((cfg.mu - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_structure_defaults() {
        let cfg = StructureConfig::default();
        assert_eq!(cfg.win_fac, 10);
        assert_eq!(cfg.wins_per_block, 20);
        assert_eq!(cfg.k, 3);
        assert_eq!(cfg.niters, 10);
        assert_eq!(cfg.neigs, 10);
        assert_eq!(cfg.ndim, 12);
        assert!((cfg.reg_neighbs - 0.0).abs() < 1e-6);
    }
}
