//! Similarity network fusion core
//!
//! The algorithmic heart of the crate, implementing the cross-diffusion
//! approach of Wang et al. (CVPR 2012, Nature Methods 2014) as applied to
//! music structure analysis:
//! - Locally-scaled Gaussian affinity construction
//! - Row-stochastic probability normalization
//! - Sparse k-nearest-neighbor diffusion kernels
//! - The iterative cross-diffusion fixed-point loop

pub mod affinity;
pub mod diagnostics;
pub mod diffusion;
pub mod neighbors;
pub mod probability;

pub use affinity::affinity_from_distances;
pub use diagnostics::{CancelToken, DiagnosticsSink, NoopDiagnostics};
pub use diffusion::{fuse_affinities, fuse_affinities_with, fuse_distances};
pub use neighbors::neighbor_kernel;
pub use probability::to_probability;
