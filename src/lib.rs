//! # Fusion DSP
//!
//! A similarity network fusion engine for music structure analysis,
//! fusing per-feature self-similarity matrices into one consensus matrix
//! and deriving a low-dimensional structure descriptor per frame.
//!
//! ## Features
//!
//! - **Affinity construction**: locally-scaled Gaussian kernels with
//!   adaptive per-pair bandwidths
//! - **Cross-diffusion**: iterative fusion of multiple feature views
//!   through sparse k-nearest-neighbor kernels
//! - **Graph export**: downsampled nearest-neighbor graphs for
//!   force-directed visualization
//! - **Structure embedding**: multi-scale spectral segmentation of the
//!   fused matrix, reduced by an SVD of the meet matrix
//!
//! ## Quick Start
//!
//! ```
//! use fusion_dsp::{fuse_distances, DenseMatrix, FusionConfig};
//!
//! // Two feature views over 4 frames: two clear 2-frame sections
//! let d = DenseMatrix::from_rows(&[
//!     vec![0.0, 0.1, 5.0, 5.0],
//!     vec![0.1, 0.0, 5.0, 5.0],
//!     vec![5.0, 5.0, 0.0, 0.1],
//!     vec![5.0, 5.0, 0.1, 0.0],
//! ])?;
//! let cfg = FusionConfig { k: 1, niters: 5, ..FusionConfig::default() };
//!
//! let (affinities, fused) = fuse_distances(&[d.clone(), d], &cfg)?;
//! assert_eq!(affinities.len(), 2);
//! assert!(fused.get(0, 1) > fused.get(0, 2)); // section structure survives
//! # Ok::<(), fusion_dsp::FusionError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline follows this flow:
//!
//! ```text
//! Distance matrices → Affinities → {Probability, Neighbor kernels}
//!     → Cross-diffusion → Fused matrix → Graph export / Structure embedding
//! ```
//!
//! The whole pipeline is synchronous batch computation; the only
//! concurrency is the per-view update inside one diffusion sweep, which is
//! safe because every view reads the same immutable snapshot.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clustering;
pub mod config;
pub mod embedding;
pub mod error;
pub mod fusion;
pub mod graph;
pub mod matrix;

// Re-export main types
pub use config::{FusionConfig, StructureConfig};
pub use embedding::{structure_features, structure_features_with};
pub use error::FusionError;
pub use fusion::{
    affinity_from_distances, fuse_affinities, fuse_affinities_with, fuse_distances,
    neighbor_kernel, to_probability, CancelToken, DiagnosticsSink, NoopDiagnostics,
};
pub use graph::{neighbor_graph, NeighborGraph};
pub use matrix::{DenseMatrix, MatrixRows, SparseMatrix};
