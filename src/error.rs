//! Error types for the similarity fusion engine

use std::fmt;

/// Errors that can occur during similarity fusion or structure analysis
#[derive(Debug, Clone)]
pub enum FusionError {
    /// Invalid input parameters (bad matrix shape, neighbor count too large, etc.)
    InvalidInput(String),

    /// Processing error during fusion or clustering
    ProcessingError(String),

    /// Numerical error (eigendecomposition failure, non-finite values, etc.)
    NumericalError(String),

    /// Computation was cancelled through a [`CancelToken`](crate::fusion::CancelToken)
    Cancelled,
}

impl fmt::Display for FusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FusionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            FusionError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            FusionError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            FusionError::Cancelled => write!(f, "Computation cancelled"),
        }
    }
}

impl std::error::Error for FusionError {}
