//! Diagnostics and cancellation hooks for the diffusion loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::matrix::DenseMatrix;

/// Observer for per-iteration diffusion state
///
/// Called at the start of every iteration with the current per-view
/// probability matrices, before the sweep updates them. Implementations can
/// render animations or dump intermediate matrices; correctness never
/// depends on the sink.
pub trait DiagnosticsSink {
    /// Observe the state entering iteration `iteration` (0-based)
    fn on_iteration(&mut self, iteration: usize, views: &[DenseMatrix]);
}

/// Default sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl DiagnosticsSink for NoopDiagnostics {
    fn on_iteration(&mut self, _iteration: usize, _views: &[DenseMatrix]) {}
}

/// Cooperative cancellation token for the diffusion loop
///
/// Clones share the same flag. The engine checks the token between
/// iterations only; an in-flight sweep always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, non-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
