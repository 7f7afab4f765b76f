//! Cooperative cancellation.
//!
//! Filtration size grows combinatorially with the homology dimension, so long
//! runs check a shared flag at stage boundaries: between simplex-dimension
//! passes, before the reduction, and between per-dimension metric solves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, TdaError};

/// Cloneable flag shared between a caller and running pipelines.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Running stages stop at their next checkpoint.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns `Err(Cancelled)` once cancellation has been requested.
    pub fn checkpoint(&self, stage: &'static str) -> Result<()> {
        if self.is_cancelled() {
            tracing::debug!(stage, "cancellation observed");
            Err(TdaError::Cancelled { stage })
        } else {
            Ok(())
        }
    }
}
