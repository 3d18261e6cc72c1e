//! Support-vector algorithm drivers.
//!
//! All variants run the same outer loop: pick the pivot support vector,
//! extract the lightest cycle with odd parity against it, emit the cycle,
//! and fold it into the remaining support vectors. They differ only in the
//! extraction subsystem (signed search vs. Horton candidate pool) and in
//! whether the per-vertex work is spread over a communicator.

pub mod distributed;
pub mod signed;
pub mod support;
pub mod trees;

pub use distributed::mcb_sva_distributed;
pub use signed::mcb_sva_signed;
pub use support::SupportVectors;
pub use trees::mcb_sva_trees;

use crate::error::{McbError, McbResult};
use crate::graph::EdgeId;

/// An ordered minimum cycle basis: one sorted edge list per cycle, emitted
/// in iteration order, plus the summed weight.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleBasis {
    /// Emitted cycles in iteration order; each is a sorted edge-id list.
    pub cycles: Vec<Vec<EdgeId>>,
    /// Sum of the emitted cycle weights.
    pub total_weight: f64,
}

impl CycleBasis {
    /// The empty basis of a forest.
    pub fn empty() -> Self {
        Self {
            cycles: Vec::new(),
            total_weight: 0.0,
        }
    }

    /// Number of cycles in the basis.
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Whether the basis is empty.
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Run `f` under the requested worker count: 0 means the library default
/// pool, anything else gets a dedicated pool of that size.
pub(crate) fn with_thread_pool<R, F>(threads: usize, f: F) -> McbResult<R>
where
    R: Send,
    F: FnOnce() -> McbResult<R> + Send,
{
    if threads == 0 {
        return f();
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| McbError::InvalidInput(format!("cannot build thread pool: {e}")))?;
    pool.install(f)
}

/// Reject a total that left the representable range.
pub(crate) fn check_total(total: f64) -> McbResult<f64> {
    if total.is_finite() {
        Ok(total)
    } else {
        Err(McbError::ArithmeticOverflow)
    }
}
