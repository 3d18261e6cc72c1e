//! Configuration settings for the cycle basis drivers.

/// Settings shared by all solver variants.
#[derive(Debug, Clone)]
pub struct McbSettings {
    /// Worker thread count for intra-process parallelism.
    /// 0 uses the library default (one worker per available core).
    pub threads: usize,

    /// Pre-sort the Horton candidate pool by lower-bound weight.
    ///
    /// In sorted mode the first candidate that survives reconstruction is
    /// the minimum, so each iteration of the trees driver can stop at the
    /// first hit instead of scanning the whole pool.
    pub sorted_candidates: bool,

    /// Log a progress line every this many iterations of the outer loop.
    /// 0 disables progress logging.
    pub progress_interval: usize,
}

impl Default for McbSettings {
    fn default() -> Self {
        Self {
            threads: 0,
            sorted_candidates: true,
            progress_interval: 250,
        }
    }
}
