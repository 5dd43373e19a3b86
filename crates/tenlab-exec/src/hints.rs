//! Execution hints and configuration

/// Hints controlling how [`ApplyEngine`](crate::ApplyEngine) dispatches slices
///
/// # Examples
///
/// ```
/// use tenlab_exec::ApplyHints;
///
/// let hints = ApplyHints::new()
///     .with_max_parallelism(4)
///     .with_min_parallel_slices(8);
/// assert_eq!(hints.max_parallelism, Some(4));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyHints {
    /// Upper bound on worker threads for the innermost axis (None = all cores)
    pub max_parallelism: Option<usize>,
    /// Levels with fewer slices than this run inline on the calling thread
    pub min_parallel_slices: usize,
}

impl Default for ApplyHints {
    fn default() -> Self {
        Self {
            max_parallelism: None,
            min_parallel_slices: 2,
        }
    }
}

impl ApplyHints {
    /// Create new hints with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the worker pool size
    pub fn with_max_parallelism(mut self, workers: usize) -> Self {
        self.max_parallelism = Some(workers);
        self
    }

    /// Use every available core
    pub fn with_all_cores(mut self) -> Self {
        self.max_parallelism = None;
        self
    }

    /// Set the smallest level size that is dispatched to the pool
    pub fn with_min_parallel_slices(mut self, slices: usize) -> Self {
        self.min_parallel_slices = slices;
        self
    }
}
