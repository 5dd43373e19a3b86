//! Slice runners
//!
//! A [`SliceRunner`] takes `count` independent tasks, indexed `0..count`, and
//! returns their results in index order, or the first error. The apply
//! engine only ever talks to this trait, so the worker pool can be swapped
//! for an inline runner in tests or single-threaded hosts.
//!
//! # Examples
//!
//! ```
//! use tenlab_exec::{ApplyHints, RayonRunner, SliceRunner};
//!
//! let runner = RayonRunner::new(&ApplyHints::new().with_max_parallelism(2)).unwrap();
//! let squares = runner.run(5, |i| Ok(i * i)).unwrap();
//! assert_eq!(squares, vec![0, 1, 4, 9, 16]);
//! ```

use crate::hints::ApplyHints;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tenlab_core::{LabelError, LabelResult};

/// Runs a batch of indexed tasks and collects their results in index order.
pub trait SliceRunner: Send + Sync {
    /// Run `task(0) .. task(count - 1)`.
    ///
    /// Results are returned in index order regardless of completion order.
    /// The first error aborts the batch; results of the other tasks are
    /// discarded.
    fn run<R, F>(&self, count: usize, task: F) -> LabelResult<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> LabelResult<R> + Send + Sync;

    /// Upper bound on tasks running at once
    fn parallelism(&self) -> usize;
}

/// Runs every task inline on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialRunner;

impl SliceRunner for SequentialRunner {
    fn run<R, F>(&self, count: usize, task: F) -> LabelResult<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> LabelResult<R> + Send + Sync,
    {
        (0..count).map(task).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }
}

/// Fork-join runner backed by a dedicated rayon thread pool.
///
/// The pool is built once and reused for every batch. Batches smaller than
/// [`ApplyHints::min_parallel_slices`] run inline.
#[derive(Debug)]
pub struct RayonRunner {
    pool: ThreadPool,
    min_parallel_slices: usize,
}

impl RayonRunner {
    /// Build the worker pool described by `hints`.
    ///
    /// # Errors
    ///
    /// [`LabelError::WorkerPool`] if `max_parallelism` is zero or the pool
    /// cannot be created.
    pub fn new(hints: &ApplyHints) -> LabelResult<Self> {
        let mut builder =
            ThreadPoolBuilder::new().thread_name(|i| format!("tenlab-slice-{}", i));
        if let Some(workers) = hints.max_parallelism {
            if workers == 0 {
                return Err(LabelError::WorkerPool(
                    "max_parallelism must be at least 1".to_string(),
                ));
            }
            builder = builder.num_threads(workers);
        }
        let pool = builder
            .build()
            .map_err(|e| LabelError::WorkerPool(e.to_string()))?;
        tracing::debug!(workers = pool.current_num_threads(), "worker pool ready");
        Ok(Self {
            pool,
            min_parallel_slices: hints.min_parallel_slices,
        })
    }
}

impl SliceRunner for RayonRunner {
    fn run<R, F>(&self, count: usize, task: F) -> LabelResult<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> LabelResult<R> + Send + Sync,
    {
        if count < self.min_parallel_slices {
            return (0..count).map(task).collect();
        }
        // indexed collect keeps results in task order
        self.pool
            .install(|| (0..count).into_par_iter().map(&task).collect())
    }

    fn parallelism(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_sequential_order_and_error() {
        let ok = SequentialRunner.run(3, |i| Ok(i + 1)).unwrap();
        assert_eq!(ok, vec![1, 2, 3]);
        let err = SequentialRunner
            .run(3, |i| {
                if i == 1 {
                    Err(LabelError::UnfittedModel)
                } else {
                    Ok(i)
                }
            })
            .unwrap_err();
        assert!(matches!(err, LabelError::UnfittedModel));
    }

    #[test]
    fn test_rayon_keeps_index_order_under_skewed_latency() {
        let runner = RayonRunner::new(&ApplyHints::new().with_max_parallelism(4)).unwrap();
        let out = runner
            .run(8, |i| {
                // later tasks finish first
                thread::sleep(Duration::from_millis((8 - i as u64) * 3));
                Ok(i)
            })
            .unwrap();
        assert_eq!(out, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_rayon_bounds_worker_count() {
        let runner = RayonRunner::new(&ApplyHints::new().with_max_parallelism(2)).unwrap();
        assert_eq!(runner.parallelism(), 2);
        let names = Mutex::new(HashSet::new());
        runner
            .run(16, |_| {
                let name = thread::current().name().map(str::to_string);
                names.lock().unwrap().insert(name);
                thread::sleep(Duration::from_millis(1));
                Ok(())
            })
            .unwrap();
        let names = names.into_inner().unwrap();
        assert!(names.len() <= 2);
        assert!(names
            .iter()
            .all(|n| n.as_deref().is_some_and(|n| n.starts_with("tenlab-slice-"))));
    }

    #[test]
    fn test_rayon_propagates_error() {
        let runner = RayonRunner::new(&ApplyHints::new().with_max_parallelism(3)).unwrap();
        let err = runner
            .run(10, |i| {
                if i == 7 {
                    Err(LabelError::WorkerPool("boom".to_string()))
                } else {
                    Ok(i)
                }
            })
            .unwrap_err();
        assert!(matches!(err, LabelError::WorkerPool(_)));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = RayonRunner::new(&ApplyHints::new().with_max_parallelism(0)).unwrap_err();
        assert!(matches!(err, LabelError::WorkerPool(_)));
    }

    #[test]
    fn test_small_batches_run_inline() {
        let runner = RayonRunner::new(&ApplyHints::new().with_min_parallel_slices(4)).unwrap();
        let caller = thread::current().id();
        let ids = runner.run(3, |_| Ok(thread::current().id())).unwrap();
        assert!(ids.iter().all(|id| *id == caller));
    }
}
