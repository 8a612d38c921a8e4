//! Fork-join coordinator for graph construction.
//!
//! Both graph builds fill one adjacency row per point. The point range is cut
//! once into contiguous slices, each worker gets its slice of ids plus the
//! matching `&mut` slice of pre-sized storage, and the caller blocks until all
//! of them join. Workers never share a write location, so the parallel phase
//! takes no locks.
//!
//! Partition boundaries depend only on `(len, workers)`, and each row is a pure
//! function of its point, so the built graph is the same for any worker count.

use std::ops::Range;

use rayon::ThreadPoolBuilder;

use crate::error::Result;

/// Workers used when a configuration does not say otherwise.
pub const DEFAULT_WORKERS: usize = 4;

/// Split `0..len` into `parts` contiguous ranges of `len / parts` items.
///
/// The last range absorbs the remainder. When `len < parts` the leading ranges
/// are empty. `parts == 0` is treated as one part.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let base = len / parts;
    (0..parts)
        .map(|i| {
            let start = i * base;
            let end = if i == parts - 1 { len } else { start + base };
            start..end
        })
        .collect()
}

/// A fixed number of build workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl WorkerPool {
    /// Pool with `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `f` once per partition of `slots`, in parallel, and wait for all.
    ///
    /// `f` receives the id range it owns and the slice of `slots` covering
    /// exactly that range. Returns the per-partition results in partition
    /// order.
    ///
    /// Fails only if the worker threads cannot be started, in which case no
    /// slot has been written.
    pub fn fork_join<T, R, F>(&self, slots: &mut [T], f: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(Range<usize>, &mut [T]) -> R + Sync,
    {
        let ranges = partition(slots.len(), self.workers);
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("navgraph-build-{i}"))
            .build()?;

        tracing::debug!(
            workers = self.workers,
            items = slots.len(),
            "forking build workers"
        );

        let mut results: Vec<Option<R>> = ranges.iter().map(|_| None).collect();
        let f = &f;
        pool.scope(|scope| {
            let mut rest = slots;
            for (range, result) in ranges.iter().cloned().zip(results.iter_mut()) {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                scope.spawn(move |_| {
                    *result = Some(f(range, chunk));
                });
            }
        });

        // A panicking worker re-panics out of `scope`, so every slot is filled here.
        Ok(results.into_iter().flatten().collect())
    }
}
