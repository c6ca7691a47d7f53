use rayon::prelude::*;

use crate::data::{Point, PointStore};
use crate::exec::Executor;

/// Runs partitions in parallel on the global rayon thread pool.
///
/// Results are collected in partition order, so the driver observes the
/// same sequence whichever worker finishes first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPoolExecutor;

impl ThreadPoolExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for ThreadPoolExecutor {
    fn map_partitions<T, F>(&self, store: &PointStore, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, &[Point]) -> T + Sync,
    {
        (0..store.partition_count())
            .into_par_iter()
            .map(|idx| f(idx, store.partition(idx)))
            .collect()
    }
}
