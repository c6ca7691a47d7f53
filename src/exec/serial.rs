use crate::data::{Point, PointStore};
use crate::exec::Executor;

/// Runs every partition on the calling thread, in partition order.
///
/// The reference backend: useful for debugging and for checking that the
/// parallel backend produces identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialExecutor;

impl Executor for SerialExecutor {
    fn map_partitions<T, F>(&self, store: &PointStore, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, &[Point]) -> T + Sync,
    {
        (0..store.partition_count())
            .map(|idx| f(idx, store.partition(idx)))
            .collect()
    }
}
