//! Execution backends for the data-parallel steps of a run.
//!
//! The driver expresses every distributed step as "map a pure function over
//! the partitions of a [`PointStore`], then reduce the results on the
//! driver". [`Executor`] captures exactly that contract, so the same engine
//! code runs on a single thread, on a rayon thread pool, or (in principle)
//! over a message-passing cluster.
//!
//! The mapped closure receives an immutable partition slice and shares no
//! mutable state with other partitions; results come back indexed by
//! partition, so reduction on the driver is deterministic regardless of
//! which worker finished first.

pub mod serial;
pub mod threaded;

pub use serial::SerialExecutor;
pub use threaded::ThreadPoolExecutor;

use crate::data::{Point, PointStore};

/// A backend that evaluates a pure function over every partition.
pub trait Executor {
    /// Apply `f` to each partition, returning one result per partition in
    /// partition order. `f` receives the partition index and its points.
    fn map_partitions<T, F>(&self, store: &PointStore, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, &[Point]) -> T + Sync;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PointStore {
        let raw: Vec<Vec<f64>> = (0..17).map(|i| vec![i as f64]).collect();
        PointStore::from_vecs(raw, 4).unwrap()
    }

    #[test]
    fn backends_agree_and_preserve_partition_order() {
        let store = store();
        let count = |_: usize, pts: &[Point]| pts.len();
        let serial = SerialExecutor.map_partitions(&store, count);
        let pooled = ThreadPoolExecutor::new().map_partitions(&store, count);
        assert_eq!(serial, pooled);
        assert_eq!(serial.iter().sum::<usize>(), 17);

        let firsts = ThreadPoolExecutor::new().map_partitions(&store, |idx, pts| {
            (idx, pts.first().map(|p| p.as_slice()[0]))
        });
        for (i, (idx, _)) in firsts.iter().enumerate() {
            assert_eq!(i, *idx);
        }
    }
}
