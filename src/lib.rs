//! Partitioned, data-parallel k-means.
//!
//! `parlloyd` runs Lloyd's algorithm over a dataset split into immutable
//! partitions: a driver broadcasts a centroid snapshot, every partition
//! assigns its points and emits a partial aggregate, and the driver reduces
//! those into the next centroid set until the convergence controller stops
//! the run. Seeding is k-means++ by default, with uniform sampling as an
//! alternative. Execution backends are pluggable through [`exec::Executor`];
//! a serial backend and a rayon thread-pool backend ship with the crate.

pub mod data;
pub mod engine;
pub mod error;
pub mod exec;

pub use data::{gaussian_blobs, Point, PointStore};
pub use engine::{
    elbow_sweep, heterogeneity, Assignments, CentroidSet, IterationMetrics, KMeans, KMeansConfig,
    KMeansFit, Seeding, Termination,
};
pub use error::{Error, Result};
pub use exec::{Executor, SerialExecutor, ThreadPoolExecutor};
