pub mod assignment;
pub mod broadcast;
pub mod config;
pub mod controller;
pub mod driver;
pub mod heterogeneity;
pub mod seeding;
pub mod update;

pub use assignment::{assign_partition, reduce_partials, PartialAggregate};
pub use broadcast::{broadcast, CentroidSet, CentroidSnapshot};
pub use config::{KMeansConfig, Seeding};
pub use controller::{ControllerState, ConvergenceController};
pub use driver::{Assignments, IterationMetrics, KMeans, KMeansFit, Termination};
pub use heterogeneity::{elbow_sweep, heterogeneity};
pub use seeding::seed_centroids;
pub use update::{update_centroids, UpdateOutcome};
