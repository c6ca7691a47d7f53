use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::data::{Point, PointStore};
use crate::engine::assignment::{assign_partition, reduce_partials};
use crate::engine::broadcast::{broadcast, CentroidSet};
use crate::engine::config::KMeansConfig;
use crate::engine::controller::{ControllerState, ConvergenceController};
use crate::engine::seeding::seed_centroids;
use crate::engine::update::update_centroids;
use crate::error::{Error, Result};
use crate::exec::Executor;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Centroid movement reached the tolerance: the result is a fixed
    /// point of Lloyd's update.
    Converged,
    /// The iteration budget or deadline ran out; the result is usable but
    /// not necessarily a fixed point.
    BudgetExhausted,
}

/// Per-iteration diagnostics, emitted in iteration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationMetrics {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Within-cluster sum of squares under the snapshot this iteration's
    /// assignments used. Non-increasing across iterations.
    pub heterogeneity: f64,
    /// Largest Euclidean distance any centroid moved this iteration.
    pub max_displacement: f64,
    /// Number of empty clusters recovered this iteration.
    pub recovered_clusters: usize,
}

/// The single piece of cross-iteration mutable state, owned by the driver
/// and replaced by value once per barrier.
#[derive(Debug, Clone)]
struct ClusteringState {
    iteration: usize,
    centroids: CentroidSet,
    heterogeneity: f64,
}

/// The clustering driver: seeds centroids, then alternates the distributed
/// assignment step with the centroid update until the convergence
/// controller stops the run.
///
/// # Examples
///
/// ```
/// use parlloyd::{KMeans, KMeansConfig, PointStore, SerialExecutor, Termination};
///
/// let store = PointStore::from_vecs(
///     vec![
///         vec![0.0, 0.0],
///         vec![0.2, 0.1],
///         vec![9.9, 10.0],
///         vec![10.1, 9.8],
///     ],
///     2,
/// )
/// .unwrap();
///
/// let fit = KMeans::new(KMeansConfig::new(2).with_seed(7))
///     .fit(&store, &SerialExecutor)
///     .unwrap();
/// assert_eq!(fit.termination, Termination::Converged);
/// assert_eq!(fit.centroids.k(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Run the full clustering loop over `store` on the given backend.
    ///
    /// Each iteration broadcasts an immutable centroid snapshot, maps the
    /// assignment step over all partitions, blocks at the barrier until
    /// every partial aggregate arrived, reduces them, and derives the next
    /// centroid set. Degenerate empty clusters are recovered, never fatal.
    pub fn fit(&self, store: &PointStore, executor: &impl Executor) -> Result<KMeansFit> {
        self.config.validate(store)?;
        let seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let initial = seed_centroids(store, &self.config, &mut rng, executor)?;
        self.run(store, executor, initial)
    }

    /// Run the clustering loop from a caller-supplied centroid set,
    /// skipping the seeding step. The warm start must match `k` and the
    /// store's dimensionality.
    pub fn fit_with(
        &self,
        store: &PointStore,
        executor: &impl Executor,
        initial: CentroidSet,
    ) -> Result<KMeansFit> {
        self.config.validate(store)?;
        if initial.k() != self.config.k {
            return Err(Error::InvalidConfig(format!(
                "warm start supplies {} centroids but k = {}",
                initial.k(),
                self.config.k
            )));
        }
        if initial.dim() != store.dim() {
            return Err(Error::DimensionMismatch {
                expected: store.dim(),
                found: initial.dim(),
            });
        }
        self.run(store, executor, initial)
    }

    fn run(
        &self,
        store: &PointStore,
        executor: &impl Executor,
        initial: CentroidSet,
    ) -> Result<KMeansFit> {
        let mut controller = ConvergenceController::new(
            self.config.tolerance,
            self.config.max_iterations,
            self.config.deadline,
        );
        let mut state = ClusteringState {
            iteration: 0,
            centroids: initial,
            heterogeneity: f64::INFINITY,
        };
        let mut metrics = Vec::new();
        // Persistence is measured from the iteration degeneracy first
        // appears: once a recovery has happened, any later iteration
        // without one breaks the streak.
        let mut saw_recovery = false;
        let mut recovery_uninterrupted = true;

        let final_state = loop {
            let snapshot = broadcast(&state.centroids);
            let partials =
                executor.map_partitions(store, |_, pts| assign_partition(pts, &snapshot));
            // Barrier: every partition has reported before anything is
            // reduced or updated.
            let aggregate = reduce_partials(partials, snapshot.k(), snapshot.dim());

            let outcome = update_centroids(&state.centroids, &aggregate, store, executor);
            let max_displacement = outcome
                .displacements
                .iter()
                .copied()
                .fold(0.0_f64, f64::max);
            let iteration = state.iteration + 1;
            let wcss = aggregate.sq_dist_sum();
            debug!(
                "iteration {iteration}: heterogeneity {wcss:.6}, max displacement {max_displacement:.6}, recovered {}",
                outcome.recovered.len()
            );
            metrics.push(IterationMetrics {
                iteration,
                heterogeneity: wcss,
                max_displacement,
                recovered_clusters: outcome.recovered.len(),
            });
            if outcome.recovered.is_empty() {
                if saw_recovery {
                    recovery_uninterrupted = false;
                }
            } else {
                saw_recovery = true;
            }

            let next = ClusteringState {
                iteration,
                centroids: outcome.centroids,
                heterogeneity: wcss,
            };
            if controller.observe(iteration, max_displacement) != ControllerState::Running {
                break next;
            }
            state = next;
        };
        debug!(
            "run stopped after {} iterations (last in-loop heterogeneity {:.6})",
            final_state.iteration, final_state.heterogeneity
        );

        let termination = match controller.state() {
            ControllerState::Converged => Termination::Converged,
            _ => Termination::BudgetExhausted,
        };
        let persistent_degeneracy =
            termination == Termination::BudgetExhausted && saw_recovery && recovery_uninterrupted;
        if persistent_degeneracy {
            warn!("degenerate clusters recurred in every iteration up to the budget");
        }

        // One more assignment pass against the final centroids gives the
        // reported heterogeneity and cluster sizes for the set the caller
        // actually receives.
        let snapshot = broadcast(&final_state.centroids);
        let partials = executor.map_partitions(store, |_, pts| assign_partition(pts, &snapshot));
        let final_aggregate = reduce_partials(partials, snapshot.k(), snapshot.dim());

        Ok(KMeansFit {
            centroids: final_state.centroids,
            termination,
            iterations: final_state.iteration,
            heterogeneity: final_aggregate.sq_dist_sum(),
            cluster_sizes: final_aggregate.counts().to_vec(),
            metrics,
            persistent_degeneracy,
        })
    }
}

/// Everything a finished run reports.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Final centroid set, ids stable since seeding.
    pub centroids: CentroidSet,
    /// Whether the run hit a fixed point or a budget cutoff.
    pub termination: Termination,
    /// Number of Lloyd iterations executed.
    pub iterations: usize,
    /// Within-cluster sum of squares under the final centroids.
    pub heterogeneity: f64,
    /// Points assigned to each centroid under the final centroids.
    pub cluster_sizes: Vec<u64>,
    /// Per-iteration diagnostics for convergence monitoring.
    pub metrics: Vec<IterationMetrics>,
    /// True when a degenerate cluster appeared and recovery recurred in
    /// every subsequent iteration up to an exhausted budget.
    pub persistent_degeneracy: bool,
}

impl KMeansFit {
    /// A lazily-produced, restartable view of `(point index, centroid id)`
    /// pairs over `store`. Nothing is materialized unless the caller
    /// collects; calling [`Assignments::iter`] again restarts from the
    /// first point.
    pub fn assignments<'a>(&'a self, store: &'a PointStore) -> Result<Assignments<'a>> {
        if store.dim() != self.centroids.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.centroids.dim(),
                found: store.dim(),
            });
        }
        Ok(Assignments {
            store,
            centroids: &self.centroids,
        })
    }

    /// Nearest-centroid id for a single point.
    pub fn predict(&self, point: &Point) -> Result<usize> {
        if point.dim() != self.centroids.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.centroids.dim(),
                found: point.dim(),
            });
        }
        Ok(self.centroids.nearest(point.as_slice()).0)
    }
}

/// Restartable assignment sequence produced by [`KMeansFit::assignments`].
#[derive(Debug, Clone, Copy)]
pub struct Assignments<'a> {
    store: &'a PointStore,
    centroids: &'a CentroidSet,
}

impl<'a> Assignments<'a> {
    /// Iterate `(point index, centroid id)` pairs in global point order.
    /// Each call starts over from the first point.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        let centroids = self.centroids;
        self.store
            .points()
            .iter()
            .enumerate()
            .map(move |(idx, p)| (idx, centroids.nearest(p.as_slice()).0))
    }

    /// Number of points the sequence will yield.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
