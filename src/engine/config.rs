use std::time::Instant;

use crate::data::PointStore;
use crate::error::{Error, Result};

/// Strategy used to choose the initial centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seeding {
    /// Sample k distinct point locations uniformly at random.
    Uniform,
    /// k-means++: each new centroid is sampled with probability
    /// proportional to its squared distance from the centroids chosen so
    /// far.
    #[default]
    KMeansPlusPlus,
}

/// Configuration options for a clustering run.
///
/// # Examples
///
/// ```
/// use parlloyd::KMeansConfig;
///
/// let config = KMeansConfig::new(4)
///     .with_max_iterations(50)
///     .with_tolerance(1e-4)
///     .with_seed(42);
/// assert_eq!(config.k, 4);
/// ```
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters to find.
    pub k: usize,
    /// Maximum number of Lloyd iterations.
    pub max_iterations: usize,
    /// Converged once the largest centroid displacement is at or below
    /// this value.
    pub tolerance: f64,
    /// Seed for the run's RNG. `None` draws a seed from entropy.
    pub seed: Option<u64>,
    /// Initial centroid selection strategy.
    pub seeding: Seeding,
    /// Optional wall-clock cutoff, checked only at the iteration barrier.
    pub deadline: Option<Instant>,
}

impl KMeansConfig {
    /// Create a config with default values for max_iterations (300) and
    /// tolerance (1e-4).
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 300,
            tolerance: 1e-4,
            seed: None,
            seeding: Seeding::default(),
            deadline: None,
        }
    }

    /// Customize the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Customize the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Fix the RNG seed for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose the seeding strategy.
    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Set a wall-clock deadline for the run.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Validate the configuration against a dataset. Runs are refused
    /// before any work starts.
    pub fn validate(&self, store: &PointStore) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be at least 1".into()));
        }
        if self.k > store.len() {
            return Err(Error::InvalidConfig(format!(
                "k = {} exceeds the {} points in the dataset",
                self.k,
                store.len()
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidConfig(
                "tolerance must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(n: usize) -> PointStore {
        PointStore::from_vecs((0..n).map(|i| vec![i as f64]).collect(), 2).unwrap()
    }

    #[test]
    fn rejects_invalid_parameters() {
        let s = store(5);
        assert!(KMeansConfig::new(0).validate(&s).is_err());
        assert!(KMeansConfig::new(6).validate(&s).is_err());
        assert!(KMeansConfig::new(2)
            .with_max_iterations(0)
            .validate(&s)
            .is_err());
        assert!(KMeansConfig::new(2)
            .with_tolerance(-1.0)
            .validate(&s)
            .is_err());
        assert!(KMeansConfig::new(2)
            .with_tolerance(f64::NAN)
            .validate(&s)
            .is_err());
        assert!(KMeansConfig::new(5).validate(&s).is_ok());
    }
}
