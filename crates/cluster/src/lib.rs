//! Cohort Clustering
//!
//! Places a student's score pair into one of k behavioral groups derived
//! from a reference population. Two strategies are provided:
//! - [`assign_cluster`] re-fits the population plus the new point per call
//! - [`CohortModel`] fits once and classifies by nearest centroid

#![warn(missing_docs)]

pub mod assign;
pub mod config;
pub mod error;
pub mod kmeans;
pub mod model;
pub mod scaler;

pub use assign::{assign_cluster, RefitClusterer};
pub use config::{ClusterConfig, ClusterMode};
pub use error::{ClusterError, Result};
pub use kmeans::{KMeansFit, Point};
pub use model::CohortModel;
pub use scaler::Standardizer;

use learnpath_core::{ClusterId, ReferencePopulation, ScorePair};

/// Maps a score pair onto a cohort group.
pub trait CohortClusterer: Send + Sync {
    /// Group id for `pair`, drawn from `0..k()`.
    fn assign(&self, pair: ScorePair) -> Result<ClusterId>;

    /// Number of groups.
    fn k(&self) -> usize;

    /// Strategy in use.
    fn mode(&self) -> ClusterMode;
}

/// Build the clusterer for `mode` over a shared reference population.
pub fn build_clusterer(
    mode: ClusterMode,
    population: ReferencePopulation,
    config: ClusterConfig,
) -> Result<Box<dyn CohortClusterer>> {
    match mode {
        ClusterMode::Fixed => Ok(Box::new(CohortModel::fit(&population, &config)?)),
        ClusterMode::Refit => {
            config.validate()?;
            Ok(Box::new(RefitClusterer::new(population, config)))
        }
    }
}
