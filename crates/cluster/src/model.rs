//! Fixed-centroid cohort model.
//!
//! Fits the standardizer and centroids once against the reference
//! population only, then classifies new observations by nearest centroid.
//! Centroids are stored in ascending order of mean standardized score, so
//! cluster 0 is always the lowest-performing profile and cluster k-1 the
//! highest, independent of seed or restart order.

use learnpath_core::{ClusterId, ReferencePopulation, ScorePair};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ClusterConfig, ClusterMode};
use crate::error::{ClusterError, Result};
use crate::kmeans::{self, Point};
use crate::scaler::Standardizer;
use crate::CohortClusterer;

/// Cohort centroids fitted once and reused for every classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortModel {
    scaler: Standardizer,
    centroids: Vec<Point>,
    inertia: f64,
}

impl CohortModel {
    /// Fit the model on the reference population.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` if the population holds fewer than `config.k` points
    /// - `NonFinite` if any reference score is NaN or infinite
    /// - `InvalidConfig` if the configuration does not validate
    pub fn fit(population: &ReferencePopulation, config: &ClusterConfig) -> Result<Self> {
        config.validate()?;
        let pairs = population.pairs();
        if pairs.len() < config.k {
            return Err(ClusterError::InsufficientData {
                required: config.k,
                actual: pairs.len(),
            });
        }
        if let Some(row) = pairs.iter().position(|p| !p.is_finite()) {
            return Err(ClusterError::NonFinite(format!("reference row {}", row)));
        }

        let scaler = Standardizer::fit(pairs)
            .ok_or_else(|| ClusterError::config("nothing to standardize"))?;
        let points: Vec<Point> = pairs.iter().map(|p| scaler.transform(*p)).collect();

        let mut rng = config.rng();
        let fit = kmeans::fit(&points, config, &mut rng)?;

        let mut centroids = fit.centroids;
        centroids.sort_by(|a, b| {
            (a[0] + a[1])
                .partial_cmp(&(b[0] + b[1]))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal))
        });

        info!(
            k = config.k,
            n = pairs.len(),
            inertia = fit.inertia,
            iterations = fit.iterations,
            converged = fit.converged,
            "fitted cohort model"
        );

        Ok(Self {
            scaler,
            centroids,
            inertia: fit.inertia,
        })
    }

    /// Classify a score pair by its nearest centroid.
    pub fn classify(&self, pair: ScorePair) -> Result<ClusterId> {
        if !pair.is_finite() {
            return Err(ClusterError::NonFinite("new observation".to_string()));
        }
        let point = self.scaler.transform(pair);
        let label = kmeans::nearest(&point, &self.centroids);
        debug!(
            cluster = label,
            math = pair.math,
            reading = pair.reading,
            "classified observation against fixed centroids"
        );
        Ok(ClusterId(label))
    }

    /// Number of groups.
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Centroids mapped back to score space, indexed by cluster id.
    pub fn centroid_scores(&self) -> Vec<ScorePair> {
        self.centroids.iter().map(|c| self.scaler.inverse(*c)).collect()
    }
}

impl CohortClusterer for CohortModel {
    fn assign(&self, pair: ScorePair) -> Result<ClusterId> {
        self.classify(pair)
    }

    fn k(&self) -> usize {
        CohortModel::k(self)
    }

    fn mode(&self) -> ClusterMode {
        ClusterMode::Fixed
    }
}
