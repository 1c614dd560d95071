//! Clustering configuration.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// How a new observation is mapped onto a cohort group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterMode {
    /// Fit centroids once on the reference population, then classify
    /// new points by nearest centroid. Labels keep their meaning.
    #[default]
    Fixed,
    /// Re-fit the whole population plus the new point on every call.
    /// Labels are only meaningful within a single call.
    Refit,
}

impl ClusterMode {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterMode::Fixed => "fixed",
            ClusterMode::Refit => "refit",
        }
    }
}

impl std::fmt::Display for ClusterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClusterMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(ClusterMode::Fixed),
            "refit" => Ok(ClusterMode::Refit),
            other => Err(format!("unknown cluster mode '{}' (expected fixed or refit)", other)),
        }
    }
}

/// Configuration for k-means clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Number of groups (k)
    pub k: usize,

    /// Independent k-means++ restarts; the lowest-inertia run wins
    pub restarts: usize,

    /// Lloyd iteration cap per restart
    pub max_iterations: usize,

    /// Stop when the largest squared centroid shift falls to or below this
    pub tolerance: f64,

    /// Seed for centroid initialization (None = seeded from entropy)
    pub seed: Option<u64>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: 3,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
            seed: None,
        }
    }
}

impl ClusterConfig {
    /// Set the number of groups.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the number of restarts.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Fix the random seed, making results reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that clustering is well defined under this configuration.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(ClusterError::config("k must be > 0"));
        }
        if self.restarts == 0 {
            return Err(ClusterError::config("restarts must be > 0"));
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::config("max_iterations must be > 0"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ClusterError::config(
                "tolerance must be a finite non-negative number",
            ));
        }
        Ok(())
    }

    /// Random source for one fitting pass.
    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
