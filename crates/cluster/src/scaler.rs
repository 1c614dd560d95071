//! Per-dimension standardization (zero mean, unit variance).

use learnpath_core::ScorePair;
use serde::{Deserialize, Serialize};

use crate::kmeans::Point;

/// Standardizer fitted on a set of score pairs.
///
/// Uses the population standard deviation. A dimension with zero variance
/// keeps a scale of 1 so it maps to 0 rather than dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    mean: Point,
    scale: Point,
}

impl Standardizer {
    /// Fit mean and scale over `pairs`. Returns None for an empty slice.
    pub fn fit(pairs: &[ScorePair]) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }
        let n = pairs.len() as f64;

        let mut mean = [0.0; 2];
        for pair in pairs {
            let p = pair.to_array();
            mean[0] += p[0];
            mean[1] += p[1];
        }
        mean[0] /= n;
        mean[1] /= n;

        let mut var = [0.0; 2];
        for pair in pairs {
            let p = pair.to_array();
            var[0] += (p[0] - mean[0]).powi(2);
            var[1] += (p[1] - mean[1]).powi(2);
        }

        let scale = [scale_of(var[0] / n), scale_of(var[1] / n)];
        Some(Self { mean, scale })
    }

    /// Map a score pair into standardized space.
    pub fn transform(&self, pair: ScorePair) -> Point {
        let p = pair.to_array();
        [
            (p[0] - self.mean[0]) / self.scale[0],
            (p[1] - self.mean[1]) / self.scale[1],
        ]
    }

    /// Map standardized coordinates back to score space.
    pub fn inverse(&self, point: Point) -> ScorePair {
        ScorePair::new(
            point[0] * self.scale[0] + self.mean[0],
            point[1] * self.scale[1] + self.mean[1],
        )
    }

    /// Fitted per-dimension mean.
    pub fn mean(&self) -> Point {
        self.mean
    }

    /// Fitted per-dimension scale.
    pub fn scale(&self) -> Point {
        self.scale
    }
}

fn scale_of(variance: f64) -> f64 {
    let std = variance.sqrt();
    if std > f64::EPSILON {
        std
    } else {
        1.0
    }
}
