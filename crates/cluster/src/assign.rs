//! Re-fit cohort assignment.
//!
//! Every call appends the new observation to the reference population,
//! standardizes the combined set and clusters it from scratch. The label
//! returned is only meaningful inside that call: the same id can name a
//! different behavioral profile next time, because restarts and label
//! order are not fixed. Use [`CohortModel`](crate::CohortModel) when ids
//! must stay stable.

use learnpath_core::{ClusterId, ReferencePopulation, ScorePair};
use tracing::debug;

use crate::config::{ClusterConfig, ClusterMode};
use crate::error::{ClusterError, Result};
use crate::kmeans::{self, KMeansFit, Point};
use crate::scaler::Standardizer;
use crate::CohortClusterer;

/// Assign `new_pair` to one of `config.k` groups by re-clustering the
/// reference population together with it.
///
/// # Errors
///
/// - `InsufficientData` if the reference population holds fewer than `config.k` points
/// - `NonFinite` if any score is NaN or infinite
/// - `InvalidConfig` if the configuration does not validate
pub fn assign_cluster(
    reference: &[ScorePair],
    new_pair: ScorePair,
    config: &ClusterConfig,
) -> Result<ClusterId> {
    let fit = fit_with_observation(reference, new_pair, config)?;
    let label = fit
        .labels
        .last()
        .copied()
        .ok_or_else(|| ClusterError::config("empty clustering result"))?;

    debug!(
        cluster = label,
        math = new_pair.math,
        reading = new_pair.reading,
        n = reference.len() + 1,
        "assigned observation by re-fit"
    );
    Ok(ClusterId(label))
}

/// Cluster `reference` plus `new_pair` (appended as the last row).
pub(crate) fn fit_with_observation(
    reference: &[ScorePair],
    new_pair: ScorePair,
    config: &ClusterConfig,
) -> Result<KMeansFit> {
    config.validate()?;
    if reference.len() < config.k {
        return Err(ClusterError::InsufficientData {
            required: config.k,
            actual: reference.len(),
        });
    }
    if !new_pair.is_finite() {
        return Err(ClusterError::NonFinite("new observation".to_string()));
    }
    if let Some(row) = reference.iter().position(|p| !p.is_finite()) {
        return Err(ClusterError::NonFinite(format!("reference row {}", row)));
    }

    let (_, points) = standardize_with_observation(reference, new_pair)?;

    let mut rng = config.rng();
    kmeans::fit(&points, config, &mut rng)
}

/// Standardize `reference` plus `new_pair` with statistics taken over both,
/// returning the points in input order with the new one last.
fn standardize_with_observation(
    reference: &[ScorePair],
    new_pair: ScorePair,
) -> Result<(Standardizer, Vec<Point>)> {
    let mut combined = Vec::with_capacity(reference.len() + 1);
    combined.extend_from_slice(reference);
    combined.push(new_pair);

    let scaler = Standardizer::fit(&combined)
        .ok_or_else(|| ClusterError::config("nothing to standardize"))?;
    let points = combined.iter().map(|p| scaler.transform(*p)).collect();
    Ok((scaler, points))
}

/// Clusterer that re-fits on every assignment.
#[derive(Debug, Clone)]
pub struct RefitClusterer {
    population: ReferencePopulation,
    config: ClusterConfig,
}

impl RefitClusterer {
    /// Create a re-fitting clusterer over a shared reference population.
    pub fn new(population: ReferencePopulation, config: ClusterConfig) -> Self {
        Self { population, config }
    }

    /// Configuration used for every call.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }
}

impl CohortClusterer for RefitClusterer {
    fn assign(&self, pair: ScorePair) -> Result<ClusterId> {
        assign_cluster(self.population.pairs(), pair, &self.config)
    }

    fn k(&self) -> usize {
        self.config.k
    }

    fn mode(&self) -> ClusterMode {
        ClusterMode::Refit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cohort() -> Vec<ScorePair> {
        vec![
            ScorePair::new(35.0, 40.0),
            ScorePair::new(38.0, 42.0),
            ScorePair::new(33.0, 37.0),
            ScorePair::new(62.0, 65.0),
            ScorePair::new(60.0, 63.0),
            ScorePair::new(64.0, 61.0),
            ScorePair::new(90.0, 92.0),
            ScorePair::new(93.0, 88.0),
            ScorePair::new(88.0, 95.0),
        ]
    }

    #[test]
    fn test_assignment_always_in_range() {
        let reference = cohort();
        let config = ClusterConfig::default();
        for (math, reading) in [(0.0, 0.0), (50.0, 50.0), (100.0, 100.0), (10.0, 95.0)] {
            let id = assign_cluster(&reference, ScorePair::new(math, reading), &config).unwrap();
            assert!(id.index() < 3);
        }
    }

    #[test]
    fn test_insufficient_reference_population() {
        let config = ClusterConfig::default();
        let pair = ScorePair::new(70.0, 65.0);
        for n in 0..3 {
            let reference: Vec<ScorePair> = cohort().into_iter().take(n).collect();
            let err = assign_cluster(&reference, pair, &config).unwrap_err();
            assert_eq!(err, ClusterError::InsufficientData { required: 3, actual: n });
        }
    }

    #[test]
    fn test_exactly_k_reference_points_is_enough() {
        let reference: Vec<ScorePair> = cohort().into_iter().step_by(3).collect();
        assert_eq!(reference.len(), 3);
        let id = assign_cluster(&reference, ScorePair::new(70.0, 70.0), &ClusterConfig::default())
            .unwrap();
        assert!(id.index() < 3);
    }

    #[test]
    fn test_seeded_assignment_is_reproducible() {
        let reference = cohort();
        let config = ClusterConfig::default().with_seed(42);
        let pair = ScorePair::new(61.0, 64.0);
        let first = assign_cluster(&reference, pair, &config).unwrap();
        for _ in 0..5 {
            assert_eq!(assign_cluster(&reference, pair, &config).unwrap(), first);
        }
    }

    #[test]
    fn test_unseeded_assignment_stays_in_range() {
        let reference = cohort();
        let config = ClusterConfig::default();
        for _ in 0..10 {
            let id = assign_cluster(&reference, ScorePair::new(61.0, 64.0), &config).unwrap();
            assert!(id.index() < 3);
        }
    }

    #[test]
    fn test_new_point_joins_its_neighbours() {
        let reference = cohort();
        let fit = fit_with_observation(
            &reference,
            ScorePair::new(91.0, 90.0),
            &ClusterConfig::default().with_seed(1),
        )
        .unwrap();
        let new_label = fit.labels[reference.len()];
        assert_eq!(new_label, fit.labels[6]);
        assert_eq!(new_label, fit.labels[7]);
        assert_ne!(new_label, fit.labels[0]);
    }

    #[test]
    fn test_new_observation_shifts_standardization() {
        let reference = cohort();
        let outlier = ScorePair::new(1000.0, 900.0);
        let (scaler, points) = standardize_with_observation(&reference, outlier).unwrap();
        let alone = Standardizer::fit(&reference).unwrap();

        assert!(scaler.mean()[0] > alone.mean()[0]);
        assert!(scaler.mean()[1] > alone.mean()[1]);
        assert!(scaler.scale()[0] > alone.scale()[0]);
        assert_eq!(points.len(), reference.len() + 1);
        assert_eq!(points[reference.len()], scaler.transform(outlier));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let reference = cohort();
        let config = ClusterConfig::default();
        assert!(matches!(
            assign_cluster(&reference, ScorePair::new(f64::NAN, 1.0), &config),
            Err(ClusterError::NonFinite(_))
        ));

        let mut poisoned = cohort();
        poisoned[4].reading = f64::INFINITY;
        assert_eq!(
            assign_cluster(&poisoned, ScorePair::new(1.0, 1.0), &config).unwrap_err(),
            ClusterError::NonFinite("reference row 4".to_string())
        );
    }

    #[test]
    fn test_refit_clusterer_delegates() {
        let clusterer = RefitClusterer::new(
            ReferencePopulation::new(cohort()),
            ClusterConfig::default().with_seed(8),
        );
        let pair = ScorePair::new(36.0, 39.0);
        let direct = assign_cluster(&cohort(), pair, clusterer.config()).unwrap();
        assert_eq!(clusterer.assign(pair).unwrap(), direct);
        assert_eq!(clusterer.mode(), ClusterMode::Refit);
        assert_eq!(clusterer.k(), 3);
    }
}
