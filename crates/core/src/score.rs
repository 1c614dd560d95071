//! Score pairs and the reference population they are clustered against.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Subject tracked by a score pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    /// Math score
    #[default]
    Math,
    /// Reading score
    Reading,
}

impl Subject {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Reading => "reading",
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Subject {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "math" => Ok(Subject::Math),
            "reading" => Ok(Subject::Reading),
            other => Err(crate::ParseError::UnknownSubject(other.to_string())),
        }
    }
}

/// A student's two subject scores at one point in time.
///
/// Scores are expected in `[0, 100]` but the bound is not enforced here;
/// input surfaces clamp or reject out-of-range values themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    /// Math score
    pub math: f64,

    /// Reading score
    pub reading: f64,
}

impl ScorePair {
    /// Create a new score pair.
    pub fn new(math: f64, reading: f64) -> Self {
        Self { math, reading }
    }

    /// Score for a single subject.
    pub fn get(&self, subject: Subject) -> f64 {
        match subject {
            Subject::Math => self.math,
            Subject::Reading => self.reading,
        }
    }

    /// Both components as a fixed-size vector.
    pub fn to_array(self) -> [f64; 2] {
        [self.math, self.reading]
    }

    /// Whether both scores are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.math.is_finite() && self.reading.is_finite()
    }
}

impl From<(f64, f64)> for ScorePair {
    fn from((math, reading): (f64, f64)) -> Self {
        Self { math, reading }
    }
}

/// Historical cohort used as the clustering backdrop.
///
/// Immutable once built. Cloning shares the underlying buffer, so one
/// population can be handed to any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct ReferencePopulation {
    pairs: Arc<[ScorePair]>,
}

impl ReferencePopulation {
    /// Build a population from score pairs, keeping their order.
    pub fn new(pairs: Vec<ScorePair>) -> Self {
        Self {
            pairs: pairs.into(),
        }
    }

    /// Score pairs in load order.
    pub fn pairs(&self) -> &[ScorePair] {
        &self.pairs
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the population has no points.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Default for ReferencePopulation {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<ScorePair>> for ReferencePopulation {
    fn from(pairs: Vec<ScorePair>) -> Self {
        Self::new(pairs)
    }
}

impl FromIterator<ScorePair> for ReferencePopulation {
    fn from_iter<I: IntoIterator<Item = ScorePair>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_pair_subject_lookup() {
        let pair = ScorePair::new(72.0, 65.0);
        assert_eq!(pair.get(Subject::Math), 72.0);
        assert_eq!(pair.get(Subject::Reading), 65.0);
    }

    #[test]
    fn test_score_pair_non_finite() {
        assert!(ScorePair::new(1.0, 2.0).is_finite());
        assert!(!ScorePair::new(f64::NAN, 2.0).is_finite());
        assert!(!ScorePair::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_subject_parse() {
        assert_eq!("Math".parse::<Subject>().unwrap(), Subject::Math);
        assert_eq!("reading".parse::<Subject>().unwrap(), Subject::Reading);
        assert!("science".parse::<Subject>().is_err());
    }

    #[test]
    fn test_population_clone_shares_buffer() {
        let population: ReferencePopulation =
            vec![ScorePair::new(1.0, 2.0), ScorePair::new(3.0, 4.0)].into();
        let shared = population.clone();
        assert_eq!(shared.len(), 2);
        assert!(std::ptr::eq(population.pairs(), shared.pairs()));
    }
}
