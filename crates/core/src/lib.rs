//! LearnPath core data models.
//!
//! This crate defines the value types shared by the cohort clusterer,
//! the progress analyzer and the record store.

#![warn(missing_docs)]

// Core identities
mod id;

// Scores and cohorts
mod score;

// Per-student records
mod snapshot;
mod student;

// Re-exports
pub use id::*;
pub use score::{ScorePair, Subject, ReferencePopulation};
pub use snapshot::ProgressSnapshot;
pub use student::{Student, PreferredFormat};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Errors from parsing textual enum values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Subject name not recognised
    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    /// Resource format not recognised
    #[error("unknown format: {0}")]
    UnknownFormat(String),
}
