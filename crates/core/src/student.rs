//! Student profile model.

use serde::{Deserialize, Serialize};
use crate::id::StudentId;
use crate::Time;

/// A student whose progress is tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier
    pub id: StudentId,

    /// Display name
    pub name: String,

    /// Free-text interests (e.g. "ML, Math")
    pub interests: String,

    /// Preferred resource format
    pub preferred_format: PreferredFormat,

    /// When created
    pub created_at: Time,
}

impl Student {
    /// Create a new student profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: StudentId::new(),
            name: name.into(),
            interests: String::new(),
            preferred_format: PreferredFormat::default(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Set interests.
    pub fn with_interests(mut self, interests: impl Into<String>) -> Self {
        self.interests = interests.into();
        self
    }

    /// Set preferred format.
    pub fn with_format(mut self, format: PreferredFormat) -> Self {
        self.preferred_format = format;
        self
    }
}

/// Preferred learning resource format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PreferredFormat {
    /// Video lessons
    #[default]
    Video,
    /// Written material
    Text,
    /// Group discussion
    Discussion,
}

impl PreferredFormat {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredFormat::Video => "Video",
            PreferredFormat::Text => "Text",
            PreferredFormat::Discussion => "Discussion",
        }
    }
}

impl std::fmt::Display for PreferredFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PreferredFormat {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" => Ok(PreferredFormat::Video),
            "text" => Ok(PreferredFormat::Text),
            "discussion" => Ok(PreferredFormat::Discussion),
            other => Err(crate::ParseError::UnknownFormat(other.to_string())),
        }
    }
}
