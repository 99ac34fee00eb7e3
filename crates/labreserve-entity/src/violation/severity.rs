//! Violation severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a recorded violation. The consequence is determined by
/// the severity alone, not by the caller:
///
/// - `Minor` — a warning; booking stays allowed.
/// - `Moderate` — timed suspension, auto-lifted by the sweep.
/// - `Major` — indefinite suspension until manual slip review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "violation_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning only.
    Minor,
    /// Timed suspension.
    Moderate,
    /// Suspension until manual review.
    Major,
}

impl Severity {
    /// Whether this severity suspends the requester at all.
    pub fn suspends(&self) -> bool {
        matches!(self, Self::Moderate | Self::Major)
    }

    /// The severity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = labreserve_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minor" => Ok(Self::Minor),
            "moderate" => Ok(Self::Moderate),
            "major" => Ok(Self::Major),
            _ => Err(labreserve_core::AppError::validation(format!(
                "Invalid violation severity: '{s}'. Expected one of: minor, moderate, major"
            ))),
        }
    }
}
