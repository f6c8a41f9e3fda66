use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Effort level of an exercise.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for Intensity {
    type Err = IntensityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(IntensityParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Intensity`] string.
#[derive(Debug, Clone)]
pub struct IntensityParseError(pub String);

impl fmt::Display for IntensityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid intensity: {:?} (expected low, medium, or high)", self.0)
    }
}

impl std::error::Error for IntensityParseError {}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A catalog entry from the `exercise` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    /// Stable identifier used by plans and clients.
    pub id: String,
    pub name: String,
    pub description: String,
    pub muscle_groups: Vec<String>,
    pub equipment_required: Vec<String>,
    /// Joints or conditions for which this exercise should be avoided.
    pub contraindications: Vec<String>,
    pub estimated_calories_per_min: Option<f64>,
    pub intensity: Intensity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a catalog entry.
///
/// Deserializes from the plain exercise JSON used by catalog fixtures;
/// everything but `id` and `name` is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub equipment_required: Vec<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub estimated_calories_per_min: Option<f64>,
    #[serde(default)]
    pub intensity: Intensity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_display_roundtrips_through_from_str() {
        for intensity in [Intensity::Low, Intensity::Medium, Intensity::High] {
            let parsed: Intensity = intensity.to_string().parse().unwrap();
            assert_eq!(parsed, intensity);
        }
    }

    #[test]
    fn intensity_rejects_unknown_value() {
        let err = "extreme".parse::<Intensity>().unwrap_err();
        assert!(err.to_string().contains("extreme"));
    }

    #[test]
    fn new_exercise_fills_defaults() {
        let json = r#"{"id": "march_in_place", "name": "March in Place"}"#;
        let ex: NewExercise = serde_json::from_str(json).unwrap();
        assert_eq!(ex.id, "march_in_place");
        assert!(ex.description.is_empty());
        assert!(ex.contraindications.is_empty());
        assert_eq!(ex.estimated_calories_per_min, None);
        assert_eq!(ex.intensity, Intensity::Low);
    }
}
