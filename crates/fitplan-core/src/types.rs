//! Typed DTOs produced by the coercers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::ValidationError;

/// Duration used when the model omits `duration_seconds`.
pub const DEFAULT_DURATION_SECONDS: i64 = 300;

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

/// The closed set of fitness intentions a goal may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    CalorieBurn,
    GeneralFitness,
    Strength,
    Mobility,
    Rehab,
}

impl PrimaryGoal {
    pub const ALL: [PrimaryGoal; 5] = [
        Self::CalorieBurn,
        Self::GeneralFitness,
        Self::Strength,
        Self::Mobility,
        Self::Rehab,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CalorieBurn => "calorie_burn",
            Self::GeneralFitness => "general_fitness",
            Self::Strength => "strength",
            Self::Mobility => "mobility",
            Self::Rehab => "rehab",
        }
    }
}

impl fmt::Display for PrimaryGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimaryGoal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownGoal(s.to_owned()))
    }
}

/// A user's parsed fitness intent.
///
/// `primary_goal` holds the model's answer verbatim; [`GoalProfile::goal`]
/// checks it against the closed set. `constraints` is passed through as the
/// model wrote it (keys such as `avoid_joint`, `impact_level`, `equipment`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProfile {
    pub primary_goal: String,
    pub duration_seconds: i64,
    pub constraints: Map<String, Value>,
}

impl GoalProfile {
    /// The primary goal as a member of the closed set.
    pub fn goal(&self) -> Result<PrimaryGoal, ValidationError> {
        self.primary_goal.parse()
    }

    /// Values of a constraint that may be written either as a single string
    /// or as a list of strings. Non-string entries are ignored.
    pub fn constraint_values(&self, key: &str) -> Vec<&str> {
        match self.constraints.get(key) {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Joints the user asked to spare (`constraints.avoid_joint`).
    pub fn avoided_joints(&self) -> Vec<&str> {
        self.constraint_values("avoid_joint")
    }
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// An exercise reference as the model wrote it.
///
/// Catalog ids are strings, but models regularly echo numeric ids back as
/// JSON numbers; both forms are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExerciseRef {
    Text(String),
    Number(Number),
}

impl ExerciseRef {
    /// Canonical string form used for catalog lookups.
    pub fn key(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl fmt::Display for ExerciseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ExerciseRef {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// One step of a plan. A `None` exercise id marks an entry the model could
/// not match to the catalog; a `None` duration marks a step the model left
/// untimed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    #[serde(default)]
    pub exercise_id: Option<ExerciseRef>,
    #[serde(default, deserialize_with = "whole_seconds")]
    pub duration_seconds: Option<i64>,
    /// Any other keys the model attached to the step.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An ordered workout. Step order is execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
    pub notes: Option<String>,
}

impl Plan {
    /// Sum of step durations, saturating at the `i64` bounds. Untimed steps
    /// count as zero. Advisory only; nothing enforces a target.
    pub fn total_duration_seconds(&self) -> i64 {
        self.steps
            .iter()
            .filter_map(|s| s.duration_seconds)
            .fold(0i64, i64::saturating_add)
    }
}

// ---------------------------------------------------------------------------
// Durations
// ---------------------------------------------------------------------------

/// Deserialize an optional duration given as any whole JSON number.
///
/// Models write `60` and `60.0` interchangeably. Fractional values and
/// numbers outside the `i64` range are rejected.
pub(crate) fn whole_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number.as_i64() {
        return Ok(Some(n));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(serde::de::Error::custom(format!(
            "expected a whole number of seconds, got {number}"
        ))),
    }
}
