//! Schema coercers: parsed JSON -> typed DTOs.
//!
//! Coercion checks shape only. Required keys must be present with the
//! right JSON type; documented optional keys (`duration_seconds`,
//! `constraints`, `notes`) fall back to defaults when absent or null.
//! Durations accept any whole JSON number, so `300` and `300.0` coerce
//! alike.
//! Whether the values make sense (goal in the closed set, positive
//! durations, known exercise ids) is the business of [`crate::validate`].
//!
//! Every shape failure becomes [`ServiceError::SchemaMismatch`] carrying the
//! parsed structure, never the raw text.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ServiceError;
use crate::types::{DEFAULT_DURATION_SECONDS, GoalProfile, Plan, PlanStep, whole_seconds};

/// `GoalProfile` as the model sends it.
#[derive(Debug, Deserialize)]
struct GoalProfileWire {
    primary_goal: String,
    #[serde(default, deserialize_with = "whole_seconds")]
    duration_seconds: Option<i64>,
    #[serde(default)]
    constraints: Option<Map<String, Value>>,
}

/// `Plan` as the model sends it.
#[derive(Debug, Deserialize)]
struct PlanWire {
    plan: Vec<PlanStep>,
    #[serde(default)]
    notes: Option<String>,
}

fn extract<T: DeserializeOwned>(schema: &'static str, parsed: &Value) -> Result<T, ServiceError> {
    if !parsed.is_object() {
        return Err(ServiceError::SchemaMismatch {
            schema,
            parsed: parsed.clone(),
            reason: "expected a JSON object".to_string(),
        });
    }
    T::deserialize(parsed).map_err(|e| ServiceError::SchemaMismatch {
        schema,
        parsed: parsed.clone(),
        reason: e.to_string(),
    })
}

/// Coerce parsed model output into a [`GoalProfile`].
///
/// `primary_goal` is required and must be a string; it is never defaulted.
pub fn coerce_goal_profile(parsed: &Value) -> Result<GoalProfile, ServiceError> {
    let wire: GoalProfileWire = extract("GoalProfile", parsed)?;
    Ok(GoalProfile {
        primary_goal: wire.primary_goal,
        duration_seconds: wire.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS),
        constraints: wire.constraints.unwrap_or_default(),
    })
}

/// Coerce parsed model output into a [`Plan`].
///
/// `plan` is required and must be an array of step objects. Step ids and
/// durations pass through unchecked, including `null` ids and missing
/// durations; only a duration of the wrong JSON type is a shape failure.
pub fn coerce_plan(parsed: &Value) -> Result<Plan, ServiceError> {
    let wire: PlanWire = extract("Plan", parsed)?;
    Ok(Plan {
        steps: wire.plan,
        notes: wire.notes,
    })
}
