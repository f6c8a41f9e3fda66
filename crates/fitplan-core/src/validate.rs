//! Semantic validation of coerced DTOs against domain policy.
//!
//! The coercers only guarantee shape. These checks decide whether a
//! well-formed answer is acceptable and report violations as
//! [`ValidationError`], so "the model returned garbage" and "the model
//! broke the rules" stay distinguishable.

use std::collections::HashMap;

use crate::catalog::ExerciseProjection;
use crate::error::ValidationError;
use crate::types::{GoalProfile, Plan, PrimaryGoal};

/// Check that the goal is in the closed set and the duration is positive.
pub fn check_goal_profile(profile: &GoalProfile) -> Result<PrimaryGoal, ValidationError> {
    let goal = profile.goal()?;
    if profile.duration_seconds <= 0 {
        return Err(ValidationError::NonPositiveDuration {
            field: "duration_seconds".to_string(),
            value: profile.duration_seconds,
        });
    }
    Ok(goal)
}

/// Check a generated plan against the exercises that were offered.
///
/// Steps are checked in order and the first violation is returned:
/// the plan must be non-empty; each step needs an id from `allowed` and a
/// positive duration (present, not null); no step may use an exercise
/// contraindicated for a joint the goal asks to avoid (case-insensitive
/// match).
pub fn check_plan(
    plan: &Plan,
    allowed: &[ExerciseProjection],
    goal: &GoalProfile,
) -> Result<(), ValidationError> {
    if plan.steps.is_empty() {
        return Err(ValidationError::EmptyPlan);
    }

    let by_id: HashMap<&str, &ExerciseProjection> =
        allowed.iter().map(|e| (e.id.as_str(), e)).collect();
    let avoided: Vec<String> = goal
        .avoided_joints()
        .into_iter()
        .map(str::to_lowercase)
        .collect();

    for (index, step) in plan.steps.iter().enumerate() {
        let Some(exercise_ref) = &step.exercise_id else {
            return Err(ValidationError::MissingExerciseId { index });
        };
        let key = exercise_ref.key();
        let Some(exercise) = by_id.get(key.as_str()) else {
            return Err(ValidationError::UnknownExercise {
                index,
                exercise_id: key,
            });
        };

        let Some(duration) = step.duration_seconds else {
            return Err(ValidationError::MissingDuration { index });
        };
        if duration <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                field: format!("plan[{index}].duration_seconds"),
                value: duration,
            });
        }

        if let Some(joint) = exercise
            .contraindications
            .iter()
            .find(|c| avoided.contains(&c.to_lowercase()))
        {
            return Err(ValidationError::ContraindicatedExercise {
                index,
                exercise_id: key,
                joint: joint.clone(),
            });
        }
    }

    Ok(())
}
