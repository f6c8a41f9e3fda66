//! Prompt construction for goal parsing and plan generation.
//!
//! Both builders are pure: they interpolate caller data into fixed
//! instruction templates and perform no I/O or validation. Wording is not
//! byte-normative, but every rule listed in the templates must survive
//! edits: the closed goal set, the injury-vs-goal rule, the JSON-only
//! instruction, and the use-only-listed-exercises instruction.

use serde_json::Value;

use crate::catalog::ExerciseProjection;
use crate::types::{DEFAULT_DURATION_SECONDS, GoalProfile, PrimaryGoal};

// ---------------------------------------------------------------------------
// Goal parsing
// ---------------------------------------------------------------------------

const GOAL_RULES: &str = r#"IMPORTANT RULES:
- "primary_goal" must reflect the user's FITNESS INTENTION (burn calories, get fitter, get stronger, move better, recover).
- Injuries or limitations must NOT override the fitness intention. They belong ONLY under "constraints".
- Injuries NEVER determine "primary_goal".
"#;

const GOAL_SHAPE: &str = r#"Return ONLY JSON in this structure:

{
  "primary_goal": "calorie_burn | general_fitness | strength | mobility | rehab",
  "duration_seconds": 300,
  "constraints": {
    "avoid_joint": ["knee", "ankle", "back"],
    "impact_level": "low | medium | high",
    "equipment": "bodyweight_only | dumbbells | chair"
  }
}

Do not add explanations. JSON only."#;

/// Build the prompt that turns free-text user intent into a goal profile.
pub fn build_goal_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(1024 + text.len());

    prompt.push_str("You are an assistant that extracts structured workout intentions.\n\n");
    prompt.push_str(GOAL_RULES);
    prompt.push('\n');

    prompt.push_str("Valid primary_goal values:\n");
    for goal in PrimaryGoal::ALL {
        prompt.push_str(&format!("- \"{goal}\""));
        if goal == PrimaryGoal::Rehab {
            prompt.push_str(" (only if the user explicitly asks for rehabilitation)");
        }
        prompt.push('\n');
    }
    prompt.push('\n');

    prompt.push_str("Input:\n");
    prompt.push_str(text.trim());
    prompt.push_str("\n\n");

    prompt.push_str(GOAL_SHAPE);
    prompt
}

// ---------------------------------------------------------------------------
// Plan generation
// ---------------------------------------------------------------------------

const PLAN_SHAPE: &str = r#"Return ONLY JSON in this EXACT format:

{
  "plan": [
    {"exercise_id": "<id from the list>", "duration_seconds": 60},
    {"exercise_id": "<id from the list>", "duration_seconds": 45}
  ],
  "notes": "optional notes here"
}

Do not include exercises not listed above.
Do not include any text outside of JSON."#;

/// Build the plan-generation prompt with the default 300 second target.
pub fn build_plan_prompt(goal: &GoalProfile, exercises: &[ExerciseProjection]) -> String {
    build_plan_prompt_with_target(goal, exercises, DEFAULT_DURATION_SECONDS)
}

/// Build the prompt asking for a plan that uses only `exercises`, totalling
/// roughly `target_seconds`.
pub fn build_plan_prompt_with_target(
    goal: &GoalProfile,
    exercises: &[ExerciseProjection],
    target_seconds: i64,
) -> String {
    let goal_json = goal_to_json(goal);
    let exercises_json = Value::Array(exercises.iter().map(Value::from).collect());

    let mut prompt = String::with_capacity(2048 + 256 * exercises.len());

    prompt.push_str(&format!(
        "You are a fitness coach assistant that builds a workout plan of about {target_seconds} seconds.\n"
    ));
    prompt.push_str("You MUST follow the rules strictly:\n\n");
    prompt.push_str("RULES:\n");
    prompt.push_str("- You may ONLY use exercises from the provided list, referenced by their \"id\".\n");
    prompt.push_str("- Do not invent exercise names or IDs.\n");
    prompt.push_str(&format!(
        "- Total duration must be close to {target_seconds} seconds.\n"
    ));
    prompt.push_str("- Keep all constraints from the goal profile.\n");
    prompt.push_str("- Output JSON ONLY. No commentary.\n\n");

    prompt.push_str("Goal Profile:\n");
    prompt.push_str(&format!("{goal_json:#}"));
    prompt.push_str("\n\n");

    prompt.push_str("Allowed Exercises (each has id, name, description, etc):\n");
    prompt.push_str(&format!("{exercises_json:#}"));
    prompt.push_str("\n\n");

    prompt.push_str(PLAN_SHAPE);
    prompt
}

fn goal_to_json(goal: &GoalProfile) -> Value {
    serde_json::json!({
        "primary_goal": goal.primary_goal,
        "duration_seconds": goal.duration_seconds,
        "constraints": Value::Object(goal.constraints.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitplan_db::models::Intensity;
    use serde_json::json;

    fn knee_goal() -> GoalProfile {
        GoalProfile {
            primary_goal: "calorie_burn".to_string(),
            duration_seconds: 300,
            constraints: json!({"avoid_joint": ["knee"], "impact_level": "low"})
                .as_object()
                .cloned()
                .unwrap(),
        }
    }

    fn seated_punches() -> ExerciseProjection {
        ExerciseProjection {
            id: "seated_punches".to_string(),
            name: "Seated Punches".to_string(),
            description: "Alternate punches from a chair.".to_string(),
            muscle_groups: vec!["arms".to_string()],
            equipment_required: vec!["chair".to_string()],
            contraindications: vec![],
            estimated_calories_per_min: Some(5.5),
            intensity: Intensity::Medium,
        }
    }

    #[test]
    fn goal_prompt_lists_every_goal_and_embeds_input() {
        let prompt = build_goal_prompt("I want to burn calories but my knee hurts.");
        for goal in PrimaryGoal::ALL {
            assert!(prompt.contains(&format!("\"{goal}\"")), "missing {goal}");
        }
        assert!(prompt.contains("I want to burn calories but my knee hurts."));
        assert!(prompt.contains("Injuries NEVER determine"));
        assert!(prompt.contains("\"constraints\""));
        assert!(prompt.ends_with("JSON only."));
    }

    #[test]
    fn goal_prompt_is_deterministic() {
        assert_eq!(build_goal_prompt("run more"), build_goal_prompt("run more"));
    }

    #[test]
    fn plan_prompt_embeds_goal_and_exercise_projection() {
        let prompt = build_plan_prompt(&knee_goal(), &[seated_punches()]);

        assert!(prompt.contains("\"avoid_joint\""));
        assert!(prompt.contains("\"calorie_burn\""));
        assert!(prompt.contains("\"id\": \"seated_punches\""));
        assert!(prompt.contains("\"estimated_calories_per_min\": 5.5"));
        assert!(prompt.contains("\"intensity\": \"medium\""));
        assert!(prompt.contains("ONLY use exercises from the provided list"));
        assert!(prompt.contains("Do not invent exercise names or IDs."));
        assert!(prompt.contains("close to 300 seconds"));
        assert!(prompt.contains("Output JSON ONLY"));
    }

    #[test]
    fn plan_prompt_uses_requested_target() {
        let prompt = build_plan_prompt_with_target(&knee_goal(), &[seated_punches()], 600);
        assert!(prompt.contains("close to 600 seconds"));
        assert!(!prompt.contains("close to 300 seconds"));
    }

    #[test]
    fn plan_prompt_with_no_exercises_still_renders_an_empty_list() {
        let prompt = build_plan_prompt(&knee_goal(), &[]);
        assert!(prompt.contains("Allowed Exercises (each has id, name, description, etc):\n[]"));
    }
}
