//! CLI handlers for the model-backed commands.
//!
//! Implements:
//! - `fitplan goal <text>` -- parse free text into a goal profile
//! - `fitplan plan <text>` -- parse a goal, then generate a plan from the catalog

use std::collections::HashMap;

use anyhow::{Result, bail};
use sqlx::PgPool;
use tracing::info;

use fitplan_core::catalog::{
    ExerciseCatalog, ExerciseProjection, PgExerciseStore, project_for_model,
};
use fitplan_core::planner::{Planner, ValidationMode};
use fitplan_core::types::{GoalProfile, Plan};

use crate::config::FitplanConfig;

/// Options for `fitplan plan`.
#[derive(Debug)]
pub struct PlanParams {
    pub text: String,
    /// Restrict the offered exercises to these ids. Empty means the whole catalog.
    pub exercise_ids: Vec<String>,
    pub strict: bool,
    pub json: bool,
}

fn build_planner(config: &FitplanConfig, strict: bool) -> Result<Planner> {
    let mut options = config.planner_options;
    if strict {
        options.validation = ValidationMode::Strict;
    }
    Ok(Planner::gemini(config.require_gateway()?).with_options(options))
}

// -----------------------------------------------------------------------
// fitplan goal
// -----------------------------------------------------------------------

pub async fn run_goal(config: &FitplanConfig, text: &str, strict: bool) -> Result<()> {
    let planner = build_planner(config, strict)?;
    let profile = planner.parse_goal(text).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

// -----------------------------------------------------------------------
// fitplan plan
// -----------------------------------------------------------------------

pub async fn run_plan(pool: &PgPool, config: &FitplanConfig, params: PlanParams) -> Result<()> {
    let planner = build_planner(config, params.strict)?;
    let catalog = ExerciseCatalog::new(PgExerciseStore::new(pool.clone()));

    let rows = if params.exercise_ids.is_empty() {
        catalog.list_all().await?
    } else {
        catalog.get_by_ids(params.exercise_ids.iter().cloned()).await?
    };
    if rows.is_empty() {
        bail!("no exercises available; import a catalog with `fitplan exercise import <file>`");
    }
    let exercises = project_for_model(&rows);
    info!(offered = exercises.len(), "loaded exercises for planning");

    let goal = planner.parse_goal(&params.text).await?;
    let plan = planner.generate_plan(&goal, &exercises).await?;

    if params.json {
        let out = serde_json::json!({ "goal": goal, "plan": plan });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let target = planner.options().target_duration_seconds;
        print!("{}", render_plan(&goal, &plan, &exercises, target));
    }
    Ok(())
}

/// Human-readable plan with exercise names resolved against the offered set.
fn render_plan(
    goal: &GoalProfile,
    plan: &Plan,
    exercises: &[ExerciseProjection],
    target_seconds: i64,
) -> String {
    let names: HashMap<&str, &str> = exercises
        .iter()
        .map(|e| (e.id.as_str(), e.name.as_str()))
        .collect();

    let mut lines = vec![format!(
        "Goal: {} ({}s)",
        goal.primary_goal, goal.duration_seconds
    )];
    let avoided = goal.avoided_joints();
    if !avoided.is_empty() {
        lines.push(format!("Avoiding: {}", avoided.join(", ")));
    }
    lines.push(String::new());

    let id_w = plan
        .steps
        .iter()
        .map(|s| s.exercise_id.as_ref().map_or(1, |id| id.key().len()))
        .max()
        .unwrap_or(2)
        .max(2);

    for (i, step) in plan.steps.iter().enumerate() {
        let (id, name) = match &step.exercise_id {
            Some(id) => {
                let key = id.key();
                let name = names
                    .get(key.as_str())
                    .map_or("(not in catalog)".to_string(), |n| (*n).to_string());
                (key, name)
            }
            None => ("-".to_string(), "(unmatched)".to_string()),
        };
        lines.push(format!(
            "{:>3}. {:<id_w$}  {:>6}  {}",
            i + 1,
            id,
            format_seconds(step.duration_seconds),
            name
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Total: {}s (target {target_seconds}s)",
        plan.total_duration_seconds()
    ));
    if let Some(notes) = &plan.notes {
        lines.push(format!("Notes: {notes}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn format_seconds(value: Option<i64>) -> String {
    value.map(|v| format!("{v}s")).unwrap_or_else(|| "-".to_string())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use fitplan_core::types::PlanStep;
    use fitplan_db::models::Intensity;
    use serde_json::{Map, json};

    fn projection(id: &str, name: &str) -> ExerciseProjection {
        ExerciseProjection {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            muscle_groups: vec![],
            equipment_required: vec![],
            contraindications: vec![],
            estimated_calories_per_min: None,
            intensity: Intensity::Low,
        }
    }

    fn step(id: serde_json::Value, seconds: i64) -> PlanStep {
        serde_json::from_value(json!({"exercise_id": id, "duration_seconds": seconds})).unwrap()
    }

    fn mobility_goal() -> GoalProfile {
        GoalProfile {
            primary_goal: "mobility".to_string(),
            duration_seconds: 120,
            constraints: Map::new(),
        }
    }

    #[test]
    fn render_plan_resolves_names_and_totals() {
        let goal = GoalProfile {
            primary_goal: "calorie_burn".to_string(),
            duration_seconds: 300,
            constraints: json!({"avoid_joint": ["knee"]}).as_object().cloned().unwrap(),
        };
        let plan = Plan {
            steps: vec![
                step(json!("seated_punches"), 150),
                step(json!("burpees"), 100),
                step(json!(null), 20),
            ],
            notes: Some("Go easy.".to_string()),
        };
        let exercises = vec![projection("seated_punches", "Seated Punches")];

        let out = render_plan(&goal, &plan, &exercises, 300);
        assert!(out.contains("Goal: calorie_burn (300s)"), "{out}");
        assert!(out.contains("Avoiding: knee"), "{out}");
        assert!(out.contains("Seated Punches"), "{out}");
        assert!(out.contains("(not in catalog)"), "{out}");
        assert!(out.contains("(unmatched)"), "{out}");
        assert!(out.contains("Total: 270s (target 300s)"), "{out}");
        assert!(out.contains("Notes: Go easy."), "{out}");
    }

    #[test]
    fn render_plan_without_constraints_or_notes() {
        let goal = GoalProfile {
            primary_goal: "mobility".to_string(),
            duration_seconds: 120,
            constraints: Map::new(),
        };
        let plan = Plan {
            steps: vec![step(json!(1), 120)],
            notes: None,
        };
        let out = render_plan(&goal, &plan, &[projection("1", "Neck Rolls")], 120);
        assert!(!out.contains("Avoiding"), "{out}");
        assert!(!out.contains("Notes"), "{out}");
        assert!(out.contains("Neck Rolls"), "{out}");
    }

    #[test]
    fn render_plan_marks_untimed_steps() {
        let untimed: PlanStep = serde_json::from_value(json!({"exercise_id": "1"})).unwrap();
        let plan = Plan {
            steps: vec![step(json!("1"), 60), untimed],
            notes: None,
        };
        let out = render_plan(&mobility_goal(), &plan, &[projection("1", "Neck Rolls")], 120);
        let step_lines: Vec<&str> = out.lines().filter(|l| l.contains("Neck Rolls")).collect();
        assert_eq!(step_lines.len(), 2, "{out}");
        assert!(step_lines[0].contains("60s"), "{out}");
        assert!(step_lines[1].contains(" - "), "{out}");
        assert!(out.contains("Total: 60s (target 120s)"), "{out}");
        assert!(out.ends_with('\n'), "{out:?}");
    }

    #[test]
    fn render_plan_with_overflowing_durations() {
        let plan = Plan {
            steps: vec![step(json!("1"), i64::MAX), step(json!("1"), 1)],
            notes: None,
        };
        let out = render_plan(&mobility_goal(), &plan, &[projection("1", "Neck Rolls")], 120);
        assert!(out.contains(&format!("Total: {}s", i64::MAX)), "{out}");
    }

    #[test]
    fn format_seconds_handles_missing_value() {
        assert_eq!(format_seconds(Some(45)), "45s");
        assert_eq!(format_seconds(None), "-");
    }
}
