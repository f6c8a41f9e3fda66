//! CLI handlers for `fitplan exercise` subcommands.
//!
//! Implements:
//! - `fitplan exercise list`          -- list the catalog in table format
//! - `fitplan exercise show <id>...`  -- show full details for entries
//! - `fitplan exercise import <file>` -- upsert entries from a JSON fixture
//! - `fitplan exercise remove <id>`   -- delete an entry

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::PgPool;

use fitplan_db::models::{Exercise, NewExercise};
use fitplan_db::queries::exercises;

use crate::ExerciseCommands;

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch an `ExerciseCommands` variant to the appropriate handler.
pub async fn run_exercise_command(command: ExerciseCommands, pool: &PgPool) -> Result<()> {
    match command {
        ExerciseCommands::List { verbose } => cmd_list(pool, verbose).await,
        ExerciseCommands::Show { ids } => cmd_show(pool, &ids).await,
        ExerciseCommands::Import { file } => cmd_import(pool, &file).await,
        ExerciseCommands::Remove { id } => cmd_remove(pool, &id).await,
    }
}

// -----------------------------------------------------------------------
// fitplan exercise list
// -----------------------------------------------------------------------

async fn cmd_list(pool: &PgPool, verbose: bool) -> Result<()> {
    let all = exercises::list_exercises(pool).await?;

    if all.is_empty() {
        println!("No exercises found. Use `fitplan exercise import <file>` to load a catalog.");
        return Ok(());
    }

    if verbose {
        for (i, exercise) in all.iter().enumerate() {
            if i > 0 {
                println!("---");
            }
            print_details(exercise);
        }
        return Ok(());
    }

    // Fixed-width columns.
    let id_w = all.iter().map(|e| e.id.len()).max().unwrap_or(2).max(2);
    let name_w = all.iter().map(|e| e.name.len()).max().unwrap_or(4).max(4);

    println!(
        "{:<id_w$}  {:<name_w$}  {:<9}  {:>8}  AVOID",
        "ID", "NAME", "INTENSITY", "KCAL/MIN"
    );
    for e in &all {
        println!(
            "{:<id_w$}  {:<name_w$}  {:<9}  {:>8}  {}",
            e.id,
            e.name,
            e.intensity,
            format_calories(e.estimated_calories_per_min),
            e.contraindications.join(",")
        );
    }
    println!();
    println!("{} exercise(s)", all.len());

    Ok(())
}

fn format_calories(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".to_string())
}

// -----------------------------------------------------------------------
// fitplan exercise show
// -----------------------------------------------------------------------

async fn cmd_show(pool: &PgPool, ids: &[String]) -> Result<()> {
    let found = exercises::get_exercises_by_ids(pool, ids).await?;

    let missing: Vec<&str> = ids
        .iter()
        .filter(|id| !found.iter().any(|e| &e.id == *id))
        .map(String::as_str)
        .collect();

    for (i, exercise) in found.iter().enumerate() {
        if i > 0 {
            println!("---");
        }
        print_details(exercise);
    }

    if !missing.is_empty() {
        bail!("exercise(s) not found: {}", missing.join(", "));
    }
    Ok(())
}

fn print_details(e: &Exercise) {
    println!("ID:                {}", e.id);
    println!("Name:              {}", e.name);
    if !e.description.is_empty() {
        println!("Description:       {}", e.description);
    }
    println!("Intensity:         {}", e.intensity);
    println!("Muscle groups:     {}", list_or_dash(&e.muscle_groups));
    println!("Equipment:         {}", list_or_dash(&e.equipment_required));
    println!("Contraindications: {}", list_or_dash(&e.contraindications));
    println!(
        "Calories/min:      {}",
        format_calories(e.estimated_calories_per_min)
    );
    println!("Updated:           {}", e.updated_at);
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

// -----------------------------------------------------------------------
// fitplan exercise import
// -----------------------------------------------------------------------

/// One record in a catalog fixture file.
///
/// Either the fixture-dump shape `{"model": ..., "pk": ..., "fields": {...}}`
/// or a plain exercise object carrying its own `id`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixtureRecord {
    Dump {
        pk: Value,
        fields: Map<String, Value>,
    },
    Plain(NewExercise),
}

impl FixtureRecord {
    fn into_new_exercise(self, index: usize) -> Result<NewExercise> {
        match self {
            Self::Plain(new) => Ok(new),
            Self::Dump { pk, mut fields } => {
                let id = match pk {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    other => bail!("record {index}: unsupported pk {other}"),
                };
                fields.insert("id".to_string(), Value::String(id));
                serde_json::from_value(Value::Object(fields))
                    .with_context(|| format!("record {index}: invalid exercise fields"))
            }
        }
    }
}

/// Parse a fixture file body into exercises ready to upsert.
pub fn parse_fixture(contents: &str) -> Result<Vec<NewExercise>> {
    let records: Vec<Value> =
        serde_json::from_str(contents).context("fixture must be a JSON array")?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let record: FixtureRecord = serde_json::from_value(raw)
                .with_context(|| format!("record {index}: not an exercise"))?;
            let new = record.into_new_exercise(index)?;
            if new.id.trim().is_empty() {
                bail!("record {index}: empty exercise id");
            }
            Ok(new)
        })
        .collect()
}

async fn cmd_import(pool: &PgPool, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read fixture {}", file.display()))?;
    let entries = parse_fixture(&contents)
        .with_context(|| format!("failed to parse fixture {}", file.display()))?;

    for entry in &entries {
        exercises::upsert_exercise(pool, entry)
            .await
            .with_context(|| format!("failed to import exercise {:?}", entry.id))?;
    }

    let total = exercises::count_exercises(pool).await?;
    println!(
        "Imported {} exercise(s) from {}. Catalog now holds {total}.",
        entries.len(),
        file.display()
    );
    Ok(())
}

// -----------------------------------------------------------------------
// fitplan exercise remove
// -----------------------------------------------------------------------

async fn cmd_remove(pool: &PgPool, id: &str) -> Result<()> {
    if !exercises::delete_exercise(pool, id).await? {
        bail!("exercise {id:?} not found");
    }
    println!("Exercise {id} removed.");
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
