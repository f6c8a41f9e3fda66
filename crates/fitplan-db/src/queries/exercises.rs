//! Database query functions for the `exercise` table.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::{Exercise, NewExercise};

/// List every catalog entry, ordered by id.
pub async fn list_exercises(pool: &PgPool) -> Result<Vec<Exercise>> {
    let exercises = sqlx::query_as::<_, Exercise>("SELECT * FROM exercise ORDER BY id")
        .fetch_all(pool)
        .await
        .context("failed to list exercises")?;

    Ok(exercises)
}

/// Fetch the entries whose id is in `ids`, ordered by id.
///
/// Ids with no matching row are silently skipped.
pub async fn get_exercises_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<Exercise>> {
    let exercises = sqlx::query_as::<_, Exercise>(
        "SELECT * FROM exercise WHERE id = ANY($1) ORDER BY id",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .context("failed to fetch exercises by id")?;

    Ok(exercises)
}

/// Fetch a single exercise by id.
pub async fn get_exercise(pool: &PgPool, id: &str) -> Result<Option<Exercise>> {
    let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercise WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("failed to fetch exercise {id:?}"))?;

    Ok(exercise)
}

/// Insert an exercise, or replace every field of the existing row with the
/// same id. Returns the stored row.
pub async fn upsert_exercise(pool: &PgPool, new: &NewExercise) -> Result<Exercise> {
    let exercise = sqlx::query_as::<_, Exercise>(
        "INSERT INTO exercise (id, name, description, muscle_groups, equipment_required, \
         contraindications, estimated_calories_per_min, intensity) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (id) DO UPDATE SET \
             name = EXCLUDED.name, \
             description = EXCLUDED.description, \
             muscle_groups = EXCLUDED.muscle_groups, \
             equipment_required = EXCLUDED.equipment_required, \
             contraindications = EXCLUDED.contraindications, \
             estimated_calories_per_min = EXCLUDED.estimated_calories_per_min, \
             intensity = EXCLUDED.intensity, \
             updated_at = now() \
         RETURNING *",
    )
    .bind(&new.id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.muscle_groups)
    .bind(&new.equipment_required)
    .bind(&new.contraindications)
    .bind(new.estimated_calories_per_min)
    .bind(new.intensity)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to upsert exercise {:?}", new.id))?;

    Ok(exercise)
}

/// Delete an exercise by id. Returns `true` if a row was removed.
pub async fn delete_exercise(pool: &PgPool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM exercise WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .with_context(|| format!("failed to delete exercise {id:?}"))?;

    Ok(result.rows_affected() > 0)
}

/// Count catalog entries.
pub async fn count_exercises(pool: &PgPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercise")
        .fetch_one(pool)
        .await
        .context("failed to count exercises")?;

    Ok(count)
}
