//! Exercise catalog accessor.
//!
//! Read-only access to the exercise knowledge base and the projection of
//! catalog rows into the shape embedded in plan-generation prompts. Store
//! failures surface as [`RepositoryError`]; nothing is retried.

pub mod store;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use fitplan_db::models::{Exercise, Intensity};

use crate::error::RepositoryError;

pub use store::{ExerciseStore, PgExerciseStore};

/// An exercise as presented to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProjection {
    pub id: String,
    pub name: String,
    pub description: String,
    pub muscle_groups: Vec<String>,
    pub equipment_required: Vec<String>,
    pub contraindications: Vec<String>,
    pub estimated_calories_per_min: Option<f64>,
    pub intensity: Intensity,
}

impl From<&Exercise> for ExerciseProjection {
    fn from(e: &Exercise) -> Self {
        Self {
            id: e.id.clone(),
            name: e.name.clone(),
            description: e.description.clone(),
            muscle_groups: e.muscle_groups.clone(),
            equipment_required: e.equipment_required.clone(),
            contraindications: e.contraindications.clone(),
            estimated_calories_per_min: e.estimated_calories_per_min,
            intensity: e.intensity,
        }
    }
}

impl From<&ExerciseProjection> for Value {
    fn from(p: &ExerciseProjection) -> Self {
        json!({
            "id": p.id,
            "name": p.name,
            "description": p.description,
            "muscle_groups": p.muscle_groups,
            "equipment_required": p.equipment_required,
            "contraindications": p.contraindications,
            "estimated_calories_per_min": p.estimated_calories_per_min,
            "intensity": p.intensity.to_string(),
        })
    }
}

/// Read access to the catalog through an [`ExerciseStore`].
#[derive(Debug, Clone)]
pub struct ExerciseCatalog<S> {
    store: S,
}

impl<S: ExerciseStore> ExerciseCatalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All catalog entries, in the store's natural order.
    pub async fn list_all(&self) -> Result<Vec<Exercise>, RepositoryError> {
        let exercises = self
            .store
            .list_all()
            .await
            .map_err(|e| RepositoryError::store("list_all", e))?;
        debug!(count = exercises.len(), "listed catalog");
        Ok(exercises)
    }

    /// Entries whose id is in `ids`.
    ///
    /// An empty id set returns an empty list without touching the store.
    /// Duplicate ids are collapsed before querying.
    pub async fn get_by_ids<I, T>(&self, ids: I) -> Result<Vec<Exercise>, RepositoryError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let ids: Vec<String> = ids
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let exercises = self
            .store
            .filter_by_ids(&ids)
            .await
            .map_err(|e| RepositoryError::store("get_by_ids", e))?;
        debug!(requested = ids.len(), found = exercises.len(), "fetched catalog subset");
        Ok(exercises)
    }
}

/// Project rows into the prompt-facing shape, preserving order.
pub fn project_for_model(exercises: &[Exercise]) -> Vec<ExerciseProjection> {
    exercises.iter().map(ExerciseProjection::from).collect()
}
