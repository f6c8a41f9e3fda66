//! The `ExerciseStore` trait -- the read interface to catalog persistence.
//!
//! The accessor in [`super::ExerciseCatalog`] depends only on this trait, so
//! the PostgreSQL store can be replaced by an in-memory one in tests.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use fitplan_db::models::Exercise;
use fitplan_db::queries::exercises;

/// Read access to stored exercise records keyed by string id.
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Every stored exercise in the store's natural order.
    async fn list_all(&self) -> Result<Vec<Exercise>>;

    /// Exercises whose id is in `ids`. Unknown ids are skipped.
    async fn filter_by_ids(&self, ids: &[String]) -> Result<Vec<Exercise>>;
}

// Compile-time assertion: ExerciseStore must be usable as `dyn ExerciseStore`.
const _: () = {
    fn _assert_object_safe(_: &dyn ExerciseStore) {}
};

/// [`ExerciseStore`] backed by the `exercise` table.
#[derive(Debug, Clone)]
pub struct PgExerciseStore {
    pool: PgPool,
}

impl PgExerciseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExerciseStore for PgExerciseStore {
    async fn list_all(&self) -> Result<Vec<Exercise>> {
        exercises::list_exercises(&self.pool).await
    }

    async fn filter_by_ids(&self, ids: &[String]) -> Result<Vec<Exercise>> {
        exercises::get_exercises_by_ids(&self.pool, ids).await
    }
}
