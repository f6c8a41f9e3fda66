//! Integration tests for the embedded migrations.

use sqlx::Row;

use fitplan_db::pool;
use fitplan_test_utils::{create_test_db, drop_test_db};

#[tokio::test]
async fn migrations_create_exercise_table() {
    let (pool, db_name) = create_test_db().await;

    let row = sqlx::query(
        "SELECT COUNT(*) AS n FROM information_schema.tables \
         WHERE table_schema = 'public' AND table_name = 'exercise'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let n: i64 = row.get("n");
    assert_eq!(n, 1);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let (pool, db_name) = create_test_db().await;

    // create_test_db already migrated once.
    pool::run_migrations(&pool)
        .await
        .expect("re-running migrations should be a no-op");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn intensity_check_rejects_unknown_values() {
    let (pool, db_name) = create_test_db().await;

    let result = sqlx::query("INSERT INTO exercise (id, name, intensity) VALUES ('x', 'X', 'extreme')")
        .execute(&pool)
        .await;
    assert!(result.is_err());

    pool.close().await;
    drop_test_db(&db_name).await;
}
