//! Integration tests for the `fitplan exercise` commands.
//!
//! Runs the built binary against an isolated temporary database from the
//! shared PostgreSQL in `fitplan-test-utils`.

use std::path::Path;
use std::process::{Command, Output};

use fitplan_db::queries::exercises;
use fitplan_test_utils::{create_test_db, drop_test_db, pg_url};

const FIXTURE: &str = r#"[
    {
        "model": "exercises.exercise",
        "pk": "seated_punches",
        "fields": {
            "name": "Seated Punches",
            "description": "Alternate punches while seated.",
            "muscle_groups": ["arms", "shoulders"],
            "equipment_required": [],
            "contraindications": [],
            "estimated_calories_per_min": 5.0,
            "intensity": "medium"
        }
    },
    {"id": "march_in_place", "name": "March in Place", "contraindications": ["knee"]}
]"#;

fn fitplan(db_url: &str, config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fitplan"))
        .arg("--database-url")
        .arg(db_url)
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("FITPLAN_DATABASE_URL")
        .env_remove("GEMINI_API_KEY")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run fitplan binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[tokio::test]
async fn import_list_show_remove() {
    let (pool, db_name) = create_test_db().await;
    let db_url = format!("{}/{db_name}", pg_url().await);
    let tmp = tempfile::TempDir::new().unwrap();
    let fixture = tmp.path().join("exercises.json");
    std::fs::write(&fixture, FIXTURE).unwrap();

    let out = fitplan(&db_url, tmp.path(), &["exercise", "import", fixture.to_str().unwrap()]);
    assert!(out.status.success(), "import failed: {}", stderr(&out));
    assert!(stdout(&out).contains("Imported 2 exercise(s)"), "{}", stdout(&out));
    assert_eq!(exercises::count_exercises(&pool).await.unwrap(), 2);

    let out = fitplan(&db_url, tmp.path(), &["exercise", "list"]);
    assert!(out.status.success(), "list failed: {}", stderr(&out));
    let listed = stdout(&out);
    assert!(listed.contains("march_in_place"), "{listed}");
    assert!(listed.contains("Seated Punches"), "{listed}");

    let out = fitplan(&db_url, tmp.path(), &["exercise", "show", "march_in_place"]);
    assert!(out.status.success(), "show failed: {}", stderr(&out));
    assert!(stdout(&out).contains("Contraindications: knee"), "{}", stdout(&out));

    let out = fitplan(&db_url, tmp.path(), &["exercise", "show", "burpees"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("burpees"), "{}", stderr(&out));

    let out = fitplan(&db_url, tmp.path(), &["exercise", "remove", "march_in_place"]);
    assert!(out.status.success(), "remove failed: {}", stderr(&out));
    assert_eq!(exercises::count_exercises(&pool).await.unwrap(), 1);

    let out = fitplan(&db_url, tmp.path(), &["exercise", "remove", "march_in_place"]);
    assert!(!out.status.success());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn import_is_idempotent() {
    let (pool, db_name) = create_test_db().await;
    let db_url = format!("{}/{db_name}", pg_url().await);
    let tmp = tempfile::TempDir::new().unwrap();
    let fixture = tmp.path().join("exercises.json");
    std::fs::write(&fixture, FIXTURE).unwrap();

    for _ in 0..2 {
        let out = fitplan(&db_url, tmp.path(), &["exercise", "import", fixture.to_str().unwrap()]);
        assert!(out.status.success(), "import failed: {}", stderr(&out));
    }
    assert_eq!(exercises::count_exercises(&pool).await.unwrap(), 2);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn plan_without_api_key_fails_before_calling_model() {
    let (pool, db_name) = create_test_db().await;
    let db_url = format!("{}/{db_name}", pg_url().await);
    let tmp = tempfile::TempDir::new().unwrap();

    let out = fitplan(&db_url, tmp.path(), &["plan", "burn calories"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("GEMINI_API_KEY"), "{}", stderr(&out));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[test]
fn completions_are_generated_without_a_database() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = fitplan("postgresql://unused:1/none", tmp.path(), &["completions", "bash"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("fitplan"));
}

#[test]
fn init_writes_config_and_refuses_to_overwrite() {
    let tmp = tempfile::TempDir::new().unwrap();
    let args = ["init", "--db-url", "postgresql://h:5432/fp", "--api-key", "k", "--strict"];

    let out = fitplan("postgresql://unused:1/none", tmp.path(), &args);
    assert!(out.status.success(), "{}", stderr(&out));
    let written = std::fs::read_to_string(tmp.path().join("fitplan/config.toml")).unwrap();
    assert!(written.contains("postgresql://h:5432/fp"), "{written}");
    assert!(written.contains("strict = true"), "{written}");

    let out = fitplan("postgresql://unused:1/none", tmp.path(), &args);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("--force"), "{}", stderr(&out));
}
