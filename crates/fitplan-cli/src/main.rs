mod coach_cmds;
mod config;
mod exercise_cmds;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use fitplan_core::gateway::GatewayConfig;
use fitplan_db::config::DbConfig;
use fitplan_db::pool;
use fitplan_db::queries::exercises;

use config::FitplanConfig;

#[derive(Parser)]
#[command(name = "fitplan", about = "Turn fitness goals into workout plans with an LLM")]
struct Cli {
    /// Database URL (overrides FITPLAN_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fitplan config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Gemini API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Model id to use instead of the default
        #[arg(long)]
        model: Option<String>,
        /// Reject plans that step outside the offered exercises
        #[arg(long)]
        strict: bool,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create and migrate the catalog database
    DbInit,
    /// Exercise catalog management
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },
    /// Parse a free-text goal and print the goal profile as JSON
    Goal {
        /// The goal, in your own words
        text: String,
        /// Reject goals outside the supported set
        #[arg(long)]
        strict: bool,
    },
    /// Generate a workout plan for a free-text goal
    Plan {
        /// The goal, in your own words
        text: String,
        /// Offer only these exercise ids (repeatable; default: whole catalog)
        #[arg(long = "exercise", value_name = "ID")]
        exercise_ids: Vec<String>,
        /// Reject plans that step outside the offered exercises
        #[arg(long)]
        strict: bool,
        /// Print the goal and plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ExerciseCommands {
    /// List the catalog
    List {
        /// Show full details for every entry
        #[arg(long)]
        verbose: bool,
    },
    /// Show one or more entries
    Show {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Upsert entries from a JSON fixture file
    Import {
        file: PathBuf,
    },
    /// Delete an entry
    Remove {
        id: String,
    },
}

fn cmd_init(
    db_url: &str,
    api_key: Option<String>,
    model: Option<String>,
    strict: bool,
    force: bool,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let has_key = api_key.is_some();
    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        model: config::ModelSection { api_key, model },
        planning: config::PlanningSection { strict },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    if has_key {
        println!("  model.api_key = [set]");
    } else {
        println!(
            "  model.api_key not set; export {} before running `fitplan goal` or `fitplan plan`",
            GatewayConfig::API_KEY_ENV
        );
    }
    if let Some(model) = &cfg.model.model {
        println!("  model.model = {model}");
    }
    println!("  planning.strict = {strict}");
    println!();
    println!("Next: run `fitplan db-init` to create and migrate the database.");

    Ok(())
}

async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = FitplanConfig::resolve(cli_db_url)?;

    println!("Initializing fitplan database...");

    // 1. Create the database if it does not exist.
    pool::ensure_database_exists(&resolved.db_config).await?;

    // 2. Connect to the target database.
    let db_pool = pool::create_pool(&resolved.db_config).await?;

    // 3. Run migrations.
    let result = pool::run_migrations(&db_pool).await;

    // 4. Report catalog size.
    let count = match result {
        Ok(()) => exercises::count_exercises(&db_pool).await,
        Err(e) => Err(e),
    };

    // 5. Clean shutdown.
    db_pool.close().await;

    println!("Database ready. exercise: {} rows", count?);
    println!("fitplan db-init complete.");
    Ok(())
}

fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            db_url,
            api_key,
            model,
            strict,
            force,
        } => {
            cmd_init(&db_url, api_key, model, strict, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Exercise { command } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = exercise_cmds::run_exercise_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Goal { text, strict } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref())?;
            coach_cmds::run_goal(&resolved, &text, strict).await?;
        }
        Commands::Plan {
            text,
            exercise_ids,
            strict,
            json,
        } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let params = coach_cmds::PlanParams {
                text,
                exercise_ids,
                strict,
                json,
            };
            let result = coach_cmds::run_plan(&db_pool, &resolved, params).await;
            db_pool.close().await;
            result?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}
