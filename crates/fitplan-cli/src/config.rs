//! Configuration file management for fitplan.
//!
//! Provides a TOML-based config file at `~/.config/fitplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use fitplan_core::gateway::GatewayConfig;
use fitplan_core::planner::{PlannerOptions, ValidationMode};
use fitplan_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub planning: PlanningSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DbConfig::DEFAULT_URL.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelSection {
    /// Gemini API key. Prefer the `GEMINI_API_KEY` env var on shared machines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PlanningSection {
    /// Reject plans that reference exercises outside the offered set.
    #[serde(default)]
    pub strict: bool,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the fitplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/fitplan` or `~/.config/fitplan`.
/// The platform-specific `dirs::config_dir()` is ignored (it returns
/// `~/Library/Application Support` on macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("fitplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("fitplan")
}

/// Return the path to the fitplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix, since it may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct FitplanConfig {
    pub db_config: DbConfig,
    /// `None` when no API key is configured anywhere; only the model
    /// commands need one.
    pub gateway_config: Option<GatewayConfig>,
    pub planner_options: PlannerOptions,
}

impl FitplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: `cli_db_url` > `FITPLAN_DATABASE_URL` > `database.url` > `DbConfig::DEFAULT_URL`
    /// - API key: `GEMINI_API_KEY` > `model.api_key` > none
    /// - Model: `FITPLAN_MODEL` > `model.model` > `GatewayConfig::DEFAULT_MODEL`
    /// - Base URL: `FITPLAN_MODEL_BASE_URL` > `GatewayConfig::DEFAULT_BASE_URL`
    /// - Validation: `planning.strict` > permissive
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        // DB URL resolution.
        let db_url = if let Some(url) = cli_db_url {
            url.to_string()
        } else if let Ok(url) = std::env::var(DbConfig::ENV_VAR) {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_string()
        };
        let db_config = DbConfig::new(db_url);

        // Gateway resolution.
        let file_model = file_config.as_ref().map(|c| &c.model);
        let api_key = env_non_empty(GatewayConfig::API_KEY_ENV)
            .or_else(|| file_model.and_then(|m| m.api_key.clone()))
            .filter(|k| !k.trim().is_empty());
        let model = env_non_empty(GatewayConfig::MODEL_ENV)
            .or_else(|| file_model.and_then(|m| m.model.clone()));
        let base_url = env_non_empty(GatewayConfig::BASE_URL_ENV);

        let gateway_config = api_key.map(|key| {
            let mut cfg = GatewayConfig::new(key);
            if let Some(model) = model {
                cfg = cfg.with_model(model);
            }
            if let Some(url) = base_url {
                cfg = cfg.with_base_url(url);
            }
            cfg
        });

        let strict = file_config.as_ref().is_some_and(|c| c.planning.strict);
        let planner_options = PlannerOptions {
            validation: if strict {
                ValidationMode::Strict
            } else {
                ValidationMode::Permissive
            },
            ..PlannerOptions::default()
        };

        Ok(Self {
            db_config,
            gateway_config,
            planner_options,
        })
    }

    /// The gateway config, or an error explaining how to provide a key.
    pub fn require_gateway(&self) -> Result<GatewayConfig> {
        match &self.gateway_config {
            Some(cfg) => Ok(cfg.clone()),
            None => bail!(
                "Gemini API key not found; set {} or run `fitplan init --api-key <KEY>`",
                GatewayConfig::API_KEY_ENV
            ),
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
