use std::env;
use std::fmt;

/// Errors building a [`GatewayConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum GatewayConfigError {
    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),

    #[error("{0} is set but empty")]
    EmptyValue(&'static str),
}

/// Credential and model selection for the completion service.
///
/// One instance per composition root; it is handed to the gateway
/// explicitly and never stored globally.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_key: String,
    pub model: String,
    /// API root, without a trailing slash.
    pub base_url: String,
}

impl GatewayConfig {
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
    pub const MODEL_ENV: &str = "FITPLAN_MODEL";
    pub const BASE_URL_ENV: &str = "FITPLAN_MODEL_BASE_URL";

    /// Config for the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_owned(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Build a config from `GEMINI_API_KEY` (required), `FITPLAN_MODEL`, and
    /// `FITPLAN_MODEL_BASE_URL`.
    pub fn from_env() -> Result<Self, GatewayConfigError> {
        let api_key = env::var(Self::API_KEY_ENV)
            .map_err(|_| GatewayConfigError::MissingApiKey(Self::API_KEY_ENV))?;
        if api_key.trim().is_empty() {
            return Err(GatewayConfigError::EmptyValue(Self::API_KEY_ENV));
        }

        let mut config = Self::new(api_key);
        if let Some(model) = non_empty_var(Self::MODEL_ENV) {
            config = config.with_model(model);
        }
        if let Some(url) = non_empty_var(Self::BASE_URL_ENV) {
            config = config.with_base_url(url);
        }
        Ok(config)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}
