//! Settings loaded from the environment.
//!
//! Built once at startup and passed explicitly into the components that need
//! it; there is no ambient configuration state. Values come from an env file
//! at `<config_dir>/env` and from the process environment, the latter
//! winning.

use std::path::PathBuf;

use thiserror::Error;

/// Environment variable names.
pub mod vars {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const LLM_CODE_MODEL: &str = "LLM_CODE_MODEL";
    pub const LLM_CODE_TEMPERATURE: &str = "LLM_CODE_TEMPERATURE";
    pub const LLM_CODE_MAX_TOKENS: &str = "LLM_CODE_MAX_TOKENS";
    pub const LLM_CODE_CONFIG_DIR: &str = "LLM_CODE_CONFIG_DIR";
    pub const LLM_CODE_API_BASE: &str = "LLM_CODE_API_BASE";
}

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f64 = 0.8;
const DEFAULT_MAX_TOKENS: u32 = 1000;
const CONFIG_DIR_NAME: &str = ".llm-code";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("required environment variable not set: {var}")]
    NotSet { var: &'static str },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },

    #[error("could not determine a home directory; set LLM_CODE_CONFIG_DIR")]
    NoHomeDir,
}

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub config_dir: PathBuf,
    /// Override for the API host (compatible proxies).
    pub api_base: Option<String>,
}

impl Settings {
    /// Load settings from `<config_dir>/env` and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        let config_dir = match std::env::var(vars::LLM_CODE_CONFIG_DIR) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::home_dir()
                .ok_or(SettingsError::NoHomeDir)?
                .join(CONFIG_DIR_NAME),
        };

        // Absence of the env file is fine; the process environment may
        // carry everything.
        let _ = dotenvy::from_path(config_dir.join("env"));

        Ok(Self {
            openai_api_key: std::env::var(vars::OPENAI_API_KEY).ok().filter(|k| !k.is_empty()),
            model: std::env::var(vars::LLM_CODE_MODEL)
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature: parse_var(vars::LLM_CODE_TEMPERATURE, DEFAULT_TEMPERATURE)?,
            max_tokens: parse_var(vars::LLM_CODE_MAX_TOKENS, DEFAULT_MAX_TOKENS)?,
            config_dir,
            api_base: std::env::var(vars::LLM_CODE_API_BASE).ok(),
        })
    }

    /// The credential, or the fatal configuration error for its absence.
    pub fn require_api_key(&self) -> Result<&str, SettingsError> {
        self.openai_api_key.as_deref().ok_or(SettingsError::NotSet {
            var: vars::OPENAI_API_KEY,
        })
    }

    /// Location of the on-disk record store.
    pub fn db_path(&self) -> PathBuf {
        self.config_dir.join("db.sqlite")
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, SettingsError> {
    match std::env::var(var) {
        Ok(value) => value.parse().map_err(|_| SettingsError::InvalidValue {
            var,
            message: format!("could not parse `{value}`"),
        }),
        Err(_) => Ok(default),
    }
}
