//! Settings for the service endpoint and the debug form.
//!
//! Read from `<config_dir>/stackoverfix/config.toml` when present; every
//! field has a default so a partial file is fine.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const SERVICE_URL_ENV: &str = "STACKOVERFIX_SERVICE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No timeout when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Lifetime of a client-issued session id; checked before the second call.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_session_ttl() -> u64 {
    300
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            session_ttl_secs: default_session_ttl(),
        }
    }
}

impl ServiceConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Sent as `user_prompt` when the prompt box is blank.
    #[serde(default = "default_prompt")]
    pub default_prompt: String,

    #[serde(default = "default_code_min_height")]
    pub stack_trace_min_height: f32,

    #[serde(default = "default_code_min_height")]
    pub code_snippet_min_height: f32,

    #[serde(default = "default_prompt_min_height")]
    pub prompt_min_height: f32,
}

fn default_prompt() -> String {
    "Please solve the bug".to_string()
}

fn default_code_min_height() -> f32 {
    200.0
}

fn default_prompt_min_height() -> f32 {
    100.0
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_prompt: default_prompt(),
            stack_trace_min_height: default_code_min_height(),
            code_snippet_min_height: default_code_min_height(),
            prompt_min_height: default_prompt_min_height(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub form: FormConfig,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stackoverfix").join("config.toml"))
    }

    /// Missing file means defaults; an unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Loads the default config file, then applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env_override(std::env::var(SERVICE_URL_ENV).ok());
        Ok(config)
    }

    fn apply_env_override(&mut self, base_url: Option<String>) {
        if let Some(url) = base_url {
            let url = url.trim();
            if !url.is_empty() {
                self.service.base_url = url.to_string();
            }
        }
    }
}
