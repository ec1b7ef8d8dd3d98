//! Conversion configuration.
//!
//! [`ConvertConfig`] is an explicit value handed to every conversion; the
//! library never reads process-wide state on its own. The CLI builds one
//! from these sources (highest priority first):
//! 1. Command-line flags
//! 2. Environment variables (SHOTSCENE_API_KEY / OPENAI_API_KEY,
//!    SHOTSCENE_MODEL, SHOTSCENE_BASE_URL, SHOTSCENE_LANGUAGE)
//! 3. Config file (.shotscene/config.yaml in the current directory or a
//!    parent, else ~/.config/shotscene/config.yaml)
//! 4. Defaults

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::openai::DEFAULT_BASE_URL;
use crate::core::{InputLimits, RetryPolicy};
use crate::error::ConvertError;

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Everything a conversion needs to know
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Credential for the completion service
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Remote model variant to invoke
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    pub base_url: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Cap on generated tokens (service default if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Language for headings and descriptions (story language if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    pub retry: RetryPolicy,

    pub limits: InputLimits,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            max_tokens: None,
            request_timeout_seconds: 120,
            language: None,
            retry: RetryPolicy::default(),
            limits: InputLimits::default(),
        }
    }
}

impl fmt::Debug for ConvertConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertConfig")
            .field("api_key", &self.api_key.as_ref().map(|k| redact(k)))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("language", &self.language)
            .field("retry", &self.retry)
            .field("limits", &self.limits)
            .finish()
    }
}

impl ConvertConfig {
    /// Config with a credential and model, defaults elsewhere
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// The credential, or an authentication error if it is missing or blank
    pub fn api_key(&self) -> Result<&str, ConvertError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if key.chars().any(char::is_control) => Err(ConvertError::Authentication(
                "API key contains control characters".to_string(),
            )),
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConvertError::Authentication(
                "no API key configured (set SHOTSCENE_API_KEY or OPENAI_API_KEY)".to_string(),
            )),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Masked credential for display
    pub fn redacted_api_key(&self) -> String {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => redact(key),
            _ => "<not set>".to_string(),
        }
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("SHOTSCENE_API_KEY").or_else(|| get("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = get("SHOTSCENE_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = get("SHOTSCENE_BASE_URL").or_else(|| get("OPENAI_BASE_URL")) {
            self.base_url = base_url;
        }
        if let Some(language) = get("SHOTSCENE_LANGUAGE") {
            self.language = Some(language);
        }
    }
}

fn redact(key: &str) -> String {
    let visible: String = key.chars().take(3).collect();
    if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

/// Resolved configuration and where it came from
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub convert: ConvertConfig,

    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find a project config file by searching `start` and its parents
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".shotscene").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Per-user config file location
pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("shotscene").join("config.yaml"))
}

/// Load and parse a config file
pub fn load_config_file(path: &Path) -> Result<ConvertConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration from the file system and process environment
pub fn load_config(start_dir: &Path) -> Result<ResolvedConfig> {
    load_config_with(start_dir, user_config_file(), |key| std::env::var(key).ok())
}

/// Load configuration with explicit sources
pub fn load_config_with<F>(
    start_dir: &Path,
    user_config: Option<PathBuf>,
    env: F,
) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config_file =
        find_config_file(start_dir).or_else(|| user_config.filter(|path| path.exists()));

    let mut convert = match &config_file {
        Some(path) => load_config_file(path)?,
        None => ConvertConfig::default(),
    };
    convert.apply_env(env);

    Ok(ResolvedConfig {
        convert,
        config_file,
    })
}
