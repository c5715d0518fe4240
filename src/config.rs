//! Application configuration.
//!
//! Settings merge three layers, later winning: serde defaults, an optional
//! `postforge.toml` file, and `POSTFORGE_*` environment variables (e.g.
//! `POSTFORGE_MODEL`, `POSTFORGE_SHEETS__SPREADSHEET_ID`). `GEMINI_API_KEY`
//! is honored as a fallback for the model API key so existing deployments
//! keep working.

use serde::Deserialize;
use thiserror::Error;

/// Configuration load/validation errors. Fatal at startup, never a
/// per-request condition.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// No API key in config or the `GEMINI_API_KEY` environment variable.
    #[error("missing model API key: set POSTFORGE_API_KEY or GEMINI_API_KEY")]
    MissingApiKey,
}

/// Spreadsheet persistence target.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Spreadsheet identifier (the long id in the sheet URL).
    pub spreadsheet_id: String,
    /// Worksheet (tab) name rows are appended to.
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    /// Ready OAuth bearer token for the Sheets API.
    pub access_token: String,
}

fn default_worksheet() -> String {
    "Posts".to_string()
}

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Model identifier passed to the generation API.
    #[serde(default = "default_model")]
    pub model: String,

    /// Model API key. May arrive via `GEMINI_API_KEY` instead.
    #[serde(default)]
    pub api_key: String,

    /// Per-token price used for cost estimates, in dollars.
    #[serde(default = "default_token_price")]
    pub token_price: f64,

    /// Per-request output token cap.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Local JSONL log path, used when no spreadsheet is configured.
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Optional spreadsheet target; when present it replaces the JSONL log.
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_token_price() -> f64 {
    0.000002
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_path() -> String {
    ".postforge/posts.jsonl".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            token_price: default_token_price(),
            max_output_tokens: default_max_output_tokens(),
            bind_addr: default_bind_addr(),
            log_path: default_log_path(),
            sheets: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file name and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("postforge")
    }

    /// Load configuration from a specific file basename (without extension)
    /// plus the environment.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("POSTFORGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: AppConfig = settings.try_deserialize()?;

        if cfg.api_key.is_empty() {
            if let Ok(key) = std::env::var("GEMINI_API_KEY") {
                cfg.api_key = key;
            }
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate required settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}
