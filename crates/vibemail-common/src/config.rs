//! Configuration for VibeMail

use crate::types::QuotaAccounting;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Sending simulation configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// AI assistant configuration
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Hostname
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            bind_address: default_bind_address(),
        }
    }
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API port
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Serve the OpenAPI document and docs page
    #[serde(default = "default_enable_docs")]
    pub enable_docs: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
            enable_docs: default_enable_docs(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_api_port() -> u16 {
    8080
}

fn default_enable_docs() -> bool {
    true
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend: "fs" or "memory"
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Directory holding one file per persisted slot
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: default_storage_path(),
        }
    }
}

fn default_storage_backend() -> String {
    "fs".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data")
}

/// Sending simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run the simulation worker
    #[serde(default = "default_engine_enabled")]
    pub enabled: bool,

    /// Seconds between ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,

    /// Largest batch simulated per campaign per tick
    #[serde(default = "default_max_batch")]
    pub max_batch: u32,

    /// Probability that a tick records opens
    #[serde(default = "default_open_probability")]
    pub open_probability: f64,

    /// Share of the batch counted as opened when opens are recorded
    #[serde(default = "default_open_factor")]
    pub open_factor: f64,

    /// Probability that a tick records one reply
    #[serde(default = "default_reply_probability")]
    pub reply_probability: f64,

    /// How account quota is charged
    #[serde(default)]
    pub quota_accounting: QuotaAccounting,

    /// Reset `sentToday` when the UTC day changes
    #[serde(default = "default_daily_reset")]
    pub daily_reset: bool,

    /// Move exhausted running campaigns to `completed`
    #[serde(default)]
    pub auto_complete: bool,

    /// Fixed RNG seed (reproducible runs)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: default_engine_enabled(),
            tick_interval_secs: default_tick_interval(),
            max_batch: default_max_batch(),
            open_probability: default_open_probability(),
            open_factor: default_open_factor(),
            reply_probability: default_reply_probability(),
            quota_accounting: QuotaAccounting::default(),
            daily_reset: default_daily_reset(),
            auto_complete: false,
            seed: None,
        }
    }
}

fn default_engine_enabled() -> bool {
    true
}

fn default_tick_interval() -> u64 {
    5
}

fn default_max_batch() -> u32 {
    3
}

fn default_open_probability() -> f64 {
    0.4
}

fn default_open_factor() -> f64 {
    0.4
}

fn default_reply_probability() -> f64 {
    0.1
}

fn default_daily_reset() -> bool {
    true
}

/// AI assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Enable the AI assistant (falls back to placeholder text when off)
    #[serde(default = "default_assistant_enabled")]
    pub enabled: bool,

    /// Base URL of the generative language API
    #[serde(default = "default_assistant_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_assistant_model")]
    pub model: String,

    /// API key; `GEMINI_API_KEY` or `API_KEY` are used when unset
    pub api_key: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_assistant_timeout")]
    pub timeout_ms: u64,

    /// Sampling temperature for copy generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Top-k for copy generation
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Top-p for copy generation
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Product context sent with every copy request
    #[serde(default = "default_copy_context")]
    pub copy_context: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: default_assistant_enabled(),
            endpoint: default_assistant_endpoint(),
            model: default_assistant_model(),
            api_key: None,
            timeout_ms: default_assistant_timeout(),
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            copy_context: default_copy_context(),
        }
    }
}

impl AssistantConfig {
    /// Configured API key, falling back to the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

fn default_assistant_enabled() -> bool {
    true
}

fn default_assistant_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_assistant_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_assistant_timeout() -> u64 {
    30_000
}

fn default_temperature() -> f32 {
    0.8
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.95
}

fn default_copy_context() -> String {
    "VibeMail AI outreach".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `VIBEMAIL_CONFIG` or the default locations.
    ///
    /// Falls back to built-in defaults when no file exists.
    pub fn load() -> crate::Result<Self> {
        if let Ok(path) = std::env::var("VIBEMAIL_CONFIG") {
            return Self::from_file(Path::new(&path));
        }

        let paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("/etc/vibemail/config.toml"),
        ];

        for path in paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        let engine = &self.engine;
        if engine.tick_interval_secs == 0 {
            return Err(crate::Error::Config(
                "engine.tick_interval_secs must be positive".to_string(),
            ));
        }
        if engine.max_batch == 0 {
            return Err(crate::Error::Config(
                "engine.max_batch must be positive".to_string(),
            ));
        }
        for (name, p) in [
            ("open_probability", engine.open_probability),
            ("open_factor", engine.open_factor),
            ("reply_probability", engine.reply_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(crate::Error::Config(format!(
                    "engine.{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        match self.storage.backend.as_str() {
            "fs" | "memory" => Ok(()),
            other => Err(crate::Error::Config(format!(
                "Unsupported storage backend: {}",
                other
            ))),
        }
    }
}
