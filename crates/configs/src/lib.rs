//! # configs
//!
//! Layered application configuration. Later sources win:
//!
//! 1. built-in defaults
//! 2. `config/cityboard.toml` (optional)
//! 3. environment variables prefixed `CITYBOARD_`, nested with `__`
//!    (e.g. `CITYBOARD_SERVER__PORT=9000`)
//!
//! A `.env` file is loaded into the environment first if present.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const DEFAULT_FILE: &str = "config/cityboard";
const ENV_PREFIX: &str = "CITYBOARD";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub media: MediaConfig,
    pub log: LogConfig,
    pub popularity: PopularityConfig,
    pub push: PushConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Where uploaded images are written.
    pub root_dir: String,
    /// URL path the root directory is served under.
    pub url_prefix: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopularityConfig {
    pub default_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    pub enabled: bool,
    /// Buffered messages per live connection before pushes are dropped.
    pub channel_capacity: usize,
}

impl AppConfig {
    /// Loads `.env`, the default config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(Some(DEFAULT_FILE))
    }

    /// Loads defaults, the optional file (extension inferred), and the
    /// environment, then validates the result.
    pub fn load_from(file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("media.root_dir", "./data/uploads")?
            .set_default("media.url_prefix", "/media")?
            .set_default("media.max_upload_bytes", 5 * 1024 * 1024)?
            .set_default("log.level", "info")?
            .set_default("log.format", "text")?
            .set_default("popularity.default_limit", 10)?
            .set_default("push.enabled", true)?
            .set_default("push.channel_capacity", 64)?;

        if let Some(file) = file {
            builder = builder.add_source(config::File::with_name(file).required(false));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be greater than 0".into()));
        }
        if self.media.root_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("media.root_dir is required".into()));
        }
        if !self.media.url_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(
                "media.url_prefix must start with '/'".into(),
            ));
        }
        if self.media.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "media.max_upload_bytes must be greater than 0".into(),
            ));
        }
        if self.popularity.default_limit == 0 {
            return Err(ConfigError::Invalid(
                "popularity.default_limit must be greater than 0".into(),
            ));
        }
        if self.push.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "push.channel_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
