//! Settings for the tracing subscriber installed by the binary

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Environment};

/// How log lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, for log shippers
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" | "text" => Ok(LogFormat::Compact),
            other => Err(ConfigError::Invalid {
                key: "LOG_FORMAT".to_string(),
                message: format!("expected json, pretty or compact, got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive such as `info` or `agri_api=debug,sqlx=warn`
    pub level: String,
    pub format: LogFormat,
    /// Adds file and line to every event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    pub fn for_environment(env: Environment) -> Self {
        let (level, format, source_location) = match env {
            Environment::Development => ("debug,sqlx=warn", LogFormat::Pretty, true),
            Environment::Staging => ("info", LogFormat::Compact, false),
            Environment::Production => ("info", LogFormat::Json, false),
        };
        Self {
            level: level.to_string(),
            format,
            source_location,
        }
    }

    /// Environment defaults overridden by `LOG_LEVEL` and `LOG_FORMAT`
    ///
    /// `RUST_LOG` is read by the subscriber itself and wins over both.
    pub fn from_env(env: Environment) -> Self {
        let mut config = Self::for_environment(env);
        if let Some(level) = std::env::var("LOG_LEVEL").ok().filter(|l| !l.trim().is_empty()) {
            config.level = level;
        }
        if let Ok(raw) = std::env::var("LOG_FORMAT") {
            match raw.parse() {
                Ok(format) => config.format = format,
                Err(err) => tracing::warn!(error = %err, "Ignoring LOG_FORMAT"),
            }
        }
        config
    }
}
