//! HTTP listener and CORS settings

use std::str::FromStr;

use serde::{Deserialize, Serialize};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_KEEP_ALIVE_SECS: u64 = 75;
const DEFAULT_MAX_PAYLOAD_BYTES: usize = 2 * 1024 * 1024;
const DEFAULT_CORS_MAX_AGE_SECS: usize = 3600;

/// First of `keys` that is set and parses, else `default`
fn env_value<T: FromStr>(keys: &[&str], default: T) -> T {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .find_map(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// actix worker count; 0 keeps actix's per-core default
    #[serde(default)]
    pub workers: usize,

    #[serde(default = "default_keep_alive")]
    pub keep_alive: u64,

    /// Upper bound for JSON request bodies, in bytes
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            workers: 0,
            keep_alive: DEFAULT_KEEP_ALIVE_SECS,
            max_payload_size: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Reads `SERVER_HOST`, `PORT`/`SERVER_PORT`, `SERVER_WORKERS`,
    /// `SERVER_KEEP_ALIVE` and `MAX_PAYLOAD_SIZE`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_value(&["SERVER_HOST"], defaults.host),
            port: env_value(&["PORT", "SERVER_PORT"], defaults.port),
            workers: env_value(&["SERVER_WORKERS"], defaults.workers),
            keep_alive: env_value(&["SERVER_KEEP_ALIVE"], defaults.keep_alive),
            max_payload_size: env_value(&["MAX_PAYLOAD_SIZE"], defaults.max_payload_size),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Origins allowed to call the API from a browser
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Empty, or containing `*`, means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Preflight cache lifetime in seconds
    #[serde(default = "default_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age: DEFAULT_CORS_MAX_AGE_SECS,
        }
    }
}

impl CorsConfig {
    /// Reads the comma separated `ALLOWED_ORIGINS` and `CORS_MAX_AGE`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();
        Self {
            allowed_origins,
            max_age: env_value(&["CORS_MAX_AGE"], DEFAULT_CORS_MAX_AGE_SECS),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_keep_alive() -> u64 {
    DEFAULT_KEEP_ALIVE_SECS
}

fn default_max_payload_size() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

fn default_max_age() -> usize {
    DEFAULT_CORS_MAX_AGE_SECS
}
