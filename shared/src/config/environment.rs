//! Deployment environment detection

use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Where the API is running; decides logging defaults and CORS strictness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    /// Also used by the integration tests
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    /// `ENVIRONMENT`, then `APP_ENV`; unknown values fall back to development
    pub fn from_env() -> Self {
        let raw = env::var("ENVIRONMENT").or_else(|_| env::var("APP_ENV"));
        match raw {
            Ok(value) => value.parse().unwrap_or_else(|err: ConfigError| {
                tracing::warn!(error = %err, "Falling back to development environment");
                Environment::Development
            }),
            Err(_) => Environment::Development,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Invalid {
                key: "ENVIRONMENT".to_string(),
                message: format!("unknown environment '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(" Test ".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert!("qa-cluster".parse::<Environment>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for env in [
            Environment::Development,
            Environment::Staging,
            Environment::Production,
        ] {
            let json = serde_json::to_string(&env).unwrap();
            assert_eq!(json, format!("\"{}\"", env));
        }
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
    }
}
