//! Server configuration
//!
//! Layered in this order, later layers winning:
//! 1. built-in defaults
//! 2. TOML file (`~/.forumfusion/config.toml`, or an explicit path)
//! 3. environment variables (`DATABASE_URL`, `TOKEN_SECRET`, `STRIPE_SECRET_KEY`,
//!    `PORT`, `APP_ENV`, `CORS_ORIGINS`)
//!
//! CLI flags are applied on top by the binary.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Deployment environment. Controls session cookie attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Anything other than `production` is development.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Forum server configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForumConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    /// HMAC secret for session tokens
    pub token_secret: String,
    pub token_ttl_days: i64,
    pub environment: Environment,
    /// Origins allowed to call the API with credentials
    pub cors_origins: Vec<String>,
    /// Without a key, payment intent creation answers 503
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            database_url: String::new(),
            max_connections: crate::db::DEFAULT_MAX_CONNECTIONS,
            token_secret: String::new(),
            token_ttl_days: 365,
            environment: Environment::Development,
            cors_origins: vec!["http://localhost:5173".to_string()],
            stripe_secret_key: None,
            stripe_api_base: "https://api.stripe.com".to_string(),
        }
    }
}

impl fmt::Debug for ForumConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForumConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("token_secret", &"<redacted>")
            .field("token_ttl_days", &self.token_ttl_days)
            .field("environment", &self.environment)
            .field("cors_origins", &self.cors_origins)
            .field("stripe_secret_key", &self.stripe_secret_key.as_ref().map(|_| "<redacted>"))
            .field("stripe_api_base", &self.stripe_api_base)
            .finish()
    }
}

impl ForumConfig {
    /// Default config file path: ~/.forumfusion/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".forumfusion/config.toml")
    }

    /// Load defaults, the config file and the process environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(secret) = lookup("TOKEN_SECRET") {
            self.token_secret = secret;
        }
        if let Some(key) = lookup("STRIPE_SECRET_KEY").filter(|k| !k.trim().is_empty()) {
            self.stripe_secret_key = Some(key);
        }
        if let Some(port) = lookup("PORT") {
            let port: u16 = port.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "PORT",
                reason: format!("'{port}' is not a port number"),
            })?;
            self.bind_addr.set_port(port);
        }
        if let Some(env) = lookup("APP_ENV") {
            self.environment = Environment::from_name(&env);
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_owned)
                .collect();
        }
        Ok(())
    }

    /// Check required settings before starting the server.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "database_url",
                reason: "not set (use DATABASE_URL or the config file)".into(),
            });
        }
        if self.token_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "token_secret",
                reason: "not set (use TOKEN_SECRET or the config file)".into(),
            });
        }
        if self.bind_addr.port() == 0 {
            return Err(ConfigError::Invalid {
                field: "bind_addr",
                reason: "port must be non-zero".into(),
            });
        }
        if self.token_ttl_days <= 0 {
            return Err(ConfigError::Invalid {
                field: "token_ttl_days",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn valid() -> ForumConfig {
        ForumConfig {
            database_url: "postgres://localhost/forumfusion".into(),
            token_secret: "secret".into(),
            ..ForumConfig::default()
        }
    }

    #[test]
    fn defaults() {
        let config = ForumConfig::default();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.token_ttl_days, 365);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.stripe_secret_key.is_none());
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://db/forum"),
            ("TOKEN_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("STRIPE_SECRET_KEY", "sk_test_123"),
        ]
        .into_iter()
        .collect();

        let mut config = ForumConfig::default();
        config
            .apply_env(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database_url, "postgres://db/forum");
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.environment.is_production());
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.stripe_secret_key.as_deref(), Some("sk_test_123"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = ForumConfig::default();
        let err = config
            .apply_env(|k| (k == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "PORT", .. }));
    }

    #[test]
    fn validate_requires_secret_and_database() {
        assert!(valid().validate().is_ok());

        let config = ForumConfig {
            token_secret: "  ".into(),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "token_secret", .. })
        ));

        let config = ForumConfig {
            database_url: String::new(),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "database_url", .. })
        ));

        let mut config = valid();
        config.bind_addr.set_port(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn environment_names() {
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("PRODUCTION"), Environment::Production);
        assert_eq!(Environment::from_name("staging"), Environment::Development);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            bind_addr = "0.0.0.0:7000"
            environment = "production"
            "#
        )
        .unwrap();

        let config = ForumConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bind_addr.port(), 7000);
        assert!(config.environment.is_production());
        assert_eq!(config.token_ttl_days, 365);
    }

    #[test]
    fn explicit_missing_file_errors() {
        let err = ForumConfig::from_file(Path::new("/nonexistent/forumfusion.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = ForumConfig {
            stripe_secret_key: Some("sk_live_abc".into()),
            ..valid()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk_live_abc"));
        assert!(!debug.contains("\"secret\""));
    }
}
