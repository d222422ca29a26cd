//! Configuration management for the API server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Empty variables count as unset. Malformed values are rejected instead of
//! silently replaced by defaults.

use axum::http::HeaderValue;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use ticket_trader_cache::CacheConfig;
use ticket_trader_core::constants::{Environment, UnknownEnvironment};
use ticket_trader_postgres::DatabaseConfig;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `APP_ENV` / `NODE_ENV` names an unknown profile.
    #[error(transparent)]
    UnknownEnvironment(#[from] UnknownEnvironment),

    /// A variable is present but cannot be parsed.
    #[error("invalid value for {key}: `{value}`")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },
}

/// Application configuration, immutable after load.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment profile
    pub environment: Environment,
    /// HTTP server settings
    pub server: ServerConfig,
    /// `PostgreSQL` settings
    pub database: DatabaseConfig,
    /// Redis settings
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Origin allowed by CORS (credentials enabled)
    pub cors_origin: HeaderValue,
    /// Upper bound for draining in-flight requests on shutdown
    pub shutdown_timeout: Duration,
    /// Log level overriding the profile default
    pub log_level: Option<String>,
}

impl ServerConfig {
    /// `host:port` the listener binds to.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEnvironment`] for an unknown profile name
    /// and [`ConfigError::Invalid`] for malformed numbers, booleans, origins or
    /// inverted pool bounds.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let environment = match vars.get("APP_ENV").or_else(|| vars.get("NODE_ENV")) {
            Some(name) => name.parse()?,
            None => Environment::default(),
        };

        Ok(Self {
            environment,
            server: server_config(&vars)?,
            database: database_config(&vars, environment)?,
            cache: cache_config(&vars)?,
        })
    }
}

fn server_config<F>(vars: &Vars<F>) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let cors_origin = vars
        .get("CORS_ORIGIN")
        .unwrap_or_else(|| "http://localhost:3000".to_string());
    let cors_origin = HeaderValue::from_str(&cors_origin).map_err(|_| ConfigError::Invalid {
        key: "CORS_ORIGIN",
        value: cors_origin.clone(),
    })?;

    Ok(ServerConfig {
        host: vars.get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
        port: vars.parse_or("PORT", 3000)?,
        cors_origin,
        shutdown_timeout: Duration::from_secs(vars.parse_or("SHUTDOWN_TIMEOUT", 10)?),
        log_level: vars.get("LOG_LEVEL"),
    })
}

fn database_config<F>(vars: &Vars<F>, environment: Environment) -> Result<DatabaseConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = DatabaseConfig::for_environment(environment);

    let database_key = if environment == Environment::Test {
        "DB_TEST_NAME"
    } else {
        "DB_NAME"
    };

    let config = DatabaseConfig {
        host: vars.get("DB_HOST").unwrap_or(defaults.host),
        port: vars.parse_or("DB_PORT", defaults.port)?,
        user: vars.get("DB_USER").unwrap_or(defaults.user),
        password: vars.get("DB_PASSWORD").unwrap_or(defaults.password),
        database: vars.get(database_key).unwrap_or(defaults.database),
        ssl: vars.flag_or("DB_SSL", defaults.ssl)?,
        min_connections: vars.parse_or("DB_POOL_MIN", defaults.min_connections)?,
        max_connections: vars.parse_or("DB_POOL_MAX", defaults.max_connections)?,
        connect_timeout: vars.seconds_or("DB_CONNECT_TIMEOUT", defaults.connect_timeout)?,
    };

    if config.min_connections > config.max_connections {
        return Err(ConfigError::Invalid {
            key: "DB_POOL_MIN",
            value: config.min_connections.to_string(),
        });
    }

    Ok(config)
}

fn cache_config<F>(vars: &Vars<F>) -> Result<CacheConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = CacheConfig::default();

    Ok(CacheConfig {
        host: vars.get("REDIS_HOST").unwrap_or(defaults.host),
        port: vars.parse_or("REDIS_PORT", defaults.port)?,
        password: vars.get("REDIS_PASSWORD"),
        db: vars.parse_or("REDIS_DB", defaults.db)?,
        connect_timeout: vars.seconds_or("REDIS_CONNECT_TIMEOUT", defaults.connect_timeout)?,
    })
}

/// Variable source with typed accessors.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
    {
        match self.get(key) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }

    fn flag_or(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ConfigError::Invalid { key, value }),
            },
            None => Ok(default),
        }
    }

    fn seconds_or(&self, key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        self.parse_or(key, default.as_secs()).map(Duration::from_secs)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "environment={} listen={} database={} cache={}",
            self.environment,
            self.server.address(),
            self.database.redacted_url(),
            self.cache.redacted_url(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.address(), "0.0.0.0:3000");
        assert_eq!(config.server.cors_origin, "http://localhost:3000");
        assert_eq!(config.server.shutdown_timeout, Duration::from_secs(10));
        assert_eq!(config.server.log_level, None);
        assert_eq!(config.database.database, "ticket_trader");
        assert_eq!(config.database.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.cache.redacted_url(), "redis://localhost:6379/0");
        assert_eq!(config.cache.password, None);
    }

    #[test]
    fn test_app_env_wins_over_node_env() {
        let config = load(&[("APP_ENV", "production"), ("NODE_ENV", "test")]).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(
            (config.database.min_connections, config.database.max_connections),
            (2, 20)
        );

        let config = load(&[("NODE_ENV", "test")]).unwrap();
        assert_eq!(config.environment, Environment::Test);
    }

    #[test]
    fn test_unknown_environment_rejected() {
        let result = load(&[("NODE_ENV", "staging")]);
        assert!(matches!(result, Err(ConfigError::UnknownEnvironment(_))));
    }

    #[test]
    fn test_test_profile_uses_test_database() {
        let config = load(&[("NODE_ENV", "test"), ("DB_NAME", "ignored")]).unwrap();
        assert_eq!(config.database.database, "ticket_trader_test");

        let config = load(&[("NODE_ENV", "test"), ("DB_TEST_NAME", "ci_db")]).unwrap();
        assert_eq!(config.database.database, "ci_db");
        assert_eq!(
            (config.database.min_connections, config.database.max_connections),
            (1, 5)
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("DB_HOST", "db.internal"),
            ("DB_SSL", "true"),
            ("DB_POOL_MAX", "50"),
            ("REDIS_PASSWORD", "s3cret"),
            ("REDIS_DB", "2"),
            ("REDIS_CONNECT_TIMEOUT", "5"),
            ("LOG_LEVEL", "warn"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.host, "db.internal");
        assert!(config.database.ssl);
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.cache.password.as_deref(), Some("s3cret"));
        assert_eq!(config.cache.db, 2);
        assert_eq!(config.cache.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.server.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = load(&[("REDIS_PASSWORD", ""), ("PORT", "  ")]).unwrap();
        assert_eq!(config.cache.password, None);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_malformed_values_rejected() {
        let result = load(&[("PORT", "eighty")]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "PORT", ref value }) if value == "eighty"
        ));

        let result = load(&[("DB_SSL", "yes please")]);
        assert!(matches!(result, Err(ConfigError::Invalid { key: "DB_SSL", .. })));
    }

    #[test]
    fn test_inverted_pool_bounds_rejected() {
        let result = load(&[("DB_POOL_MIN", "8"), ("DB_POOL_MAX", "4")]);
        assert!(matches!(result, Err(ConfigError::Invalid { key: "DB_POOL_MIN", .. })));
    }

    #[test]
    fn test_secrets_never_rendered() {
        let config = load(&[("DB_PASSWORD", "hunter2"), ("REDIS_PASSWORD", "s3cret")]).unwrap();
        let rendered = format!("{config} {config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cret"));
    }
}
