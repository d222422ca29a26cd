//! Database connection settings.

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;
use std::time::Duration;
use ticket_trader_core::Environment;

/// Database name used outside the test profile.
pub const DEFAULT_DATABASE: &str = "ticket_trader";
/// Database name used by the test profile.
pub const DEFAULT_TEST_DATABASE: &str = "ticket_trader_test";

/// `PostgreSQL` connection configuration.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Server host name
    pub host: String,
    /// Server port
    pub port: u16,
    /// Login role
    pub user: String,
    /// Login password (never logged)
    pub password: String,
    /// Database to select
    pub database: String,
    /// Require TLS (the server certificate is not verified)
    pub ssl: bool,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Upper bound for connecting plus the liveness round trip
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Defaults for a deployment profile.
    ///
    /// Pool bounds follow the profile: development 2..10, test 1..5,
    /// production 2..20.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        let (database, min_connections, max_connections) = match environment {
            Environment::Development => (DEFAULT_DATABASE, 2, 10),
            Environment::Test => (DEFAULT_TEST_DATABASE, 1, 5),
            Environment::Production => (DEFAULT_DATABASE, 2, 20),
        };

        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "password".to_string(),
            database: database.to_string(),
            ssl: false,
            min_connections,
            max_connections,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Driver connect options for this configuration.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(ssl_mode)
    }

    /// Connection target without the password, for logs and errors.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("ssl", &self.ssl)
            .field("min_connections", &self.min_connections)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
