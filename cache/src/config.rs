//! Cache connection settings.

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use std::fmt;
use std::time::Duration;

/// Redis connection configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Server host name
    pub host: String,
    /// Server port
    pub port: u16,
    /// `AUTH` password; `None` skips authentication
    pub password: Option<String>,
    /// Logical database index to `SELECT`
    pub db: i64,
    /// Upper bound for connecting plus the `PING` round trip
    pub connect_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl CacheConfig {
    /// Driver connection info for this configuration.
    #[must_use]
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                db: self.db,
                password: self.password.clone(),
                ..RedisConnectionInfo::default()
            },
        }
    }

    /// Connection target without credentials, for logs and errors.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("db", &self.db)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
