//! Redis connection lifecycle.

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::observer::{CacheObserver, LoggingObserver};
use redis::Client;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Owns the Redis client for the lifetime of the process.
///
/// Enforces connect-before-use: [`client`](Self::client) fails with
/// [`CacheError::Uninitialized`] until [`connect`](Self::connect) has
/// succeeded. Repeated or concurrent `connect()` calls are serialized and
/// reuse the established client.
pub struct CacheConnector {
    config: CacheConfig,
    observer: Arc<dyn CacheObserver>,
    client: Mutex<Option<ConnectionManager>>,
}

impl CacheConnector {
    /// Create a connector that reports lifecycle events to the log.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            observer: Arc::new(LoggingObserver),
            client: Mutex::new(None),
        }
    }

    /// Replace the lifecycle observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Configuration this connector was built with.
    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Connect, authenticate, select the database and verify with `PING`.
    ///
    /// The whole attempt is bounded by `connect_timeout`. Nothing is retried:
    /// a refused store fails on the first attempt.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Client`] if the configuration cannot produce a client
    /// - [`CacheError::Connect`] if the store is unreachable or authentication fails
    /// - [`CacheError::Verify`] if `PING` fails
    /// - [`CacheError::Timeout`] if the attempt exceeds `connect_timeout`
    pub async fn connect(&self) -> Result<ConnectionManager> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            debug!("Cache already connected, reusing client");
            return Ok(client.clone());
        }

        let address = self.config.redacted_url();
        let timeout = self.config.connect_timeout;

        let result = match tokio::time::timeout(timeout, self.open_verified_client(&address)).await
        {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(timeout)),
        };

        match result {
            Ok(client) => {
                *slot = Some(client.clone());
                Ok(client)
            }
            Err(e) => {
                self.observer.on_error(&address, &e);
                Err(e)
            }
        }
    }

    async fn open_verified_client(&self, address: &str) -> Result<ConnectionManager> {
        let client = Client::open(self.config.connection_info()).map_err(CacheError::Client)?;
        let connect_error = |source| CacheError::Connect {
            address: address.to_string(),
            source,
        };

        // One plain connection first: the manager retries a refused store
        // with backoff, so it is only built once the store has answered.
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(connect_error)?;
        self.observer.on_connect(address);

        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(CacheError::Verify)?;
        drop(conn);

        let manager = ConnectionManager::new(client).await.map_err(connect_error)?;
        self.observer.on_ready(address);

        Ok(manager)
    }

    /// Send `PING` on the connected client.
    ///
    /// A failure is reported to the observer as well as returned.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Uninitialized`] when not connected and
    /// [`CacheError::Verify`] when the round trip fails.
    pub async fn ping(&self) -> Result<()> {
        let mut client = self.client().await?;
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut client).await;

        pong.map(|_| ()).map_err(|source| {
            let error = CacheError::Verify(source);
            self.observer.on_error(&self.config.redacted_url(), &error);
            error
        })
    }

    /// A handle to the connected client.
    ///
    /// Handles are cheap clones sharing one multiplexed connection.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Uninitialized`] before a successful `connect()`
    /// or after `close()`.
    pub async fn client(&self) -> Result<ConnectionManager> {
        self.client
            .lock()
            .await
            .clone()
            .ok_or(CacheError::Uninitialized)
    }

    /// Whether a verified client is currently held.
    pub async fn is_connected(&self) -> bool {
        self.client.lock().await.is_some()
    }

    /// Send `QUIT` and forget the client. No-op when not connected.
    pub async fn close(&self) {
        let client = self.client.lock().await.take();
        match client {
            Some(mut client) => {
                let quit: redis::RedisResult<()> = redis::cmd("QUIT").query_async(&mut client).await;
                if let Err(e) = quit {
                    warn!(error = %e, "Redis QUIT failed, dropping connection");
                }
                info!(cache = %self.config.redacted_url(), "Redis connection closed");
            }
            None => debug!("Cache close requested while not connected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::time::{Duration, Instant};

    /// Records notifications in arrival order.
    #[derive(Default)]
    struct RecordingObserver {
        events: StdMutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<String> {
            self.events.lock().map(|e| e.clone()).unwrap_or_default()
        }

        fn push(&self, event: &str) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event.to_string());
            }
        }
    }

    impl CacheObserver for RecordingObserver {
        fn on_connect(&self, _address: &str) {
            self.push("connect");
        }

        fn on_ready(&self, _address: &str) {
            self.push("ready");
        }

        fn on_error(&self, _address: &str, _error: &CacheError) {
            self.push("error");
        }
    }

    fn unreachable_config() -> CacheConfig {
        CacheConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout: Duration::from_millis(500),
            ..CacheConfig::default()
        }
    }

    #[tokio::test]
    async fn test_client_before_connect_is_uninitialized() {
        let connector = CacheConnector::new(CacheConfig::default());
        assert!(matches!(
            connector.client().await,
            Err(CacheError::Uninitialized)
        ));
        assert!(!connector.is_connected().await);
    }

    #[tokio::test]
    async fn test_ping_before_connect_is_uninitialized() {
        let observer = Arc::new(RecordingObserver::default());
        let connector =
            CacheConnector::new(CacheConfig::default()).with_observer(observer.clone());

        assert!(matches!(
            connector.ping().await,
            Err(CacheError::Uninitialized)
        ));
        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn test_close_without_connect_is_noop() {
        let connector = CacheConnector::new(CacheConfig::default());
        connector.close().await;
        assert!(!connector.is_connected().await);
    }

    #[tokio::test]
    async fn test_unreachable_store_reports_error_only() {
        let observer = Arc::new(RecordingObserver::default());
        let config = CacheConfig {
            connect_timeout: Duration::from_secs(10),
            ..unreachable_config()
        };
        let connector = CacheConnector::new(config).with_observer(observer.clone());

        let started = Instant::now();
        let result = connector.connect().await;

        assert!(matches!(result, Err(CacheError::Connect { .. })));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(observer.events(), vec!["error".to_string()]);
        assert!(matches!(
            connector.client().await,
            Err(CacheError::Uninitialized)
        ));
    }
}
