//! Integration tests for `CacheConnector` using testcontainers.
//!
//! # Requirements
//!
//! Docker must be running. The tests are ignored by default:
//!
//! ```bash
//! cargo test -p ticket-trader-cache -- --ignored
//! ```

#![allow(clippy::expect_used)] // Test code uses expect for clear failure messages

use redis::AsyncCommands;
use std::sync::{Arc, Mutex};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use ticket_trader_cache::{CacheConfig, CacheConnector, CacheError, CacheObserver};

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<&'static str> {
        self.events.lock().expect("observer lock").clone()
    }
}

impl CacheObserver for RecordingObserver {
    fn on_connect(&self, _address: &str) {
        self.events.lock().expect("observer lock").push("connect");
    }

    fn on_ready(&self, _address: &str) {
        self.events.lock().expect("observer lock").push("ready");
    }

    fn on_error(&self, _address: &str, _error: &CacheError) {
        self.events.lock().expect("observer lock").push("error");
    }
}

async fn start_redis() -> (ContainerAsync<Redis>, CacheConfig) {
    let container = Redis::default()
        .start()
        .await
        .expect("Failed to start redis container");

    let port = container
        .get_host_port_ipv4(6379)
        .await
        .expect("Failed to get redis port");

    let config = CacheConfig {
        host: "127.0.0.1".to_string(),
        port,
        db: 1,
        ..CacheConfig::default()
    };

    (container, config)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_connect_notifies_connect_then_ready() {
    let (_container, config) = start_redis().await;
    let observer = Arc::new(RecordingObserver::default());
    let connector = CacheConnector::new(config).with_observer(observer.clone());

    connector.connect().await.expect("connect should succeed");

    assert_eq!(observer.events(), vec!["connect", "ready"]);
    assert!(connector.is_connected().await);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_client_round_trip_after_connect() {
    let (_container, config) = start_redis().await;
    let connector = CacheConnector::new(config);
    connector.connect().await.expect("connect should succeed");

    let mut conn = connector.client().await.expect("client after connect");
    let _: () = conn.set("listing:1:views", 7).await.expect("SET");
    let views: i64 = conn.get("listing:1:views").await.expect("GET");
    assert_eq!(views, 7);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_second_connect_does_not_reconnect() {
    let (_container, config) = start_redis().await;
    let observer = Arc::new(RecordingObserver::default());
    let connector = CacheConnector::new(config).with_observer(observer.clone());

    connector.connect().await.expect("first connect");
    connector.connect().await.expect("second connect");

    assert_eq!(observer.events(), vec!["connect", "ready"]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_close_returns_to_uninitialized() {
    let (_container, config) = start_redis().await;
    let connector = CacheConnector::new(config);
    connector.connect().await.expect("connect should succeed");

    connector.close().await;

    assert!(matches!(
        connector.client().await,
        Err(CacheError::Uninitialized)
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ping_failure_after_connect_is_reported() {
    let (container, config) = start_redis().await;
    let observer = Arc::new(RecordingObserver::default());
    let connector = CacheConnector::new(config).with_observer(observer.clone());

    connector.connect().await.expect("connect should succeed");
    connector.ping().await.expect("ping while the store is up");

    container.stop().await.expect("stop redis container");

    assert!(connector.ping().await.is_err());
    assert_eq!(observer.events(), vec!["connect", "ready", "error"]);
}
