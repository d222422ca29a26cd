//! Integration tests for `DatabaseConnector` using testcontainers.
//!
//! These tests use a real `PostgreSQL` database to validate the connector lifecycle.
//!
//! # Requirements
//!
//! Docker must be running to execute these tests. They are ignored by default:
//!
//! ```bash
//! cargo test -p ticket-trader-postgres -- --ignored
//! ```

#![allow(clippy::expect_used)] // Test code uses expect for clear failure messages

use std::time::Duration;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use ticket_trader_core::Environment;
use ticket_trader_postgres::{DatabaseConfig, DatabaseConnector, DatabaseError};

/// Start a Postgres container and return it with a matching configuration.
///
/// Returns the container too so it stays alive for the duration of the test.
async fn start_postgres() -> (ContainerAsync<Postgres>, DatabaseConfig) {
    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start postgres container");

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get postgres port");

    let mut config = DatabaseConfig::for_environment(Environment::Test);
    config.host = "127.0.0.1".to_string();
    config.port = port;
    config.user = "postgres".to_string();
    config.password = "postgres".to_string();
    config.database = "postgres".to_string();
    config.connect_timeout = Duration::from_secs(30);

    (container, config)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_connect_verifies_and_exposes_pool() {
    let (_container, config) = start_postgres().await;
    let connector = DatabaseConnector::new(config);

    let pool = connector.connect().await.expect("connect should succeed");
    let one: i32 = sqlx::query_scalar("SELECT 1")
        .fetch_one(&pool)
        .await
        .expect("query should succeed");
    assert_eq!(one, 1);

    assert!(connector.is_connected().await);
    connector.ping().await.expect("ping should succeed");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_second_connect_reuses_pool() {
    let (_container, config) = start_postgres().await;
    let connector = DatabaseConnector::new(config);

    let first = connector.connect().await.expect("first connect");
    let second = connector.connect().await.expect("second connect");

    // Closing one handle closes the shared pool.
    first.close().await;
    assert!(second.is_closed());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_bad_credentials_fail_with_connect_error() {
    let (_container, mut config) = start_postgres().await;
    config.password = "wrong".to_string();
    config.connect_timeout = Duration::from_secs(5);
    let connector = DatabaseConnector::new(config);

    let result = connector.connect().await;
    assert!(matches!(
        result,
        Err(DatabaseError::Connect { .. } | DatabaseError::Timeout(_))
    ));
    assert!(!connector.is_connected().await);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_close_forgets_pool() {
    let (_container, config) = start_postgres().await;
    let connector = DatabaseConnector::new(config);

    let pool = connector.connect().await.expect("connect should succeed");
    connector.close().await;

    assert!(pool.is_closed());
    assert!(matches!(
        connector.pool().await,
        Err(DatabaseError::Uninitialized)
    ));

    // Closing again is harmless.
    connector.close().await;
}
