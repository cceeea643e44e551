//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use gateway_adapter::config::AdapterConfig;
use gateway_adapter::http::HttpServer;
use gateway_adapter::lifecycle::startup::build_adapter_with;
use gateway_adapter::lifecycle::Shutdown;
use gateway_adapter::service::{DirectoryError, StaticUserDirectory, User, UserDirectory};
use gateway_adapter::GatewayAdapter;

/// Adapter over the placeholder directory.
#[allow(dead_code)]
pub fn adapter() -> GatewayAdapter {
    build_adapter_with(&AdapterConfig::default(), Arc::new(StaticUserDirectory::default())).unwrap()
}

/// Directory whose backing store is always down.
#[allow(dead_code)]
pub struct OfflineDirectory;

impl UserDirectory for OfflineDirectory {
    fn list_user_ids(&self) -> Result<Vec<String>, DirectoryError> {
        Err(DirectoryError::Unavailable("connection refused".into()))
    }

    fn find_user(&self, _user_id: &str) -> Result<Option<User>, DirectoryError> {
        Err(DirectoryError::Lookup("connection refused".into()))
    }
}

/// Start the local server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_local_server(config: AdapterConfig) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let adapter = build_adapter_with(&config, Arc::new(StaticUserDirectory::default())).unwrap();
    let server = HttpServer::new(config, adapter);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, shutdown)
}
