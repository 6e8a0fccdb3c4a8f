//! Test server harness for E2E testing
//!
//! Provides `TestClinicServer` for spawning real clinic server instances in
//! tests, backed by an in-memory repository the test can inspect.

use clinic_service::config::Config;
use clinic_service::repositories::InMemoryHolderRepository;
use clinic_service::routes::{self, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the clinic server in E2E tests.
pub struct TestClinicServer {
    addr: SocketAddr,
    repository: Arc<InMemoryHolderRepository>,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestClinicServer {
    /// Spawn a server on a random local port around `repository`.
    pub async fn spawn(repository: Arc<InMemoryHolderRepository>) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("CLINIC_SAMPLE_DATA".to_string(), "false".to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let state = Arc::new(AppState {
            holders: repository.clone(),
            config: config.clone(),
        });

        // Local recorder handle; the global recorder is never installed in tests
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();
        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            repository,
            config,
            _handle: handle,
        })
    }

    /// Spawn a server over an empty repository.
    pub async fn spawn_empty() -> Result<Self, anyhow::Error> {
        Self::spawn(Arc::new(InMemoryHolderRepository::new())).await
    }

    /// Spawn a server over the sample clinic records.
    pub async fn spawn_with_sample_data() -> Result<Self, anyhow::Error> {
        Self::spawn(Arc::new(InMemoryHolderRepository::with_sample_data())).await
    }

    /// Get the repository backing the server.
    pub fn repository(&self) -> &InMemoryHolderRepository {
        &self.repository
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// HTTP client that does not follow redirects, so tests can assert on
    /// the `Location` of a successful form submission.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_default()
    }
}

impl Drop for TestClinicServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
