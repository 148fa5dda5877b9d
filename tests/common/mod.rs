#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use jobly_api::config::AppConfig;
use jobly_api::testing::ScriptedStorage;
use jobly_api::{app, AppState};

/// In-process server over a scripted storage double. Each test gets its own
/// server so queued replies never leak between tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub storage: Arc<ScriptedStorage>,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let storage = Arc::new(ScriptedStorage::new());
        let state = AppState::new(AppConfig::development(), storage.clone())?;

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            storage,
            state,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token signed with the server's own keys.
    pub fn token(&self, username: &str, is_admin: bool) -> Result<String> {
        Ok(self.state.keys.issue(username, is_admin)?)
    }
}

/// bcrypt hash at the development cost, for seeding credential rows.
pub fn hash(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, 4)?)
}
