#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use blog_api_rust::state::AppState;
use blog_api_rust::testing::TestContext;
use reqwest::StatusCode;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub ctx: TestContext,
    client: reqwest::Client,
}

impl TestServer {
    /// Serve the app on a free port, backed by a fresh in-memory store
    pub async fn spawn() -> Result<Self> {
        let ctx = TestContext::new();
        let state = ctx.state();
        Self::spawn_with(ctx, state).await
    }

    /// Serve the app with a store that fails every call
    pub async fn spawn_failing() -> Result<Self> {
        let ctx = TestContext::new();
        let state = ctx.failing_state();
        Self::spawn_with(ctx, state).await
    }

    async fn spawn_with(ctx: TestContext, state: AppState) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let app = blog_api_rust::app(state);
        tokio::spawn(async move {
            let _ = axum_serve(listener, app).await;
        });

        let server = Self {
            port,
            base_url,
            ctx,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            if let Ok(resp) = self.client.get(self.url("/")).send().await {
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

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn token(&self, id: i64, email: &str) -> Result<String> {
        self.ctx.token_for(id, email)
    }

    /// POST /posts with a bearer token for user `id`
    pub async fn create_post(&self, id: i64, body: &serde_json::Value) -> Result<reqwest::Response> {
        let token = self.token(id, &format!("user{}@example.com", id))?;
        Ok(self
            .client
            .post(self.url("/posts"))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }
}

async fn axum_serve(listener: tokio::net::TcpListener, app: axum::Router) -> std::io::Result<()> {
    axum::serve(listener, app).await
}
