#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use timey::auth::{Claims, Role, TokenCodec};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Points at a closed port unless a real database is supplied
const UNREACHABLE_DATABASE: &str = "postgres://timey@127.0.0.1:1/timey";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let database_url =
            std::env::var("TIMEY_TEST_DATABASE_URL").unwrap_or_else(|_| UNREACHABLE_DATABASE.to_string());

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_timey"));
        cmd.env("TIMEY_PORT", port.to_string())
            .env("JWT_SECRET", TEST_SECRET)
            .env("DATABASE_URL", database_url)
            .env("DATABASE_CONNECT_TIMEOUT", "1")
            .env("APP_ENV", "development")
            .env_remove("RESEND_API_KEY")
            .env_remove("AUTH_COOKIE_NAME")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Ready once the app answers, with or without a database
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Client that reports redirects instead of following them
pub fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?)
}

pub fn token_issued_at(role: Role, issued_at: DateTime<Utc>) -> String {
    let claims = Claims::new(1, "someone@timey.test", role, "Someone", issued_at);
    TokenCodec::new(TEST_SECRET.as_bytes())
        .and_then(|codec| codec.issue(&claims))
        .expect("token issuance")
}

pub fn token(role: Role) -> String {
    token_issued_at(role, Utc::now())
}

pub fn auth_cookie(token: &str) -> String {
    format!("auth_token={}", token)
}
