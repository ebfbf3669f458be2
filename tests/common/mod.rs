#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use college_admin_api::auth::generate_jwt;
use college_admin_api::config::AppConfig;
use college_admin_api::database::{MemoryStore, NewUser, ProfileAssignment, Store, User};
use college_admin_api::routes::app;
use college_admin_api::state::AppState;
use college_admin_api::types::Role;

pub const ADMIN_EMAIL: &str = "admin@college.com";
pub const STAFF_EMAIL: &str = "teacher@college.com";
pub const STUDENT_EMAIL: &str = "pupil@college.com";
pub const PASSWORD: &str = "correct-horse";

// ---------------------------------------------------------------------------
// In-process router
// ---------------------------------------------------------------------------

/// Router over a fresh in-memory store with one user per role.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
    pub admin: User,
    pub staff: User,
    pub student: User,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let admin = insert_user(&store, ADMIN_EMAIL, Role::Admin).await;
        let staff = insert_user(&store, STAFF_EMAIL, Role::Staff).await;
        let student = insert_user(&store, STUDENT_EMAIL, Role::Student).await;

        let state = AppState::new(store.clone(), config.clone());
        Self {
            router: app(state),
            store,
            config,
            admin,
            staff,
            student,
        }
    }

    pub fn token(&self, role: Role) -> String {
        let user = match role {
            Role::Admin => &self.admin,
            Role::Staff => &self.staff,
            Role::Student => &self.student,
        };
        generate_jwt(user, &self.config.security).expect("issue token")
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };
        (status, body)
    }

    /// JSON request, optionally authenticated as `role`.
    pub async fn json(
        &self,
        method: Method,
        path: &str,
        role: Option<Role>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(role) = role {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(role)));
        }
        self.send(builder.body(Body::from(body.to_string())).expect("request"))
            .await
    }

    /// Bodyless request, optionally authenticated as `role`.
    pub async fn call(&self, method: Method, path: &str, role: Option<Role>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(role) = role {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(role)));
        }
        self.send(builder.body(Body::empty()).expect("request")).await
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.bcrypt_cost = 4;
    config
}

async fn insert_user(store: &MemoryStore, email: &str, role: Role) -> User {
    let new_user = NewUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: role.to_string(),
        role,
        gender: "F".to_string(),
        address: "1 Test Lane".to_string(),
        password_hash: bcrypt::hash(PASSWORD, 4).expect("bcrypt hash"),
    };
    let (user, _) = store
        .create_user_with_profile(new_user, ProfileAssignment::default())
        .await
        .expect("create user");
    user
}

// ---------------------------------------------------------------------------
// Spawned server binary
// ---------------------------------------------------------------------------

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

        // Without DATABASE_URL the server runs on the seeded in-memory store
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_college-admin-api"));
        cmd.env("COLLEGE_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("SECURITY_BCRYPT_COST", "4")
            .env_remove("DATABASE_URL")
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
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
