// tests/common/mod.rs
// Shared helpers: an in-process server on a random port plus HTTP clients
// that log in and create projects the way a browser session would.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use reqwest::{Client, StatusCode, redirect::Policy};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::sync::Arc;

use project_hub::api::http_router;
use project_hub::db;
use project_hub::state::AppState;

pub struct TestApp {
    pub url: String,
    pub pool: SqlitePool,
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub password: String,
    /// The `/user` payload, filled in by `login`.
    pub obj: Option<Value>,
}

impl TestUser {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            password: format!("{username}-password"),
            obj: None,
        }
    }

    pub fn id(&self) -> &str {
        self.obj
            .as_ref()
            .and_then(|obj| obj["id"].as_str())
            .expect("user has not logged in yet")
    }
}

pub fn default_user() -> TestUser {
    TestUser::new("testuser")
}

/// Start the full router against a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to create in-memory database");

    let app = http_router(Arc::new(AppState::new(pool.clone())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    TestApp {
        url: format!("http://{addr}"),
        pool,
    }
}

/// A client with its own cookie jar that does not follow redirects.
pub fn init() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to build HTTP client")
}

/// Log out, then log in as `user`, registering the account first if the
/// server does not know it yet. Stores the `/user` payload on `user.obj`.
pub async fn login(client: &Client, app: &TestApp, user: &mut TestUser) -> Result<()> {
    client
        .get(format!("{}/auth/logout", app.url))
        .send()
        .await?;

    let form = [
        ("username", user.username.as_str()),
        ("password", user.password.as_str()),
    ];

    let response = client
        .post(format!("{}/auth/local", app.url))
        .form(&form)
        .send()
        .await?;

    if response.status() == StatusCode::FORBIDDEN {
        client
            .post(format!("{}/auth/register", app.url))
            .form(&form)
            .send()
            .await?;
    }

    let response = client.get(format!("{}/user", app.url)).send().await?;
    if response.status() != StatusCode::OK {
        let body = response.text().await?;
        return Err(anyhow!("Error: Login unsuccessful. {}", body));
    }

    user.obj = Some(response.json().await?);
    Ok(())
}

pub fn sample_project(open: bool) -> Value {
    json!({
        "title": "Test Project",
        "description": "A project created by the integration tests.",
        "state": if open { "open" } else { "draft" },
    })
}

/// Create a project as the client's logged-in user.
pub async fn create_project(client: &Client, app: &TestApp, open: bool) -> Result<Value> {
    create_project_from(client, app, sample_project(open)).await
}

pub async fn create_project_from(client: &Client, app: &TestApp, project: Value) -> Result<Value> {
    let response = client
        .post(format!("{}/project", app.url))
        .body(project.to_string())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(anyhow!("Project creation failed with {}: {}", status, body));
    }

    Ok(response.json().await?)
}

pub async fn list_projects(client: &Client, app: &TestApp, state: Option<&str>) -> Result<Vec<Value>> {
    let mut request = client.get(format!("{}/project", app.url));
    if let Some(state) = state {
        request = request.query(&[("state", state)]);
    }

    let body: Value = request.send().await?.error_for_status()?.json().await?;
    body["projects"]
        .as_array()
        .cloned()
        .ok_or_else(|| anyhow!("Response has no projects array: {}", body))
}

pub fn project_ids(projects: &[Value]) -> Vec<i64> {
    projects.iter().filter_map(|p| p["id"].as_i64()).collect()
}
