//! Shared helpers for Web API integration tests.

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use stratus::config::Config;
use stratus::db::Database;
use stratus::file::{BlobStore, FileRepository, NewFile};
use stratus::web::handlers::AppState;
use stratus::web::middleware::JwtState;
use stratus::web::router::{create_health_router, create_router};

/// Create a test configuration pointing at a temporary blob directory.
pub fn create_test_config(storage_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.auth.jwt_secret = "test-secret-key-for-testing-only".to_string();
    config.storage.path = storage_dir.path().to_string_lossy().into_owned();
    config.logging.level = "warn".to_string();
    config
}

/// Create a test server with an in-memory database.
///
/// Returns the server, the database handle for direct fixture setup,
/// and the TempDir guard keeping the blob directory alive.
pub async fn create_test_server() -> (TestServer, Arc<Database>, TempDir) {
    let storage_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&storage_dir);

    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );
    let storage = BlobStore::new(storage_dir.path()).expect("Failed to create blob store");

    let app_state = Arc::new(AppState::new(db.clone(), storage, &config));
    let jwt_state = Arc::new(JwtState::new(&config.auth.jwt_secret));

    let router = create_router(app_state, jwt_state, &config.server.cors_origins)
        .merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db, storage_dir)
}

/// Register a user, activate the account via its token, and return the
/// activation token that was consumed.
pub async fn register_and_activate(server: &TestServer, db: &Database, email: &str) {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "password": "password123",
            "first_name": "Test",
            "last_name": "User"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    // Activation links are delivered out-of-band; tests read the token
    // straight from the database.
    let token: String = sqlx::query_scalar(
        "SELECT token FROM account_tokens
         WHERE user_id = (SELECT id FROM users WHERE email = ?)
           AND purpose = 'activation'
         ORDER BY id DESC LIMIT 1",
    )
    .bind(email)
    .fetch_one(db.pool())
    .await
    .expect("activation token missing");

    server
        .get(&format!("/api/auth/verify/{}", token))
        .await
        .assert_status_ok();
}

/// Log in and return the JWT.
pub async fn login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": "password123"
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["data"]["token"]
        .as_str()
        .expect("token missing from login response")
        .to_string()
}

/// Register, activate, and log in a user in one step.
pub async fn setup_user(server: &TestServer, db: &Database, email: &str) -> String {
    register_and_activate(server, db, email).await;
    login(server, email).await
}

/// Create a folder through the API and return its ID.
pub async fn create_folder(
    server: &TestServer,
    token: &str,
    name: &str,
    parent_id: Option<i64>,
) -> i64 {
    let mut payload = json!({ "name": name });
    if let Some(parent) = parent_id {
        payload["parent_id"] = json!(parent);
    }

    let response = server
        .post("/api/folders")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&payload)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    body["data"]["id"].as_i64().expect("folder id missing")
}

/// Seed a file directly through the repositories and blob store.
///
/// Multipart uploads are covered separately; most tests only need file
/// rows with real backing blobs.
pub async fn seed_file(
    db: &Database,
    storage_dir: &TempDir,
    owner_id: i64,
    folder_id: Option<i64>,
    name: &str,
    content: &[u8],
) -> (i64, String) {
    let store = BlobStore::new(storage_dir.path()).expect("Failed to open blob store");
    let key = store.save(name, content).expect("Failed to save blob");

    let repo = FileRepository::new(db.pool());
    let mut new_file = NewFile::new(
        name,
        &key,
        content.len() as i64,
        "application/octet-stream",
        owner_id,
    );
    if let Some(folder) = folder_id {
        new_file = new_file.in_folder(folder);
    }
    let file = repo.create(&new_file).await.expect("Failed to seed file");

    (file.id, key)
}

/// Look up a user's ID by email.
pub async fn user_id_by_email(db: &Database, email: &str) -> i64 {
    sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(db.pool())
        .await
        .expect("user missing")
}
