//! Application factory startup tests.
//!
//! Each test gets its own temporary instance directory and file-backed
//! `SQLite` database, then drives the router in-process.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::json;
use tower::ServiceExt;

use tax_simulator_integration_tests::{account_count, config_for, open_pool, read_json};
use tax_simulator_server::create_app;
use tax_simulator_server::db::create_schema;
use tax_simulator_server::seed::ADMIN_EMAIL;

// ============================================================================
// Startup
// ============================================================================

#[tokio::test]
async fn test_defaults_create_file_database_in_instance_dir() {
    let dir = tempfile::tempdir().unwrap();
    let instance = dir.path().join("instance");
    let config = config_for(&instance).unwrap();
    assert!(config.uses_file_database());

    create_app(config).await.expect("startup with defaults");

    assert!(instance.is_dir());
    assert!(instance.join("database.db").is_file());
}

#[tokio::test]
async fn test_existing_instance_dir_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let instance = dir.path().join("instance");
    std::fs::create_dir_all(&instance).unwrap();
    std::fs::write(instance.join("keep.txt"), b"unrelated").unwrap();

    create_app(config_for(&instance).unwrap())
        .await
        .expect("startup with existing instance dir");

    assert!(instance.join("keep.txt").is_file());
}

// ============================================================================
// Seeding
// ============================================================================

#[tokio::test]
async fn test_end_to_end_seed_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let instance = dir.path().join("instance");

    create_app(config_for(&instance).unwrap()).await.unwrap();

    let pool = open_pool(&config_for(&instance).unwrap()).await.unwrap();
    assert_eq!(account_count(&pool).await.unwrap(), 1);

    let (status, is_admin, stored): (String, bool, String) = sqlx::query_as(
        "SELECT status, is_admin, password_hash FROM account WHERE email = ?",
    )
    .bind(ADMIN_EMAIL)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "activo");
    assert!(is_admin);
    assert_ne!(stored, "adminpassword");

    create_app(config_for(&instance).unwrap()).await.unwrap();
    assert_eq!(account_count(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_existing_sentinel_account_is_not_altered() {
    let dir = tempfile::tempdir().unwrap();
    let instance = dir.path().join("instance");
    std::fs::create_dir_all(&instance).unwrap();
    let config = config_for(&instance).unwrap();

    let pool = open_pool(&config).await.unwrap();
    create_schema(&pool).await.unwrap();
    sqlx::query(
        r"
        INSERT INTO account (full_name, document_type, document_number, email,
                             password_hash, status, is_admin, created_at, updated_at)
        VALUES ('Admin Heredado', 'ADMIN', '11111111', ?, 'legacy-digest', 'activo', 1,
                '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')
        ",
    )
    .bind(ADMIN_EMAIL)
    .execute(&pool)
    .await
    .unwrap();

    create_app(config).await.unwrap();

    assert_eq!(account_count(&pool).await.unwrap(), 1);
    let (name, document, digest): (String, String, String) = sqlx::query_as(
        "SELECT full_name, document_number, password_hash FROM account WHERE email = ?",
    )
    .bind(ADMIN_EMAIL)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(name, "Admin Heredado");
    assert_eq!(document, "11111111");
    assert_eq!(digest, "legacy-digest");
}

#[tokio::test]
async fn test_concurrent_startups_seed_one_account() {
    let dir = tempfile::tempdir().unwrap();
    let instance = dir.path().join("instance");

    let (first, second) = tokio::join!(
        create_app(config_for(&instance).unwrap()),
        create_app(config_for(&instance).unwrap()),
    );
    first.expect("first startup");
    second.expect("second startup");

    let pool = open_pool(&config_for(&instance).unwrap()).await.unwrap();
    assert_eq!(account_count(&pool).await.unwrap(), 1);
}

// ============================================================================
// Session extension
// ============================================================================

#[tokio::test]
async fn test_protected_resource_without_session_is_401() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(config_for(&dir.path().join("instance")).unwrap())
        .await
        .unwrap();

    let response = app
        .into_router()
        .oneshot(
            Request::get("/api/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        read_json(response).await,
        json!({ "message": "Autenticación requerida." })
    );
}

#[tokio::test]
async fn test_seeded_administrator_can_log_in() {
    let dir = tempfile::tempdir().unwrap();
    let router = create_app(config_for(&dir.path().join("instance")).unwrap())
        .await
        .unwrap()
        .into_router();

    let login = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "correo_electronico": ADMIN_EMAIL, "password": "adminpassword" }).to_string(),
        ))
        .unwrap();
    let response = router.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = router
        .oneshot(
            Request::get("/api/session")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["user"]["correo_electronico"], ADMIN_EMAIL);
    assert_eq!(body["user"]["es_admin"], true);
}

#[tokio::test]
async fn test_tampered_session_cookie_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let router = create_app(config_for(&dir.path().join("instance")).unwrap())
        .await
        .unwrap()
        .into_router();

    let response = router
        .oneshot(
            Request::get("/api/session")
                .header(header::COOKIE, "tax_session=forged-session-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
