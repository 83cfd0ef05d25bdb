mod common;

use axum::http::StatusCode;
use common::{TestApp, PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
async fn anonymous_current_user_is_null() {
    let app = TestApp::new().await;
    let current: Value = app.server.get("/api/users/current").await.json();
    assert_eq!(current, Value::Null);
}

#[tokio::test]
async fn login_logout_round_trip() {
    let app = TestApp::new().await;
    let ada = app.register("ada@example.com", "Ada").await;
    let grace = app.register("grace@example.com", "Grace").await;

    let current: Value = app.server.get("/api/users/current").await.json();
    assert_eq!(current["_id"], grace["_id"]);

    let response = app
        .server
        .post("/api/users/login")
        .json(&json!({ "email": "Ada@Example.com", "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["_id"], ada["_id"]);
    assert_eq!(body["homeState"], "TX");
    assert!(body.get("hashedPassword").is_none());

    let current: Value = app.server.get("/api/users/current").await.json();
    assert_eq!(current["_id"], ada["_id"]);
    assert_eq!(current["email"], "ada@example.com");
    assert!(current.get("homeCity").is_none());

    let response = app.server.delete("/api/users/session").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "message": "success" }));

    let current: Value = app.server.get("/api/users/current").await.json();
    assert_eq!(current, Value::Null);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new().await;
    app.register("ada@example.com", "Ada").await;
    app.server.delete("/api/users/session").await.assert_status_ok();

    for credentials in [
        json!({ "email": "ada@example.com", "password": "wrong-password" }),
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    ] {
        let response = app.server.post("/api/users/login").json(&credentials).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid credentials");
        assert_eq!(body["errors"], json!({ "email": "Invalid credentials" }));
    }

    let current: Value = app.server.get("/api/users/current").await.json();
    assert_eq!(current, Value::Null);
}

#[tokio::test]
async fn malformed_login_is_a_validation_error() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/users/login")
        .json(&json!({ "email": "ada" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"]["email"], "Email is invalid");
    assert_eq!(body["errors"]["password"], "Password is required");
}

#[tokio::test]
async fn unparseable_body_is_a_json_validation_error() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/users/login")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["title"], "Validation Error");
    assert!(body["errors"]["body"].is_string());
}
