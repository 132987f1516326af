use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

fn basic(username: &str, password: &str) -> String {
    let secret = format!("{username}:{password}");
    format!(
        "Basic {}",
        base64::prelude::BASE64_STANDARD.encode(secret)
    )
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((username, password)) = auth {
        builder = builder.header(header::AUTHORIZATION, basic(username, password));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn signup(app: &Router, username: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/signup",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn signup_then_login() {
    let app = app().await;
    let created = signup(&app, "alice", "s3cret").await;
    assert_eq!(created["username"], "alice");

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({"username": "alice", "password": "s3cret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({"username": "alice", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn duplicate_signup_is_a_conflict() {
    let app = app().await;
    signup(&app, "alice", "s3cret").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({"username": "alice", "password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({"username": "", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn protected_routes_require_credentials() {
    let app = app().await;
    signup(&app, "alice", "s3cret").await;

    for (method, uri) in [
        (Method::GET, "/transactions"),
        (Method::GET, "/stats"),
        (Method::GET, "/budget"),
        (Method::DELETE, "/transactions/1"),
        (Method::DELETE, "/budget/Food"),
    ] {
        let (status, body) = send(&app, method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["error"], "unauthorized");

        let (status, _) = send(&app, method.clone(), uri, Some(("alice", "nope")), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn transactions_round_trip() {
    let app = app().await;
    signup(&app, "alice", "s3cret").await;
    let alice = Some(("alice", "s3cret"));

    let (status, created) = send(
        &app,
        Method::POST,
        "/transactions",
        alice,
        Some(json!({
            "date": "2024-03-05",
            "description": "Groceries",
            "amount": "20.50",
            "category": "Food",
            "type": "expense"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/transactions",
        alice,
        Some(json!({"date": "2024-03-01", "description": "Salary", "amount": 1000, "type": "Income"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/transactions", alice, None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body["transactions"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["description"], "Groceries");
    assert_eq!(list[0]["amount_minor"], 2050);
    assert_eq!(list[0]["type"], "Expense");
    assert_eq!(list[1]["amount_minor"], 100_000);
    assert_eq!(list[1]["category"], "Other");

    let uri = format!("/transactions/{}", created["id"]);
    let (status, _) = send(&app, Method::DELETE, &uri, alice, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &uri, alice, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/transactions", alice, None).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_transaction_is_rejected() {
    let app = app().await;
    signup(&app, "alice", "s3cret").await;
    let alice = Some(("alice", "s3cret"));

    for body in [
        json!({"description": "Rent"}),
        json!({"description": "Rent", "amount": "lots"}),
        json!({"description": "Rent", "amount": -5}),
        json!({"amount": 5}),
        json!({"description": "Rent", "amount": 5, "date": "yesterday"}),
    ] {
        let (status, _) = send(&app, Method::POST, "/transactions", alice, Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn sub_cent_amounts_explain_the_rejection() {
    let app = app().await;
    signup(&app, "alice", "s3cret").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(("alice", "s3cret")),
        Some(json!({"description": "Coffee", "amount": 1.999})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "Invalid input: amount must have at most 2 decimal places"
    );
}

#[tokio::test]
async fn users_cannot_see_or_delete_each_other() {
    let app = app().await;
    signup(&app, "alice", "s3cret").await;
    signup(&app, "bob", "hunter2").await;
    let alice = Some(("alice", "s3cret"));
    let bob = Some(("bob", "hunter2"));

    let (_, created) = send(
        &app,
        Method::POST,
        "/transactions",
        alice,
        Some(json!({"description": "Rent", "amount": 700})),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/transactions", bob, None).await;
    assert!(body["transactions"].as_array().unwrap().is_empty());

    let uri = format!("/transactions/{}", created["id"]);
    let (status, _) = send(&app, Method::DELETE, &uri, bob, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/transactions", alice, None).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn budgets_upsert_and_delete() {
    let app = app().await;
    signup(&app, "alice", "s3cret").await;
    let alice = Some(("alice", "s3cret"));

    for amount in [json!(300), json!("250.00")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/budget",
            alice,
            Some(json!({"category": "Food", "amount": amount})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, body) = send(&app, Method::GET, "/budget", alice, None).await;
    assert_eq!(status, StatusCode::OK);
    let budgets = body["budgets"].as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["category"], "Food");
    assert_eq!(budgets[0]["amount_minor"], 25_000);

    let (status, _) = send(
        &app,
        Method::POST,
        "/budget",
        alice,
        Some(json!({"category": "Food", "amount": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::DELETE, "/budget/Food", alice, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, "/budget/Food", alice, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/budget", alice, None).await;
    assert!(body["budgets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn stats_cover_the_current_month() {
    let app = app().await;
    signup(&app, "alice", "s3cret").await;
    let alice = Some(("alice", "s3cret"));

    let (status, body) = send(&app, Method::GET, "/stats", alice, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["income_minor"], 0);
    assert_eq!(body["expense_minor"], 0);
    assert_eq!(body["savings_rate"], 0.0);
    assert!(body["categories"].as_array().unwrap().is_empty());

    // No date: recorded today, so it lands in the current month.
    for payload in [
        json!({"description": "Salary", "amount": 1000, "type": "Income"}),
        json!({"description": "Groceries", "amount": 200, "category": "Food"}),
    ] {
        send(&app, Method::POST, "/transactions", alice, Some(payload)).await;
    }
    send(
        &app,
        Method::POST,
        "/budget",
        alice,
        Some(json!({"category": "Food", "amount": 300})),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/stats", alice, None).await;
    assert_eq!(body["income_minor"], 100_000);
    assert_eq!(body["expense_minor"], 20_000);
    assert_eq!(body["net_savings_minor"], 80_000);
    assert_eq!(body["savings_rate"], 80.0);
    assert_eq!(body["categories"], json!([{"category": "Food", "total_minor": 20_000}]));
    assert_eq!(body["budgets"], json!([{"category": "Food", "amount_minor": 30_000}]));
}

#[tokio::test]
async fn responses_carry_cors_headers() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/stats")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
