use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerConfig, app};

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    app(
        engine,
        &ServerConfig {
            jwt_secret: "test-secret".to_string(),
            ..Default::default()
        },
    )
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
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

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": "Alice", "email": email, "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["token"].as_str().unwrap().to_string()
}

fn error_code(body: &Value) -> &str {
    assert_eq!(body["success"], false);
    body["error"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;
    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_and_me() {
    let app = test_app().await;
    let token = register(&app, " Alice@Example.com ").await;

    let (status, body) = call(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["is_onboarded"], false);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].as_str().is_some());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "wrong password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": "Alice", "email": "alice@example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "REGISTER_FAILED");
    assert_eq!(body["error"]["message"], "email already exists");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = test_app().await;

    let (status, body) = call(&app, Method::GET, "/api/v1/wallets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "Missing authorization header");

    let request = Request::builder()
        .uri("/api/v1/wallets")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6c2VjcmV0")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["message"], "Invalid authorization format");

    let (status, body) = call(&app, Method::GET, "/api/v1/wallets", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid or expired token");
}

#[tokio::test]
async fn onboarding_wallets_and_transfers() {
    let app = test_app().await;
    let token = register(&app, "alice@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/auth/onboarding",
        Some(&token),
        Some(json!({ "monthly_income_minor": 50_000, "currency": "KES" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_onboarded"], true);

    let (status, body) = call(&app, Method::GET, "/api/v1/wallets/default", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Main Wallet");
    assert_eq!(body["data"]["type"], "Cash");
    assert_eq!(body["data"]["balance_minor"], 0);
    assert_eq!(body["data"]["currency"], "KES");
    let main_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/wallets",
        Some(&token),
        Some(json!({
            "name": "M-Pesa",
            "type": "Mobile Money",
            "balance_minor": 5_000,
            "color": "#22c55e"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["is_default"], false);
    let mpesa_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/wallets/transfer",
        Some(&token),
        Some(json!({ "from_wallet_id": main_id, "to_wallet_id": mpesa_id, "amount_minor": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "TRANSFER_FAILED");
    assert_eq!(body["error"]["message"], "insufficient balance");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/wallets/transfer",
        Some(&token),
        Some(json!({ "from_wallet_id": mpesa_id, "to_wallet_id": main_id, "amount_minor": 2_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "transfer completed successfully");

    let (_, body) = call(
        &app,
        Method::GET,
        &format!("/api/v1/wallets/{main_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["balance_minor"], 2_000);

    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/api/v1/wallets/{main_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "DELETE_FAILED");

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/v1/wallets/{mpesa_id}/default"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_default"], true);

    let (status, body) = call(&app, Method::GET, "/api/v1/wallets", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let wallets = body["data"].as_array().unwrap();
    assert_eq!(wallets.len(), 2);
    assert_eq!(wallets.iter().filter(|w| w["is_default"] == true).count(), 1);
}

#[tokio::test]
async fn lookup_and_mutation_errors_have_distinct_statuses() {
    let app = test_app().await;
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/v1/wallets",
        Some(&alice),
        Some(json!({ "name": "Cash", "type": "Cash", "color": "#000000" })),
    )
    .await;
    let wallet_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, Method::GET, "/api/v1/wallets/not-a-uuid", Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_ID");

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/v1/wallets/00000000-0000-0000-0000-000000000000",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");

    let uri = format!("/api/v1/wallets/{wallet_id}");
    let (status, body) = call(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");

    let (status, body) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&bob),
        Some(json!({ "name": "Mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "UPDATE_FAILED");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/wallets")
        .header(header::AUTHORIZATION, format!("Bearer {alice}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let (status, _) = call(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn transactions_are_paged() {
    let app = test_app().await;
    let token = register(&app, "alice@example.com").await;

    for i in 0..25 {
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/transactions",
            Some(&token),
            Some(json!({
                "amount_minor": 100 + i,
                "description": format!("Item {i}"),
                "method": "Cash",
                "category": "Food"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/v1/transactions?page=2&limit=10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 10);
    let pagination = &body["data"]["pagination"];
    assert_eq!(pagination["page"], 2);
    assert_eq!(pagination["total"], 25);
    assert_eq!(pagination["total_pages"], 3);
    assert_eq!(pagination["has_next"], true);
    assert_eq!(pagination["has_prev"], true);

    let (_, body) = call(&app, Method::GET, "/api/v1/transactions", Some(&token), None).await;
    assert_eq!(body["data"]["pagination"]["limit"], 20);

    for query in ["limit=101", "limit=0", "page=0", "page=abc"] {
        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/api/v1/transactions?{query}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }

    let (status, body) = call(&app, Method::GET, "/api/v1/transactions/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["transaction_count"], 25);
    assert_eq!(body["data"]["total_income_minor"], 0);
}

#[tokio::test]
async fn transaction_update_clears_nullable_fields() {
    let app = test_app().await;
    let token = register(&app, "alice@example.com").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(&token),
        Some(json!({
            "amount_minor": 450,
            "description": "Taxi",
            "method": "M-Pesa",
            "category": "Transport",
            "notes": "airport run"
        })),
    )
    .await;
    assert_eq!(body["data"]["status"], "Completed");
    let uri = format!("/api/v1/transactions/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "notes": null, "amount_minor": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], Value::Null);
    assert_eq!(body["data"]["amount_minor"], 500);
    assert_eq!(body["data"]["description"], "Taxi");

    let (status, _) = call(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn goal_progress_and_budgets() {
    let app = test_app().await;
    let token = register(&app, "alice@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/goals",
        Some(&token),
        Some(json!({ "name": "Laptop", "target_amount_minor": 1_000, "color": "#f97316" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["priority"], "Medium");
    let uri = format!("/api/v1/goals/{}/progress", body["data"]["id"].as_str().unwrap());

    let (status, body) = call(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({ "amount_minor": 1_500 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "UPDATE_PROGRESS_FAILED");

    let (status, body) = call(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({ "amount_minor": 1_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Completed");
    assert_eq!(body["data"]["progress_percentage"], 100.0);

    let (_, body) = call(&app, Method::GET, "/api/v1/goals/summary", Some(&token), None).await;
    assert_eq!(body["data"]["completed_goals"], 1);

    let budget = json!({ "category": "Food", "limit_amount_minor": 10_000, "color": "#ef4444" });
    let (status, body) = call(&app, Method::POST, "/api/v1/budgets", Some(&token), Some(budget.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "Variable");
    assert_eq!(body["data"]["alert_threshold"], 80);

    let (status, body) = call(&app, Method::POST, "/api/v1/budgets", Some(&token), Some(budget)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "CREATE_FAILED");

    let (status, body) = call(&app, Method::GET, "/api/v1/budgets/status", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["spent_amount_minor"], 0);
}

#[tokio::test]
async fn analytics_endpoints() {
    let app = test_app().await;
    let token = register(&app, "alice@example.com").await;
    call(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(&token),
        Some(json!({
            "amount_minor": 1_000,
            "description": "Groceries",
            "method": "Cash",
            "category": "Food"
        })),
    )
    .await;

    let (status, body) = call(&app, Method::GET, "/api/v1/analytics/money-flow", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["months"].as_array().unwrap().len(), 6);

    let (_, body) = call(
        &app,
        Method::GET,
        "/api/v1/analytics/money-flow?period=7days",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["period"], "7days");
    assert_eq!(body["data"]["total_expense_minor"], 1_000);

    let (status, body) = call(&app, Method::GET, "/api/v1/analytics/spending", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["period"], "1month");
    assert_eq!(body["data"]["by_category"][0]["percentage"], 100.0);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/v1/analytics/spending?period=2weeks",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let (status, _) = call(&app, Method::GET, "/api/v1/analytics/trends?months=0", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = call(&app, Method::GET, "/api/v1/analytics/trends?months=30", Some(&token), None).await;
    assert_eq!(body["data"]["months"].as_array().unwrap().len(), 24);

    let (status, body) = call(&app, Method::GET, "/api/v1/analytics/health", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["score"].as_u64().is_some());

    let (status, body) = call(&app, Method::GET, "/api/v1/analytics/insights", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["message"].as_str().is_some());

    let (status, body) = call(&app, Method::GET, "/api/v1/analytics/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_expense_minor"], 1_000);
}

#[tokio::test]
async fn amounts_above_the_maximum_are_bad_requests() {
    let app = test_app().await;
    let token = register(&app, "alice@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/wallets",
        Some(&token),
        Some(json!({
            "name": "Vault",
            "type": "Bank",
            "balance_minor": i64::MAX,
            "color": "#22c55e"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "CREATE_FAILED");

    let (status, _) = call(&app, Method::GET, "/api/v1/wallets", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}
