//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use compass_core::db::Database;
use compass_core::models::{AccountType, NewDebt, NewRecurringItem, TransactionKind};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn open_test_app() -> (Database, Router) {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: false,
        ..Default::default()
    };
    let app = create_router(db.clone(), None, config);
    (db, app)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

// ========== Account API Tests ==========

#[tokio::test]
async fn test_create_and_list_accounts() {
    let (_db, app) = open_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/accounts",
            serde_json::json!({
                "name": "Checking",
                "account_type": "checking",
                "balance_cents": 150000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = get_body_json(response).await;
    assert_eq!(created["name"], "Checking");
    assert_eq!(created["balance_cents"], 150000);

    let response = app.oneshot(get("/api/accounts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let accounts = get_body_json(response).await;
    assert_eq!(accounts.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_account_requires_name() {
    let (_db, app) = open_test_app();

    let response = app
        .oneshot(post_json(
            "/api/accounts",
            serde_json::json!({ "name": "  ", "account_type": "cash" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Decision API Tests ==========

#[tokio::test]
async fn test_decision_freezes_on_deficit() {
    let (db, app) = open_test_app();

    // $100 of cash against a $150 bill due before payday
    db.upsert_account("Checking", AccountType::Checking, 10_000)
        .unwrap();
    db.insert_recurring(&NewRecurringItem {
        name: "Rent".to_string(),
        kind: TransactionKind::Expense,
        amount_cents: 15_000,
        next_due_date: Utc::now().date_naive() + Duration::days(2),
    })
    .unwrap();

    let response = app.clone().oneshot(get("/api/decision")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let decision = get_body_json(response).await;

    assert_eq!(decision["risk_level"], "critical");
    assert_eq!(decision["primary_command"]["type"], "freeze");
    assert_eq!(decision["primary_command"]["amount_cents"], 5000);
    assert_eq!(decision["is_new"], true);
    assert!(decision["warnings"].as_array().unwrap().len() <= 2);

    // Same day: the cached decision comes back unchanged
    let response = app.oneshot(get("/api/decision")).await.unwrap();
    let second = get_body_json(response).await;
    assert_eq!(second["is_new"], false);
    assert_eq!(second["id"], decision["id"]);
}

#[tokio::test]
async fn test_acknowledge_decision_is_idempotent() {
    let (db, app) = open_test_app();
    db.upsert_account("Checking", AccountType::Checking, 500_000)
        .unwrap();

    let response = app.clone().oneshot(get("/api/decision")).await.unwrap();
    let decision = get_body_json(response).await;
    let id = decision["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/decision/{}/acknowledge", id),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let acked = get_body_json(response).await;
    let first_ack = acked["acknowledged_at"].clone();
    assert!(!first_ack.is_null());
    // The command is untouched
    assert_eq!(acked["primary_command"], decision["primary_command"]);

    let response = app
        .oneshot(post_json(
            &format!("/api/decision/{}/acknowledge", id),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    let again = get_body_json(response).await;
    assert_eq!(again["acknowledged_at"], first_ack);
}

#[tokio::test]
async fn test_acknowledge_unknown_decision_is_404() {
    let (_db, app) = open_test_app();

    let response = app
        .oneshot(post_json(
            "/api/decision/4242/acknowledge",
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_decision_history_includes_current() {
    let (db, app) = open_test_app();
    db.upsert_account("Checking", AccountType::Checking, 500_000)
        .unwrap();

    app.clone().oneshot(get("/api/decision")).await.unwrap();

    let response = app.oneshot(get("/api/decision/history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history = get_body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

// ========== Debt API Tests ==========

fn seed_two_cards(db: &Database) {
    db.insert_debt(&NewDebt {
        name: "CardA".to_string(),
        balance_cents: 200_000,
        apr_percent: 24.0,
        minimum_payment_cents: Some(6_000),
        next_due_date: None,
    })
    .unwrap();
    db.insert_debt(&NewDebt {
        name: "CardB".to_string(),
        balance_cents: 50_000,
        apr_percent: 15.0,
        minimum_payment_cents: Some(2_500),
        next_due_date: None,
    })
    .unwrap();
}

#[tokio::test]
async fn test_strategy_comparison_orders() {
    let (db, app) = open_test_app();
    seed_two_cards(&db);

    let response = app.oneshot(get("/api/debts/strategies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let comparison = get_body_json(response).await;

    assert_eq!(comparison["avalanche"]["order"][0]["name"], "CardA");
    assert_eq!(comparison["avalanche"]["order"][1]["name"], "CardB");
    assert_eq!(comparison["snowball"]["order"][0]["name"], "CardB");
    assert_eq!(comparison["snowball"]["order"][1]["name"], "CardA");

    // No debt at or above 25% APR: quick wins get the nod
    assert_eq!(comparison["recommendation"], "snowball");
    assert!(comparison["savings_with_avalanche_cents"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn test_strategy_comparison_with_exclusion() {
    let (db, app) = open_test_app();
    seed_two_cards(&db);
    let debts = db.list_debts().unwrap();
    let card_a = debts.iter().find(|d| d.name == "CardA").unwrap().id;

    let response = app
        .oneshot(get(&format!(
            "/api/debts/strategies?extra_cents=10000&exclude={}",
            card_a
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let comparison = get_body_json(response).await;

    let order = comparison["avalanche"]["order"].as_array().unwrap();
    assert_eq!(order.len(), 1);
    assert_eq!(order[0]["name"], "CardB");
}

#[tokio::test]
async fn test_strategy_comparison_rejects_bad_exclude() {
    let (db, app) = open_test_app();
    seed_two_cards(&db);

    let response = app
        .oneshot(get("/api/debts/strategies?exclude=banana"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_debt_payment_and_status() {
    let (db, app) = open_test_app();
    seed_two_cards(&db);
    let debts = db.list_debts().unwrap();
    let card_b = debts.iter().find(|d| d.name == "CardB").unwrap().id;

    // Overpay CardB: clamps to zero and flips to paid_off
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/debts/{}/payments", card_b),
            serde_json::json!({ "amount_cents": 90_000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let debt = get_body_json(response).await;
    assert_eq!(debt["balance_cents"], 0);
    assert_eq!(debt["status"], "paid_off");

    // Invalid payment amount is a 400, not a 500
    let response = app
        .oneshot(post_json(
            &format!("/api/debts/{}/payments", card_b),
            serde_json::json!({ "amount_cents": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== APR Tool Tests ==========

#[tokio::test]
async fn test_estimate_apr_round_trip() {
    let (_db, app) = open_test_app();

    // $10,000 at 20% APR over 36 months pays $371.64/month
    let response = app
        .oneshot(post_json(
            "/api/tools/estimate-apr",
            serde_json::json!({
                "principal_cents": 1_000_000,
                "monthly_payment_cents": 37_164,
                "term_months": 36
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_body_json(response).await;
    let apr = body["apr_percent"].as_f64().unwrap();
    assert!((apr - 20.0).abs() <= 0.01, "apr was {}", apr);
}

#[tokio::test]
async fn test_estimate_apr_unresolvable() {
    let (_db, app) = open_test_app();

    // Payments sum below the principal: no rate can fit
    let response = app
        .oneshot(post_json(
            "/api/tools/estimate-apr",
            serde_json::json!({
                "principal_cents": 120_000,
                "monthly_payment_cents": 9_000,
                "term_months": 12
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = get_body_json(response).await;
    assert_eq!(body["error"], "unresolvable");
}

#[tokio::test]
async fn test_estimate_apr_near_zero_rate() {
    let (_db, app) = open_test_app();

    let response = app
        .oneshot(post_json(
            "/api/tools/estimate-apr",
            serde_json::json!({
                "principal_cents": 1_000,
                "monthly_payment_cents": 10,
                "term_months": 200
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = get_body_json(response).await;
    let apr = body["apr_percent"].as_f64().unwrap();
    assert!(apr.is_finite());
    assert!(apr >= 0.0);
}

// ========== Auth Tests ==========

#[tokio::test]
async fn test_auth_required_by_default() {
    let db = Database::in_memory().unwrap();
    let app = create_router(db, None, ServerConfig::default());

    let response = app.clone().oneshot(get("/api/accounts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The proxy identity header opens the door
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/accounts")
                .header("x-auth-request-email", "ada@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_key_auth() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        api_keys: vec!["sekret".to_string()],
        ..Default::default()
    };
    let app = create_router(db, None, config);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/accounts")
                .header("authorization", "Bearer sekret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/accounts")
                .header("authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ========== Dashboard Tests ==========

#[tokio::test]
async fn test_dashboard_metrics_shape() {
    let (db, app) = open_test_app();
    db.upsert_account("Checking", AccountType::Checking, 300_000)
        .unwrap();
    seed_two_cards(&db);

    let response = app.oneshot(get("/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let dashboard = get_body_json(response).await;

    assert_eq!(dashboard["metrics"]["cash_available_cents"], 300_000);
    assert_eq!(dashboard["active_debt_count"], 2);
    assert_eq!(dashboard["debt_balance_cents"], 250_000);
    assert_eq!(dashboard["minimum_payments_cents"], 8_500);
}
