use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use pin_ledger::{
    ledger::{Ledger, in_memory_ledger::InMemoryLedger},
    service::{DEFAULT_ADDR, Service, ServiceConfig, load_seed, routes},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

const TEST_SEED: &str = include_str!("accounts.csv");

fn reference_app() -> Router {
    let service = Service::new(ServiceConfig {
        addr: DEFAULT_ADDR.parse().unwrap(),
        seed_path: None,
    });
    routes::router(Arc::new(service.build_ledger().unwrap()))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn number(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

#[tokio::test]
async fn root_reports_running() {
    let app = reference_app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Bank API running" }));
}

#[tokio::test]
async fn authenticate_route() {
    let app = reference_app();

    let (status, body) = post(
        &app,
        "/authenticate",
        json!({ "name": "uzma", "pin_number": "1234" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "uzma");
    assert_eq!(number(&body["bank_balance"]), 5000.0);

    let wrong_pin = post(
        &app,
        "/authenticate",
        json!({ "name": "uzma", "pin_number": "0000" }),
    )
    .await;
    let unknown = post(
        &app,
        "/authenticate",
        json!({ "name": "nobody", "pin_number": "1234" }),
    )
    .await;
    assert_eq!(wrong_pin.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pin, unknown);
    assert_eq!(
        wrong_pin.1,
        json!({ "error": "invalid_credentials", "message": "Invalid Credentials" })
    );
}

#[tokio::test]
async fn deposit_route() {
    let app = reference_app();

    let (status, body) = post(&app, "/deposit", json!({ "name": "ali", "amount": 250.5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(number(&body["bank_balance"]), 10250.5);

    let (status, body) = post(&app, "/deposit", json!({ "name": "ali", "amount": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Deposit amount must be positive");

    let (status, body) = post(&app, "/deposit", json!({ "name": "zed", "amount": 10 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": "account_not_found", "message": "User not found" })
    );
}

#[tokio::test]
async fn deposit_past_max_balance_is_rejected() {
    let app = reference_app();
    let big: Value =
        serde_json::from_str(r#"{"name":"ahmed","amount":70000000000000000000000000000}"#)
            .unwrap();

    let (status, first) = post(&app, "/deposit", big.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(&app, "/deposit", big).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({ "error": "balance_overflow", "message": "Balance limit exceeded" })
    );

    // the rejected deposit left the balance where the first one put it
    let (_, body) = post(
        &app,
        "/authenticate",
        json!({ "name": "ahmed", "pin_number": "1111" }),
    )
    .await;
    assert_eq!(body["bank_balance"], first["bank_balance"]);
}

#[tokio::test]
async fn transfer_errors() {
    let app = reference_app();
    let transfer = |sender: &str, pin: &str, recipient: &str, amount: i64| {
        json!({
            "sender_name": sender,
            "sender_pin": pin,
            "recipient_name": recipient,
            "amount": amount,
        })
    };

    let cases = [
        (
            transfer("zed", "1234", "ahmed", 10),
            StatusCode::NOT_FOUND,
            "Sender not found",
        ),
        (
            transfer("uzma", "1234", "zed", 10),
            StatusCode::NOT_FOUND,
            "Recipient not found",
        ),
        (
            transfer("uzma", "1234", "uzma", 10),
            StatusCode::BAD_REQUEST,
            "Cannot transfer to yourself",
        ),
        (
            transfer("uzma", "1111", "ahmed", 10),
            StatusCode::UNAUTHORIZED,
            "Invalid Credentials",
        ),
        (
            transfer("uzma", "1234", "ahmed", -5),
            StatusCode::BAD_REQUEST,
            "Transfer amount must be positive",
        ),
        (
            transfer("uzma", "1234", "ahmed", 5001),
            StatusCode::UNPROCESSABLE_ENTITY,
            "Insufficient funds",
        ),
    ];
    for (request, expected_status, expected_message) in cases {
        let (status, body) = post(&app, "/bank-transfer", request).await;
        assert_eq!(status, expected_status);
        assert_eq!(body["message"], expected_message);
    }

    for (name, pin, balance) in [("uzma", "1234", 5000.0), ("ahmed", "1111", 3000.0)] {
        let (_, body) = post(
            &app,
            "/authenticate",
            json!({ "name": name, "pin_number": pin }),
        )
        .await;
        assert_eq!(number(&body["bank_balance"]), balance);
    }
}

#[tokio::test]
async fn reference_scenario() {
    let app = reference_app();

    let (status, body) = post(
        &app,
        "/bank-transfer",
        json!({
            "sender_name": "uzma",
            "sender_pin": "1234",
            "recipient_name": "ahmed",
            "amount": 1500,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transfer successful");
    assert_eq!(number(&body["sender_new_balance"]), 3500.0);
    assert_eq!(number(&body["recipient_new_balance"]), 4500.0);

    let (_, body) = post(&app, "/deposit", json!({ "name": "ahmed", "amount": 500 })).await;
    assert_eq!(number(&body["bank_balance"]), 5000.0);

    let (status, body) = post(
        &app,
        "/bank-transfer",
        json!({
            "sender_name": "ahmed",
            "sender_pin": "1111",
            "recipient_name": "uzma",
            "amount": 20000,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "insufficient_funds");

    let (_, uzma) = post(
        &app,
        "/authenticate",
        json!({ "name": "uzma", "pin_number": "1234" }),
    )
    .await;
    let (_, ahmed) = post(
        &app,
        "/authenticate",
        json!({ "name": "ahmed", "pin_number": "1111" }),
    )
    .await;
    assert_eq!(number(&uzma["bank_balance"]), 3500.0);
    assert_eq!(number(&ahmed["bank_balance"]), 5000.0);
}

#[tokio::test]
async fn malformed_payload_never_reaches_ledger() {
    let app = reference_app();
    let request = Request::builder()
        .method("POST")
        .uri("/deposit")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"ali"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());

    let (_, body) = post(
        &app,
        "/authenticate",
        json!({ "name": "ali", "pin_number": "2222" }),
    )
    .await;
    assert_eq!(number(&body["bank_balance"]), 10000.0);
}

#[test]
fn seed_from_csv() {
    let ledger = InMemoryLedger::new();
    assert_eq!(load_seed(&ledger, TEST_SEED.as_bytes()).unwrap(), 2);
    assert_eq!(ledger.balance("carol").unwrap(), Decimal::new(25050, 2));
    assert!(ledger.authenticate("carol", "0007").is_ok());
    assert!(ledger.authenticate("carol", "7").is_err());
    // built-in accounts are not present
    assert!(ledger.balance("uzma").is_err());

    // loading the same file again hits duplicates
    assert!(load_seed(&ledger, TEST_SEED.as_bytes()).is_err());
}

#[test]
fn service_uses_seed_file() {
    let config = ServiceConfig {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        seed_path: Some(PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/accounts.csv"
        ))),
    };
    let ledger = Service::new(config).build_ledger().unwrap();
    assert_eq!(ledger.total_balance().unwrap(), Decimal::new(25050, 2));

    let missing = ServiceConfig {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        seed_path: Some(PathBuf::from("does/not/exist.csv")),
    };
    let err = Service::new(missing).build_ledger().unwrap_err();
    assert!(err.to_string().contains("Failed to open"));
}
