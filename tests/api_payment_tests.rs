//! Payment API integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::create_test_app;

#[tokio::test]
async fn test_process_payment_success() {
    let app = create_test_app();
    let token = app.register_user("alice", "VOLUNTEER").await;

    let response = app
        .request(
            Method::POST,
            "/payments/process",
            Some(&token),
            Some(json!({
                "bankAccountNumber": "12345678",
                "amount": 150,
                "paymentInfo": "Clean water"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["message"], "Payment of 150.00 processed for account ****5678");
    assert!(uuid::Uuid::parse_str(body["transactionId"].as_str().unwrap()).is_ok());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_process_payment_long_account_fails() {
    let app = create_test_app();
    let token = app.register_user("alice", "VOLUNTEER").await;

    let response = app
        .request(
            Method::POST,
            "/payments/process",
            Some(&token),
            Some(json!({
                "bankAccountNumber": "123456789012345678",
                "amount": 500,
                "paymentInfo": "Clean water"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["status"], "FAILED");
}

#[tokio::test]
async fn test_process_payment_validation() {
    let app = create_test_app();
    let token = app.register_user("alice", "VOLUNTEER").await;

    for body in [
        json!({"bankAccountNumber": "12345", "amount": 150, "paymentInfo": "x"}),
        json!({"bankAccountNumber": "12345678", "amount": 99, "paymentInfo": "x"}),
        json!({"bankAccountNumber": "12345678", "amount": 150, "paymentInfo": "  "}),
        json!({"bankAccountNumber": "12345678", "amount": "lots", "paymentInfo": "x"}),
    ] {
        let response = app
            .request(Method::POST, "/payments/process", Some(&token), Some(body))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_payments_require_authentication() {
    let app = create_test_app();
    let response = app
        .request(
            Method::POST,
            "/payments/process",
            None,
            Some(json!({
                "bankAccountNumber": "12345678",
                "amount": 150,
                "paymentInfo": "Clean water"
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_receipt_is_pdf() {
    let app = create_test_app();
    let token = app.register_user("alice", "VOLUNTEER").await;

    let response = app
        .request(
            Method::POST,
            "/payments/receipt",
            Some(&token),
            Some(json!({
                "bankAccountNumber": "12345678",
                "amount": 150,
                "paymentInfo": "Clean water"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.content_type.as_deref(), Some("application/pdf"));
    assert!(response.bytes.starts_with(b"%PDF"));
}
