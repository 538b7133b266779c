//! End-to-end tests driving the production router in-process, no sockets.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use careworks_api::auth::AppStateInner;
use careworks_api::routes;
use careworks_gateway::paypal::{self, PaypalClient};
use careworks_gateway::stripe::StripeClient;
use careworks_store::Store;

fn app() -> Router {
    // Gateways unconfigured: their endpoints answer 500, everything else is live.
    routes::router(Arc::new(AppStateInner {
        store: Store::new(),
        stripe: None,
        paypal: None,
    }))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
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

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["sessionId"].as_str().unwrap().to_string()
}

fn gcash_donation(amount: &str) -> Value {
    json!({
        "donorName": "Jane",
        "donorEmail": "j@x.com",
        "amount": amount,
        "paymentMethod": "gcash",
        "referenceNumber": "REF1",
        "senderNumber": "09123456789"
    })
}

#[tokio::test]
async fn login_returns_sanitized_user_and_session() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("password").is_none());
    assert!(body["sessionId"].as_str().unwrap().parse::<Uuid>().is_ok());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "wrongpass" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_empty_portal_is_ungated() {
    let app = app();
    // the login form sends portal: "" when no portal was picked
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123", "portal": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["sessionId"].as_str().unwrap().parse::<Uuid>().is_ok());
}

#[tokio::test]
async fn admin_cannot_enter_owner_portal() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123", "portal": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // owner enters both portals
    for portal in ["admin", "owner"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "owner", "password": "owner123", "portal": portal })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn donation_creation_starts_pending() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/donations", None, Some(gcash_donation("50.00"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["paymentStatus"], "pending");
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["donationType"], "one-time");

    let id = body["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/donations/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], body["id"]);
}

#[tokio::test]
async fn donation_validation_failures_are_400() {
    let app = app();

    let mut bad_amount = gcash_donation("0");
    bad_amount["amount"] = json!("0");
    let (status, body) = send(&app, "POST", "/api/donations", None, Some(bad_amount)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid amount");

    let mut bad_method = gcash_donation("50.00");
    bad_method["paymentMethod"] = json!("venmo");
    let (status, _) = send(&app, "POST", "/api/donations", None, Some(bad_method)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gcash_verification_scenario() {
    let app = app();

    let (_, created) = send(&app, "POST", "/api/donations", None, Some(gcash_donation("50.00"))).await;
    let id = created["id"].as_str().unwrap().to_string();

    let token = login(&app, "admin", "admin123").await;

    let (status, queue) = send(&app, "GET", "/api/gcash/pending", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue.as_array().unwrap().len(), 1);

    let (status, verified) = send(
        &app,
        "PATCH",
        &format!("/api/gcash/{}/verify", id),
        Some(&token),
        Some(json!({ "status": "verified" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["paymentStatus"], "completed");

    let (status, stats) = send(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalDonations"], 50.0);
    assert_eq!(stats["donationCount"], 1);
    assert_eq!(stats["pendingGCashPayments"], 0);
}

#[tokio::test]
async fn gcash_rejection_marks_failed() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/donations", None, Some(gcash_donation("25.00"))).await;
    let id = created["id"].as_str().unwrap().to_string();
    let token = login(&app, "admin", "admin123").await;

    let (status, rejected) = send(
        &app,
        "PATCH",
        &format!("/api/gcash/{}/verify", id),
        Some(&token),
        Some(json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["paymentStatus"], "failed");

    // failed donations never count toward the total
    let (_, stats) = send(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(stats["totalDonations"], 0.0);
    assert_eq!(stats["donationCount"], 1);
}

#[tokio::test]
async fn gcash_verify_unknown_id_is_404() {
    let app = app();
    let token = login(&app, "admin", "admin123").await;
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/gcash/{}/verify", Uuid::new_v4()),
        Some(&token),
        Some(json!({ "status": "verified" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_asserted_completion_via_patch() {
    let app = app();
    let (_, created) = send(
        &app,
        "POST",
        "/api/donations",
        None,
        Some(json!({
            "donorName": "Jane",
            "donorEmail": "j@x.com",
            "amount": "100.00",
            "paymentMethod": "stripe"
        })),
    )
    .await;
    assert_eq!(created["paymentStatus"], "pending");
    let id = created["id"].as_str().unwrap();

    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/api/donations/{}", id),
        None,
        Some(json!({ "paymentStatus": "completed", "stripePaymentIntentId": "pi_123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["paymentStatus"], "completed");
    assert_eq!(patched["stripePaymentIntentId"], "pi_123");
}

#[tokio::test]
async fn dashboard_endpoints_require_admin_role() {
    let app = app();

    // no token
    let (status, _) = send(&app, "GET", "/api/donations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // garbage token
    let (status, _) = send(&app, "GET", "/api/admin/stats", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // plain user role
    let (status, registered) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "jane", "email": "jane@example.com", "password": "longenough" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_token = registered["sessionId"].as_str().unwrap();

    let (status, _) = send(&app, "GET", "/api/donations", Some(user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "GET", "/api/contact", Some(user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn owner_portal_gates_user_updates() {
    let app = app();
    let admin_token = login(&app, "admin", "admin123").await;
    let owner_token = login(&app, "owner", "owner123").await;

    let (_, registered) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "jane", "email": "jane@example.com", "password": "longenough" })),
    )
    .await;
    let user_id = registered["user"]["id"].as_str().unwrap().to_string();

    // admin may not manage accounts
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}", user_id),
        Some(&admin_token),
        Some(json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // owner may
    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}", user_id),
        Some(&owner_token),
        Some(json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "admin");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}", Uuid::new_v4()),
        Some(&owner_token),
        Some(json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_rejects_duplicates() {
    let app = app();
    let body = json!({ "username": "jane", "email": "jane@example.com", "password": "longenough" });
    let (status, _) = send(&app, "POST", "/api/auth/register", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "POST", "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // seeded operator email collides too
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "sneaky", "email": "admin@careworks.org", "password": "longenough" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn contact_inbox_flow() {
    let app = app();
    let (status, message) = send(
        &app,
        "POST",
        "/api/contact",
        None,
        Some(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "subject": "Sponsorship",
            "inquiryType": "sponsorship",
            "message": "How do I sponsor a child?",
            "subscribeUpdates": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message["status"], "unread");
    let id = message["id"].as_str().unwrap().to_string();

    let token = login(&app, "admin", "admin123").await;

    let (_, stats) = send(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(stats["pendingMessages"], 1);

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/contact/{}", id),
        Some(&token),
        Some(json!({ "status": "replied" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "replied");

    let (_, stats) = send(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(stats["pendingMessages"], 0);
}

#[tokio::test]
async fn logout_invalidates_session_and_is_idempotent() {
    let app = app();
    let token = login(&app, "admin", "admin123").await;

    let (status, _) = send(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_gateways_answer_500() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/create-payment-intent",
        None,
        Some(json!({ "amount": "50.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Stripe not configured");

    let (status, _) = send(&app, "GET", "/api/paypal/setup", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn payment_endpoints_reject_non_finite_amounts() {
    // Gateways configured with dummy credentials: validation must fail the
    // request before any gateway call is attempted.
    let app = routes::router(Arc::new(AppStateInner {
        store: Store::new(),
        stripe: Some(StripeClient::new("sk_test_dummy".into())),
        paypal: Some(PaypalClient::new(
            "client-id".into(),
            "client-secret".into(),
            paypal::SANDBOX_BASE_URL.into(),
        )),
    }));

    for amount in ["NaN", "inf", "-5", "0", "abc"] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/create-payment-intent",
            None,
            Some(json!({ "amount": amount })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "stripe amount {:?}", amount);
        assert_eq!(body["message"], "Invalid amount");

        let (status, body) = send(
            &app,
            "POST",
            "/api/paypal/order",
            None,
            Some(json!({ "amount": amount })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "paypal amount {:?}", amount);
        assert_eq!(body["message"], "Invalid amount");
    }
}

#[tokio::test]
async fn unknown_donation_is_404_with_message() {
    let app = app();
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/donations/{}", Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Donation not found");
}

#[tokio::test]
async fn donations_list_paginates() {
    let app = app();
    for i in 0..3 {
        send(
            &app,
            "POST",
            "/api/donations",
            None,
            Some(gcash_donation(&format!("{}.00", i + 1))),
        )
        .await;
    }
    let token = login(&app, "admin", "admin123").await;

    let (status, page) = send(
        &app,
        "GET",
        "/api/donations?limit=2&offset=0",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.as_array().unwrap().len(), 2);
}
