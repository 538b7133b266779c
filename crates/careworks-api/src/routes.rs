//! Route table. Assembled here (rather than in the server binary) so the
//! integration tests can drive the exact production router.

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::auth::{self, AppState};
use crate::{contact, donations, payments, users};

pub fn router(state: AppState) -> Router {
    Router::new()
        // auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/register", post(auth::register))
        // donations
        .route(
            "/api/donations",
            post(donations::create_donation).get(donations::list_donations),
        )
        .route(
            "/api/donations/{id}",
            get(donations::get_donation).patch(donations::update_donation),
        )
        .route("/api/donations-stats", get(donations::donation_stats))
        // gcash verification queue
        .route("/api/gcash/pending", get(donations::gcash_pending))
        .route("/api/gcash/{id}/verify", patch(donations::gcash_verify))
        // contact inbox
        .route(
            "/api/contact",
            post(contact::create_message).get(contact::list_messages),
        )
        .route("/api/contact/{id}", patch(contact::update_message))
        // dashboards
        .route("/api/admin/stats", get(donations::admin_stats))
        .route("/api/users/{id}", patch(users::update_user))
        // payment gateways
        .route(
            "/api/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route("/api/paypal/setup", get(payments::paypal_setup))
        .route("/api/paypal/order", post(payments::paypal_create_order))
        .route(
            "/api/paypal/order/{order_id}/capture",
            post(payments::paypal_capture_order),
        )
        .with_state(state)
}
