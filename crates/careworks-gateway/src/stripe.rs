//! Stripe payment-intent client.
//!
//! The server's only card-payment responsibility is minting the intent; the
//! browser confirms the charge against Stripe directly with the returned
//! client secret.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::to_minor_units;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    secret_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self::with_base_url(secret_key, STRIPE_API_BASE.to_string())
    }

    pub fn with_base_url(secret_key: String, base_url: String) -> Self {
        StripeClient {
            http: Client::new(),
            secret_key,
            base_url,
        }
    }

    /// Create a payment intent for `amount` (decimal string) in `currency`.
    /// Stripe takes amounts in minor units, form-encoded.
    pub async fn create_payment_intent(
        &self,
        amount: &str,
        currency: &str,
        donation_id: Option<&str>,
    ) -> Result<PaymentIntent> {
        let minor_units = to_minor_units(amount)?;
        let params = [
            ("amount", minor_units.to_string()),
            ("currency", currency.to_lowercase()),
            (
                "metadata[donationId]",
                donation_id.unwrap_or_default().to_string(),
            ),
        ];

        debug!(amount = minor_units, currency, "creating stripe payment intent");

        let response = self
            .http
            .post(format!("{}/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .context("stripe request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| "unknown stripe error".to_string());
            return Err(anyhow!("stripe rejected payment intent ({}): {}", status, message));
        }

        let intent = response
            .json::<PaymentIntent>()
            .await
            .context("malformed stripe payment intent response")?;
        Ok(intent)
    }
}
