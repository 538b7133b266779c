//! PayPal orders client: client-credentials OAuth, order create, order
//! capture. A fresh access token is fetched per call; this backend's payment
//! volume does not justify token caching.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

pub const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

#[derive(Clone)]
pub struct PaypalClient {
    http: Client,
    client_id: String,
    client_secret: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl PaypalClient {
    pub fn new(client_id: String, client_secret: String, base_url: String) -> Self {
        PaypalClient {
            http: Client::new(),
            client_id,
            client_secret,
            base_url,
        }
    }

    /// Client id for the browser SDK bootstrap (`GET /api/paypal/setup`).
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    async fn access_token(&self) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("paypal token request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("paypal token request rejected: {}", response.status()));
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .context("malformed paypal token response")?;
        Ok(token.access_token)
    }

    /// Create an order for a one-shot capture. Returns the gateway's order
    /// JSON verbatim; the browser SDK consumes it as-is.
    pub async fn create_order(&self, amount: &str, currency: &str) -> Result<Value> {
        let token = self.access_token().await?;
        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": currency,
                    "value": amount,
                }
            }],
        });

        debug!(amount, currency, "creating paypal order");

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .context("paypal order request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("paypal order rejected: {}", response.status()));
        }

        response
            .json::<Value>()
            .await
            .context("malformed paypal order response")
    }

    pub async fn capture_order(&self, order_id: &str) -> Result<Value> {
        let token = self.access_token().await?;

        debug!(order_id, "capturing paypal order");

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders/{}/capture", self.base_url, order_id))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .context("paypal capture request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "paypal capture of order {} rejected: {}",
                order_id,
                response.status()
            ));
        }

        response
            .json::<Value>()
            .await
            .context("malformed paypal capture response")
    }
}
