use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{
    DonationType, InquiryType, MessageStatus, PaymentMethod, PaymentStatus, Portal, Role,
    User, VerifyDecision,
};

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Which gated surface the client is heading for, if any. The login
    /// form sends `""` when no portal is selected; that means no gate,
    /// same as omitting the field.
    #[serde(default, deserialize_with = "portal_or_empty")]
    pub portal: Option<Portal>,
}

fn portal_or_empty<'de, D>(deserializer: D) -> Result<Option<Portal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some("admin") => Ok(Some(Portal::Admin)),
        Some("owner") => Ok(Some(Portal::Owner)),
        Some(other) => Err(serde::de::Error::unknown_variant(other, &["admin", "owner"])),
    }
}

/// User shape returned to clients. Never carries the credential.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

// -- Users --

/// Fields an owner may change on an account. Role changes included.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub role: Option<Role>,
    pub email: Option<String>,
    pub password: Option<String>,
}

// -- Donations --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    pub donor_name: String,
    pub donor_email: String,
    pub amount: String,
    pub currency: Option<String>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub donation_type: DonationType,
    #[serde(default)]
    pub is_anonymous: bool,
    pub reference_number: Option<String>,
    pub sender_number: Option<String>,
}

/// Partial donation update. This is how the browser attaches gateway results
/// (payment status plus the intent/order id) after a card or PayPal flow.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationUpdate {
    pub payment_status: Option<PaymentStatus>,
    pub stripe_payment_intent_id: Option<String>,
    pub paypal_order_id: Option<String>,
    pub reference_number: Option<String>,
    pub sender_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub status: VerifyDecision,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationStats {
    pub total_amount: f64,
    pub total_count: usize,
    pub pending_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_donations: f64,
    pub donation_count: usize,
    pub pending_messages: usize,
    pub pending_g_cash_payments: usize,
}

// -- Contact --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub inquiry_type: InquiryType,
    pub message: String,
    #[serde(default)]
    pub subscribe_updates: bool,
}

#[derive(Debug, Deserialize)]
pub struct ContactUpdate {
    pub status: MessageStatus,
}

// -- Payments --

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    pub amount: String,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: String,
    pub currency: Option<String>,
}

// -- Pagination --

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}
