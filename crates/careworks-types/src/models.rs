use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account roles, ordered least to most privileged. The derived `Ord`
/// is the role hierarchy used by the access-control policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Owner,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// The two privileged dashboard surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Admin,
    Owner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Stripe,
    Paypal,
    Gcash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DonationType {
    OneTime,
    Monthly,
    Sponsorship,
}

impl Default for DonationType {
    fn default() -> Self {
        DonationType::OneTime
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    Sponsorship,
    Donation,
    Volunteer,
    Partnership,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
    Replied,
}

/// Operator decision on a pending GCash payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyDecision {
    Verified,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Stored and compared as an opaque plaintext credential. Hashing is an
    /// explicit non-goal of this deployment; do not serialize outward.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A bearer session. The id doubles as the opaque token handed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub donor_name: String,
    pub donor_email: String,
    /// Decimal string, e.g. "50.00". Kept as text end to end; only parsed
    /// for validation, stats, and minor-unit conversion.
    pub amount: String,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub donation_type: DonationType,
    pub is_anonymous: bool,
    pub reference_number: Option<String>,
    pub sender_number: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub paypal_order_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub inquiry_type: InquiryType,
    pub message: String,
    pub subscribe_updates: bool,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}
