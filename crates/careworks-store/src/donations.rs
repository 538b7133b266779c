//! Donation records and the stats rollup feeding the dashboards.

use anyhow::Result;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use careworks_types::api::{DonationStats, DonationUpdate, NewDonation};
use careworks_types::models::{Donation, PaymentStatus};

use crate::Store;

impl Store {
    /// Every donation starts `pending` regardless of what the caller sent;
    /// status only moves through an update.
    pub fn create_donation(&self, new: NewDonation) -> Result<Donation> {
        let now = Utc::now();
        let donation = Donation {
            id: Uuid::new_v4(),
            donor_name: new.donor_name,
            donor_email: new.donor_email,
            amount: new.amount,
            currency: new.currency.unwrap_or_else(|| "USD".to_string()),
            payment_method: new.payment_method,
            payment_status: PaymentStatus::Pending,
            donation_type: new.donation_type,
            is_anonymous: new.is_anonymous,
            reference_number: new.reference_number,
            sender_number: new.sender_number,
            stripe_payment_intent_id: None,
            paypal_order_id: None,
            created_at: now,
            updated_at: now,
        };
        let mut donations = self.lock_donations()?;
        donations.insert(donation.id, donation.clone());
        Ok(donation)
    }

    pub fn get_donation(&self, id: Uuid) -> Result<Option<Donation>> {
        Ok(self.lock_donations()?.get(&id).cloned())
    }

    pub fn update_donation(&self, id: Uuid, updates: DonationUpdate) -> Result<Option<Donation>> {
        let mut donations = self.lock_donations()?;
        let Some(donation) = donations.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = updates.payment_status {
            donation.payment_status = status;
        }
        if let Some(intent_id) = updates.stripe_payment_intent_id {
            donation.stripe_payment_intent_id = Some(intent_id);
        }
        if let Some(order_id) = updates.paypal_order_id {
            donation.paypal_order_id = Some(order_id);
        }
        if let Some(reference) = updates.reference_number {
            donation.reference_number = Some(reference);
        }
        if let Some(sender) = updates.sender_number {
            donation.sender_number = Some(sender);
        }
        donation.updated_at = Utc::now();
        Ok(Some(donation.clone()))
    }

    /// Newest first.
    pub fn list_donations(&self, limit: usize, offset: usize) -> Result<Vec<Donation>> {
        let donations = self.lock_donations()?;
        let mut all: Vec<Donation> = donations.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    pub fn donations_by_status(&self, status: PaymentStatus) -> Result<Vec<Donation>> {
        let donations = self.lock_donations()?;
        let mut matching: Vec<Donation> = donations
            .values()
            .filter(|d| d.payment_status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    pub fn donation_stats(&self) -> Result<DonationStats> {
        let donations = self.lock_donations()?;
        let mut total_amount = 0.0;
        let mut pending_count = 0;
        for donation in donations.values() {
            match donation.payment_status {
                PaymentStatus::Completed => match donation.amount.parse::<f64>() {
                    Ok(amount) => total_amount += amount,
                    Err(_) => {
                        warn!(id = %donation.id, amount = %donation.amount,
                              "unparseable amount on completed donation, skipping in stats");
                    }
                },
                PaymentStatus::Pending => pending_count += 1,
                PaymentStatus::Failed => {}
            }
        }
        Ok(DonationStats {
            total_amount,
            total_count: donations.len(),
            pending_count,
        })
    }
}
