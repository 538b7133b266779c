//! Inbound contact messages. Created unread; status overwrites are not
//! transition-checked (any status may replace any other).

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use careworks_types::api::{ContactUpdate, NewContactMessage};
use careworks_types::models::{ContactMessage, MessageStatus};

use crate::Store;

impl Store {
    pub fn create_message(&self, new: NewContactMessage) -> Result<ContactMessage> {
        let message = ContactMessage {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            subject: new.subject,
            inquiry_type: new.inquiry_type,
            message: new.message,
            subscribe_updates: new.subscribe_updates,
            status: MessageStatus::Unread,
            created_at: Utc::now(),
        };
        let mut messages = self.lock_messages()?;
        messages.insert(message.id, message.clone());
        Ok(message)
    }

    pub fn get_message(&self, id: Uuid) -> Result<Option<ContactMessage>> {
        Ok(self.lock_messages()?.get(&id).cloned())
    }

    pub fn update_message(&self, id: Uuid, updates: ContactUpdate) -> Result<Option<ContactMessage>> {
        let mut messages = self.lock_messages()?;
        let Some(message) = messages.get_mut(&id) else {
            return Ok(None);
        };
        message.status = updates.status;
        Ok(Some(message.clone()))
    }

    /// Newest first.
    pub fn list_messages(&self, limit: usize, offset: usize) -> Result<Vec<ContactMessage>> {
        let messages = self.lock_messages()?;
        let mut all: Vec<ContactMessage> = messages.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    pub fn unread_count(&self) -> Result<usize> {
        Ok(self
            .lock_messages()?
            .values()
            .filter(|m| m.status == MessageStatus::Unread)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careworks_types::models::InquiryType;

    fn inquiry(subject: &str) -> NewContactMessage {
        NewContactMessage {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            subject: subject.into(),
            inquiry_type: InquiryType::Volunteer,
            message: "I'd like to help.".into(),
            subscribe_updates: true,
        }
    }

    #[test]
    fn messages_start_unread() {
        let store = Store::new();
        let message = store.create_message(inquiry("Volunteering")).unwrap();
        assert_eq!(message.status, MessageStatus::Unread);
        assert_eq!(store.unread_count().unwrap(), 1);
    }

    #[test]
    fn status_update_changes_unread_count() {
        let store = Store::new();
        let a = store.create_message(inquiry("One")).unwrap();
        store.create_message(inquiry("Two")).unwrap();

        store
            .update_message(a.id, ContactUpdate { status: MessageStatus::Replied })
            .unwrap()
            .unwrap();
        assert_eq!(store.unread_count().unwrap(), 1);
        assert_eq!(
            store.get_message(a.id).unwrap().unwrap().status,
            MessageStatus::Replied
        );
    }

    #[test]
    fn any_status_overwrite_is_allowed() {
        let store = Store::new();
        let message = store.create_message(inquiry("One")).unwrap();
        store
            .update_message(message.id, ContactUpdate { status: MessageStatus::Replied })
            .unwrap();
        // replied back to unread is legal; no transition validation
        let back = store
            .update_message(message.id, ContactUpdate { status: MessageStatus::Unread })
            .unwrap()
            .unwrap();
        assert_eq!(back.status, MessageStatus::Unread);
    }

    #[test]
    fn update_unknown_id_is_none() {
        let store = Store::new();
        assert!(store
            .update_message(Uuid::new_v4(), ContactUpdate { status: MessageStatus::Read })
            .unwrap()
            .is_none());
    }
}
